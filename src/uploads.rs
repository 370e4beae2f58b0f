//! Storage of submitted cancha images.
//!
//! Files land in the configured upload directory and are served back under
//! [`PUBLIC_PREFIX`]; records keep the public path, never the bytes.

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// URL prefix uploaded images are served from
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Placeholder file expected in the upload directory
pub const DEFAULT_IMAGE_FILE: &str = "cancha_default.webp";

/// Image used when a submission comes without one
pub const DEFAULT_IMAGE_PATH: &str = "/uploads/cancha_default.webp";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid file name pattern"));

/// An image written to the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Name of the file inside the upload directory
    pub file_name: String,
    pub public_path: String,
}

/// Public path of the uploaded image, or the placeholder when nothing was uploaded.
pub fn resolve_image(upload: Option<&StoredUpload>) -> String {
    match upload {
        Some(upload) => upload.public_path.clone(),
        None => DEFAULT_IMAGE_PATH.to_string(),
    }
}

/// Strips directories from a client-supplied name and replaces anything
/// outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');

    if base.is_empty() {
        return "image".to_string();
    }

    UNSAFE_CHARS.replace_all(base, "_").into_owned()
}

/// Writes `bytes` to `dir` as `<unix-millis>-<sanitized name>`.
pub async fn save_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> io::Result<StoredUpload> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    );
    tokio::fs::write(dir.join(&file_name), bytes).await?;

    tracing::info!(file = %file_name, size = bytes.len(), "stored uploaded image");

    Ok(StoredUpload {
        public_path: format!("{PUBLIC_PREFIX}/{file_name}"),
        file_name,
    })
}

/// Deletes a stored image whose record never made it into the database.
pub async fn remove_upload(dir: &Path, upload: &StoredUpload) -> io::Result<()> {
    tokio::fs::remove_file(dir.join(&upload.file_name)).await?;

    tracing::info!(file = %upload.file_name, "removed orphaned upload");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_path_points_into_public_prefix() {
        assert_eq!(DEFAULT_IMAGE_PATH, format!("{PUBLIC_PREFIX}/{DEFAULT_IMAGE_FILE}"));
    }

    #[test]
    fn resolve_falls_back_to_placeholder() {
        assert_eq!(resolve_image(None), DEFAULT_IMAGE_PATH);

        let upload = StoredUpload {
            file_name: "1-a.png".into(),
            public_path: "/uploads/1-a.png".into(),
        };
        assert_eq!(resolve_image(Some(&upload)), "/uploads/1-a.png");
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\fotos\\cancha 1.jpg"), "cancha_1.jpg");
        assert_eq!(sanitize_file_name("frontón.webp"), "front_n.webp");
        assert_eq!(sanitize_file_name(".."), "image");
        assert_eq!(sanitize_file_name(""), "image");
    }

    #[tokio::test]
    async fn save_upload_writes_file_under_public_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");

        let stored = save_upload(&nested, "cancha.png", b"png-bytes").await.unwrap();

        let file_name = stored.public_path.strip_prefix("/uploads/").unwrap();
        assert_eq!(file_name, stored.file_name);
        assert!(file_name.ends_with("-cancha.png"));
        let written = tokio::fs::read(nested.join(file_name)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn remove_upload_deletes_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        let keep = save_upload(dir.path(), "keep.png", b"a").await.unwrap();
        let discard = save_upload(dir.path(), "discard.png", b"b").await.unwrap();

        remove_upload(dir.path(), &discard).await.unwrap();

        assert!(!dir.path().join(&discard.file_name).exists());
        assert!(dir.path().join(&keep.file_name).exists());
        assert!(remove_upload(dir.path(), &discard).await.is_err());
    }
}
