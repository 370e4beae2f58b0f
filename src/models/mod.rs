use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of pelota court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum CanchaType {
    Trinquete,
    #[serde(rename = "Frontón")]
    #[sqlx(rename = "Frontón")]
    Fronton,
    #[serde(rename = "Cajón")]
    #[sqlx(rename = "Cajón")]
    Cajon,
}

impl CanchaType {
    pub const ALL: [CanchaType; 3] = [CanchaType::Trinquete, CanchaType::Fronton, CanchaType::Cajon];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanchaType::Trinquete => "Trinquete",
            CanchaType::Fronton => "Frontón",
            CanchaType::Cajon => "Cajón",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCanchaType(pub String);

impl fmt::Display for UnknownCanchaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type must be one of Trinquete, Frontón, Cajón (got {:?})", self.0)
    }
}

impl FromStr for CanchaType {
    type Err = UnknownCanchaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanchaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownCanchaType(s.to_string()))
    }
}

/// Domain attributes shared by published and pending canchas.
/// Approval copies this struct as a whole, so anything added here travels
/// with a promoted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CanchaDetails {
    pub club: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: CanchaType,
    pub maps_location: String,
    pub phone: String,
}

/// Published cancha, row of the `canchas` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cancha {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: CanchaDetails,
    pub image: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Submitted cancha waiting for moderation, row of the `pending_canchas` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingCancha {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: CanchaDetails,
    pub image: Option<String>,
    pub pending: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for inserting into `canchas`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCancha {
    pub details: CanchaDetails,
    pub image: String,
}

/// Validated payload for inserting into `pending_canchas`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPendingCancha {
    pub details: CanchaDetails,
    pub image: Option<String>,
}

impl PendingCancha {
    /// Payload for publishing this submission. Store-managed columns (id,
    /// timestamps, the pending flag) are left behind.
    pub fn to_new_cancha(&self) -> Result<NewCancha, String> {
        let image = self
            .image
            .clone()
            .ok_or_else(|| "image is required to publish a cancha".to_string())?;

        Ok(NewCancha {
            details: self.details.clone(),
            image,
        })
    }
}

/// Raw cancha attributes as they arrive from a client, before validation.
/// Every field is optional so a missing one is reported as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CanchaForm {
    pub club: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub maps_location: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
    pub image: Option<String>,
}

/// Accepts a JSON string or number, keeping numbers in their literal form.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

impl CanchaForm {
    /// Stores a text field received by name, ignoring unknown names.
    pub fn set_field(&mut self, name: &str, value: String) {
        let slot = match name {
            "club" => &mut self.club,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "type" => &mut self.kind,
            "maps_location" => &mut self.maps_location,
            "phone" => &mut self.phone,
            "image" => &mut self.image,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Checks required attributes and the court type.
    /// Blank strings count as missing.
    pub fn into_details(self) -> Result<(CanchaDetails, Option<String>), String> {
        let mut missing = Vec::new();
        let mut take = |name: &'static str, value: Option<String>| -> String {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let club = take("club", self.club);
        let city = take("city", self.city);
        let state = take("state", self.state);
        let kind = take("type", self.kind);
        let maps_location = take("maps_location", self.maps_location);
        let phone = take("phone", self.phone);

        if !missing.is_empty() {
            return Err(format!("missing required fields: {}", missing.join(", ")));
        }

        let kind = kind.parse::<CanchaType>().map_err(|e| e.to_string())?;
        let image = self.image.filter(|i| !i.trim().is_empty());

        Ok((
            CanchaDetails {
                club,
                city,
                state,
                kind,
                maps_location,
                phone,
            },
            image,
        ))
    }
}

/// Body of PUT /pending-canchas/{id}
#[derive(Debug, Deserialize)]
pub struct UpdatePendingRequest {
    pub pending: bool,
}

/// Plain `{ message }` acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response of the approve endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub message: String,
    pub cancha: Cancha,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CanchaForm {
        CanchaForm {
            club: Some("Club X".into()),
            city: Some("Bariloche".into()),
            state: Some("Rio Negro".into()),
            kind: Some("Trinquete".into()),
            maps_location: Some("Luelmo 38".into()),
            phone: Some("2944112233".into()),
            image: None,
        }
    }

    #[test]
    fn cancha_type_parses_accented_literals() {
        assert_eq!("Frontón".parse::<CanchaType>(), Ok(CanchaType::Fronton));
        assert_eq!("Cajón".parse::<CanchaType>(), Ok(CanchaType::Cajon));
        assert!("Fronton".parse::<CanchaType>().is_err());
        assert!("trinquete".parse::<CanchaType>().is_err());
    }

    #[test]
    fn cancha_type_serializes_as_literal() {
        let json = serde_json::to_string(&CanchaType::Cajon).unwrap();
        assert_eq!(json, "\"Cajón\"");
    }

    #[test]
    fn form_reports_every_missing_field() {
        let mut f = form();
        f.club = None;
        f.phone = Some("   ".into());

        let err = f.into_details().unwrap_err();
        assert!(err.contains("club"));
        assert!(err.contains("phone"));
        assert!(!err.contains("city"));
    }

    #[test]
    fn form_rejects_unknown_type() {
        let mut f = form();
        f.kind = Some("Padel".into());

        assert!(f.into_details().unwrap_err().contains("Padel"));
    }

    #[test]
    fn set_field_maps_form_names() {
        let mut f = CanchaForm::default();
        f.set_field("type", "Cajón".into());
        f.set_field("maps_location", "Calle 1".into());
        f.set_field("unknown", "ignored".into());

        assert_eq!(f.kind.as_deref(), Some("Cajón"));
        assert_eq!(f.maps_location.as_deref(), Some("Calle 1"));
        assert_eq!(f.club, None);
    }

    #[test]
    fn form_accepts_numeric_phone() {
        let form: CanchaForm = serde_json::from_value(serde_json::json!({
            "club": "Club X",
            "phone": 2944112233u64,
        }))
        .unwrap();
        assert_eq!(form.phone.as_deref(), Some("2944112233"));

        let form: CanchaForm = serde_json::from_value(serde_json::json!({ "club": "Club X" })).unwrap();
        assert_eq!(form.phone, None);

        let nested = serde_json::from_value::<CanchaForm>(serde_json::json!({ "phone": ["1"] }));
        assert!(nested.is_err());
    }

    #[test]
    fn form_drops_blank_image() {
        let mut f = form();
        f.image = Some("".into());

        let (details, image) = f.into_details().unwrap();
        assert_eq!(details.kind, CanchaType::Trinquete);
        assert_eq!(image, None);
    }

    #[test]
    fn pending_without_image_cannot_be_published() {
        let (details, _) = form().into_details().unwrap();
        let pending = PendingCancha {
            id: 1,
            details,
            image: None,
            pending: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(pending.to_new_cancha().is_err());
    }
}
