//! Exact-match filters for the list endpoints.
//!
//! Query values arrive as raw `(key, value)` pairs. An attribute only
//! constrains the listing when it appears exactly once and parses into its
//! type; anything else is dropped rather than rejected, so `?type=Padel` or
//! `?city=Tandil&city=Azul` list every cancha.

use crate::models::CanchaType;

/// Raw query string pairs, in the order they were sent
pub type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CanchaFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub kind: Option<CanchaType>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingCanchaFilter {
    pub pending: Option<bool>,
}

impl CanchaFilter {
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        Self {
            city: single(pairs, "city").map(str::to_string),
            state: single(pairs, "state").map(str::to_string),
            kind: single(pairs, "type").and_then(|k| k.parse().ok()),
        }
    }
}

impl PendingCanchaFilter {
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        Self {
            pending: single(pairs, "pending").and_then(parse_flag),
        }
    }
}

/// Value of `key` when it was sent exactly once.
fn single<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str());
    let first = values.next()?;
    match values.next() {
        Some(_) => None,
        None => Some(first),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
