// SPDX-License-Identifier: MIT

//! Gym model with migration-aware decoding.
//!
//! Two legacy quirks are handled here and nowhere else:
//! - early documents stored the location under a misspelled `locaton` key;
//!   decoding accepts either key, encoding only ever writes `location`.
//! - `climbing_type` was historically a single string and is now a list;
//!   decoding accepts both shapes and skips unrecognized values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Climbing discipline offered by a gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimbingType {
    Bouldering,
    TopRope,
    Lead,
    Speed,
}

impl FromStr for ClimbingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bouldering" => Ok(Self::Bouldering),
            "top_rope" => Ok(Self::TopRope),
            "lead" => Ok(Self::Lead),
            "speed" => Ok(Self::Speed),
            _ => Err(()),
        }
    }
}

/// Climbing gym stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    /// Gym id (also used as document ID)
    pub id: String,
    pub name: String,
    pub email: String,
    /// Canonical location key; see module docs for the legacy fallback.
    #[serde(default)]
    pub location: String,
    /// Legacy misspelled location key, read-only. Never written back.
    #[serde(rename = "locaton", default, skip_serializing)]
    legacy_location: Option<String>,
    /// Disciplines offered; accepts a single legacy string or a list.
    #[serde(
        rename = "climbing_type",
        default,
        deserialize_with = "de_climbing_types"
    )]
    pub climbing_types: Vec<ClimbingType>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub created_at: DateTime<Utc>,
}

impl Gym {
    /// Fold the legacy location key into the canonical field.
    ///
    /// Repositories apply this to every decoded gym, so re-encoding a
    /// migrated document writes only the canonical key.
    pub fn normalized(mut self) -> Self {
        if self.location.is_empty() {
            if let Some(legacy) = self.legacy_location.take() {
                self.location = legacy;
            }
        }
        self.legacy_location = None;
        self
    }

    #[cfg(test)]
    pub(crate) fn test_gym(id: &str) -> Self {
        use chrono::TimeZone;
        Self {
            id: id.to_string(),
            name: format!("Gym {}", id),
            email: format!("{}@gyms.example.com", id),
            location: "Test Town".to_string(),
            legacy_location: None,
            climbing_types: vec![ClimbingType::Bouldering],
            amenities: vec![],
            events: vec![],
            description: None,
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }
}

/// Accept `"bouldering"` (legacy single value) or `["bouldering", ...]`.
/// Unrecognized values are skipped rather than failing the document.
fn de_climbing_types<'de, D>(deserializer: D) -> Result<Vec<ClimbingType>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw = match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => vec![],
    };

    Ok(raw
        .iter()
        .filter_map(|value| ClimbingType::from_str(value).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_location_key_read_canonical_written() {
        let json = serde_json::json!({
            "id": "g1",
            "name": "Crimp City",
            "email": "hello@crimpcity.example.com",
            "locaton": "14 Jug Lane",
            "climbing_type": ["bouldering", "lead"],
            "created_at": "2022-01-01T00:00:00Z",
        });
        let gym: Gym = serde_json::from_value(json).unwrap();
        let gym = gym.normalized();
        assert_eq!(gym.location, "14 Jug Lane");

        let encoded = serde_json::to_value(&gym).unwrap();
        assert_eq!(encoded["location"], "14 Jug Lane");
        assert!(encoded.get("locaton").is_none());
    }

    #[test]
    fn test_canonical_location_wins_over_legacy() {
        let json = serde_json::json!({
            "id": "g1",
            "name": "Crimp City",
            "email": "hello@crimpcity.example.com",
            "location": "New Address",
            "locaton": "Old Address",
            "created_at": "2022-01-01T00:00:00Z",
        });
        let gym: Gym = serde_json::from_value::<Gym>(json).unwrap().normalized();
        assert_eq!(gym.location, "New Address");
    }

    #[test]
    fn test_climbing_type_single_legacy_value() {
        let json = serde_json::json!({
            "id": "g1",
            "name": "Old School",
            "email": "x@example.com",
            "location": "Somewhere",
            "climbing_type": "top_rope",
            "created_at": "2022-01-01T00:00:00Z",
        });
        let gym: Gym = serde_json::from_value(json).unwrap();
        assert_eq!(gym.climbing_types, vec![ClimbingType::TopRope]);
    }

    #[test]
    fn test_climbing_type_unknown_values_skipped() {
        let json = serde_json::json!({
            "id": "g1",
            "name": "Odd Data",
            "email": "x@example.com",
            "location": "Somewhere",
            "climbing_type": ["bouldering", "ice_climbing"],
            "created_at": "2022-01-01T00:00:00Z",
        });
        let gym: Gym = serde_json::from_value(json).unwrap();
        assert_eq!(gym.climbing_types, vec![ClimbingType::Bouldering]);
    }

    #[test]
    fn test_climbing_type_absent_defaults_empty() {
        let json = serde_json::json!({
            "id": "g1",
            "name": "Minimal",
            "email": "x@example.com",
            "location": "Somewhere",
            "created_at": "2022-01-01T00:00:00Z",
        });
        let gym: Gym = serde_json::from_value(json).unwrap();
        assert!(gym.climbing_types.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let gym = Gym::test_gym("g7");
        let encoded = serde_json::to_value(&gym).unwrap();
        let decoded: Gym = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.normalized(), gym);
    }
}
