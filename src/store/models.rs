use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Store-assigned identifier. JSON collection servers hand out either
/// numbers or short strings, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(s.to_string())))
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

/// Everything about a record except its id. Also the create payload.
///
/// Empty registration fields are left out when serializing, so a form
/// configured without them sends only its own keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "birth_date")]
    pub birth_date: Option<NaiveDate>,
    /// Columns beyond the registration fields (e.g. `age`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
}

impl Record {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.fields.first_name, self.fields.last_name)
            .trim()
            .to_string()
    }
}

/// Partial update body: only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "birth_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `YYYY-MM-DD` on the wire. Reading is lenient: null, an empty string, or a
/// full timestamp whose date part is `YYYY-MM-DD` are all accepted.
mod birth_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::form::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        // A bare date, or a timestamp whose date part ends at `T` or a space.
        let date_part = match raw.as_bytes().get(10) {
            None => raw.as_str(),
            Some(b'T' | b' ') => &raw[..10],
            Some(_) => {
                return Err(serde::de::Error::custom(format!(
                    "invalid birthDate '{raw}': trailing characters"
                )));
            }
        };
        NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid birthDate '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_store_json() {
        let record: Record = serde_json::from_value(json!({
            "id": 7,
            "firstName": "Al",
            "lastName": "Li",
            "email": "a@b.co",
            "phone": "+79991234567",
            "birthDate": "2000-01-15",
            "age": 24
        }))
        .unwrap();

        assert_eq!(record.id, RecordId::Number(7));
        assert_eq!(record.full_name(), "Al Li");
        assert_eq!(record.fields.birth_date, NaiveDate::from_ymd_opt(2000, 1, 15));
        assert_eq!(record.fields.extra.get("age"), Some(&json!(24)));
        assert!(!record.fields.extra.contains_key("id"));
    }

    #[test]
    fn test_lenient_record_fields() {
        let record: Record = serde_json::from_value(json!({
            "id": "a1b2",
            "firstName": "Al",
            "birthDate": "2000-01-15T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(record.id, RecordId::Text("a1b2".into()));
        assert_eq!(record.fields.last_name, "");
        assert_eq!(record.fields.birth_date, NaiveDate::from_ymd_opt(2000, 1, 15));

        let no_date: Record =
            serde_json::from_value(json!({"id": 1, "birthDate": null})).unwrap();
        assert_eq!(no_date.fields.birth_date, None);
    }

    #[test]
    fn test_bad_birth_date_is_an_error() {
        let result = serde_json::from_value::<Record>(json!({"id": 1, "birthDate": "15/01/2000"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_birth_date_with_trailing_garbage_is_an_error() {
        for raw in ["2000-01-15garbage", "2000-01-15Z", "2000-01-150"] {
            let result = serde_json::from_value::<Record>(json!({"id": 1, "birthDate": raw}));
            assert!(result.is_err(), "accepted {raw}");
        }

        let spaced: Record =
            serde_json::from_value(json!({"id": 1, "birthDate": "2000-01-15 08:30:00"})).unwrap();
        assert_eq!(spaced.fields.birth_date, NaiveDate::from_ymd_opt(2000, 1, 15));
    }

    #[test]
    fn test_empty_registration_fields_are_not_sent() {
        let mut extra = Map::new();
        extra.insert("name".into(), json!("Al"));
        extra.insert("age".into(), json!(42));
        let fields = RecordFields {
            extra,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({"name": "Al", "age": 42})
        );
    }

    #[test]
    fn test_patch_only_sends_set_fields() {
        let patch = RecordPatch {
            email: Some("new@mail.example".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"email": "new@mail.example"})
        );
        assert!(!patch.is_empty());
        assert!(RecordPatch::default().is_empty());
    }

    #[test]
    fn test_record_id_parsing() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::Number(42));
        assert_eq!(
            "x9".parse::<RecordId>().unwrap(),
            RecordId::Text("x9".into())
        );
        assert_eq!(RecordId::Text("x9".into()).to_string(), "x9");
    }
}
