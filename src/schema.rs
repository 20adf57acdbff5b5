//! Field descriptors: the columns a form collects and a listing shows.
//!
//! Each descriptor pairs a key with a [`FieldKind`], and the kind decides
//! which validation settings exist. A number field has no pattern and a
//! text field has no range, so those combinations cannot be written down.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::locale::Locale;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const BIRTH_DATE: &str = "birthDate";

/// Letters, digits and `._%+-` before the `@`, a dotted domain, 2+ letter TLD.
pub(crate) static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

/// Optional `+`, a non-zero first digit, then 7 to 14 more digits.
pub(crate) static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{7,14}$").expect("Invalid phone regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPattern {
    Email,
    Phone,
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum FieldKind {
    Text {
        #[serde(default)]
        required: bool,
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        pattern: Option<TextPattern>,
    },
    Number {
        #[serde(default)]
        required: bool,
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
    },
    Date {
        #[serde(default)]
        required: bool,
        #[serde(default)]
        allow_future: bool,
    },
}

impl FieldKind {
    pub fn is_required(&self) -> bool {
        match self {
            Self::Text { required, .. }
            | Self::Number { required, .. }
            | Self::Date { required, .. } => *required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub title: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(key: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            kind,
        }
    }

    pub fn text(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            key,
            title,
            FieldKind::Text {
                required: true,
                min_length: None,
                pattern: None,
            },
        )
    }
}

/// An ordered set of descriptors with unique keys.
#[derive(Debug, Clone)]
pub struct FieldSet {
    fields: Vec<FieldDescriptor>,
    custom_patterns: HashMap<String, Regex>,
}

impl FieldSet {
    /// Build a set, rejecting duplicate keys and custom patterns that do not
    /// compile.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut custom_patterns = HashMap::new();

        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.key == field.key) {
                return Err(AppError::DuplicateFieldKey(field.key.clone()));
            }

            if let FieldKind::Text {
                pattern: Some(TextPattern::Regex(pattern)),
                ..
            } = &field.kind
            {
                let regex = Regex::new(pattern).map_err(|source| AppError::InvalidPattern {
                    key: field.key.clone(),
                    source,
                })?;
                custom_patterns.insert(field.key.clone(), regex);
            }
        }

        Ok(Self {
            fields,
            custom_patterns,
        })
    }

    /// The registration form: first and last name, email, phone, birth date.
    pub fn defaults(locale: Locale) -> Self {
        let name = |key: &str, title: &str| {
            FieldDescriptor::new(
                key,
                title,
                FieldKind::Text {
                    required: true,
                    min_length: Some(2),
                    pattern: None,
                },
            )
        };
        let patterned = |key: &str, title: &str, pattern: TextPattern| {
            FieldDescriptor::new(
                key,
                title,
                FieldKind::Text {
                    required: true,
                    min_length: None,
                    pattern: Some(pattern),
                },
            )
        };

        Self {
            fields: vec![
                name(FIRST_NAME, locale.first_name()),
                name(LAST_NAME, locale.last_name()),
                patterned(EMAIL, locale.email(), TextPattern::Email),
                patterned(PHONE, locale.phone(), TextPattern::Phone),
                FieldDescriptor::new(
                    BIRTH_DATE,
                    locale.birth_date(),
                    FieldKind::Date {
                        required: true,
                        allow_future: false,
                    },
                ),
            ],
            custom_patterns: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn pattern_regex<'a>(
        &'a self,
        key: &str,
        pattern: &TextPattern,
    ) -> Option<&'a Regex> {
        match pattern {
            TextPattern::Email => Some(&*EMAIL_RE),
            TextPattern::Phone => Some(&*PHONE_RE),
            TextPattern::Regex(_) => self.custom_patterns.get(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_registration_fields() {
        let fields = FieldSet::defaults(Locale::En);
        let keys: Vec<_> = fields.keys().collect();
        assert_eq!(keys, vec![FIRST_NAME, LAST_NAME, EMAIL, PHONE, BIRTH_DATE]);
        assert!(fields.iter().all(|f| f.kind.is_required()));
        assert_eq!(fields.get(PHONE).unwrap().title, "Phone");

        let ru = FieldSet::defaults(Locale::Ru);
        assert_eq!(ru.get(FIRST_NAME).unwrap().title, "Имя");
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = FieldSet::new(vec![
            FieldDescriptor::text("email", "Email"),
            FieldDescriptor::text("name", "Name"),
            FieldDescriptor::text("email", "Email again"),
        ]);
        assert!(matches!(result, Err(AppError::DuplicateFieldKey(k)) if k == "email"));
    }

    #[test]
    fn test_invalid_custom_pattern_rejected() {
        let result = FieldSet::new(vec![FieldDescriptor::new(
            "code",
            "Code",
            FieldKind::Text {
                required: true,
                min_length: None,
                pattern: Some(TextPattern::Regex("([a-z".into())),
            },
        )]);
        assert!(matches!(result, Err(AppError::InvalidPattern { key, .. }) if key == "code"));
    }

    #[test]
    fn test_custom_pattern_compiled() {
        let fields = FieldSet::new(vec![FieldDescriptor::new(
            "firstName",
            "First Name",
            FieldKind::Text {
                required: true,
                min_length: None,
                pattern: Some(TextPattern::Regex(r"^[A-Za-z\s-]+$".into())),
            },
        )])
        .unwrap();
        let pattern = TextPattern::Regex(String::new());
        let regex = fields.pattern_regex("firstName", &pattern).unwrap();
        assert!(regex.is_match("Mary-Jane"));
        assert!(!regex.is_match("R2D2"));
    }

    #[test]
    fn test_descriptor_from_json() {
        let json = r#"{
            "key": "age",
            "title": "Age",
            "kind": { "type": "number", "required": true, "min": 18, "max": 100 }
        }"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            field.kind,
            FieldKind::Number {
                required: true,
                min: Some(18),
                max: Some(100),
            }
        );

        let email = r#"{"key": "email", "title": "Email", "kind": {"type": "text", "pattern": "email"}}"#;
        let field: FieldDescriptor = serde_json::from_str(email).unwrap();
        assert!(matches!(
            field.kind,
            FieldKind::Text {
                pattern: Some(TextPattern::Email),
                ..
            }
        ));
    }

    #[test]
    fn test_pattern_on_number_is_unrepresentable() {
        let json = r#"{
            "key": "age",
            "title": "Age",
            "kind": { "type": "number", "pattern": "email" }
        }"#;
        assert!(serde_json::from_str::<FieldDescriptor>(json).is_err());
    }
}
