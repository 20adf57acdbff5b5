//! Form state: the values being edited and the messages shown next to them.

use std::collections::HashMap;
use std::num::ParseIntError;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::schema::{BIRTH_DATE, EMAIL, FIRST_NAME, FieldKind, FieldSet, LAST_NAME, PHONE};
use crate::store::{RecordFields, RecordPatch};
use crate::validate::ValidationReport;

/// Wire format for dates sent to the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format dates are shown in, and accepted as input.
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

pub fn parse_date(input: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(Option<i64>),
    Date(Option<NaiveDate>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn empty_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Text { .. } => Self::Text(String::new()),
            FieldKind::Number { .. } => Self::Number(None),
            FieldKind::Date { .. } => Self::Date(None),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.map(|n| n.to_string()).unwrap_or_default(),
            Self::Date(d) => d
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    pub fn as_number(&self) -> std::result::Result<Option<i64>, ParseIntError> {
        match self {
            Self::Number(n) => Ok(*n),
            other => {
                let text = other.as_text();
                let text = text.trim();
                if text.is_empty() {
                    Ok(None)
                } else {
                    text.parse().map(Some)
                }
            }
        }
    }

    pub fn as_date(&self) -> std::result::Result<Option<NaiveDate>, chrono::ParseError> {
        match self {
            Self::Date(d) => Ok(*d),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => parse_date(s).map(Some),
            Self::Number(None) => Ok(None),
            Self::Number(Some(n)) => parse_date(&n.to_string()).map(Some),
        }
    }

    fn to_json(&self, kind: &FieldKind) -> Value {
        match kind {
            FieldKind::Text { .. } => Value::String(self.as_text()),
            FieldKind::Number { .. } => match self.as_number() {
                Ok(Some(n)) => Value::from(n),
                _ => Value::Null,
            },
            FieldKind::Date { .. } => match self.as_date() {
                Ok(Some(d)) => Value::String(d.format(DATE_FORMAT).to_string()),
                _ => Value::Null,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: HashMap<String, FieldValue>,
    errors: HashMap<String, String>,
}

impl FormState {
    pub fn new(fields: &FieldSet) -> Self {
        let mut form = Self::default();
        form.reset(fields);
        form
    }

    /// Set a field's value, clearing any message attached to it.
    pub fn set(&mut self, key: &str, value: FieldValue) -> Result<()> {
        let slot = self
            .values
            .get_mut(key)
            .ok_or_else(|| AppError::UnknownField(key.to_string()))?;
        *slot = value;
        self.errors.remove(key);
        Ok(())
    }

    /// Set a field from typed input, converting it to the field's kind when
    /// it parses. Unparseable input is kept as text so validation can report it.
    pub fn set_input(&mut self, fields: &FieldSet, key: &str, raw: &str) -> Result<()> {
        let field = fields
            .get(key)
            .ok_or_else(|| AppError::UnknownField(key.to_string()))?;

        let text = FieldValue::text(raw);
        let value = match &field.kind {
            FieldKind::Text { .. } => text,
            FieldKind::Number { .. } => text.as_number().map(FieldValue::Number).unwrap_or(text),
            FieldKind::Date { .. } => text.as_date().map(FieldValue::Date).unwrap_or(text),
        };
        self.set(key, value)
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn apply_report(&mut self, report: &ValidationReport) {
        self.errors = report
            .errors()
            .map(|(key, message)| (key.to_string(), message.to_string()))
            .collect();
    }

    pub fn reset(&mut self, fields: &FieldSet) {
        self.values = fields
            .iter()
            .map(|f| (f.key.clone(), FieldValue::empty_for(&f.kind)))
            .collect();
        self.errors.clear();
    }

    /// Build the create payload. Known record fields map onto the record;
    /// any other descriptor lands in the record's extra fields.
    pub fn to_record_fields(&self, fields: &FieldSet) -> RecordFields {
        let mut record = RecordFields::default();

        for field in fields.iter() {
            let value = self
                .values
                .get(&field.key)
                .cloned()
                .unwrap_or_else(|| FieldValue::empty_for(&field.kind));

            match field.key.as_str() {
                FIRST_NAME => record.first_name = value.as_text(),
                LAST_NAME => record.last_name = value.as_text(),
                EMAIL => record.email = value.as_text(),
                PHONE => record.phone = value.as_text(),
                BIRTH_DATE => record.birth_date = value.as_date().ok().flatten(),
                key => {
                    record
                        .extra
                        .insert(key.to_string(), value.to_json(&field.kind));
                }
            }
        }

        record
    }

    /// Build a partial update carrying only the fields named in `keys`.
    pub fn to_record_patch<'k>(
        &self,
        fields: &FieldSet,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> RecordPatch {
        let mut patch = RecordPatch::default();

        for key in keys {
            let (Some(field), Some(value)) = (fields.get(key), self.values.get(key)) else {
                continue;
            };
            match key {
                FIRST_NAME => patch.first_name = Some(value.as_text()),
                LAST_NAME => patch.last_name = Some(value.as_text()),
                EMAIL => patch.email = Some(value.as_text()),
                PHONE => patch.phone = Some(value.as_text()),
                BIRTH_DATE => patch.birth_date = value.as_date().ok().flatten(),
                key => {
                    patch
                        .extra
                        .insert(key.to_string(), value.to_json(&field.kind));
                }
            }
        }

        patch
    }
}
