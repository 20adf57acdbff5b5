//! Per-field validation. Each field is checked on its own; there are no
//! cross-field rules.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::form::{FieldValue, FormState};
use crate::locale::Locale;
use crate::schema::{FieldDescriptor, FieldKind, FieldSet, TextPattern};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Results for a whole form, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    results: Vec<(String, ValidationResult)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, r)| r.valid)
    }

    pub fn get(&self, key: &str) -> Option<&ValidationResult> {
        self.results
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, result)| result)
    }

    pub fn message_for(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|r| r.message.as_deref())
    }

    /// `(key, message)` for every failing field.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|(key, result)| {
            result
                .message
                .as_deref()
                .filter(|_| !result.valid)
                .map(|msg| (key.as_str(), msg))
        })
    }

    pub fn failed_keys(&self) -> Vec<&str> {
        self.errors().map(|(key, _)| key).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in self.errors() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

pub struct Validator<'a> {
    fields: &'a FieldSet,
    locale: Locale,
    today: NaiveDate,
}

impl<'a> Validator<'a> {
    pub fn new(fields: &'a FieldSet, locale: Locale) -> Self {
        Self::with_today(fields, locale, Local::now().date_naive())
    }

    /// Fix "today" for the future-date check.
    pub fn with_today(fields: &'a FieldSet, locale: Locale, today: NaiveDate) -> Self {
        Self {
            fields,
            locale,
            today,
        }
    }

    pub fn validate_form(&self, form: &FormState) -> ValidationReport {
        let results = self
            .fields
            .iter()
            .map(|field| {
                let result = match form.value(&field.key) {
                    Some(value) => self.validate_field(field, value),
                    None => self.validate_field(field, &FieldValue::empty_for(&field.kind)),
                };
                (field.key.clone(), result)
            })
            .collect();

        ValidationReport { results }
    }

    pub fn validate_field(&self, field: &FieldDescriptor, value: &FieldValue) -> ValidationResult {
        match &field.kind {
            FieldKind::Text {
                required,
                min_length,
                pattern,
            } => self.check_text(field, value, *required, *min_length, pattern.as_ref()),
            FieldKind::Number { required, min, max } => {
                self.check_number(value, *required, *min, *max)
            }
            FieldKind::Date {
                required,
                allow_future,
            } => self.check_date(value, *required, *allow_future),
        }
    }

    fn check_text(
        &self,
        field: &FieldDescriptor,
        value: &FieldValue,
        required: bool,
        min_length: Option<usize>,
        pattern: Option<&TextPattern>,
    ) -> ValidationResult {
        let raw = value.as_text();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if !required {
                return ValidationResult::ok();
            }
            return match min_length {
                Some(min) if min > 0 => {
                    ValidationResult::fail(self.locale.min_length(&field.title, min))
                }
                _ => ValidationResult::fail(self.locale.required()),
            };
        }

        if let Some(min) = min_length
            && trimmed.chars().count() < min
        {
            return ValidationResult::fail(self.locale.min_length(&field.title, min));
        }

        if let Some(pattern) = pattern {
            let matches = self
                .fields
                .pattern_regex(&field.key, pattern)
                .is_some_and(|re| re.is_match(&raw));
            if !matches {
                let message = match pattern {
                    TextPattern::Email => self.locale.invalid_email(),
                    TextPattern::Phone => self.locale.invalid_phone(),
                    TextPattern::Regex(_) => self.locale.pattern_mismatch(&field.title),
                };
                return ValidationResult::fail(message);
            }
        }

        ValidationResult::ok()
    }

    fn check_number(
        &self,
        value: &FieldValue,
        required: bool,
        min: Option<i64>,
        max: Option<i64>,
    ) -> ValidationResult {
        match value.as_number() {
            Err(_) => ValidationResult::fail(self.locale.not_a_number()),
            Ok(None) if required => ValidationResult::fail(self.locale.required()),
            Ok(None) => ValidationResult::ok(),
            Ok(Some(n)) => {
                let below = min.is_some_and(|lo| n < lo);
                let above = max.is_some_and(|hi| n > hi);
                if below || above {
                    ValidationResult::fail(self.locale.out_of_range(min, max))
                } else {
                    ValidationResult::ok()
                }
            }
        }
    }

    fn check_date(&self, value: &FieldValue, required: bool, allow_future: bool) -> ValidationResult {
        match value.as_date() {
            Err(_) => ValidationResult::fail(self.locale.invalid_date()),
            Ok(None) if required => ValidationResult::fail(self.locale.choose_date()),
            Ok(None) => ValidationResult::ok(),
            Ok(Some(date)) if !allow_future && date > self.today => {
                ValidationResult::fail(self.locale.future_date())
            }
            Ok(Some(_)) => ValidationResult::ok(),
        }
    }
}
