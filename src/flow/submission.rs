//! The write path: validate, build the payload, create, reset.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, Result};
use crate::flow::RefreshTrigger;
use crate::form::FormState;
use crate::locale::Locale;
use crate::schema::FieldSet;
use crate::store::{Record, RecordStore};
use crate::validate::Validator;

pub struct SubmissionFlow {
    store: Arc<dyn RecordStore>,
    fields: Arc<FieldSet>,
    locale: Locale,
    refresh: RefreshTrigger,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the submission finishes, whichever way.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SubmissionFlow {
    pub fn new(
        store: Arc<dyn RecordStore>,
        fields: Arc<FieldSet>,
        locale: Locale,
        refresh: RefreshTrigger,
    ) -> Self {
        Self {
            store,
            fields,
            locale,
            refresh,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validate `form` and, if every field passes, create the record.
    ///
    /// Validation failures attach messages to the form and never reach the
    /// store. On success the form is reset and the listing is told to
    /// re-fetch; on a failed request the form keeps its values.
    pub async fn submit(&self, form: &mut FormState) -> Result<Record> {
        let _guard =
            InFlightGuard::acquire(&self.in_flight).ok_or(AppError::SubmissionInProgress)?;

        let report = Validator::new(&self.fields, self.locale).validate_form(form);
        form.apply_report(&report);
        if !report.is_valid() {
            tracing::debug!("Submission blocked by validation: {report}");
            return Err(AppError::Validation(report));
        }

        let payload = form.to_record_fields(&self.fields);
        match self.store.create(&payload).await {
            Ok(record) => {
                tracing::info!("Record {} saved", record.id);
                form.reset(&self.fields);
                self.refresh.bump();
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Failed to save record: {e}");
                Err(e)
            }
        }
    }
}
