use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::flow::{ListingFlow, RefreshTrigger, SubmissionFlow};
use crate::form::FormState;
use crate::locale::Locale;
use crate::schema::FieldSet;
use crate::store::{Record, RecordStore};
use crate::view::{Renderer, ResponsiveView};

/// Owns the field configuration and wires it into the form, the listing and
/// the view.
pub struct App {
    pub locale: Locale,
    pub fields: Arc<FieldSet>,
    pub submission: SubmissionFlow,
    pub listing: ListingFlow,
    pub view: ResponsiveView,
    store: Arc<dyn RecordStore>,
}

impl App {
    pub fn new(config: &Config, store: Arc<dyn RecordStore>, width: u32) -> Result<Self> {
        let fields = Arc::new(config.field_set()?);
        Ok(Self::with_fields(
            fields,
            config.locale,
            store,
            ResponsiveView::new(config.view.narrow_breakpoint, width),
        ))
    }

    pub fn with_fields(
        fields: Arc<FieldSet>,
        locale: Locale,
        store: Arc<dyn RecordStore>,
        view: ResponsiveView,
    ) -> Self {
        let refresh = RefreshTrigger::new();
        Self {
            locale,
            submission: SubmissionFlow::new(store.clone(), fields.clone(), locale, refresh.clone()),
            listing: ListingFlow::new(store.clone(), refresh),
            fields,
            view,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn new_form(&self) -> FormState {
        FormState::new(&self.fields)
    }

    /// Submit the form; on success the listing re-fetches before returning.
    /// A failed re-fetch does not undo the save; it shows up in the listing.
    pub async fn submit(&mut self, form: &mut FormState) -> Result<Record> {
        let record = self.submission.submit(form).await?;
        if let Err(e) = self.listing.sync().await {
            tracing::warn!("Listing not refreshed after saving {}: {e}", record.id);
        }
        Ok(record)
    }

    /// Render the listing at `width`, switching layout if the width crossed
    /// the breakpoint.
    pub fn render(&mut self, width: u32) -> String {
        self.view.resize(width);
        Renderer::new(&self.fields, self.locale).render(&self.listing, &self.view)
    }
}
