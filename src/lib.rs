//! Registration form and record list backed by a REST JSON record store.
//!
//! Writes go form → [`validate`] → [`flow::SubmissionFlow`] → [`store`], then
//! bump a refresh trigger; reads go [`store`] → [`flow::ListingFlow`] →
//! [`view`], which picks a table or card layout from the available width.

pub mod app;
pub mod config;
pub mod error;
pub mod flow;
pub mod form;
pub mod locale;
pub mod schema;
pub mod store;
pub mod validate;
pub mod view;

pub use app::App;
pub use config::Config;
pub use error::{AppError, Result};
pub use form::{FieldValue, FormState};
pub use locale::Locale;
pub use schema::{FieldDescriptor, FieldKind, FieldSet, TextPattern};
pub use store::{HttpRecordStore, MemoryStore, Record, RecordFields, RecordId, RecordPatch, RecordStore};
pub use validate::{ValidationReport, ValidationResult, Validator};
pub use view::{Layout, ResponsiveView};
