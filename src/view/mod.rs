//! Rendering the listing as a table or as stacked cards, chosen by width.

pub mod cards;
pub mod table;

use crate::flow::{ListingFlow, ListingStatus};
use crate::form::{DISPLAY_DATE_FORMAT, parse_date};
use crate::locale::Locale;
use crate::schema::{BIRTH_DATE, EMAIL, FIRST_NAME, FieldDescriptor, FieldKind, FieldSet, LAST_NAME, PHONE};
use crate::store::Record;

/// Below this width (in CSS pixels) a browser viewport counts as narrow.
pub const DEFAULT_NARROW_BREAKPOINT: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Table,
    Cards,
}

impl Layout {
    pub fn for_width(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint {
            Self::Cards
        } else {
            Self::Table
        }
    }
}

/// Tracks the viewport width and the layout it implies.
#[derive(Debug, Clone)]
pub struct ResponsiveView {
    breakpoint: u32,
    width: u32,
    layout: Layout,
}

impl ResponsiveView {
    pub fn new(breakpoint: u32, width: u32) -> Self {
        Self {
            breakpoint,
            width,
            layout: Layout::for_width(width, breakpoint),
        }
    }

    /// Record a new width. Returns true when the layout switched.
    pub fn resize(&mut self, width: u32) -> bool {
        let layout = Layout::for_width(width, self.breakpoint);
        let changed = layout != self.layout;
        if changed {
            tracing::debug!("Viewport {} -> {width}: switching to {layout:?}", self.width);
        }
        self.width = width;
        self.layout = layout;
        changed
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_narrow(&self) -> bool {
        self.layout == Layout::Cards
    }
}

/// Width of the attached terminal in columns, if there is one.
pub fn terminal_width() -> Option<u32> {
    comfy_table::Table::new().width().map(u32::from)
}

/// Text shown for one field of one record. Dates are shown `DD.MM.YYYY`,
/// missing values as `-`.
pub fn display_value(record: &Record, field: &FieldDescriptor) -> String {
    let fields = &record.fields;
    let text = match field.key.as_str() {
        FIRST_NAME => fields.first_name.clone(),
        LAST_NAME => fields.last_name.clone(),
        EMAIL => fields.email.clone(),
        PHONE => fields.phone.clone(),
        BIRTH_DATE => fields
            .birth_date
            .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        key => match fields.extra.get(key) {
            Some(serde_json::Value::String(s)) => match field.kind {
                FieldKind::Date { .. } => parse_date(s.get(..10).unwrap_or(s))
                    .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
                    .unwrap_or_else(|_| s.clone()),
                _ => s.clone(),
            },
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
    };

    if text.is_empty() { "-".to_string() } else { text }
}

pub struct Renderer<'a> {
    fields: &'a FieldSet,
    locale: Locale,
}

impl<'a> Renderer<'a> {
    pub fn new(fields: &'a FieldSet, locale: Locale) -> Self {
        Self { fields, locale }
    }

    /// Render the listing's current state: a loading line, the records in
    /// the chosen layout, and the last error if the latest fetch failed.
    pub fn render(&self, listing: &ListingFlow, view: &ResponsiveView) -> String {
        let records = listing.records();
        let mut output = match listing.status() {
            ListingStatus::Loading => return self.locale.loading().to_string(),
            _ if records.is_empty() => self.locale.no_records().to_string(),
            _ => self.render_records(records, view),
        };

        if let ListingStatus::Failed(message) = listing.status() {
            output.push_str(&format!("\n{}: {message}", self.locale.load_failed()));
        }

        output
    }

    pub fn render_records(&self, records: &[Record], view: &ResponsiveView) -> String {
        match view.layout() {
            Layout::Table => table::render(records, self.fields, self.locale, view.width()),
            Layout::Cards => cards::render(records, self.fields, self.locale, view.width()),
        }
    }
}
