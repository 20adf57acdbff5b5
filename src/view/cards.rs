use super::display_value;
use crate::locale::Locale;
use crate::schema::{FIRST_NAME, FieldSet, LAST_NAME};
use crate::store::Record;

const MAX_CARD_WIDTH: usize = 48;

/// One stacked card per record: the full name with a delete hint, then the
/// remaining fields one per line.
pub fn render(records: &[Record], fields: &FieldSet, locale: Locale, width: u32) -> String {
    let rule = "─".repeat((width as usize).clamp(8, MAX_CARD_WIDTH));
    let has_name = fields.get(FIRST_NAME).is_some() || fields.get(LAST_NAME).is_some();

    let cards: Vec<String> = records
        .iter()
        .map(|record| {
            let heading = if has_name {
                record.full_name()
            } else {
                format!("#{}", record.id)
            };

            let mut card = format!("{rule}\n{heading}  [{} #{}]\n", locale.delete(), record.id);
            for field in fields
                .iter()
                .filter(|f| f.key != FIRST_NAME && f.key != LAST_NAME)
            {
                card.push_str(&format!("  {}: {}\n", field.title, display_value(record, field)));
            }
            card
        })
        .collect();

    let mut output = cards.concat();
    output.push_str(&rule);
    output
}
