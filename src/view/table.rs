use comfy_table::{Cell, ContentArrangement, Table};

use super::display_value;
use crate::locale::Locale;
use crate::schema::FieldSet;
use crate::store::Record;

/// One row per record, one column per field, plus a delete action column.
pub fn render(records: &[Record], fields: &FieldSet, locale: Locale, width: u32) -> String {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(u16::try_from(width).unwrap_or(u16::MAX));

    let mut header: Vec<&str> = fields.iter().map(|f| f.title.as_str()).collect();
    header.push(locale.actions());
    table.set_header(header);

    for record in records {
        let mut row: Vec<Cell> = fields
            .iter()
            .map(|f| Cell::new(display_value(record, f)))
            .collect();
        row.push(Cell::new(format!("{} #{}", locale.delete(), record.id)));
        table.add_row(row);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{RecordFields, RecordId};

    #[test]
    fn test_table_has_header_and_action_column() {
        let fields = FieldSet::defaults(Locale::Ru);
        let records = vec![Record {
            id: RecordId::Number(4),
            fields: RecordFields {
                first_name: "Иван".into(),
                last_name: "Петров".into(),
                email: "ivan@mail.ru".into(),
                phone: "+79991234567".into(),
                birth_date: None,
                ..Default::default()
            },
        }];

        let out = render(&records, &fields, Locale::Ru, 200);
        for title in ["Имя", "Фамилия", "Email", "Телефон", "Дата рождения", "Действия"] {
            assert!(out.contains(title), "missing column {title}");
        }
        assert!(out.contains("Иван"));
        assert!(out.contains("Удалить #4"));
    }
}
