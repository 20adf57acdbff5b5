use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two languages the form and list are shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(format!("unsupported locale '{other}' (expected en or ru)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Ru => f.write_str("ru"),
        }
    }
}

impl Locale {
    // --- Validation messages ---

    pub fn required(self) -> String {
        match self {
            Self::En => "This field is required".into(),
            Self::Ru => "Обязательное поле".into(),
        }
    }

    pub fn min_length(self, title: &str, min: usize) -> String {
        match self {
            Self::En => format!("{title} must contain a minimum of {min} characters"),
            Self::Ru => format!("{title}: минимум {min} символа"),
        }
    }

    pub fn invalid_email(self) -> String {
        match self {
            Self::En => "Invalid email format".into(),
            Self::Ru => "Неверный формат email".into(),
        }
    }

    pub fn invalid_phone(self) -> String {
        match self {
            Self::En => "Invalid phone format".into(),
            Self::Ru => "Неверный формат телефона".into(),
        }
    }

    pub fn pattern_mismatch(self, title: &str) -> String {
        match self {
            Self::En => format!("{title} has an invalid format"),
            Self::Ru => format!("{title}: неверный формат"),
        }
    }

    pub fn choose_date(self) -> String {
        match self {
            Self::En => "Choose a birth date".into(),
            Self::Ru => "Выберите дату рождения".into(),
        }
    }

    pub fn invalid_date(self) -> String {
        match self {
            Self::En => "Enter a date as YYYY-MM-DD or DD.MM.YYYY".into(),
            Self::Ru => "Введите дату в формате ДД.ММ.ГГГГ".into(),
        }
    }

    pub fn future_date(self) -> String {
        match self {
            Self::En => "Date cannot be in the future".into(),
            Self::Ru => "Дата не может быть в будущем".into(),
        }
    }

    pub fn not_a_number(self) -> String {
        match self {
            Self::En => "Enter a number".into(),
            Self::Ru => "Введите число".into(),
        }
    }

    pub fn out_of_range(self, min: Option<i64>, max: Option<i64>) -> String {
        match (self, min, max) {
            (Self::En, Some(lo), Some(hi)) => format!("Value must be between {lo} and {hi}"),
            (Self::En, Some(lo), None) => format!("Value must be at least {lo}"),
            (Self::En, None, Some(hi)) => format!("Value must be at most {hi}"),
            (Self::Ru, Some(lo), Some(hi)) => format!("Значение должно быть от {lo} до {hi}"),
            (Self::Ru, Some(lo), None) => format!("Значение должно быть не меньше {lo}"),
            (Self::Ru, None, Some(hi)) => format!("Значение должно быть не больше {hi}"),
            (_, None, None) => self.not_a_number(),
        }
    }

    // --- Field titles ---

    pub fn first_name(self) -> &'static str {
        match self {
            Self::En => "First name",
            Self::Ru => "Имя",
        }
    }

    pub fn last_name(self) -> &'static str {
        match self {
            Self::En => "Last name",
            Self::Ru => "Фамилия",
        }
    }

    pub fn email(self) -> &'static str {
        "Email"
    }

    pub fn phone(self) -> &'static str {
        match self {
            Self::En => "Phone",
            Self::Ru => "Телефон",
        }
    }

    pub fn birth_date(self) -> &'static str {
        match self {
            Self::En => "Birth date",
            Self::Ru => "Дата рождения",
        }
    }

    // --- Listing ---

    pub fn actions(self) -> &'static str {
        match self {
            Self::En => "Actions",
            Self::Ru => "Действия",
        }
    }

    pub fn delete(self) -> &'static str {
        match self {
            Self::En => "Delete",
            Self::Ru => "Удалить",
        }
    }

    pub fn loading(self) -> &'static str {
        match self {
            Self::En => "Loading...",
            Self::Ru => "Загрузка...",
        }
    }

    pub fn no_records(self) -> &'static str {
        match self {
            Self::En => "No records yet.",
            Self::Ru => "Записей пока нет.",
        }
    }

    pub fn load_failed(self) -> &'static str {
        match self {
            Self::En => "Failed to load records",
            Self::Ru => "Ошибка при загрузке данных",
        }
    }

    // --- Form ---

    pub fn form_title(self) -> &'static str {
        match self {
            Self::En => "Registration form",
            Self::Ru => "Форма регистрации",
        }
    }

    pub fn submitting(self) -> &'static str {
        match self {
            Self::En => "Saving...",
            Self::Ru => "Сохранение...",
        }
    }

    pub fn saved(self) -> &'static str {
        match self {
            Self::En => "Record saved",
            Self::Ru => "Данные успешно сохранены",
        }
    }

    pub fn save_failed(self) -> &'static str {
        match self {
            Self::En => "Failed to save the record",
            Self::Ru => "Ошибка при сохранении данных",
        }
    }

    pub fn delete_failed(self) -> &'static str {
        match self {
            Self::En => "Failed to delete the record",
            Self::Ru => "Ошибка при удалении записи",
        }
    }

    /// Footer for a single page of the listing.
    pub fn page_summary(self, page: u32, shown: usize, total: u64) -> String {
        match self {
            Self::En => format!("Page {page}: {shown} of {total} record(s)"),
            Self::Ru => format!("Страница {page}: {shown} из {total} записей"),
        }
    }
}
