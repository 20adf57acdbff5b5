pub mod add;
pub mod delete;
pub mod list;
pub mod shell;
pub mod update;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use regform::store::RecordId;
use regform::view::terminal_width;
use regform::{FieldSet, Locale, ValidationReport};

/// Columns used when there is no terminal to measure.
const FALLBACK_WIDTH: u32 = 80;

#[derive(Parser)]
#[command(
    name = "regform",
    version,
    about = "Register people in a REST record store and browse the records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to config.toml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Record store base URL, e.g. http://localhost:3001
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Render width in columns (defaults to the terminal width)
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Language for labels and messages (en, ru)
    #[arg(long, global = true)]
    pub locale: Option<Locale>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fill in the registration form and submit it
    Add {
        #[command(flatten)]
        values: RecordArgs,
    },
    /// Show the records in the store
    List {
        /// Show a single page instead of everything
        #[arg(long)]
        page: Option<u32>,
    },
    /// Delete a record by ID
    Delete {
        /// Record ID
        id: RecordId,
    },
    /// Change some fields of an existing record
    Update {
        /// Record ID
        id: RecordId,
        #[command(flatten)]
        values: RecordArgs,
    },
    /// Interactive form and record list
    Shell,
}

#[derive(clap::Args, Debug, Default)]
pub struct RecordArgs {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,
    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    /// Phone number, e.g. +79991234567
    #[arg(long)]
    pub phone: Option<String>,
    /// Birth date (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long)]
    pub birth_date: Option<String>,
    /// Any other configured field (repeatable)
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

impl RecordArgs {
    /// `(field key, raw input)` for every value given on the command line.
    pub fn inputs(&self) -> Vec<(String, String)> {
        use regform::schema::{BIRTH_DATE, EMAIL, FIRST_NAME, LAST_NAME, PHONE};

        let named = [
            (FIRST_NAME, &self.first_name),
            (LAST_NAME, &self.last_name),
            (EMAIL, &self.email),
            (PHONE, &self.phone),
            (BIRTH_DATE, &self.birth_date),
        ];

        named
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
            .chain(self.fields.iter().cloned())
            .collect()
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Width to render at: the override if given, else the terminal's.
pub fn current_width(width: Option<u32>) -> u32 {
    width.or_else(terminal_width).unwrap_or(FALLBACK_WIDTH)
}

pub fn print_validation_errors(fields: &FieldSet, report: &ValidationReport) {
    for (key, message) in report.errors() {
        let title = fields.get(key).map_or(key, |f| f.title.as_str());
        println!("  {title}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("age=42").unwrap(),
            ("age".to_string(), "42".to_string())
        );
        assert_eq!(
            parse_key_value("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("age").is_err());
        assert!(parse_key_value("=42").is_err());
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::parse_from([
            "regform",
            "--width",
            "60",
            "add",
            "--first-name",
            "Al",
            "--birth-date",
            "15.01.2000",
            "--field",
            "age=42",
        ]);
        assert_eq!(cli.width, Some(60));
        let Command::Add { values } = cli.command else {
            panic!("expected add");
        };
        assert_eq!(
            values.inputs(),
            vec![
                ("firstName".to_string(), "Al".to_string()),
                ("birthDate".to_string(), "15.01.2000".to_string()),
                ("age".to_string(), "42".to_string()),
            ]
        );
    }

    #[test]
    fn test_cli_parses_delete_id() {
        let cli = Cli::parse_from(["regform", "delete", "17", "--locale", "ru"]);
        assert_eq!(cli.locale, Some(Locale::Ru));
        assert!(matches!(cli.command, Command::Delete { id: RecordId::Number(17) }));
    }

    #[test]
    fn test_current_width_prefers_override() {
        assert_eq!(current_width(Some(42)), 42);
    }
}
