use std::io::Write;

use regform::store::RecordId;
use regform::{App, AppError, FormState};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{current_width, print_validation_errors};

const HELP: &str = "\
Commands:
  show                 show the form
  set <field> <value>  fill in a field
  clear                empty the form
  submit               save the form as a new record
  list                 re-fetch and show the records
  delete <id>          delete a record
  help                 show this help
  quit                 leave the shell";

/// Interactive loop over one form and the live record list. The terminal is
/// re-measured before every render so the layout follows window resizes.
pub async fn shell(app: &mut App, width: Option<u32>) -> anyhow::Result<()> {
    let mut form = app.new_form();

    let _ = app.listing.refresh().await;
    println!("{}\n", app.render(current_width(width)));
    println!("{}", app.locale.form_title());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "help" | "?" => println!("{HELP}"),
            "show" | "fields" => print_form(app, &form),
            "set" => {
                let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
                if key.is_empty() {
                    println!("usage: set <field> <value>");
                    continue;
                }
                if let Err(e) = form.set_input(&app.fields, key, value.trim()) {
                    println!("{e} (fields: {})", app.fields.keys().collect::<Vec<_>>().join(", "));
                }
            }
            "clear" => form.reset(&app.fields),
            "submit" => submit(app, &mut form, width).await,
            "list" | "refresh" => {
                let _ = app.listing.refresh().await;
                println!("{}", app.render(current_width(width)));
            }
            "delete" => {
                if rest.is_empty() {
                    println!("usage: delete <id>");
                    continue;
                }
                let id: RecordId = rest.parse()?;
                match app.listing.delete(&id).await {
                    Ok(()) => println!("{}", app.render(current_width(width))),
                    Err(e) => println!("{} #{id}: {e}", app.locale.delete_failed()),
                }
            }
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}', type 'help'"),
        }
    }

    Ok(())
}

async fn submit(app: &mut App, form: &mut FormState, width: Option<u32>) {
    println!("{}", app.locale.submitting());
    match app.submit(form).await {
        Ok(record) => {
            println!("{} (id {})\n", app.locale.saved(), record.id);
            println!("{}", app.render(current_width(width)));
        }
        Err(AppError::Validation(report)) => {
            println!("{}", app.locale.save_failed());
            print_validation_errors(&app.fields, &report);
        }
        Err(e) => println!("{}: {e}", app.locale.save_failed()),
    }
}

fn print_form(app: &App, form: &FormState) {
    for field in app.fields.iter() {
        let value = form.value(&field.key).map(|v| v.as_text()).unwrap_or_default();
        match form.error(&field.key) {
            Some(message) => println!("  {} [{}]: {value}  ! {message}", field.title, field.key),
            None => println!("  {} [{}]: {value}", field.title, field.key),
        }
    }
}
