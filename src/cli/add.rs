use regform::{App, AppError};

use super::print_validation_errors;

pub async fn add(app: &mut App, inputs: &[(String, String)], width: u32) -> anyhow::Result<()> {
    let mut form = app.new_form();
    for (key, value) in inputs {
        form.set_input(&app.fields, key, value)?;
    }

    println!("{}", app.locale.submitting());
    match app.submit(&mut form).await {
        Ok(record) => {
            println!("{} (id {})\n", app.locale.saved(), record.id);
            println!("{}", app.render(width));
            Ok(())
        }
        Err(AppError::Validation(report)) => {
            print_validation_errors(&app.fields, &report);
            anyhow::bail!("{}", app.locale.save_failed())
        }
        Err(e) => anyhow::bail!("{}: {e}", app.locale.save_failed()),
    }
}
