use regform::store::RecordId;
use regform::view::Renderer;
use regform::{App, Validator};

pub async fn update(
    app: &mut App,
    id: &RecordId,
    inputs: &[(String, String)],
    width: u32,
) -> anyhow::Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("Nothing to update, pass at least one field");
    }

    let mut form = app.new_form();
    for (key, value) in inputs {
        form.set_input(&app.fields, key, value)?;
    }

    // Only the fields being changed are checked.
    let validator = Validator::new(&app.fields, app.locale);
    let mut invalid = false;
    for (key, _) in inputs {
        let (Some(field), Some(value)) = (app.fields.get(key), form.value(key)) else {
            continue;
        };
        if let Some(message) = validator.validate_field(field, value).message {
            println!("  {}: {message}", field.title);
            invalid = true;
        }
    }
    if invalid {
        anyhow::bail!("{}", app.locale.save_failed());
    }

    let patch = form.to_record_patch(&app.fields, inputs.iter().map(|(k, _)| k.as_str()));
    let record = app
        .store()
        .update(id, &patch)
        .await
        .map_err(|e| anyhow::anyhow!("{} #{id}: {e}", app.locale.save_failed()))?;

    tracing::info!("Record {} updated", record.id);
    println!("{}\n", app.locale.saved());

    app.view.resize(width);
    let renderer = Renderer::new(&app.fields, app.locale);
    println!("{}", renderer.render_records(std::slice::from_ref(&record), &app.view));
    Ok(())
}
