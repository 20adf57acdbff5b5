use regform::App;
use regform::store::RecordId;

pub async fn delete(app: &mut App, id: &RecordId, width: u32) -> anyhow::Result<()> {
    if let Err(e) = app.listing.delete(id).await {
        anyhow::bail!("{} #{id}: {e}", app.locale.delete_failed());
    }
    println!("{}", app.render(width));
    Ok(())
}
