use regform::App;
use regform::view::{Renderer, ResponsiveView};

pub async fn list(app: &mut App, page: Option<u32>, width: u32) -> anyhow::Result<()> {
    match page {
        Some(page) => list_page(app, page, width).await,
        None => {
            let result = app.listing.refresh().await;
            println!("{}", app.render(width));
            result.map_err(Into::into)
        }
    }
}

async fn list_page(app: &mut App, page: u32, width: u32) -> anyhow::Result<()> {
    let page_data = app.store().list_page(page).await?;

    app.view.resize(width);
    let view: &ResponsiveView = &app.view;
    let renderer = Renderer::new(&app.fields, app.locale);

    if page_data.records.is_empty() {
        println!("{}", app.locale.no_records());
    } else {
        println!("{}", renderer.render_records(&page_data.records, view));
    }
    println!(
        "{}",
        app.locale
            .page_summary(page, page_data.records.len(), page_data.total)
    );
    Ok(())
}
