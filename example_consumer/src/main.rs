//! Example consumer: boots a session from `LABINV_*` env vars and lists one model.
//!
//! Run from repo root: `cargo run -p example-consumer -- lab plasmid [search]`

use labinv_sdk::{ClientConfig, ClientError, LabContext, ListOutcome, ListRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("labinv_sdk=info,example_consumer=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let app_label = args.next().unwrap_or_else(|| "collection".into());
    let model_name = args.next().unwrap_or_else(|| "plasmid".into());
    let search = args.next();

    let config = ClientConfig::from_env()?;
    let ctx = match LabContext::bootstrap(config).await {
        Ok(ctx) => ctx,
        Err(ClientError::Unauthenticated { login_url }) => {
            tracing::error!("not logged in; open {} and set LABINV_SESSION_ID", login_url);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let store = ctx.stores.dynamic(&app_label, &model_name)?;
    if !store.model().is_known() {
        tracing::warn!("{}/{} is not in the navigation tree", app_label, model_name);
    }
    let mut request = ListRequest::new().page(1);
    if let Some(search) = search {
        request = request.query(search);
    }
    if let ListOutcome::Applied(pagination) = store.list_items(request).await? {
        tracing::info!(
            "{} items, page {}/{}",
            pagination.item_count,
            pagination.current_page,
            pagination.page_count
        );
    }
    for entity in store.items() {
        let creator = entity.user.as_ref().map(|u| u.username.as_str()).unwrap_or("-");
        tracing::info!("{}  created by {}", entity.path, creator);
    }
    Ok(())
}
