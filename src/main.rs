use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;

use masjid_info::{
    auth::bootstrap::init_providers,
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    mail::build_mailer,
    routes::build_app,
    state::AppState,
    storage::LocalObjectStorage,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging);

    let db_cfg = cfg
        .database
        .as_ref()
        .context("database config missing (set APP_DATABASE__URL)")?;
    let auth = cfg
        .auth
        .clone()
        .context("auth config missing (set APP_AUTH__JWT_SECRET)")?;

    let db = connection::connect(db_cfg).await?;
    let providers = init_providers(&cfg, &db).await?;
    let mailer = build_mailer(cfg.mail.as_ref())?;

    let storage = LocalObjectStorage::new(&cfg.storage);
    tokio::fs::create_dir_all(storage.root())
        .await
        .with_context(|| format!("cannot create upload dir {}", storage.root().display()))?;

    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid host/port")?;
    let state = AppState::new(cfg, auth, db, providers, mailer, Arc::new(storage));
    let app = build_app(state);

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
