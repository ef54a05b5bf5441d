use tcsi_exporter::{
    build_state,
    config::{load_env, Config},
    init_tracing, serve,
};

#[tokio::main]
async fn main() {
    load_env();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let state = build_state(&config).await?;
    serve(&config.listen_addr, state).await
}
