#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = todo_api::config::Config::from_env()?;
    todo_api::web::start_web_server(config).await
}
