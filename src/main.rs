use anyhow::{Context, Result};
use std::path::PathBuf;
use suryansh_site::{Config, Document, Page, Session};
use tracing::info;

const USAGE: &str = "usage: suryansh-site <page.json> [session.json] (or set SITE_PAGE / SITE_SESSION)";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr, the final page snapshot to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("suryansh_site=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let mut args = std::env::args().skip(1);
    let page_path: PathBuf = args
        .next()
        .or_else(|| std::env::var("SITE_PAGE").ok())
        .context(USAGE)?
        .into();
    let session_path: Option<PathBuf> = args
        .next()
        .or_else(|| std::env::var("SITE_SESSION").ok())
        .map(PathBuf::from);

    let document = Document::load(&page_path)
        .with_context(|| format!("Failed to load page {}", page_path.display()))?;
    let session = match &session_path {
        Some(path) => Session::load(path)
            .with_context(|| format!("Failed to load session {}", path.display()))?,
        None => Session::default(),
    };

    info!(
        "Loaded page {} (language {}, {} session steps)",
        page_path.display(),
        config.default_language,
        session.steps.len()
    );

    // Page timers are local tasks sharing the document, so the runtime is single-threaded
    let mut page = Page::init(document, config);
    session.replay(&mut page).await?;
    let snapshot = page.snapshot();

    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("Failed to serialize page snapshot")?
    );
    Ok(())
}
