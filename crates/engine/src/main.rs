//! Sheetsmith - console front end for the character rules engine.
//!
//! Reads one command per line from stdin and prints one JSON response per
//! command to stdout. Logs go to stderr.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheetsmith_engine::api::{parse_request, Console, Request, ResponseResult};
use sheetsmith_engine::infrastructure::settings::EngineSettings;
use sheetsmith_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();
    let settings = EngineSettings::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        roll_history = settings.roll_history,
        seeded = settings.rng_seed.is_some(),
        data_dir = ?settings.data_dir,
        "Starting Sheetsmith"
    );

    let app = App::from_settings(settings).await?;
    let mut console = Console::new(Arc::new(app));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let response = match parse_request(&line) {
            Ok(None) => continue,
            Ok(Some(Request::Quit)) => break,
            Ok(Some(request)) => console.handle(request).await,
            Err(e) => ResponseResult::from(&e),
        };

        let mut out = serde_json::to_string_pretty(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    tracing::info!("Sheetsmith stopped");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Local overrides win.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
