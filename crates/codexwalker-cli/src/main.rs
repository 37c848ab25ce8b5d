//! Codex Walker terminal host entry point.

use std::process::ExitCode;

use codexwalker_cli::config::{AppConfig, LogFormat};
use codexwalker_cli::error::AppError;
use codexwalker_cli::session::{build_director, run_session};
use codexwalker_cli::terminal::Console;
use codexwalker_scene_graph::domain::graph::START_SCENE_ID;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("codexwalker: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run() -> Result<(), AppError> {
    // Read configuration from environment; it selects the log format.
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("Starting Codex Walker");

    let console = Console::stdout();
    let (completions_tx, mut completions) = tokio::sync::mpsc::unbounded_channel();
    let mut director = build_director(&config, &console, completions_tx);

    if let Err(e) = director.load().await {
        if e.is_fatal() {
            console.line(format_args!(
                "关键数据加载失败。请检查数据文件或网络后重新启动。"
            ));
        }
        return Err(e.into());
    }
    tracing::info!(source = ?director.scenes().loaded_from(), "scene data ready");

    director.play_scene(START_SCENE_ID).await?;
    let end = run_session(
        &mut director,
        BufReader::new(tokio::io::stdin()),
        &mut completions,
        &console,
    )
    .await?;

    tracing::info!(?end, "session ended");
    Ok(())
}
