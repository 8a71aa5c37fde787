use anyhow::Context;
use bubbletea_rs::Program;
use ringtimer::TimerScreen;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Logs go to a file because the terminal belongs to the UI. Nothing is
/// installed unless `RUST_LOG` is set.
fn init_logging() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let path = std::env::temp_dir().join("ringtimer.log");
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let program = Program::<TimerScreen>::builder()
        .alt_screen(true)
        .build()
        .context("failed to build program")?;
    program.run().await.context("program exited with an error")?;
    Ok(())
}
