use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use yak::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the webhook response.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::from_cli();

    match yak::run(&args, &mut std::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "yak failed");
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
