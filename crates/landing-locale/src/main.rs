use clap::Parser;
use landing_locale::{Cli, execute};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "landing-locale failed");
            std::process::exit(1);
        }
    }
}
