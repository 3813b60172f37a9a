mod cli;
mod commands;

use clap::Parser;

fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let stdout = std::io::stdout();
    commands::run(args, &mut stdout.lock())
}
