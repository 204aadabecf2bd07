mod cli;
mod config;
mod error;
mod output;

use std::fs::File;
use std::path::Path;

use clap::Parser;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use netpush_core::{NetworkUpdater, RESULT_TARGET};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(Command::Completions(args)) = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "netpush", &mut std::io::stdout());
        return Ok(());
    }

    let run_config = config::resolve(&cli.push)?;

    // Held until the end of the run so the result log gets flushed
    let _guard = init_tracing(&cli.global, &run_config.log_file);

    let mut updater = NetworkUpdater::build(run_config.updater).await?;
    let report = updater.run().await;

    let rendered = output::render_report(&cli.global.output, &report)?;
    output::print_output(&rendered, cli.global.quiet);

    match report.aborted_at {
        Some(mac) => Err(CliError::FailFastAbort {
            mac: mac.to_string(),
        }),
        None => Ok(()),
    }
}

/// Diagnostics go to stderr by verbosity; per-device results also go to
/// `log_file`, which is truncated at startup.
fn init_tracing(global: &GlobalOpts, log_file: &Path) -> Option<WorkerGuard> {
    let level = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)));

    let (file_layer, guard, open_error) = match open_log_file(log_file) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(Targets::new().with_target(RESULT_TARGET, Level::INFO));
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(e) = open_error {
        tracing::warn!(path = %log_file.display(), error = %e, "cannot open result log");
    }
    guard
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}
