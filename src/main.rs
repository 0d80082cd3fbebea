//! `hiitclock` - Countdown interval timer for HIIT workouts

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use clap::Parser;
use tokio_util::sync::CancellationToken;

use hiitclock::cli::args::Cli;
use hiitclock::cli::commands;
use hiitclock::error::ExitCode;
use hiitclock::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    let shutdown = CancellationToken::new();
    let signal_code = Arc::new(AtomicI32::new(ExitCode::SUCCESS));

    // First signal stops the workout, a second one forces exit
    tokio::spawn({
        let shutdown = shutdown.clone();
        let signal_code = Arc::clone(&signal_code);
        async move {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");

            let code = tokio::select! {
                _ = tokio::signal::ctrl_c() => ExitCode::INTERRUPTED,
                _ = sigterm.recv() => ExitCode::TERMINATED,
            };
            signal_code.store(code, Ordering::SeqCst);
            shutdown.cancel();

            eprintln!("\nStopping workout... (press Ctrl+C again to force)");

            tokio::select! {
                _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
                _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
            }
        }
    });

    let result = commands::dispatch(cli, shutdown).await;

    match result {
        Ok(()) => std::process::exit(signal_code.load(Ordering::SeqCst)),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
