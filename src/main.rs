//! investor-commitments - loader and query service
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use investor_commitments::config::{CliArgs, Command, LoadConfig, ServeConfig};
use investor_commitments::loader::run_load;
use investor_commitments::progress::{print_header, print_summary, ProgressReporter};
use investor_commitments::server;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    match args.command {
        Command::Load { source, db, quiet } => {
            let config = LoadConfig::from_args(source, db, quiet)
                .context("Invalid configuration")?;
            run_load_command(config)
        }
        Command::Serve { db, bind, port } => {
            let config = ServeConfig::from_args(db, &bind, port)
                .context("Invalid configuration")?;
            run_serve_command(config)
        }
    }
}

fn run_load_command(config: LoadConfig) -> Result<()> {
    let source = config.source_path.display().to_string();
    let db_path = config.db_path.display().to_string();

    if config.show_progress {
        print_header(&source, &db_path);
    }

    let progress = if config.show_progress {
        Some(ProgressReporter::new())
    } else {
        None
    };

    let result = run_load(&config, progress.as_ref());

    if let Some(ref p) = progress {
        match &result {
            Ok(_) => p.finish_and_clear(),
            Err(_) => p.finish("Load failed"),
        }
    }

    let summary = result.with_context(|| format!("Failed to load {}", source))?;

    if config.show_progress {
        print_summary(
            summary.source_rows,
            summary.investors,
            summary.commitments,
            summary.duration,
            &db_path,
            summary.db_size(),
        );
    }
    println!("{}", summary.confirmation());

    Ok(())
}

fn run_serve_command(config: ServeConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    runtime
        .block_on(server::serve(config))
        .context("Query service failed")
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("investor_commitments=debug,tower_http=debug,warn")
    } else {
        EnvFilter::new("investor_commitments=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
