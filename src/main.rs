//! djorder CLI entry point

use clap::Parser;
use djorder::config::{
    AnalyzeSettings, Cli, Command, OrderSettings, ServerSettings,
};
use djorder::{pipeline, server};
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    match &cli.command {
        Command::Serve(args) => serve(ServerSettings::from_cli(args)),
        Command::Order(args) => {
            let settings = OrderSettings::from_cli(args);
            match pipeline::run_order(&settings) {
                Ok(sequence) => {
                    if settings.output.is_some() {
                        println!(
                            "Ordered {} tracks (total transition cost {:.1})",
                            sequence.tracks.len(),
                            sequence.total_cost()
                        );
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Analyze(args) => {
            let settings = AnalyzeSettings::from_cli(args, cli.quiet);
            if let Err(e) = validate_output(&settings) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            match pipeline::run_analyze(&settings) {
                Ok(summary) => {
                    println!();
                    println!(
                        "Summary: {} analyzed, {} failed, {} with artwork (of {} total)",
                        summary.analyzed, summary.failed, summary.with_artwork, summary.total
                    );
                    println!("Wrote {}", settings.output.display());

                    if summary.failed > 0 {
                        ExitCode::from(1)
                    } else {
                        ExitCode::SUCCESS
                    }
                }
                Err(e) => {
                    eprintln!("Fatal error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn serve(settings: ServerSettings) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Fatal error: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server::run(settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = LevelFilter::from_level(cli.log_level());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn validate_output(settings: &AnalyzeSettings) -> Result<(), String> {
    // The output file is created, but its directory must already exist
    if let Some(parent) = settings.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(format!(
                "Output directory does not exist: {}\n\n  Tip: Create it first.\n  Example: mkdir -p {}",
                parent.display(),
                parent.display()
            ));
        }
    }

    Ok(())
}
