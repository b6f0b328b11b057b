use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use golden_writer::args::ConfigArgs;
use golden_writer::generator::generate_to_files;
use golden_writer::verify::verify_artifacts;
use log::{error, info, LevelFilter};

// Only the first mismatches are logged, the count is always reported
const MAX_REPORTED_MISMATCHES: usize = 20;

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate golden inputs and references
    #[clap(name = "generate")]
    Generate(ConfigArgs),

    /// Recompute the references of existing artifacts and report mismatches
    #[clap(name = "verify")]
    Verify(ConfigArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    match args.command {
        Command::Generate(config_args) => {
            let summary = generate_to_files(config_args.resolve()?)?;
            info!(
                "Generated {} samples, rerun with --seed {} to reproduce",
                summary.num_samples, summary.seed
            );
        }
        Command::Verify(config_args) => {
            let config = config_args.resolve()?;
            let report = verify_artifacts(&config)?;
            if !report.is_ok() {
                for mismatch in report.mismatches.iter().take(MAX_REPORTED_MISMATCHES) {
                    match mismatch.row {
                        Some(row) => error!(
                            "Row {} {}. Exp: {} Got: {}",
                            row, mismatch.column, mismatch.expected, mismatch.found
                        ),
                        None => error!(
                            "{}. Exp: {} Got: {}",
                            mismatch.column, mismatch.expected, mismatch.found
                        ),
                    }
                }
                bail!(
                    "{} mismatches found in {} rows",
                    report.mismatches.len(),
                    report.num_rows
                );
            }
            info!("All {} rows match", report.num_rows);
        }
    }
    Ok(())
}
