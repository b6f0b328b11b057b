// Script to write a generator config. Flags override the defaults; the result
// can be passed back to `golden_generator --config`.
use anyhow::Result;
use clap::Parser;
use golden_writer::args::ConfigArgs;
use log::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = String::from("/tmp/golden_generator_config.yaml"))]
    output: String,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.config.resolve()?;
    config.validate()?;
    config.write_yaml_file(&args.output)?;
    info!("Wrote {}", args.output);
    Ok(())
}
