use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use vbr_core::aggregate_file;
use vbr_core::config::DEFAULT_LOG_INPUT;

/// dumps the highest `views=` count seen per `page=` in a log as json
#[derive(Parser, Debug)]
struct Args {
    /// log dump to scan
    #[arg(short, long, default_value = DEFAULT_LOG_INPUT)]
    input: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let table = aggregate_file(&args.input)?;
    info!(
        "dumping {} pages recovered from {}",
        table.len(),
        args.input.display()
    );
    println!("{}", table.to_pretty_json()?);

    Ok(())
}
