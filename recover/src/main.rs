use anyhow::Result;
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;
use vbr_core::config::{DEFAULT_BASE_URL, DEFAULT_REC_INPUT};
use vbr_core::{HttpPageClient, Recoverer, RecoveryInput};

/// replays `page_id -> count` pairs against the badge service's recovery endpoint
#[derive(Parser, Debug)]
struct Args {
    /// json object mapping page ids to view counts
    #[arg(short, long, default_value = DEFAULT_REC_INPUT)]
    input: PathBuf,

    /// base url of the badge service
    #[arg(short, long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let input = RecoveryInput::load(&args.input)?;
    info!(
        "replaying {} pages from {} against {}",
        input.len(),
        args.input.display(),
        args.base_url
    );

    let recoverer = Recoverer::new(HttpPageClient::new(), args.base_url)?;
    recoverer.run(&input, &mut io::stdout()).await?;

    Ok(())
}
