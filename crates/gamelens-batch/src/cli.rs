use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gamelens")]
#[command(
    author,
    version,
    about = "Aspect-level sentiment analysis over a game review collection"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON review collection to process
    #[arg(short, long, env = "GAMELENS_STORE")]
    pub store: Option<PathBuf>,

    /// Aspect lexicon file (built-in lexicon when omitted)
    #[arg(short, long, env = "GAMELENS_LEXICON")]
    pub lexicon: Option<PathBuf>,

    /// Documents fetched per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Plain-text report destination
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Also write the statistics as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Prometheus counter dump destination
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
