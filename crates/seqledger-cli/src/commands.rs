use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "seqledger")]
#[command(about = "Track and reconcile genomic result-file deliveries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a full reconciliation pass over a delivery directory
    Run(RunArgs),
    /// Sort files into per-category folders by extension
    Organize(OrganizeArgs),
    /// Print configuration values
    PrintConfig,
    /// Truncate all database tables
    TruncateDb,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Delivery directory containing one subdirectory per patient
    #[arg(short, long)]
    pub input_path: Option<String>,
    /// SQLite database path
    #[arg(long)]
    pub db: Option<String>,
    /// Report file to append to
    #[arg(long)]
    pub report: Option<String>,
}

#[derive(Debug, Args)]
pub struct OrganizeArgs {
    /// Directory whose files should be sorted
    #[arg(short, long)]
    pub input_path: String,
    /// Destination directory for the category folders
    #[arg(short, long)]
    pub output_path: String,
    /// Only organize files with this extension (catalog order decides
    /// compound suffixes)
    #[arg(short, long)]
    pub extension: Option<String>,
}
