// CLI module for handling command-line interface

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spigot-provision")]
#[command(about = "Download and cache remapped Spigot server jars from the CodeMC nms repository")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default provision.toml
    Init {
        /// Enable bundle extraction
        #[arg(long)]
        extract: bool,
        /// Expected hash of the server jar, e.g. sha256:abc...; enables verification
        #[arg(long)]
        checksum: Option<String>,
    },
    /// Print the URL and cache paths for a version
    Resolve {
        version: String,
        #[arg(long)]
        json: bool,
    },
    /// Download the server jar for a version and register it
    Provide {
        version: String,
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        /// Unpack the server jar out of the bundler jar
        #[arg(long)]
        extract: bool,
        /// Re-download even when the jar is cached
        #[arg(long)]
        force: bool,
    },
    /// Extract the single bundled server jar from a bundler jar
    Extract { bundle: PathBuf, dest: PathBuf },
    /// List cached versions
    Cache {
        #[arg(long)]
        json: bool,
    },
}
