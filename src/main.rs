mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use spigot_provision::ui;

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Init { extract, checksum } => commands::init::init(extract, checksum),
        Commands::Resolve { version, json } => commands::resolve::resolve(&version, json),
        Commands::Provide {
            version,
            cache_dir,
            extract,
            force,
        } => commands::provide::provide(&version, cache_dir, extract, force).await,
        Commands::Extract { bundle, dest } => commands::extract::extract(&bundle, &dest),
        Commands::Cache { json } => commands::cache::list_cache(json),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            1
        }
    };

    std::process::exit(code);
}
