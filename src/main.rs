use anyhow::Context;
use clap::Parser;

use enumify_watch::cli::commands;
use enumify_watch::cli::{Cli, Commands};
use enumify_watch::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (args, watch_override) = match &cli.command {
        Commands::Build(args) | Commands::Config(args) => (args, None),
        Commands::Dev {
            generator,
            watch,
            no_watch,
        } => {
            let watch_override = if *watch {
                Some(true)
            } else if *no_watch {
                Some(false)
            } else {
                None
            };
            (generator, watch_override)
        }
    };

    let mut settings = commands::load_settings(args).context("failed to load enumify options")?;
    if watch_override.is_some() {
        settings.options.watch = watch_override;
    }
    logging::init(&settings.logging, cli.verbose);

    match cli.command {
        Commands::Build(_) => commands::build::run(settings.options).await,
        Commands::Dev { .. } => commands::dev::run(settings.options).await,
        Commands::Config(_) => commands::config::run(settings.options),
    }
}
