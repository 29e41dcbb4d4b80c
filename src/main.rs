mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "css_doc=debug"
    } else {
        "css_doc=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Build(args) => {
            cli::build(&args)?;
        }
        Commands::Parse { file, format, all } => {
            cli::parse_file(&file, &format, all)?;
        }
        Commands::Check { path, config } => {
            let problems = cli::check(path, config.as_deref())?;
            if problems > 0 {
                anyhow::bail!("check found {} structural problem(s)", problems);
            }
        }
        Commands::Init { path, force } => {
            cli::init(&path, force)?;
        }
    }

    Ok(())
}
