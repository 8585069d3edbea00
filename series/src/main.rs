mod verbose;

use std::path::Path;

use clap::{CommandFactory as _, FromArgMatches as _, Parser, Subcommand};
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};
use twelf::Layer;

use series_common::Conf;

const CONFIG_FILE: &str = "series.toml";

#[derive(Parser)]
#[clap(author, version, about = "REST API for a catalog of TV series and their reviews", long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    #[clap(flatten)]
    verbose: verbose::Verbosity,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations and start the web server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), series_common::Report> {
    series_common::install()?;

    let matches = Cli::command().args(&Conf::clap_args()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let mut layers = Vec::with_capacity(3);
    if Path::new(CONFIG_FILE).exists() {
        layers.push(Layer::Toml(CONFIG_FILE.into()));
    }
    layers.push(Layer::Env(Some("SERIES_".to_string())));
    layers.push(Layer::Clap(matches));

    let conf = Conf::with_layers(&layers)?;

    let subscriber = Registry::default()
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::Layer::default())
        .with(EnvFilter::from_default_env().add_directive(cli.verbose.log_level_filter().into()));

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve => series_command_serve::run(&conf).await?,
        Commands::Migrate => {
            if conf.database == series_common::MEMORY_DATABASE {
                series_common::bail!("the in-memory store has no migrations to apply");
            }

            let pool = series_queries::init_database_connection(&conf).await?;

            series_queries::migrate(&pool).await?;
        }
    }

    Ok(())
}
