use clap::{Parser, Subcommand};
use color_eyre::Result;
use common_services::settings::settings;
use common_services::utils::nice_id;
use std::str::FromStr;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use worker::context::WorkerContext;
use worker::handlers;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match an uploaded selfie against an event's photos.
    Match {
        event_id: String,
        /// Storage key of the uploaded selfie.
        selfie_key: String,
    },
    /// Group an event's photos by the people appearing in them.
    Cluster { event_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings();
    let level = Level::from_str(&settings.logging.level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    color_eyre::install()?;
    let args = Args::parse();

    let worker_id = nice_id(8);
    info!("[Worker ID: {}] Starting.", worker_id);

    let context = WorkerContext::new(settings)?;
    let result = match &args.command {
        Command::Match {
            event_id,
            selfie_key,
        } => handlers::match_selfie::handle(&context, event_id, selfie_key).await?,
        Command::Cluster { event_id } => {
            handlers::cluster_event::handle(&context, event_id).await?
        }
    };

    info!("[Worker ID: {}] Finished: {result:?}", worker_id);
    Ok(())
}
