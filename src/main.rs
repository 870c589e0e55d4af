use clap::{Parser, Subcommand};
use kml_stash::stash::{StashClient, StashRelay};
use kml_stash::types::StashFile;
use kml_stash::utils::{init_logger, layer_url};
use kml_stash::Config;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "kml-stash", version, about = "Stash KML files and hand back map layers")]
struct Cli {
    /// Stash endpoint; falls back to STASH_URL
    #[arg(long, global = true)]
    stash_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download a KML file, stash it and print the resulting layer as JSON
    Relay { kml_url: String },
    /// Stash local files in one request and print their layer urls
    Stash {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Retrieve a stashed file
    Fetch {
        layer_url: String,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    init_logger(&config.log.filter);

    let client = StashClient::with_user_agent(&config.stash.user_agent)?;

    match cli.command {
        Command::Relay { kml_url } => {
            let stash_url = config.stash_url(cli.stash_url.as_deref())?;
            info!("Relaying {} to {}", kml_url, stash_url);

            let relay = StashRelay::new(client);
            let mut deferred = relay.create_stashed_kml_layer(kml_url, stash_url);
            deferred.settle().await;

            match deferred.try_take() {
                Some(layer) => println!("{}", serde_json::to_string_pretty(&layer)?),
                None => anyhow::bail!("relay did not produce a layer"),
            }
        }
        Command::Stash { files } => {
            let stash_url = config.stash_url(cli.stash_url.as_deref())?;

            let mut stash_files = Vec::with_capacity(files.len());
            for path in &files {
                stash_files.push(StashFile::from_path(path).await?);
            }

            let ids = client.stash(&stash_url, stash_files).await?;
            if ids.len() != files.len() {
                error!("Sent {} file(s) but got {} id(s) back", files.len(), ids.len());
            }

            for (path, id) in files.iter().zip(&ids) {
                if id.is_empty() {
                    error!("Stash could not store {}", path.display());
                    continue;
                }
                println!("{}\t{}", path.display(), layer_url(&stash_url, id));
            }
        }
        Command::Fetch { layer_url, output } => {
            let content = client.fetch_stashed(&layer_url).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &content).await?;
                    info!("Wrote {} bytes to {}", content.len(), path.display());
                }
                None => std::io::stdout().write_all(&content)?,
            }
        }
    }

    Ok(())
}
