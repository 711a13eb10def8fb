use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use recipebox::{Config, ListSchema};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(about = "recipebox - favorite recipes served as JSON, XML or protobuf")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: ~/.config/recipebox/config.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Fetch the favorites listing in binary format from a running server
    Client {
        /// Base URL of the server
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { listen } => {
            if let Some(listen) = listen {
                config.listen = listen;
            }
            recipebox::server::serve(&config).await?;
        }
        Commands::Client { url } => {
            let schema = ListSchema::load(config.schema_path.as_deref()).await?;
            let http = reqwest::Client::new();

            println!("{}", "Fetching favorites as protobuf".bold());
            let fetched = recipebox::client::fetch_favorites(&http, &url, &schema).await?;

            println!("Bytes received: {}", fetched.byte_len.to_string().cyan());
            println!("Recipes found: {}", fetched.records.len().to_string().cyan());
            for record in &fetched.records {
                println!(" - {} ({})", record.name.green(), record.category.dimmed());
            }
        }
    }

    Ok(())
}
