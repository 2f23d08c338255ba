mod bootstrap;
mod gateway;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::warn;
use warelay_channels::whatsapp::{session_db_path, WhatsAppChannel};
use warelay_core::{config, format::html_to_chat, traits::Provider};
use warelay_providers::groq::GroqProvider;

#[derive(Parser)]
#[command(
    name = "warelay",
    version,
    about = "WhatsApp relay to a chat-completion API"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair (first run) or reconnect, then relay `0>` messages until interrupted.
    Start,
    /// Show configuration and whether a paired device is stored.
    Status,
    /// Send a one-shot prompt to the completion API and print the reply.
    Ask {
        /// The prompt to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up GROQ_API_KEY from a local .env, if any.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.relay.log_level)),
        )
        .init();

    match cli.command {
        Commands::Start => {
            if !cfg.completion.has_api_key() {
                warn!(
                    "{} is not set; completions will fail until it is",
                    config::API_KEY_ENV
                );
            }
            let provider = Arc::new(GroqProvider::from_config(&cfg.completion));
            let channel =
                Arc::new(WhatsAppChannel::open(cfg.whatsapp.clone(), &cfg.relay.data_dir).await?);

            println!("warelay: connecting to WhatsApp...");
            let events = bootstrap::establish(&channel).await?;

            let gw = Arc::new(gateway::Gateway::new(provider, channel));
            gw.run(events, gateway::shutdown_signal()).await?;
        }
        Commands::Status => {
            println!("warelay status\n");
            println!("Config: {}", cli.config);
            println!("Data dir: {}", config::shellexpand(&cfg.relay.data_dir));
            println!("Endpoint: {}", cfg.completion.base_url);
            println!("Model: {}", cfg.completion.model);
            println!(
                "API key: {}",
                if cfg.completion.has_api_key() {
                    "configured"
                } else {
                    "missing"
                }
            );

            let db_path = session_db_path(&cfg.relay.data_dir);
            let paired = if db_path.exists() {
                let channel =
                    WhatsAppChannel::open(cfg.whatsapp.clone(), &cfg.relay.data_dir).await?;
                channel.has_identity().await?
            } else {
                false
            };
            println!(
                "WhatsApp: {}",
                if paired {
                    "paired"
                } else {
                    "not paired (run `warelay start` to scan a QR code)"
                }
            );
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: warelay ask <message>");
            }

            let prompt = message.join(" ");
            let provider = GroqProvider::from_config(&cfg.completion);
            let answer = provider.complete(&prompt).await?;
            println!("{}", html_to_chat(&answer));
        }
    }

    Ok(())
}
