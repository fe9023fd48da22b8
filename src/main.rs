use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

use message_board::client::{AboutClient, AboutPage, DEFAULT_SERVER};
use message_board::{logging, server, Config};

#[derive(Parser)]
#[command(name = "message-board")]
#[command(about = "Message board REST service and about-page client", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST server
    Serve {
        /// Overrides PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep messages in memory instead of MongoDB
        #[arg(long)]
        memory: bool,
    },

    /// Fetch and print the about page
    About {
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        memory: false,
    });

    match command {
        Commands::Serve { port, memory } => {
            let mut config = Config::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }

            println!(
                "{}",
                format!("🌐 Starting server on port {}...", config.port)
                    .cyan()
                    .bold()
            );
            server::start(config, memory).await?;
        }

        Commands::About { server } => {
            let client = AboutClient::new(&server)?;
            let mut page = AboutPage::new();
            page.mount(&client).await;

            if !page.is_loaded() {
                eprintln!("{} Could not load {}", "✗".red(), server.bright_blue());
            }
            println!("{}", page.render());
        }
    }

    Ok(())
}
