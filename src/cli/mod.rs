use clap::{Parser, Subcommand};

pub mod config;
pub mod run;
pub mod secrets;
pub mod version;

#[derive(Parser)]
#[command(name = "proctor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the proctor verification bot", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot service
    Run {
        /// Path to config file (default: ~/.local/share/proctor/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Path to file containing the chat platform token (container-native)
        #[arg(long)]
        chat_token_file: Option<String>,

        /// Path to file containing the email API key (container-native)
        #[arg(long)]
        email_key_file: Option<String>,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run {
            config,
            chat_token_file,
            email_key_file,
        } => run::execute(config, chat_token_file, email_key_file).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
