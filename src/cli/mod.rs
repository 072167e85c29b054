pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "movies-api")]
#[command(about = "Movie catalog API server and maintenance commands")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Serve from an in-memory store seeded with sample movies")]
        memory: bool,
    },

    #[command(about = "Mint a session token for a user")]
    Token {
        #[arg(long, help = "User name recorded in the session")]
        user: String,
    },

    #[command(about = "Create the movies table if it does not exist")]
    InitDb,

    #[command(about = "Insert the sample movies")]
    Seed,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { memory: false }) {
        Commands::Serve { memory } => commands::serve::handle(config, memory).await,
        Commands::Token { user } => commands::token::handle(config, &user, output_format),
        Commands::InitDb => commands::db::init(config, output_format).await,
        Commands::Seed => commands::db::seed(config, output_format).await,
    }
}
