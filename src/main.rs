use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{info, LevelFilter};
use serde::Serialize;

use recipe_import::{
    AnalysisRequest, BackendSearch, ChatAssistant, ChatRequest, Difficulty, RecipeImporter,
};

/// Import recipes from web pages with a language model
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Provider to use instead of the configured default ("openai", "anthropic", "ollama")
    #[arg(long, short, global = true)]
    provider: Option<String>,

    /// Model name for the selected provider
    #[arg(long, short, global = true)]
    model: Option<String>,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: warn (0), info (1), debug (2), trace (3)", global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Import the recipe at a URL and print it as JSON
    Import {
        url: String,
        /// Seconds the renderer may spend loading the page
        #[arg(long, short)]
        timeout: Option<u64>,
    },
    /// Estimate cook time and difficulty for a recipe
    Analyze {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Ingredients, one per line
        #[arg(long)]
        ingredients: String,
        /// Instructions, one per line
        #[arg(long)]
        instructions: String,
        /// Known cook time in minutes
        #[arg(long)]
        time: Option<String>,
        /// Known difficulty (Easy, Medium or Advanced)
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Ask the cooking assistant a question
    Chat {
        question: String,
        /// Recipe backend to search for related recipes
        #[arg(long)]
        search_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let mut builder = RecipeImporter::builder();
    if let Some(provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(model) = cli.model {
        builder = builder.model(model);
    }

    match cli.command {
        Command::Import { url, timeout } => {
            if let Some(secs) = timeout {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            let importer = builder.build()?;
            let recipe = importer.import(&url).await;
            print_json(&recipe)?;
        }
        Command::Analyze {
            title,
            description,
            ingredients,
            instructions,
            time,
            difficulty,
        } => {
            let importer = builder.build()?;
            let request = AnalysisRequest {
                title,
                description,
                ingredients,
                instructions,
                estimated_time: time.unwrap_or_default(),
                difficulty: difficulty
                    .map(|d| Difficulty::from_model(&d))
                    .unwrap_or_default(),
            };
            let analysis = importer.analyzer().analyze(&request).await;
            print_json(&analysis)?;
        }
        Command::Chat {
            question,
            search_url,
        } => {
            let importer = builder.build()?;
            let config = importer.config();
            let mut assistant =
                ChatAssistant::new(importer.provider(), config.generation.chat_max_tokens);
            if let Some(url) = search_url.or_else(|| config.search.backend_url.clone()) {
                info!("Searching related recipes at {}", url);
                assistant = assistant.with_search(Arc::new(BackendSearch::new(&url)));
            }
            let response = assistant.answer(&ChatRequest { question }).await;
            print_json(&response)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
