mod config;
mod graphql;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_graphql::{Request, Variables};
use clap::{Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::views::Dashboard;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    config::{AppConfig, SeedMode},
    graphql::{SchemaSettings, SchemaType, SharedStore},
};

#[derive(Parser, Debug)]
#[command(name = "hr-admin", version, about = "HR records administration")]
struct Cli {
    /// Dataset the session starts from (overrides HR_SEED).
    #[arg(long, global = true, value_enum)]
    seed: Option<SeedMode>,
    /// JSON dataset to start from (overrides HR_SEED_FILE and --seed).
    #[arg(long, global = true, value_name = "FILE")]
    seed_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one GraphQL request and print the response.
    Query {
        document: String,
        #[arg(long, value_name = "JSON")]
        variables: Option<String>,
    },
    /// Read GraphQL requests from stdin, one per line, against one store.
    Shell,
    /// Print dashboard figures.
    Summary,
    /// Print the seed dataset.
    Seed,
    /// Print the GraphQL schema.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(ObsConfig {
        env_filter: config.log_filter.clone(),
        ..ObsConfig::default()
    })?;

    let store = match cli.seed_file.or(config.seed_file) {
        Some(path) => {
            let store = config::load_seed_file(&path)?;
            info!(path = %path.display(), "seed file loaded");
            store
        }
        None => {
            let seed = cli.seed.unwrap_or(config.seed);
            info!(?seed, "built-in seed loaded");
            seed.build_store()
        }
    };
    let store: SharedStore = Arc::new(RwLock::new(store));
    let schema = graphql::build_schema(
        store.clone(),
        SchemaSettings {
            recent_limit: config.recent_limit,
        },
    );
    info!("record store ready");

    match cli.command {
        Command::Query {
            document,
            variables,
        } => run_query(&schema, &document, variables.as_deref()).await,
        Command::Shell => run_shell(&schema).await,
        Command::Summary => {
            let store = store.read().await;
            print_json(&Dashboard::build(&store, config.recent_limit))
        }
        Command::Seed => print_json(&store.read().await.snapshot()),
        Command::SchemaPrint { output } => schema_print(&schema, output),
    }
}

async fn run_query(schema: &SchemaType, document: &str, variables: Option<&str>) -> Result<()> {
    let mut request = Request::new(document);
    if let Some(raw) = variables {
        let json = serde_json::from_str(raw).context("invalid --variables JSON")?;
        request = request.variables(Variables::from_json(json));
    }
    let response = schema.execute(request).await;
    print_json(&response)
}

/// Each line is either a raw GraphQL document or a JSON request body with
/// `query` and optional `variables`. Blank lines and `#` comments are skipped.
async fn run_shell(schema: &SchemaType) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut executed = 0usize;
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let request = serde_json::from_str::<Request>(line).unwrap_or_else(|_| Request::new(line));
        let response = schema.execute(request).await;
        println!(
            "{}",
            serde_json::to_string(&response).context("failed to encode response")?
        );
        executed += 1;
    }
    info!(executed, "shell session finished");
    Ok(())
}

fn schema_print(schema: &SchemaType, path: Option<PathBuf>) -> Result<()> {
    let sdl = schema.sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let body = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{body}");
    Ok(())
}
