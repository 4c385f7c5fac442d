use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use typedex::codebase::DeclarationEngine;
use typedex::config::{AppConfig, AppState};
use typedex::server::TypedexServer;
use typedex::types::{DeclarationKind, Lookup};

#[derive(Parser)]
#[command(name = "typedex")]
#[command(about = "Index and query the exported declarations of a TypeScript library")]
struct Cli {
    /// Library source root.
    #[arg(long, env = "TYPEDEX_ROOT", default_value = ".")]
    root: PathBuf,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Number of built indexes kept in memory by the server.
    #[arg(long, env, default_value = "8")]
    cache_size: usize,

    /// Build time budget in milliseconds. 0 = unlimited.
    #[arg(long, env, default_value = "0")]
    scan_timeout_ms: u64,

    /// Extract files on a single thread.
    #[arg(long)]
    sequential: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server over stdio (default).
    Serve,
    #[command(flatten)]
    Query(Query),
}

#[derive(Subcommand)]
enum Query {
    /// List declarations.
    List {
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        kind: Option<DeclarationKind>,
    },
    /// Find a declaration by exact name.
    Find { name: String },
    /// Fuzzy search declarations.
    Search {
        query: String,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show the inheritance hierarchy of a declaration.
    Hierarchy { name: String },
    /// Show module exports and re-export sources.
    Deps {
        #[arg(long)]
        module: Option<String>,
    },
    /// Show library statistics.
    Stats,
    /// Show the scan report.
    Report,
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_query(engine: &DeclarationEngine, query: Query) -> anyhow::Result<()> {
    match query {
        Query::List { module, kind } => {
            let declarations: Vec<_> = match module.as_deref() {
                Some(module) => engine.by_module(module),
                None => engine.all().iter().collect(),
            }
            .into_iter()
            .filter(|d| kind.map_or(true, |k| d.kind() == k))
            .collect();
            print_json(&declarations)
        }
        Query::Find { name } => match engine.lookup(&name, 5) {
            Lookup::Found(declaration) => print_json(declaration),
            Lookup::NotFound { name, suggestions } => {
                let names: Vec<&str> = suggestions
                    .iter()
                    .map(|s| s.declaration.name.as_str())
                    .collect();
                anyhow::bail!("Declaration not found: {} (did you mean: {})", name, names.join(", "))
            }
        },
        Query::Search { query, limit } => print_json(&engine.fuzzy_search(&query, limit)),
        Query::Hierarchy { name } => match engine.hierarchy(&name) {
            Some(hierarchy) => print_json(&hierarchy),
            None => anyhow::bail!("Declaration not found: {}", name),
        },
        Query::Deps { module } => match module {
            Some(module) => match engine.dependencies_of(&module) {
                Some(info) => print_json(&info),
                None => anyhow::bail!("Module not found: {}", module),
            },
            None => print_json(&engine.dependencies()),
        },
        Query::Stats => print_json(&engine.statistics()),
        Query::Report => print_json(engine.report()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig {
        root: cli.root,
        log_level: cli.log_level,
        cache_size: cli.cache_size,
        scan_timeout_ms: cli.scan_timeout_ms,
        parallel: !cli.sequential,
    };

    if let Some(Command::Query(query)) = cli.command {
        let index_config = config.index_config();
        let root = config.root.clone();
        let engine =
            tokio::task::spawn_blocking(move || DeclarationEngine::build(&root, &index_config))
                .await??;
        return run_query(&engine, query);
    }

    let state = Arc::new(AppState::new(config));
    let server = TypedexServer::new(state.clone());

    tracing::info!(root = %state.config.root.display(), "Starting typedex MCP server");

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::service::serve_server(server, transport).await?;

    tokio::select! {
        res = service.waiting() => {
            if let Err(e) = res {
                tracing::error!("Server error: {}", e);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully... (SIGINT)");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
