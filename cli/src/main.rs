//! tasklist - manage todos on a remote todo service

mod render;
mod transport;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tasklist_core::{
    ClientConfig, CreateTodoParams, FilterOption, SortOption, SystemClock, TodoApi, TodoError,
    TodoStore, UpdateTodoParams,
};
use tracing_subscriber::EnvFilter;

use crate::transport::UreqTransport;

#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(about = "Manage todos on a remote todo service", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "TASKLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show todos
    List {
        /// all, active or done
        #[arg(short, long)]
        filter: Option<FilterOption>,

        /// id or recent
        #[arg(short, long)]
        sort: Option<SortOption>,
    },
    /// Add a todo
    Add { title: String },
    /// Flip a todo between done and active
    Toggle { id: i64 },
    /// Change a todo's title or completion
    Edit {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a todo
    Delete { id: i64 },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<TodoError>() {
        Some(TodoError::Validation(_)) => 3,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::load(cli.config.as_deref()).context("loading config")?;
    if let Some(url) = cli.base_url {
        config = ClientConfig {
            base_url: url,
            ..config
        }
        .validated()?;
    }
    tracing::debug!(base_url = %config.base_url, "using service");

    let api = TodoApi::new(
        config.client(),
        UreqTransport::new(config.timeout()),
        SystemClock,
    );
    let store = TodoStore::with_options(api, config.default_filter, config.default_sort);

    store.fetch_todos()?;
    match cli.command {
        Command::List { filter, sort } => {
            if let Some(filter) = filter {
                store.set_filter(filter);
            }
            if let Some(sort) = sort {
                store.set_sort(sort);
            }
        }
        Command::Add { title } => {
            let todo = store.add_todo(CreateTodoParams::new(title))?;
            println!("Added {}", todo.id);
        }
        Command::Toggle { id } => {
            store.toggle_todo(id)?;
        }
        Command::Edit {
            id,
            title,
            completed,
        } => {
            store.update_todo(id, UpdateTodoParams { title, completed })?;
        }
        Command::Delete { id } => {
            store.delete_todo(id)?;
            println!("Deleted {id}");
        }
    }

    print!("{}", render::list(&store.visible_todos(), store.stats()));
    Ok(())
}
