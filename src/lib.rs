//! Timebank library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, &cfg.database),
        Commands::WorkerAdd { .. } => cli::commands::worker::handle_add(&cli.command, cfg),
        Commands::Workers => cli::commands::worker::handle_list(cfg),
        Commands::Schedule { .. } => cli::commands::worker::handle_schedule(&cli.command, cfg),
        Commands::Punch { .. } => cli::commands::punch::handle_self(&cli.command, cfg),
        Commands::Manual { .. } => cli::commands::punch::handle_manual(&cli.command, cfg),
        Commands::PunchApprove { .. } | Commands::PunchReject { .. } => {
            cli::commands::punch::handle_review(&cli.command, cfg)
        }
        Commands::Today { .. } => cli::commands::today::handle(&cli.command, cfg),
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, cfg),
        Commands::Justify { .. } => cli::commands::justify::handle_create(&cli.command, cfg),
        Commands::JustifyApprove { .. } | Commands::JustifyReject { .. } => {
            cli::commands::justify::handle_review(&cli.command, cfg)
        }
        Commands::Bank { .. } => cli::commands::bank::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load config once
    let mut cfg = Config::load();

    // apply a --db override from the command line
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
