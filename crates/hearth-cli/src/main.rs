//! Hearth CLI - Shared-property cost simulator
//!
//! Usage:
//!   hearth init                         Initialize database
//!   hearth simulate --config default    Print the simulation report
//!   hearth calendar --year 2026         Show the ISO weeks of a year
//!   hearth serve --port 3000            Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let defaults = commands::load_defaults(cli.defaults.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, &defaults),
        Commands::Simulate { file, config, json } => commands::cmd_simulate(
            &cli.db,
            &defaults,
            file.as_deref(),
            config.as_deref(),
            json,
        ),
        Commands::Calendar { year } => commands::cmd_calendar(year, &defaults),
        Commands::Configs { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(ConfigsAction::List) => commands::cmd_configs_list(&db),
                Some(ConfigsAction::Show { name }) => commands::cmd_configs_show(&db, &name),
                Some(ConfigsAction::New { name, year }) => {
                    commands::cmd_configs_new(&db, &defaults, &name, year)
                }
                Some(ConfigsAction::Save {
                    name,
                    file,
                    expected_version,
                }) => commands::cmd_configs_save(&db, &defaults, &name, &file, expected_version),
                Some(ConfigsAction::Delete { name }) => commands::cmd_configs_delete(&db, &name),
                Some(ConfigsAction::Export { name, output }) => {
                    commands::cmd_configs_export(&db, &name, output.as_deref()).map(|_| ())
                }
            }
        }
        Commands::Edit { config, action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                EditAction::Year { year } => commands::cmd_edit_year(&db, &defaults, &config, year),
                EditAction::Assign { week, who } => {
                    commands::cmd_edit_assign(&db, &config, week, who.as_deref())
                }
                EditAction::Weight { week, weight } => {
                    commands::cmd_edit_weight(&db, &config, week, weight)
                }
                EditAction::Revise { week, price } => {
                    commands::cmd_edit_revise(&db, &config, week, price)
                }
                EditAction::AddParticipant => commands::cmd_edit_add_participant(&db, &config),
                EditAction::RemoveParticipant { name } => {
                    commands::cmd_edit_remove_participant(&db, &config, &name)
                }
                EditAction::AddPerson => commands::cmd_edit_add_person(&db, &config),
                EditAction::RemovePerson { name } => {
                    commands::cmd_edit_remove_person(&db, &config, &name)
                }
                EditAction::AddCategory => commands::cmd_edit_add_category(&db, &config),
                EditAction::RemoveCategory { name } => {
                    commands::cmd_edit_remove_category(&db, &config, &name)
                }
                EditAction::AddCharge { kind } => commands::cmd_edit_add_charge(&db, &config, kind),
                EditAction::RemoveCharge { position } => {
                    commands::cmd_edit_remove_charge(&db, &config, position)
                }
            }
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, defaults, &host, port, static_dir.as_deref()).await,
    }
}
