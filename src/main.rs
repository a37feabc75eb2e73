mod categorize;
mod cli;
mod db;
mod error;
mod finances;
mod fmt;
mod ingest;
mod models;
mod overrides;
mod settings;
mod store;
mod trends;

use clap::Parser;

use cli::{Cli, Commands, OverrideCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, account } => cli::import::run(&file, account.as_deref()),
        Commands::Month { month } => cli::month::run(month),
        Commands::Review { month } => cli::review::run(month),
        Commands::Override { command } => match command {
            OverrideCommands::Apply {
                id,
                override_type,
                reason,
                category,
            } => cli::overrides::apply(&id, &override_type, &reason, &category),
            OverrideCommands::Remove { id } => cli::overrides::remove(&id),
        },
        Commands::Edit {
            id,
            category,
            note,
            exclude,
            include,
        } => cli::edit::run(&id, category.as_deref(), note.as_deref(), exclude, include),
        Commands::Categories => cli::categories::run(),
        Commands::Accounts => cli::accounts::run(),
        Commands::Trends { months, top } => cli::trends::run(months, top),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
