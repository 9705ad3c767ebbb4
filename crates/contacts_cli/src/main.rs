//! Terminal front end for the contacts core.
//!
//! # Responsibility
//! - Validate user input before it reaches the core.
//! - Run every store call through the coordinator and wait on its ticket.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use contacts_core::{
    init_from_config, open_coordinator, Contact, ContactCoordinator, ContactDraft,
    CoordinatorError, CoreConfig, SqliteContactStore,
};
use log::info;
use std::process::ExitCode;

const BLANK_FIELDS_MESSAGE: &str = "Name or phone cannot be blank";

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    init_from_config(&config)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let (handle, coordinator) = open_coordinator(&config)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    info!("event=cli_start module=cli status=ok");

    let code = execute(&cli, &coordinator);
    coordinator.shutdown();
    handle.close().context("failed to close database")?;
    code
}

fn load_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config `{}`", path.display()))?;
            CoreConfig::from_json_str(&raw).map_err(anyhow::Error::msg)?
        }
        None => CoreConfig::default(),
    };

    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn execute(cli: &Cli, coordinator: &ContactCoordinator<SqliteContactStore>) -> Result<ExitCode> {
    match &cli.command {
        Command::Add { name, phone } => {
            let Ok(draft) = ContactDraft::new(name.as_str(), phone.as_str()) else {
                eprintln!("{BLANK_FIELDS_MESSAGE}");
                return Ok(ExitCode::from(2));
            };
            let created = coordinator.add(draft)?.wait()?;
            print_contacts(cli.json, std::slice::from_ref(&created))?;
        }
        Command::List => {
            let contacts = coordinator.list()?.wait()?;
            print_contacts(cli.json, &contacts)?;
        }
        Command::Show { id } => match coordinator.get(*id)?.wait()? {
            Some(contact) => print_contacts(cli.json, std::slice::from_ref(&contact))?,
            None => {
                eprintln!("Contact {id} not found");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Search { query } => match coordinator.search(query).and_then(|t| t.wait()) {
            Ok(contacts) => print_contacts(cli.json, &contacts)?,
            Err(CoordinatorError::BlankQuery) => {
                eprintln!("Search text cannot be blank");
                return Ok(ExitCode::from(2));
            }
            Err(err) => {
                eprintln!("Warning: {err}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Edit { id, name, phone } => {
            let Ok(draft) = ContactDraft::new(name.as_str(), phone.as_str()) else {
                eprintln!("{BLANK_FIELDS_MESSAGE}");
                return Ok(ExitCode::from(2));
            };
            if coordinator.update(*id, draft)?.wait()? == 0 {
                eprintln!("Contact {id} not found");
                return Ok(ExitCode::FAILURE);
            }
            println!("Updated contact {id}");
        }
        Command::Delete { id } => {
            if coordinator.delete(*id)?.wait()? == 0 {
                eprintln!("Contact {id} not found");
                return Ok(ExitCode::FAILURE);
            }
            println!("Deleted contact {id}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_contacts(json: bool, contacts: &[Contact]) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(contacts)?);
        return Ok(());
    }

    if contacts.is_empty() {
        println!("No records");
        return Ok(());
    }

    for contact in contacts {
        println!("{}\t{}\t{}", contact.id, contact.name, contact.phone);
    }
    Ok(())
}
