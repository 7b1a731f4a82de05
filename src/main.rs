mod cli;
mod extractors;
mod parse;
mod views;

use crate::extractors::*;
use crate::parse::*;
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use cli::{Cli, Encoding};
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use views::Window;

fn main() -> Result<()> {
    // Logs go to stderr, stdout is reserved for the data
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();

    // Without an owner there's no telling which contacts to look at, so this is checked before
    // anything is loaded
    let owner = OwnerId::new(args.owner.as_deref())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let window = Window::from_param(args.days.as_deref());

    let contacts = scope_to_owner(get_raw_contacts(&args.source(), &owner)?, &owner);
    let final_data = FinalData {
        upcoming: upcoming(&contacts, today, window),
    };

    match args.encoding {
        Encoding::Json => println!("{}", serde_json::to_string(&final_data)?),
        Encoding::Bincode => {
            let bytes = bincode::serialize(&final_data)?;
            std::io::stdout().write_all(&bytes)?;
            std::io::stdout().flush()?;
        }
        Encoding::Text => {
            if final_data.upcoming.is_empty() {
                println!("Nothing coming up ({window}).");
            }
            for reminder in &final_data.upcoming {
                println!("{}", reminder.describe(today));
            }
        }
    }

    Ok(())
}

/// The final data we stream to the caller.
#[derive(Serialize)]
struct FinalData {
    upcoming: Vec<Reminder>,
}
