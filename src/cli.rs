use crate::parse::ContactSource;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Milestones, a lookout for the birthdays, anniversaries, and other dates of the people you know.
#[derive(Parser, Debug)]
pub struct Cli {
    #[command(flatten)]
    source: SourceOptions,

    /// The account whose contacts should be examined. Contacts belonging to anyone else will be
    /// ignored.
    #[arg(short, long, env = "MILESTONES_OWNER")]
    pub owner: Option<String>,
    /// How many days ahead to look (inclusive), or `all` to show every upcoming date. Anything
    /// that isn't a non-negative number falls back to 365.
    #[arg(short, long, env = "REMINDER_WINDOW_DAYS")]
    pub days: Option<String>,
    /// The day to treat as today. Defaults to the current local date.
    #[arg(short, long)]
    pub today: Option<NaiveDate>,
    /// Which encoding to output.
    #[arg(short, long, default_value = "json")]
    pub encoding: Encoding,
}
impl Cli {
    /// Works out where contacts should be read from.
    pub fn source(&self) -> ContactSource {
        match (&self.source.contacts, &self.source.endpoint) {
            (_, Some(addr)) => ContactSource::Endpoint(addr.clone()),
            (Some(path), None) if path.as_os_str() == "-" => ContactSource::Stdin,
            (Some(path), None) => ContactSource::File(path.clone()),
            // We're guaranteed to have one of them set by `clap`'s parsing rules
            (None, None) => unreachable!(),
        }
    }
}

/// Options for where to read contacts from: a JSON file (or stdin), or a contacts service.
#[derive(Parser, Debug)]
#[group(multiple = false, required = true)]
struct SourceOptions {
    /// The path to a JSON file of contact records, or `-` to read them from stdin
    #[arg(short, long, env = "MILESTONES_CONTACTS")]
    contacts: Option<PathBuf>,

    /// The address of a contacts service to fetch the owner's contacts from (e.g.
    /// `localhost:3000`)
    #[arg(long)]
    endpoint: Option<String>,
}

/// The encoding to use for the output of the CLI.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "snake_case")]
pub enum Encoding {
    /// JSON, the default encoding.
    Json,
    /// Bincode, which is *much* faster to handle if passing output to another Rust program.
    Bincode,
    /// One line per date, for reading in a terminal.
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sources() {
        let cli = Cli::try_parse_from(["milestones", "-c", "contacts.json", "-o", "me"]).unwrap();
        assert_eq!(
            cli.source(),
            ContactSource::File(PathBuf::from("contacts.json"))
        );
        assert_eq!(cli.owner.as_deref(), Some("me"));
        assert_eq!(cli.encoding, Encoding::Json);

        let cli = Cli::try_parse_from(["milestones", "-c", "-"]).unwrap();
        assert_eq!(cli.source(), ContactSource::Stdin);

        let cli = Cli::try_parse_from(["milestones", "--endpoint", "localhost:3000"]).unwrap();
        assert_eq!(
            cli.source(),
            ContactSource::Endpoint("localhost:3000".to_string())
        );
    }

    #[test]
    fn parses_window_and_today() {
        let cli = Cli::try_parse_from([
            "milestones",
            "-c",
            "contacts.json",
            "--days",
            "all",
            "--today",
            "2024-03-10",
            "-e",
            "text",
        ])
        .unwrap();
        assert_eq!(cli.days.as_deref(), Some("all"));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 3, 10));
        assert_eq!(cli.encoding, Encoding::Text);
    }

    #[test]
    fn sources_are_exclusive() {
        assert!(Cli::try_parse_from([
            "milestones",
            "-c",
            "contacts.json",
            "--endpoint",
            "localhost:3000"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["milestones", "--today", "2024-03-10"]).is_err());
    }
}
