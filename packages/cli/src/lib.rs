//! The `cockpit` command: read collections and singletons from a Cockpit
//! site and print them as JSON.

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;

use cockpit::{Cockpit, CockpitClient, EntryNode, Query};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Entry(#[from] cockpit::Error),

    #[error(transparent)]
    Http(#[from] cockpit_http::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },
}

/// cockpit - read entries from a Cockpit CMS
#[derive(Parser, Debug)]
#[command(name = "cockpit")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Site root, e.g. https://cms.example.com
    #[arg(long, env = "COCKPIT_URL")]
    pub url: String,

    /// API token
    #[arg(long, env = "COCKPIT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Locale overlaid onto localized fields
    #[arg(long)]
    pub locale: Option<String>,

    /// Locale of the unsuffixed fields
    #[arg(long, default_value = "en")]
    pub default_locale: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print entries of a collection
    Entries {
        collection: String,

        /// Field criterion, `field=value`; values are JSON when they parse
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Sort criterion, `field=1` or `field=-1`
        #[arg(long = "sort", value_name = "FIELD=DIR")]
        sorts: Vec<String>,

        #[arg(long)]
        limit: Option<u64>,

        /// Print only these fields
        #[arg(long = "field", value_name = "FIELD")]
        fields: Vec<String>,
    },

    /// Print a singleton
    Singleton {
        name: String,

        /// Print only these fields
        #[arg(long = "field", value_name = "FIELD")]
        fields: Vec<String>,
    },
}

/// Connect to the configured site and run the command.
pub fn run(args: Args) -> Result<(), CliError> {
    let client = CockpitClient::new(&args.url, &args.token)?;
    let cms = configure(Cockpit::new(Arc::new(client)), &args);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cms, &args.command, &mut out)
}

fn configure(cms: Cockpit, args: &Args) -> Cockpit {
    match &args.locale {
        Some(locale) => cms.with_locale(locale.as_str(), args.default_locale.as_str()),
        None => cms,
    }
}

/// Run `command` against `cms`, writing one JSON document per line.
pub fn execute(cms: &Cockpit, command: &Command, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Entries {
            collection,
            filters,
            sorts,
            limit,
            fields,
        } => {
            let query = build_query(filters, sorts, *limit)?;
            for mut entry in cms.entries(collection, &query)? {
                print_entry(&mut entry, fields, out)?;
            }
        }
        Command::Singleton { name, fields } => {
            let mut entry = cms.singleton(name)?;
            print_entry(&mut entry, fields, out)?;
        }
    }
    Ok(())
}

/// Print `fields` of `entry` through `get`, so hooks fire; every field after
/// a full load when `fields` is empty.
fn print_entry(
    entry: &mut EntryNode,
    fields: &[String],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let document = if fields.is_empty() {
        entry.load()?;
        entry.to_json()
    } else {
        let mut selected = serde_json::Map::new();
        for field in fields {
            selected.insert(field.clone(), entry.get(field.as_str())?.to_json());
        }
        JsonValue::Object(selected)
    };
    writeln!(out, "{}", serde_json::to_string(&document)?)?;
    Ok(())
}

pub fn build_query(
    filters: &[String],
    sorts: &[String],
    limit: Option<u64>,
) -> Result<Query, CliError> {
    let mut query = Query::new();
    for filter in filters {
        let (field, value) = parse_filter(filter)?;
        query = query.with_filter(field, value);
    }
    for sort in sorts {
        let (field, direction) = parse_sort(sort)?;
        query = query.with_sort(field, direction);
    }
    if let Some(limit) = limit {
        query = query.with_limit(limit);
    }
    Ok(query)
}

fn split_pair(argument: &str) -> Result<(&str, &str), CliError> {
    match argument.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field, value)),
        _ => Err(CliError::InvalidArgument {
            argument: argument.to_string(),
            message: "expected FIELD=VALUE".to_string(),
        }),
    }
}

/// `published=true` filters on the boolean, `title=Hello` on the string.
pub fn parse_filter(argument: &str) -> Result<(String, JsonValue), CliError> {
    let (field, raw) = split_pair(argument)?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::from(raw));
    Ok((field.to_string(), value))
}

pub fn parse_sort(argument: &str) -> Result<(String, i64), CliError> {
    let (field, raw) = split_pair(argument)?;
    match raw {
        "1" | "asc" => Ok((field.to_string(), 1)),
        "-1" | "desc" => Ok((field.to_string(), -1)),
        _ => Err(CliError::InvalidArgument {
            argument: argument.to_string(),
            message: "sort direction must be 1 or -1".to_string(),
        }),
    }
}
