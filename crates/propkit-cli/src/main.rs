use std::fs::File;
use std::io::{Read, stdin};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use propkit::{ArrayIter, Fields, IterableShape, Normalizer, Options, Value};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IterableArg {
    Map,
    List,
}

#[derive(Parser, Debug)]
#[command(
    name = "propkit-cli",
    about = "Normalize JSON documents and build propkit records",
    version
)]
struct Args {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a JSON document and print it
    Normalize {
        /// Treat a top-level array as a row cursor
        #[arg(long, default_value_t = false)]
        rows: bool,

        /// Output shape for row cursors
        #[arg(long, value_enum, default_value_t = IterableArg::Map)]
        iterable: IterableArg,

        /// Pretty-print JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Input file (defaults to stdin)
        input: Option<PathBuf>,
    },
    /// Build a User record from a JSON object of fields and print its JSON form
    User {
        /// Display zone for createdAt, e.g. Asia/Tokyo
        #[arg(long)]
        timezone: Option<String>,

        /// strftime pattern for createdAt
        #[arg(long)]
        date_format: Option<String>,

        /// Pretty-print JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Input file (defaults to stdin)
        input: Option<PathBuf>,
    },
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> Result<serde_json::Value> {
    let mut buf = String::new();
    match input {
        Some(path) => {
            let mut f =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            f.read_to_string(&mut buf)?;
        }
        None => {
            stdin().read_to_string(&mut buf)?;
        }
    }
    Ok(serde_json::from_str(&buf)?)
}

fn print_json(json: &propkit::Json, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(json)?);
    } else {
        println!("{}", serde_json::to_string(json)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    match args.command {
        Command::Normalize {
            rows,
            iterable,
            pretty,
            input,
        } => {
            let doc = read_input(input.as_ref())?;
            let value = match (rows, Value::from(doc)) {
                (true, Value::List(items)) => {
                    debug!(rows = items.len(), "normalizing row cursor");
                    Value::object(ArrayIter::from_list(items))
                }
                (true, _) => bail!("--rows expects a top-level JSON array"),
                (false, value) => value,
            };
            let options = Options {
                iterable: match iterable {
                    IterableArg::Map => IterableShape::Map,
                    IterableArg::List => IterableShape::List,
                },
            };
            let json = Normalizer::new(options).convert(&value)?;
            print_json(&json, pretty)?;
        }
        Command::User {
            timezone,
            date_format,
            pretty,
            input,
        } => {
            let fields: Fields = match Value::from(read_input(input.as_ref())?) {
                Value::Map(map) => map,
                other => bail!("expected a JSON object of user fields, got {}", other.type_name()),
            };
            let zone = timezone
                .as_deref()
                .map(propkit::timestamp::parse_zone)
                .transpose()?;
            let user = propkit::data::user::user(fields, zone, date_format.as_deref())?;
            let json = propkit::normalize(&Value::from(user))?;
            print_json(&json, pretty)?;
        }
    }

    Ok(())
}
