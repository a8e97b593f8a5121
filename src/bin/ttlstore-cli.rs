//! ttlstore CLI
//!
//! Interactive shell over an in-process TTL store.

use clap::Parser;
use std::io::{self, Write};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use ttlstore::storage::ttl;
use ttlstore::{StoreConfig, TtlStore};

/// ttlstore CLI - Interactive TTL Key-Value Shell
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Background sweep interval in milliseconds (0 = disabled)
    #[arg(long, default_value_t = 0)]
    sweep_interval_ms: u64,

    /// Maximum number of entries (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_entries: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Get { key: String },
    Set { key: String, value: String },
    SetEx { key: String, value: String, ttl: Duration },
    Del { key: String },
    Exists { key: String },
    Ttl { key: String },
    Keys,
    Purge,
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ttlstore=info".parse()?))
        .init();

    let args = Args::parse();

    let config = StoreConfig::new()
        .with_sweep_interval(Duration::from_millis(args.sweep_interval_ms))
        .with_max_entries(args.max_entries);
    let store = TtlStore::with_config(config)?;

    info!(
        sweep_interval_ms = args.sweep_interval_ms,
        max_entries = args.max_entries,
        "Store ready"
    );
    println!("Type 'help' for available commands, 'quit' to exit.\n");

    loop {
        print!("ttlstore> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        match parse_command(input).and_then(|cmd| execute(&store, cmd)) {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn execute(store: &TtlStore, cmd: Command) -> anyhow::Result<String> {
    let output = match cmd {
        Command::Get { key } => store.get(&key).unwrap_or_else(|| "(nil)".to_string()),
        Command::Set { key, value } => {
            store.set(key, value)?;
            "OK".to_string()
        }
        Command::SetEx { key, value, ttl } => {
            store.set_with_ttl(key, value, ttl)?;
            "OK".to_string()
        }
        Command::Del { key } => (store.delete(&key) as u8).to_string(),
        Command::Exists { key } => (store.exists(&key) as u8).to_string(),
        Command::Ttl { key } => match store.ttl(&key) {
            None => "-2".to_string(),
            Some(None) => "-1".to_string(),
            Some(Some(remaining)) => format!("{} ms", remaining.as_millis()),
        },
        Command::Keys => {
            let mut keys = store.keys();
            keys.sort();
            if keys.is_empty() {
                "(empty)".to_string()
            } else {
                keys.join("\n")
            }
        }
        Command::Purge => format!("{} expired keys removed", store.purge_expired()),
        Command::Stats => format!("entries={} | {}", store.len(), store.stats().summary()),
    };
    Ok(output)
}

fn parse_command(input: &str) -> anyhow::Result<Command> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.is_empty() {
        anyhow::bail!("Empty command");
    }

    let cmd = parts[0].to_uppercase();
    let (arity, usage) = match cmd.as_str() {
        "GET" | "DEL" | "EXISTS" | "TTL" => (2, "<key>"),
        "SET" => (3, "<key> <value>"),
        "SETEX" => (4, "<key> <value> <ttl_ms>"),
        "KEYS" | "PURGE" | "STATS" => (1, ""),
        _ => anyhow::bail!("Unknown command: {}. Type 'help' for available commands.", cmd),
    };
    // Values are single tokens; extra arguments are an error, never dropped
    if parts.len() != arity {
        anyhow::bail!(
            "{} takes {} argument(s): {} {}",
            cmd,
            arity - 1,
            cmd,
            usage
        );
    }

    let key = || parts[1].to_string();
    let command = match cmd.as_str() {
        "GET" => Command::Get { key: key() },
        "DEL" => Command::Del { key: key() },
        "EXISTS" => Command::Exists { key: key() },
        "TTL" => Command::Ttl { key: key() },
        "SET" => Command::Set {
            key: key(),
            value: parts[2].to_string(),
        },
        "SETEX" => Command::SetEx {
            key: key(),
            value: parts[2].to_string(),
            ttl: ttl::from_millis(parts[3].parse::<i64>()?)?,
        },
        "KEYS" => Command::Keys,
        "PURGE" => Command::Purge,
        _ => Command::Stats,
    };
    Ok(command)
}

fn print_help() {
    println!(
        r#"
Available commands:

  GET <key>                  - Get value for key
  SET <key> <value>          - Set key-value pair that never expires
  SETEX <key> <value> <ttl>  - Set key-value pair expiring after <ttl> milliseconds
  DEL <key>                  - Delete a key
  EXISTS <key>               - Check if key exists
  TTL <key>                  - Remaining lifetime (-1 = no expiry, -2 = missing)
  KEYS                       - List live keys
  PURGE                      - Remove expired keys now
  STATS                      - Show operation counters

  help                       - Show this help
  quit / exit                - Exit the CLI

Examples:
  SET mykey myvalue
  SETEX tempkey value 60000   (expires in 60 seconds)
  SETEX random test 0         (expires immediately)
  GET mykey
"#
    );
}
