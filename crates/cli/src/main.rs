//! # CLI - Record Store Interactive Shell
//!
//! A REPL-style front end for the record store. Reads commands from stdin,
//! runs them against a [`Store`], and prints results to stdout. Works both
//! interactively and scripted (pipe commands via stdin). Log output goes to
//! stderr so stdout stays parseable.
//!
//! ## Commands
//!
//! ```text
//! READ n                    Print record n ("(deleted)" for tombstones)
//! FIND c1|c2|...            Slots whose fields start with the criteria
//! CREATE f1|f2|...          Append a record, prints its slot
//! LOCK n                    Lock record n, prints the cookie
//! UPDATE n cookie f1|f2|... Rewrite the non-key fields of record n
//! DELETE n cookie           Mark record n deleted
//! UNLOCK n cookie           Release record n
//! SCHEMA                    Print the file header
//! COUNT                     Number of slots, deleted ones included
//! COPY path                 Copy the data file to path
//! STATS                     Print store debug info
//! EXIT / QUIT               Leave the shell
//! ```
//!
//! An empty `|`-separated token is a null (a wildcard in `FIND`).
//!
//! ## Configuration
//!
//! ```text
//! RECSTORE_DB_PATH          data file path                 (default: "db-1x1.db")
//! RECSTORE_KEY_FIELDS       key field positions            (default: "0,1")
//! RECSTORE_SCHEMA           name:len,... for a new file    (default: unset)
//! RECSTORE_MAGIC            magic number for a new file    (default: 0x00002020)
//! RECSTORE_LOCK_TIMEOUT_MS  lock wait limit, 0 = forever   (default: 0)
//! RUST_LOG                  log filter                     (default: "warn")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ RECSTORE_DB_PATH=people.db RECSTORE_SCHEMA=name:8,city:8 RECSTORE_KEY_FIELDS=0 cargo run -p cli
//! recstore started (path=people.db, records=0, key_fields=[0], lock_timeout=none)
//! > CREATE ann|nyc
//! OK slot=0
//! > FIND a|
//! 0
//! (1 matches)
//! > EXIT
//! bye
//! ```

mod shell;

use anyhow::{Context, Result};
use config::StoreConfig;
use shell::Reply;
use std::io::{self, BufRead, Write};
use store::Store;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cfg = StoreConfig::from_env()?;
    let store = Store::from_config(&cfg)
        .with_context(|| format!("cannot open data file {}", cfg.data_path.display()))?;

    println!(
        "recstore started (path={}, records={}, key_fields={:?}, lock_timeout={})",
        store.path().display(),
        store.record_count()?,
        store.key_fields(),
        store
            .lock_timeout_default()
            .map_or_else(|| "none".to_string(), |d| format!("{}ms", d.as_millis()))
    );
    println!("Commands: READ n | FIND c1|c2 | CREATE f1|f2 | LOCK n");
    println!("          UPDATE n cookie f1|f2 | DELETE n cookie | UNLOCK n cookie");
    println!("          SCHEMA | COUNT | COPY path | STATS | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        match shell::execute(&store, &line) {
            Some(Reply::Output(text)) => println!("{}", text),
            Some(Reply::Exit) => {
                println!("bye");
                break;
            }
            None => {}
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}
