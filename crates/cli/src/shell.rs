//! Command parsing and dispatch for the interactive shell.
//!
//! Every command produces one reply (possibly several lines) that `main`
//! prints to stdout. Store failures are rendered as `ERR ...` lines, never
//! returned, so a bad command does not end the session.

use store::Store;
use tracing::debug;

/// What the REPL should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Exit,
}

fn out(s: impl Into<String>) -> Reply {
    Reply::Output(s.into())
}

/// Splits `a|b||c` into fields. An empty token is a null.
pub fn parse_fields(raw: &str) -> Vec<Option<String>> {
    raw.split('|')
        .map(|t| (!t.is_empty()).then(|| t.to_string()))
        .collect()
}

/// Splits off the first whitespace-delimited word.
fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

/// Runs one input line against `store`.
pub fn execute(store: &Store, line: &str) -> Option<Reply> {
    let (cmd, rest) = next_word(line);
    if cmd.is_empty() {
        return None;
    }
    debug!(cmd, "shell command");

    let reply = match cmd.to_uppercase().as_str() {
        "READ" => match rest.trim().parse::<u32>() {
            Ok(slot) => match store.read(slot) {
                Ok(Some(fields)) => out(
                    fields
                        .iter()
                        .map(|f| f.trim())
                        .collect::<Vec<_>>()
                        .join("|"),
                ),
                Ok(None) => out("(deleted)"),
                Err(e) => out(format!("ERR read failed: {}", e)),
            },
            Err(_) => out("ERR usage: READ n"),
        },
        "FIND" => {
            let criteria = if rest.is_empty() {
                match store.header() {
                    Ok(h) => vec![None; h.field_count()],
                    Err(e) => return Some(out(format!("ERR find failed: {}", e))),
                }
            } else {
                parse_fields(rest)
            };
            match store.find(&criteria) {
                Ok(slots) if slots.is_empty() => out("(none)"),
                Ok(slots) => {
                    let list: Vec<String> = slots.iter().map(u32::to_string).collect();
                    out(format!("{}\n({} matches)", list.join(" "), slots.len()))
                }
                Err(e) => out(format!("ERR find failed: {}", e)),
            }
        }
        "CREATE" => {
            if rest.is_empty() {
                out("ERR usage: CREATE f1|f2|...")
            } else {
                match store.create(&parse_fields(rest)) {
                    Ok(slot) => out(format!("OK slot={}", slot)),
                    Err(e) => out(format!("ERR create failed: {}", e)),
                }
            }
        }
        "UPDATE" => {
            let (slot, rest) = next_word(rest);
            let (cookie, fields) = next_word(rest);
            match (slot.parse::<u32>(), cookie.parse::<u64>()) {
                (Ok(slot), Ok(cookie)) if !fields.is_empty() => {
                    match store.update(slot, &parse_fields(fields), cookie) {
                        Ok(()) => out("OK"),
                        Err(e) => out(format!("ERR update failed: {}", e)),
                    }
                }
                _ => out("ERR usage: UPDATE n cookie f1|f2|..."),
            }
        }
        "DELETE" => {
            let (slot, rest) = next_word(rest);
            let (cookie, _) = next_word(rest);
            match (slot.parse::<u32>(), cookie.parse::<u64>()) {
                (Ok(slot), Ok(cookie)) => match store.delete(slot, cookie) {
                    Ok(()) => out("OK"),
                    Err(e) => out(format!("ERR delete failed: {}", e)),
                },
                _ => out("ERR usage: DELETE n cookie"),
            }
        }
        "LOCK" => match rest.trim().parse::<u32>() {
            Ok(slot) => match store.lock(slot) {
                Ok(cookie) => out(format!("OK cookie={}", cookie)),
                Err(e) => out(format!("ERR lock failed: {}", e)),
            },
            Err(_) => out("ERR usage: LOCK n"),
        },
        "UNLOCK" => {
            let (slot, rest) = next_word(rest);
            let (cookie, _) = next_word(rest);
            match (slot.parse::<u32>(), cookie.parse::<u64>()) {
                (Ok(slot), Ok(cookie)) => match store.unlock(slot, cookie) {
                    Ok(()) => out("OK"),
                    Err(e) => out(format!("ERR unlock failed: {}", e)),
                },
                _ => out("ERR usage: UNLOCK n cookie"),
            }
        }
        "SCHEMA" => match store.header() {
            Ok(h) => out(h.to_string()),
            Err(e) => out(format!("ERR schema failed: {}", e)),
        },
        "COUNT" => match store.record_count() {
            Ok(n) => out(n.to_string()),
            Err(e) => out(format!("ERR count failed: {}", e)),
        },
        "COPY" => {
            let dst = rest.trim();
            if dst.is_empty() {
                out("ERR usage: COPY path")
            } else {
                match datafile::copy_data_file(store.path(), dst) {
                    Ok(n) => out(format!("OK copied {} records to {}", n, dst)),
                    Err(e) => out(format!("ERR copy failed: {}", e)),
                }
            }
        }
        "STATS" => out(format!("{:?}", store)),
        "EXIT" | "QUIT" => Reply::Exit,
        other => out(format!("unknown command: {}", other)),
    };
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafile::{DataFile, FieldSchema, Header, DEFAULT_MAGIC};

    fn people() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.db");
        let header = Header::new(
            DEFAULT_MAGIC,
            vec![FieldSchema::new("name", 8), FieldSchema::new("city", 8)],
        );
        DataFile::create(&path, &header).unwrap().close().unwrap();
        let store = Store::open(&path, vec![0]).unwrap();
        (dir, store)
    }

    fn run(store: &Store, line: &str) -> String {
        match execute(store, line) {
            Some(Reply::Output(s)) => s,
            other => panic!("unexpected reply {:?} for {:?}", other, line),
        }
    }

    #[test]
    fn empty_tokens_are_nulls() {
        assert_eq!(
            parse_fields("ann||new york"),
            vec![Some("ann".into()), None, Some("new york".into())]
        );
        assert_eq!(parse_fields("|"), vec![None, None]);
    }

    #[test]
    fn blank_line_is_ignored() {
        let (_dir, store) = people();
        assert_eq!(execute(&store, "   "), None);
        assert_eq!(execute(&store, "quit"), Some(Reply::Exit));
    }

    #[test]
    fn create_read_find() {
        let (_dir, store) = people();
        assert_eq!(run(&store, "CREATE ann|nyc"), "OK slot=0");
        assert_eq!(run(&store, "CREATE bob|sf"), "OK slot=1");
        assert_eq!(run(&store, "create amy|la"), "OK slot=2");
        assert_eq!(run(&store, "READ 1"), "bob|sf");
        assert_eq!(run(&store, "FIND a|"), "0 2\n(2 matches)");
        assert_eq!(run(&store, "FIND"), "0 1 2\n(3 matches)");
        assert_eq!(run(&store, "FIND z|"), "(none)");
        assert_eq!(run(&store, "COUNT"), "3");
    }

    #[test]
    fn lock_update_delete_cycle() {
        let (_dir, store) = people();
        run(&store, "CREATE ann|nyc");
        let reply = run(&store, "LOCK 0");
        let cookie = reply.strip_prefix("OK cookie=").unwrap();

        assert_eq!(run(&store, &format!("UPDATE 0 {} ann|la", cookie)), "OK");
        assert_eq!(run(&store, "READ 0"), "ann|la");
        assert_eq!(run(&store, &format!("DELETE 0 {}", cookie)), "OK");
        assert_eq!(run(&store, &format!("UNLOCK 0 {}", cookie)), "OK");
        assert_eq!(run(&store, "READ 0"), "(deleted)");
    }

    #[test]
    fn errors_are_rendered_not_returned() {
        let (_dir, store) = people();
        assert!(run(&store, "READ 0").starts_with("ERR read failed"));
        assert!(run(&store, "READ x").starts_with("ERR usage"));
        assert!(run(&store, "CREATE |nyc").starts_with("ERR create failed"));
        assert!(run(&store, "UPDATE 0").starts_with("ERR usage"));
        assert!(run(&store, "FROB").starts_with("unknown command"));
    }

    #[test]
    fn copy_writes_second_file() {
        let (dir, store) = people();
        run(&store, "CREATE ann|nyc");
        let dst = dir.path().join("copy.db");
        let reply = run(&store, &format!("COPY {}", dst.display()));
        assert!(reply.starts_with("OK copied 1 records"), "{}", reply);
        assert_eq!(
            std::fs::read(store.path()).unwrap(),
            std::fs::read(&dst).unwrap()
        );
    }

    #[test]
    fn copy_onto_live_file_is_refused() {
        let (_dir, store) = people();
        run(&store, "CREATE ann|nyc");
        let reply = run(&store, &format!("COPY {}", store.path().display()));
        assert!(reply.starts_with("ERR copy failed"), "{}", reply);
        assert_eq!(store.record_count().unwrap(), 1);
        assert_eq!(run(&store, "READ 0"), "ann|nyc");
    }
}
