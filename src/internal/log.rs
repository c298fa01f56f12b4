//! Commit history enumeration and rendering for the `log` command.
//!
//! §9 open question 4: enumerate commits by walking parent edges from
//! HEAD (ref-walk, Git-like) rather than scanning the object directory,
//! so `log` only ever shows history reachable from the current branch —
//! see DESIGN.md for the recorded decision.

use colored::Colorize;

use crate::errors::Result;
use crate::internal::merge::ancestors;
use crate::internal::object::Object;
use crate::internal::object_store::ObjectStore;

pub struct LogEntry {
    pub hash: String,
    pub author: String,
    pub timestamp: i64,
    pub message: String,
}

/// Walks parent edges from `head_commit`, newest first (BFS visit order
/// from [`ancestors`], which always yields the start commit first).
pub fn history(store: &ObjectStore, head_commit: &str) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    for hash in ancestors(store, head_commit)? {
        if let Object::Commit {
            author,
            timestamp,
            message,
            ..
        } = store.read(&hash)?
        {
            entries.push(LogEntry {
                hash,
                author,
                timestamp,
                message,
            });
        }
    }
    Ok(entries)
}

pub fn format_entry(entry: &LogEntry) -> String {
    let (name, email) = split_author(&entry.author);
    format!(
        "{} {}\nAuthor: {name} <{email}>\nDate:   {}\n\n{}\n",
        "commit".yellow(),
        entry.hash.yellow(),
        format_timestamp(entry.timestamp),
        indent_message(&entry.message),
    )
}

fn split_author(author: &str) -> (&str, &str) {
    match author.split_once('<') {
        Some((name, rest)) => (name.trim(), rest.trim_end_matches('>').trim()),
        None => (author, ""),
    }
}

fn indent_message(message: &str) -> String {
    message
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

const WEEKDAY_NAMES: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Renders an epoch-seconds timestamp as `"<weekday> <month> <day> <hh:mm:ss> <year> +0000"`,
/// matching familiar VCS log phrasing without pulling in a date/time crate.
pub fn format_timestamp(epoch_seconds: i64) -> String {
    let days = epoch_seconds.div_euclid(86_400);
    let secs_of_day = epoch_seconds.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    let hour = secs_of_day / 3600;
    let minute = (secs_of_day % 3600) / 60;
    let second = secs_of_day % 60;
    let weekday = WEEKDAY_NAMES[(days.rem_euclid(7)) as usize];
    format!(
        "{weekday} {} {day:02} {hour:02}:{minute:02}:{second:02} {year} +0000",
        MONTH_NAMES[(month - 1) as usize]
    )
}

/// Howard Hinnant's civil-from-days algorithm: converts a day count
/// since the Unix epoch into a proleptic-Gregorian (year, month, day).
fn civil_from_days(z: i64) -> (i64, i64, i64) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as i64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { y + 1 } else { y };
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::object::Object;

    #[test]
    fn history_walks_parents_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let tree = store.write(&Object::Tree { entries: vec![] }).unwrap();
        let root = store
            .write(&Object::Commit {
                tree: tree.clone(),
                parents: vec![],
                author: "Ada <ada@example.com>".into(),
                timestamp: 0,
                message: "c1".into(),
            })
            .unwrap();
        let child = store
            .write(&Object::Commit {
                tree,
                parents: vec![root.clone()],
                author: "Ada <ada@example.com>".into(),
                timestamp: 1,
                message: "c2".into(),
            })
            .unwrap();

        let log = history(&store, &child).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].hash, child);
        assert_eq!(log[1].hash, root);
    }

    #[test]
    fn formats_known_epoch_as_unix_birthday() {
        assert_eq!(format_timestamp(0), "Thu Jan 01 00:00:00 1970 +0000");
    }
}
