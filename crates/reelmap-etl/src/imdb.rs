//! Reading IMDb `locations.list` dumps.
//!
//! Each data row looks like
//!
//! ```text
//! "#15SecondScare" (2015) {It is Me Jessica (#1.5)}\t\t\tCoventry, West Midlands, England, UK
//! Harry Potter and the Chamber of Secrets (2002)\t\tAlnwick Castle, Alnwick, Northumberland, England, UK\t(Hogwarts)
//! ```
//!
//! The header, the separator lines and rows with an unknown year (`????`)
//! do not match and are ignored.

use std::collections::HashSet;
use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<title>[^\t]+?) \((?P<year>\d{4})(?:/[IVXLC]+)?\)[^\t]*\t+(?P<place>[^\t]+?)\s*(?:\t|$)",
    )
    .expect("location pattern is valid")
});

/// A filming location as listed by IMDb, not yet geocoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImdbEntry {
    pub title: String,
    pub year: i32,
    pub place: String,
}

/// Parse one row of the list.
///
/// TV series titles are quoted in the dump; the quotes are dropped. The
/// episode (`{...}`) and the trailing note column are discarded.
pub fn parse_entry(line: &str) -> Option<ImdbEntry> {
    let caps = ENTRY.captures(line)?;
    let raw_title = caps.name("title")?.as_str().trim();
    let title = raw_title
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(raw_title);
    let year = caps.name("year")?.as_str().parse().ok()?;
    let place = caps.name("place")?.as_str().trim();

    if title.is_empty() || place.is_empty() {
        return None;
    }

    Some(ImdbEntry {
        title: title.to_string(),
        year,
        place: place.to_string(),
    })
}

/// Read every entry from a list, optionally keeping one year only.
///
/// Repeated (title, year, place) rows, which the dump has for every episode
/// shot at the same place, are kept once in first-seen order. The file is
/// Latin-1 in the wild, so undecodable bytes are replaced rather than
/// failing the read.
///
/// # Errors
/// Returns the underlying I/O error if reading fails.
pub fn read_entries<R: BufRead>(mut reader: R, year: Option<i32>) -> std::io::Result<Vec<ImdbEntry>> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let Some(entry) = parse_entry(line.trim_end_matches(['\n', '\r'])) else {
            continue;
        };
        if year.is_some_and(|y| y != entry.year) {
            continue;
        }
        if seen.insert(entry.clone()) {
            entries.push(entry);
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_film() {
        let entry = parse_entry(
            "Harry Potter and the Chamber of Secrets (2002)\t\tAlnwick Castle, Alnwick, Northumberland, England, UK\t(Hogwarts)",
        )
        .unwrap();
        assert_eq!(entry.title, "Harry Potter and the Chamber of Secrets");
        assert_eq!(entry.year, 2002);
        assert_eq!(entry.place, "Alnwick Castle, Alnwick, Northumberland, England, UK");
    }

    #[test]
    fn test_parse_roman_suffix() {
        let entry = parse_entry("Haunted (2014/IV)\t\tLos Angeles, California, USA").unwrap();
        assert_eq!(entry.title, "Haunted");
        assert_eq!(entry.year, 2014);
    }

    #[test]
    fn test_parse_series_episode() {
        let entry = parse_entry(
            "\"#15SecondScare\" (2015) {It is Me Jessica (#1.5)}\t\t\tCoventry, West Midlands, England, UK",
        )
        .unwrap();
        assert_eq!(entry.title, "#15SecondScare");
        assert_eq!(entry.year, 2015);
        assert_eq!(entry.place, "Coventry, West Midlands, England, UK");
    }

    #[test]
    fn test_parse_title_with_parentheses() {
        let entry = parse_entry("Bo (Bobby) Jones (1999)\tAtlanta, Georgia, USA").unwrap();
        assert_eq!(entry.title, "Bo (Bobby) Jones");
        assert_eq!(entry.year, 1999);
    }

    #[test]
    fn test_ignores_non_entries() {
        assert!(parse_entry("LOCATIONS LIST").is_none());
        assert!(parse_entry("==============").is_none());
        assert!(parse_entry("").is_none());
        assert!(parse_entry("Unknown (????)\t\tParis, France").is_none());
        assert!(parse_entry("No Place (2001)").is_none());
    }

    #[test]
    fn test_read_entries_dedups_and_filters() {
        let list = "\
CRC: 0x3D76D9A3  File: locations.list  Date: Fri Dec 16 00:00:00 2016

LOCATIONS LIST
==============

\"Game of Thrones\" (2011) {Winter Is Coming (#1.1)}\t\tDoune Castle, Scotland, UK
\"Game of Thrones\" (2011) {The Kingsroad (#1.2)}\t\tDoune Castle, Scotland, UK
\"Game of Thrones\" (2011) {Lord Snow (#1.3)}\t\tMdina, Malta
Hugo (2011)\t\tParis, France\t(train station)
Hanna (2011)\tBerlin, Germany
Harry Potter and the Chamber of Secrets (2002)\tAlnwick Castle, England, UK
--------------------------------------------------------------------------------
";
        let all = read_entries(Cursor::new(list), None).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].place, "Doune Castle, Scotland, UK");
        assert_eq!(all[1].place, "Mdina, Malta");

        let only_2011 = read_entries(Cursor::new(list), Some(2011)).unwrap();
        assert_eq!(only_2011.len(), 4);
        assert!(only_2011.iter().all(|e| e.year == 2011));
    }

    #[test]
    fn test_read_entries_tolerates_latin1() {
        let mut bytes = b"Am\xe9lie (2001)\t\tParis, France\n".to_vec();
        bytes.extend_from_slice(b"Hugo (2011)\t\tParis, France\n");
        let entries = read_entries(Cursor::new(bytes), None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title, "Hugo");
    }
}
