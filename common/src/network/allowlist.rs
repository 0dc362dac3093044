//! # Allow-List
//!
//! Line based address allow-lists, as entered into a settings textarea:
//!
//! ```text
//! 192.0.2.0/24        # office
//! 198.51.100.7        // monitoring
//! 10.0.0.10-10.0.0.20
//! ```
//!
//! Entries that do not parse are dropped silently; the rest of the list
//! stays usable.

use std::fmt;

use tracing::debug;

use crate::network::address::IpAddress;
use crate::network::range::{self, IpRange};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowEntry {
    pub range: IpRange,
    pub comment: Option<String>,
}

impl fmt::Display for AllowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comment {
            Some(comment) => write!(f, "{} # {}", self.range, comment),
            None => write!(f, "{}", self.range),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<AllowEntry>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one entry per line, skipping blanks, comments and bad entries.
    pub fn parse(text: &str) -> Self {
        let mut list = Self::new();

        for (line_no, line) in text.lines().enumerate() {
            let (entry, comment) = strip_comment(line);
            if entry.is_empty() {
                continue;
            }

            match range::parse_range(entry) {
                Some(range) => list.entries.push(AllowEntry {
                    range,
                    comment: comment.map(str::to_string),
                }),
                None => debug!("Skipping allow-list line {}: '{entry}'", line_no + 1),
            }
        }

        list
    }

    pub fn push(&mut self, range: IpRange) {
        self.entries.push(AllowEntry {
            range,
            comment: None,
        });
    }

    pub fn contains(&self, addr: &IpAddress) -> bool {
        addr.is_in_any_range(self.ranges())
    }

    /// Like [`AllowList::contains`]; text that is not an address never matches.
    pub fn contains_text(&self, text: &str) -> bool {
        text.parse::<IpAddress>()
            .map(|addr| self.contains(&addr))
            .unwrap_or(false)
    }

    pub fn entries(&self) -> &[AllowEntry] {
        &self.entries
    }

    pub fn ranges(&self) -> impl Iterator<Item = &IpRange> {
        self.entries.iter().map(|entry| &entry.range)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<IpRange> for AllowList {
    fn from_iter<T: IntoIterator<Item = IpRange>>(iter: T) -> Self {
        let mut list = Self::new();
        iter.into_iter().for_each(|range| list.push(range));
        list
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Splits a line into its entry and an optional `#` or `//` comment.
pub fn strip_comment(line: &str) -> (&str, Option<&str>) {
    let marker = [line.find('#').map(|i| (i, 1)), line.find("//").map(|i| (i, 2))]
        .into_iter()
        .flatten()
        .min_by_key(|(i, _)| *i);

    match marker {
        Some((i, len)) => {
            let comment = line[i + len..].trim();
            (line[..i].trim(), (!comment.is_empty()).then_some(comment))
        }
        None => (line.trim(), None),
    }
}

/// Canonical text of an allow-list, one surviving entry per line.
pub fn sanitize_allowlist(text: &str) -> String {
    AllowList::parse(text).to_string()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
