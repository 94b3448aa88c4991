//! Fixed player roster and the fuzzy matcher mapping free-text names onto it.

use tracing::warn;

use super::score::ScoreEntry;

/// Header of the leading spreadsheet column.
pub const TIMESTAMP_HEADER: &str = "Timestamp";

/// Ordered list of canonical player names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster, keeping the given order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical names in configured order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Header row expected in the spreadsheet: `Timestamp` followed by every player.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(TIMESTAMP_HEADER.to_string())
            .chain(self.names.iter().cloned())
            .collect()
    }

    /// Resolve a free-text name to a roster entry.
    ///
    /// A case-insensitive exact match wins. Otherwise the first roster name (in roster
    /// order) that contains the input, or is contained by it, is returned. This is the
    /// first containment hit, not necessarily the closest one.
    pub fn match_name(&self, input: &str) -> Option<&str> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.names
            .iter()
            .find(|name| name.to_lowercase() == needle)
            .or_else(|| {
                self.names.iter().find(|name| {
                    let candidate = name.to_lowercase();
                    candidate.contains(&needle) || needle.contains(&candidate)
                })
            })
            .map(String::as_str)
    }

    /// Re-key an entry onto canonical roster names.
    ///
    /// Names without a match are dropped with a warning. The zero-sum check has already
    /// run on the submitted names, so the result may no longer balance.
    pub fn match_entry(&self, entry: &ScoreEntry) -> ScoreEntry {
        let mut matched = ScoreEntry::new();
        for (input, score) in entry.iter() {
            match self.match_name(input) {
                Some(name) => matched.insert(name, score),
                None => warn!(input, "could not match name to any roster player; dropping it"),
            }
        }
        matched
    }
}
