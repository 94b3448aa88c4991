//! Score entries: parsing free text into an ordered name → score mapping and checking the
//! zero-sum rule.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single `Name: score` pair, anchored on both ends.
static PAIR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?):\s*(-?[0-9]+)$").expect("score pair pattern is valid")
});

/// One submitted game result, mapping player display names to signed scores.
///
/// Insertion order is preserved. Inserting a name twice keeps its first position and
/// the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreEntry {
    scores: IndexMap<String, i64>,
}

impl ScoreEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `score` for `name`, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, score: i64) {
        self.scores.insert(name.into(), score);
    }

    /// Number of players in the entry.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no player has been recorded.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score recorded for `name`, if any (exact, case-sensitive lookup).
    pub fn get(&self, name: &str) -> Option<i64> {
        self.scores.get(name).copied()
    }

    /// Iterate over `(name, score)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(name, score)| (name.as_str(), *score))
    }

    /// Sum of every score in the entry, widened so it cannot overflow.
    pub fn sum(&self) -> i128 {
        self.scores.values().map(|score| i128::from(*score)).sum()
    }

    /// Whether the entry satisfies the zero-sum rule.
    pub fn is_zero_sum(&self) -> bool {
        self.sum() == 0
    }

    /// Render the entry as `Name: +N, Name: -N`, keeping insertion order.
    pub fn formatted(&self) -> String {
        self.iter()
            .map(|(name, score)| format!("{name}: {}", signed(score)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// First structural problem found in the entry, if any.
    ///
    /// Entries built by [`parse_scores`] are always structurally valid; this matters for
    /// mappings received as JSON.
    pub fn structural_error(&self) -> Option<StructuralError> {
        structural_error(self.scores.keys().map(String::as_str))
    }
}

/// Reasons a name → score mapping cannot be recorded at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    /// The mapping names no player.
    NoPlayers,
    /// A player name is empty or whitespace.
    BlankName,
}

impl StructuralError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            StructuralError::NoPlayers => "scores_empty",
            StructuralError::BlankName => "player_name_blank",
        }
    }

    /// Message shown to the submitter.
    pub fn message(self) -> &'static str {
        match self {
            StructuralError::NoPlayers => "Scores must contain at least one player",
            StructuralError::BlankName => "Player names must not be empty",
        }
    }
}

/// Check the player names of a mapping, in order.
pub fn structural_error<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<StructuralError> {
    let mut names = names.into_iter().peekable();
    if names.peek().is_none() {
        return Some(StructuralError::NoPlayers);
    }
    names
        .any(|name| name.trim().is_empty())
        .then_some(StructuralError::BlankName)
}

impl From<IndexMap<String, i64>> for ScoreEntry {
    fn from(scores: IndexMap<String, i64>) -> Self {
        Self { scores }
    }
}

impl FromIterator<(String, i64)> for ScoreEntry {
    fn from_iter<T: IntoIterator<Item = (String, i64)>>(iter: T) -> Self {
        let mut entry = Self::new();
        for (name, score) in iter {
            entry.insert(name, score);
        }
        entry
    }
}

/// Format a score with an explicit `+` for positive values.
pub fn signed(score: i64) -> String {
    if score > 0 {
        format!("+{score}")
    } else {
        score.to_string()
    }
}

/// Parse `"Name: 5, Other: -5"` into a [`ScoreEntry`].
///
/// Parsing is all-or-nothing: a single malformed pair, an empty name or a value that does
/// not fit an `i64` rejects the whole input. Repeated names keep the last value.
pub fn parse_scores(text: &str) -> Option<ScoreEntry> {
    let mut entry = ScoreEntry::new();

    for pair in text.split(',').map(str::trim) {
        let captures = PAIR_PATTERN.captures(pair)?;
        let name = captures.get(1)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        let score = captures.get(2)?.as_str().parse::<i64>().ok()?;
        entry.insert(name, score);
    }

    (!entry.is_empty()).then_some(entry)
}
