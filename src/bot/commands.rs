//! Message classification and reply texts for the chat bot.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    services::submission_service::SubmissionOutcome,
    state::score::{ScoreEntry, parse_scores},
};

/// ASCII `word: number` anywhere in the text.
static SCORE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_]+:\s*-?[0-9]+").expect("score hint pattern is valid")
});

/// Static Markdown reply for `/start` and `/help`.
pub const WELCOME_MESSAGE: &str = "🎮 *Welcome to Wild Card Score Tracker!*

This bot helps you track your wild card game scores.

*Commands:*
/start - Show this help message
/record - Record a new game
/help - Show help

*Quick Record Format:*
Send scores directly in this format:
`Name1: score1, Name2: score2, ...`

*Example:*
`Winz: 5, Luffy: 10, Lucas: -10, Finn: -5`

⚠️ *Important:* All scores must sum to 0!";

/// Static Markdown reply for `/record`.
pub const RECORD_MESSAGE: &str = "📝 *Record New Game*

Please send the scores in this format:
`Name1: score1, Name2: score2, ...`

*Example:*
`Winz: 5, Luffy: 10, Lucas: -10, Finn: -5`

⚠️ Remember: All scores must sum to 0!";

/// Markdown reply for text that looked like scores but could not be parsed.
pub const INVALID_FORMAT_MESSAGE: &str = "❌ Invalid format! Please use:
`Name1: score1, Name2: score2, ...`

Example: `Winz: 5, Luffy: 10, Lucas: -10, Finn: -5`";

/// Plain-text placeholder shown while the sinks run.
pub const SAVING_MESSAGE: &str = "⏳ Saving game record...";

/// Plain-text reply when a submission fails unexpectedly.
pub const SAVE_ERROR_MESSAGE: &str = "❌ Error saving game record. Please try again later.";

/// Supported slash commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/help`, same reply as `/start`.
    Help,
    /// `/record`
    Record,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "record" => Some(Self::Record),
            _ => None,
        }
    }

    /// Markdown text the bot answers with.
    pub fn reply(self) -> &'static str {
        match self {
            Self::Start | Self::Help => WELCOME_MESSAGE,
            Self::Record => RECORD_MESSAGE,
        }
    }
}

/// What the bot should do with an incoming text message.
#[derive(Debug, PartialEq, Eq)]
pub enum Incoming<'a> {
    /// A known slash command.
    Command(Command),
    /// Text that looks like a score submission.
    Scores(&'a str),
    /// Unknown commands and ordinary chatter.
    Ignored,
}

/// Sort a message into a command, a score submission, or noise.
///
/// Anything starting with `/` is treated as a command, known or not, and never reaches
/// score parsing. Commands may carry a `@botname` suffix as sent in group chats.
pub fn classify(text: &str) -> Incoming<'_> {
    if let Some(rest) = text.strip_prefix('/') {
        let token = rest.split_whitespace().next().unwrap_or_default();
        let name = token.split('@').next().unwrap_or_default();
        return Command::parse(name).map_or(Incoming::Ignored, Incoming::Command);
    }
    if SCORE_HINT.is_match(text) {
        Incoming::Scores(text)
    } else {
        Incoming::Ignored
    }
}

/// Parse and sum-check a score message, returning the Markdown rejection on failure.
pub fn check_scores(text: &str) -> Result<ScoreEntry, String> {
    let Some(entry) = parse_scores(text) else {
        return Err(INVALID_FORMAT_MESSAGE.to_string());
    };
    if !entry.is_zero_sum() {
        return Err(unbalanced_message(&entry));
    }
    Ok(entry)
}

/// Rejection listing the computed sum and the scores as entered.
pub fn unbalanced_message(entry: &ScoreEntry) -> String {
    format!(
        "❌ Invalid scores! Sum must equal 0.\nCurrent sum: {}\n\nScores: {}",
        entry.sum(),
        entry.formatted()
    )
}

/// Final Markdown status after both sinks ran.
pub fn status_message(entry: &ScoreEntry, outcome: SubmissionOutcome) -> String {
    let sheet = if outcome.sheet_success {
        "📊 Saved to Google Sheets ✓"
    } else {
        "📊 Google Sheets: Failed ✗"
    };
    let chat = if outcome.chat_success {
        "💬 Google Chat notified ✓"
    } else {
        "💬 Google Chat: Failed ✗"
    };
    format!(
        "✅ *Game recorded successfully!*\n\n*Scores:*\n{}\n\n{sheet}\n{chat}",
        entry.formatted()
    )
}
