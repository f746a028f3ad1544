//! Detection of agent output echoed back by the caller

/// Phrases characteristic of previously generated advice
const BOT_INDICATORS: &[&str] = &[
    "here are some",
    "steps you can take",
    "suggestions to help",
    "advice for",
    "tips that might help",
    "consider taking",
    "you can use",
    "it's essential to",
    "contact a healthcare",
    "rinse with warm salt water",
    "over-the-counter",
    "cold compress",
    "avoid irritating foods",
    "maintain oral hygiene",
    "topical anesthetics",
    "stay hydrated",
    "see a dentist",
];

/// Whether `text` looks like agent output rather than a user utterance
///
/// Case-insensitive substring match against a fixed denylist.
pub fn is_bot_echo(text: &str) -> bool {
    let lower = text.to_lowercase();
    BOT_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}
