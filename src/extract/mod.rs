//! Normalization of inbound `message/send` params into one user utterance
//!
//! Callers wrap the user's text in several envelope shapes. Extraction runs
//! an ordered chain of shape matchers over the params; the first matcher that
//! produces a usable candidate wins. Within a container the most recent text
//! wins, and text that looks like the agent's own earlier output is dropped.

pub mod echo;

use serde_json::{Map, Value};

use crate::protocol::SendMessageParams;

pub use echo::is_bot_echo;

type Object = Map<String, Value>;

/// Result of scanning one container's parts
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartsScan {
    /// Whether any non-blank text was seen, filtered or not
    pub saw_text: bool,

    /// The last candidate that survived the echo filter
    pub latest: Option<String>,
}

impl PartsScan {
    fn merge(&mut self, other: PartsScan) {
        self.saw_text |= other.saw_text;
        if other.latest.is_some() {
            self.latest = other.latest;
        }
    }
}

/// A shape matcher over the params
pub type Matcher = fn(&SendMessageParams) -> PartsScan;

/// Matchers in priority order
pub const MATCHERS: &[(&str, Matcher)] = &[
    ("message.parts", match_message_parts),
    ("messages[].parts", match_messages_parts),
    ("params.parts", match_inline_parts),
];

/// Extract the user utterance from the params
///
/// Never fails: an empty string means nothing usable was found.
pub fn extract_user_text(params: &SendMessageParams) -> String {
    let mut saw_text = false;

    for (shape, matcher) in MATCHERS {
        let scan = matcher(params);
        saw_text |= scan.saw_text;
        if let Some(text) = scan.latest {
            tracing::debug!(shape, len = text.len(), "extracted user message");
            return text;
        }
    }

    if !saw_text {
        if let Some(text) = direct_text(params) {
            tracing::debug!(shape = "text", len = text.len(), "extracted direct text");
            return text;
        }
    }

    tracing::debug!(saw_text, "no user message found");
    String::new()
}

fn match_message_parts(params: &SendMessageParams) -> PartsScan {
    params.message().map(scan_container).unwrap_or_default()
}

fn match_messages_parts(params: &SendMessageParams) -> PartsScan {
    let mut seen = PartsScan::default();
    for message in params.messages() {
        let scan = scan_container(message);
        let found = scan.latest.is_some();
        seen.merge(scan);
        if found {
            break;
        }
    }
    seen
}

fn match_inline_parts(params: &SendMessageParams) -> PartsScan {
    scan_container(params.as_map())
}

/// Unfiltered `text` on `message`, then on the params
fn direct_text(params: &SendMessageParams) -> Option<String> {
    params
        .message()
        .and_then(|message| non_blank(message.get("text")))
        .or_else(|| non_blank(params.as_map().get("text")))
}

/// Walk the `parts` of a container, collecting candidate texts in order
pub fn scan_container(container: &Map<String, Value>) -> PartsScan {
    let mut scan = PartsScan::default();

    let Some(parts) = container.get("parts").and_then(Value::as_array) else {
        return scan;
    };

    for part in parts.iter().filter_map(Value::as_object) {
        match part.get("kind").and_then(Value::as_str) {
            Some("data") => {
                for item in data_items(part.get("data")) {
                    if item.get("kind").and_then(Value::as_str) == Some("text") {
                        collect(&mut scan, item.get("text"));
                    }
                }
            }
            Some("text") => collect(&mut scan, part.get("text")),
            _ => {}
        }
    }

    scan
}

/// Flatten a data payload into its items; a bare object is one item
fn data_items(data: Option<&Value>) -> Vec<&Object> {
    match data {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        Some(Value::Object(item)) => vec![item],
        _ => Vec::new(),
    }
}

fn collect(scan: &mut PartsScan, text: Option<&Value>) {
    let Some(text) = non_blank(text) else {
        return;
    };

    scan.saw_text = true;
    if is_bot_echo(&text) {
        tracing::trace!(preview = %preview(&text), "dropping echoed agent text");
        return;
    }
    scan.latest = Some(text);
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
