//! Google Chat webhook payload handling.
//!
//! Deserializes the app-event envelope Google Chat posts to the bridge,
//! pulls out the message text plus sender/space metadata, and strips the
//! bot-mention markup Chat injects into the raw text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

// Literal "@basecamp task bot" mentions, with optional spacing
static BOT_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@\s*basecamp\s*task\s*bot").unwrap());

// Chat's structured mention markup, e.g. <@user/12345>
static MENTION_MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<@[^>]+>").unwrap());

/// Top-level webhook envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatEvent {
    pub chat: Option<ChatPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatPayload {
    #[serde(rename = "messagePayload")]
    pub message_payload: Option<MessagePayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub message: Option<ChatMessage>,
}

/// The message object the bridge consumes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatMessage {
    pub text: Option<String>,
    pub sender: Option<ChatSender>,
    pub space: Option<ChatSpace>,
    #[serde(rename = "createTime")]
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatSender {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatSpace {
    #[serde(rename = "spaceUri")]
    pub space_uri: Option<String>,
}

impl ChatEvent {
    /// The nested message, or an all-defaults message when any layer of the
    /// envelope is missing. Malformed input defaults, it never errors.
    pub fn into_message(self) -> ChatMessage {
        self.chat
            .and_then(|chat| chat.message_payload)
            .and_then(|payload| payload.message)
            .unwrap_or_default()
    }
}

impl ChatMessage {
    pub fn sender_name(&self) -> &str {
        self.sender
            .as_ref()
            .and_then(|sender| sender.display_name.as_deref())
            .unwrap_or("Unknown Sender")
    }

    pub fn sender_email(&self) -> &str {
        self.sender
            .as_ref()
            .and_then(|sender| sender.email.as_deref())
            .unwrap_or("Unknown Email")
    }

    pub fn space_uri(&self) -> &str {
        self.space
            .as_ref()
            .and_then(|space| space.space_uri.as_deref())
            .unwrap_or("N/A")
    }
}

/// Strip bot-mention markup and trim. Empty input stays empty.
pub fn sanitize_text(text: &str) -> String {
    let without_mention = BOT_MENTION.replace_all(text, "");
    let without_markup = MENTION_MARKUP.replace_all(&without_mention, "");
    without_markup.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_envelope() {
        let payload = r#"{
            "chat": {
                "messagePayload": {
                    "message": {
                        "text": "@basecamp task bot Fix login bug to- Alice",
                        "sender": {
                            "displayName": "Priya Shah",
                            "email": "priya@example.com"
                        },
                        "space": {
                            "spaceUri": "chat.google.com/room/AAAA"
                        },
                        "createTime": "2024-05-01T10:00:00Z"
                    }
                }
            }
        }"#;

        let event: ChatEvent = serde_json::from_str(payload).unwrap();
        let message = event.into_message();

        assert_eq!(
            message.text.as_deref(),
            Some("@basecamp task bot Fix login bug to- Alice")
        );
        assert_eq!(message.sender_name(), "Priya Shah");
        assert_eq!(message.sender_email(), "priya@example.com");
        assert_eq!(message.space_uri(), "chat.google.com/room/AAAA");
    }

    #[test]
    fn missing_layers_default() {
        let event: ChatEvent = serde_json::from_str(r#"{"chat": {}}"#).unwrap();
        let message = event.into_message();

        assert_eq!(message.text, None);
        assert_eq!(message.sender_name(), "Unknown Sender");
        assert_eq!(message.sender_email(), "Unknown Email");
        assert_eq!(message.space_uri(), "N/A");
    }

    #[test]
    fn sanitize_strips_bot_mention() {
        assert_eq!(
            sanitize_text("@basecamp task bot Fix login bug"),
            "Fix login bug"
        );
        assert_eq!(
            sanitize_text("@ Basecamp  Task  Bot Fix login bug"),
            "Fix login bug"
        );
    }

    #[test]
    fn sanitize_strips_mention_markup() {
        assert_eq!(sanitize_text("<@user/12345> Fix login bug"), "Fix login bug");
    }

    #[test]
    fn sanitize_handles_empty_input() {
        assert_eq!(sanitize_text(""), "");
    }
}
