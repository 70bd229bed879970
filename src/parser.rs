//! Task field extraction from free-text chat messages.
//!
//! Messages use ad-hoc markers: `notes-` introduces the card body,
//! `assigned to-` / `to-` introduces a comma-separated assignee list,
//! `p-` names a target project, and a bare `YYYY-MM-DD` anywhere sets the
//! due date. Marker precedence and fallback order are load-bearing; do not
//! generalize this into a grammar.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

// Bare ISO calendar date anywhere in the message
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());

// Notes marker; the \s* keeps leading whitespace out of the notes text
static NOTES_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnotes?-\s*").unwrap());

// Bare notes marker, for the title split
static NOTES_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bnotes?-").unwrap());

// Anything that terminates the notes text: an assignee marker or a date.
// "assigned to-" is listed first so it wins over its own "to-" suffix.
static NOTES_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)assigned to-|to-|\b\d{4}-\d{2}-\d{2}\b").unwrap());

// Assignee marker plus the raw name-list capture
static ASSIGNEE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:assigned to-|to-)\s*([A-Za-z,\s]+)").unwrap());

// Assignee marker alone, for the title split
static ASSIGNEE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)assigned to-|to-").unwrap());

// Project marker; Basecamp project names here are alphanumeric/space only
static PROJECT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bp-\s*([A-Za-z0-9\s]+)").unwrap());

/// Structured task fields extracted from one message.
///
/// Derived purely from the input text; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Card title: everything before the first marker, date stripped
    pub title: String,
    /// Card body text; empty when no `notes-` marker was present
    pub notes: String,
    /// ISO calendar date, defaulting to today (UTC) when absent
    pub due_on: String,
    /// Raw comma-separated assignee list, unresolved
    pub assignee_names: Option<String>,
    /// Raw project name fragment, unresolved
    pub project_name: Option<String>,
}

/// Extract a [`TaskDraft`] from a sanitized message.
///
/// First match wins for every field, case-insensitive. A message with no
/// markers at all becomes a title-only draft due today.
pub fn parse_task_input(message: &str) -> TaskDraft {
    let due_on = DATE_PATTERN
        .find(message)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| Utc::now().date_naive().to_string());

    let notes = extract_notes(message);

    let assignee_names = ASSIGNEE_PATTERN
        .captures(message)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty());

    let project_name = PROJECT_PATTERN
        .captures(message)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty());

    // Title precedence: cut at the notes marker when one exists, otherwise
    // at the assignee marker, otherwise keep the whole message.
    let title = if let Some(m) = NOTES_SPLIT.find(message) {
        &message[..m.start()]
    } else if let Some(m) = ASSIGNEE_SPLIT.find(message) {
        &message[..m.start()]
    } else {
        message
    };
    let title = DATE_PATTERN.replace(title, "").trim().to_string();

    TaskDraft {
        title,
        notes,
        due_on,
        assignee_names,
        project_name,
    }
}

/// Text between the `notes-` marker and the next recognized marker (or end
/// of string), trimmed. Empty when no marker is present.
fn extract_notes(message: &str) -> String {
    let Some(marker) = NOTES_MARKER.find(message) else {
        return String::new();
    };
    let rest = &message[marker.end()..];
    let end = NOTES_TERMINATOR
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_message_extracts_every_field() {
        let draft =
            parse_task_input("Fix login bug notes- breaks on mobile assigned to- Alice 2024-05-01");

        assert_eq!(draft.title, "Fix login bug");
        assert_eq!(draft.notes, "breaks on mobile");
        assert_eq!(draft.due_on, "2024-05-01");
        assert_eq!(draft.assignee_names, Some("Alice".to_string()));
        assert_eq!(draft.project_name, None);
    }

    #[test]
    fn due_date_is_first_iso_substring() {
        let draft = parse_task_input("Ship release 2024-06-15 notes- final pass 2024-07-01");
        assert_eq!(draft.due_on, "2024-06-15");
    }

    #[test]
    fn due_date_defaults_to_today() {
        let draft = parse_task_input("Ship release");
        assert_eq!(draft.due_on, Utc::now().date_naive().to_string());
    }

    #[test]
    fn date_is_stripped_from_title() {
        let draft = parse_task_input("Ship release 2024-06-15");
        assert_eq!(draft.title, "Ship release");
    }

    #[test]
    fn notes_run_to_end_of_string_without_terminator() {
        let draft = parse_task_input("Update docs notes- cover the new endpoints");
        assert_eq!(draft.notes, "cover the new endpoints");
        assert_eq!(draft.title, "Update docs");
    }

    #[test]
    fn notes_stop_at_date() {
        let draft = parse_task_input("Update docs notes- cover the new endpoints 2024-09-30");
        assert_eq!(draft.notes, "cover the new endpoints");
        assert_eq!(draft.due_on, "2024-09-30");
    }

    #[test]
    fn note_singular_marker_also_matches() {
        let draft = parse_task_input("Update docs note- short body");
        assert_eq!(draft.notes, "short body");
    }

    #[test]
    fn assignees_via_short_marker() {
        let draft = parse_task_input("Review PR to- Bob, Carol");
        assert_eq!(draft.title, "Review PR");
        assert_eq!(draft.assignee_names, Some("Bob, Carol".to_string()));
    }

    #[test]
    fn assigned_to_wins_over_inner_to() {
        let draft = parse_task_input("Triage notes- flaky suite assigned to- Dana");
        assert_eq!(draft.notes, "flaky suite");
        assert_eq!(draft.assignee_names, Some("Dana".to_string()));
    }

    #[test]
    fn project_marker_is_captured() {
        let draft = parse_task_input("Landing page copy p- new website");
        assert_eq!(draft.project_name, Some("new website".to_string()));
    }

    // The p- capture is alphanumeric/space only, so a following marker's
    // text bleeds in up to its dash. Long-standing quirk; kept as-is.
    #[test]
    fn project_capture_stops_at_dash() {
        let draft = parse_task_input("Deck update p- truva notes- polish the intro");
        assert_eq!(draft.project_name, Some("truva notes".to_string()));
    }

    #[test]
    fn markerless_message_is_title_only() {
        let draft = parse_task_input("Just a plain task");
        assert_eq!(draft.title, "Just a plain task");
        assert_eq!(draft.notes, "");
        assert_eq!(draft.assignee_names, None);
        assert_eq!(draft.project_name, None);
    }

    #[test]
    fn title_cuts_at_notes_before_assignee() {
        let draft = parse_task_input("Fix crash notes- stack below to- Frank");
        assert_eq!(draft.title, "Fix crash");
    }
}
