//! Canned assistant replies standing in for a real backend.
//!
//! A `MockResponseTable` maps literal user input to a reply record. Replies
//! may carry one embedded `Suggested Question:` line, which is lifted out of
//! the content and attached to the resulting message as its suggestion.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ChatResult;
use crate::message::{Message, Role};

/// Reply used when the user's text has no entry in the table.
pub const FALLBACK_REPLY: &str = concat!(
    "I understand your question. For now, I can help with specific queries about products. ",
    "Try asking one of the suggested questions below!",
);

/// Welcome message seeded by `ChatStore::initialize_chat`.
pub const WELCOME_MESSAGE: &str = "Welcome to Nitra AI!";

static SUGGESTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Suggest(?:ed|ion) Question:(.+?)(?:\n|$)")
        .expect("suggestion regex pattern is valid")
});

static SUGGESTION_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\n*Suggest(?:ed|ion) Question:.+?(?:\n|$)")
        .expect("suggestion line regex pattern is valid")
});

/// Produces the assistant reply for a user message.
pub trait ResponseResolver: Send + Sync {
    fn resolve(&self, user_text: &str) -> ChatResult<Message>;
}

/// Reply record as stored in the table. `role` is always `assistant` in
/// practice; `timestamp` is discarded in favor of the response time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MockReply {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MockEntry {
    pub message: MockReply,
}

/// Static lookup from exact user input to canned reply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MockResponseTable {
    entries: HashMap<String, MockEntry>,
}

impl MockResponseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table shipped with the application.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (question, answer) in BUILTIN_REPLIES {
            table.insert(*question, *answer);
        }
        table
    }

    /// Load a table from a JSON file of the form
    /// `{ "<question>": { "message": { "role", "content", "timestamp" } } }`.
    pub fn load(path: &Path) -> ChatResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ChatResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, question: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(
            question.into(),
            MockEntry {
                message: MockReply {
                    role: Role::Assistant,
                    content: content.into(),
                    timestamp: String::new(),
                },
            },
        );
    }

    pub fn get(&self, question: &str) -> Option<&MockReply> {
        self.entries.get(question).map(|entry| &entry.message)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Questions in the table, sorted for stable display.
    pub fn questions(&self) -> Vec<&str> {
        let mut questions: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        questions.sort_unstable();
        questions
    }

    /// Build the assistant reply for `user_text`.
    ///
    /// Lookup is an exact, case-sensitive match. Unmatched input gets
    /// `FALLBACK_REPLY` with no suggestion.
    pub fn respond(&self, user_text: &str) -> Message {
        match self.get(user_text) {
            Some(reply) => {
                let (content, suggestion) = extract_suggestion(&reply.content);
                Message::new(Role::Assistant, content).with_suggestion(suggestion)
            }
            None => Message::assistant(FALLBACK_REPLY),
        }
    }
}

impl ResponseResolver for MockResponseTable {
    fn resolve(&self, user_text: &str) -> ChatResult<Message> {
        Ok(self.respond(user_text))
    }
}

/// Split a canned reply into clean content and its suggested question.
///
/// Only the first marker line is honored. A marker whose capture is blank
/// leaves the content untouched and yields no suggestion.
pub fn extract_suggestion(content: &str) -> (String, Option<String>) {
    let suggestion = SUGGESTION_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty());

    match suggestion {
        Some(suggestion) => {
            let clean = SUGGESTION_LINE_RE.replace(content, "");
            (clean.trim().to_string(), Some(suggestion.to_string()))
        }
        None => (content.to_string(), None),
    }
}

const BUILTIN_REPLIES: &[(&str, &str)] = &[
    (
        "What products do you offer?",
        "We offer three product lines:\n\n\
         - **Nitra Core**: the base analytics platform\n\
         - **Nitra Edge**: on-device inference for field hardware\n\
         - **Nitra Cloud**: fully managed hosting\n\n\
         Suggested Question: How much does Nitra Core cost?",
    ),
    (
        "How much does Nitra Core cost?",
        "Nitra Core starts at **$49/month** per workspace.\n\
         Annual billing includes two months free.\n\n\
         Suggested Question: Is there a free trial?",
    ),
    (
        "Is there a free trial?",
        "Yes! Every plan comes with a *14-day* free trial, no credit card required.\n\n\
         Suggestion Question: How do I get started?",
    ),
    (
        "How do I get started?",
        "1. Create an account at [nitra.ai](https://nitra.ai)\n\
         2. Pick a plan\n\
         3. Invite your team\n\n\
         That's it. You can ask me anything else about our products.",
    ),
    (
        "What is Nitra Edge?",
        "Nitra Edge runs our models directly on your devices using `nitra-edge` runtime.\n\n\
         > No data leaves the device unless you opt in.\n\n\
         Suggested Question: What products do you offer?",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_suggestion() {
        let (clean, suggestion) =
            extract_suggestion("Here is info.\nSuggested Question: What about Y?");
        assert_eq!(clean, "Here is info.");
        assert_eq!(suggestion.as_deref(), Some("What about Y?"));
    }

    #[test]
    fn test_extract_suggestion_variants() {
        let (clean, suggestion) =
            extract_suggestion("Info.\n\nsuggestion question:   Next?   \nMore text");
        assert_eq!(clean, "Info.More text");
        assert_eq!(suggestion.as_deref(), Some("Next?"));

        let (clean, suggestion) = extract_suggestion("SUGGESTED QUESTION: Why?");
        assert_eq!(clean, "");
        assert_eq!(suggestion.as_deref(), Some("Why?"));
    }

    #[test]
    fn test_extract_suggestion_blank_capture() {
        let content = "Body\nSuggested Question:    \n";
        let (clean, suggestion) = extract_suggestion(content);
        assert_eq!(clean, content);
        assert!(suggestion.is_none());

        // Marker with nothing after the colon does not match at all
        let content = "Body\nSuggested Question:";
        let (clean, suggestion) = extract_suggestion(content);
        assert_eq!(clean, content);
        assert!(suggestion.is_none());
    }

    #[test]
    fn test_extract_suggestion_first_only() {
        let (clean, suggestion) = extract_suggestion(
            "Intro\nSuggested Question: First?\nSuggested Question: Second?",
        );
        assert_eq!(suggestion.as_deref(), Some("First?"));
        // The removed line takes its surrounding newlines with it
        assert_eq!(clean, "IntroSuggested Question: Second?");
    }

    #[test]
    fn test_respond_fallback() {
        let table = MockResponseTable::builtin();
        let reply = table.respond("Hello");
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, FALLBACK_REPLY);
        assert!(reply.suggestion.is_none());
    }

    #[test]
    fn test_respond_is_exact_match() {
        let mut table = MockResponseTable::new();
        table.insert("X", "Here is info.\nSuggested Question: What about Y?");

        let reply = table.respond("X");
        assert_eq!(reply.content, "Here is info.");
        assert_eq!(reply.suggestion.as_deref(), Some("What about Y?"));

        // Case and surrounding whitespace matter
        assert_eq!(table.respond("x").content, FALLBACK_REPLY);
        assert_eq!(table.respond(" X").content, FALLBACK_REPLY);
    }

    #[test]
    fn test_respond_twice_same_content_new_identity() {
        let mut table = MockResponseTable::new();
        table.insert("X", "Here is info.\nSuggested Question: What about Y?");

        let a = table.respond("X");
        let b = table.respond("X");
        assert_eq!(a.content, b.content);
        assert_eq!(a.suggestion, b.suggestion);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_from_json_discards_table_timestamp() {
        let json = r#"{
            "Hi": {
                "message": {
                    "role": "assistant",
                    "content": "Hello there!\nSuggested Question: What products do you offer?",
                    "timestamp": "2020-01-01T00:00:00.000Z"
                }
            }
        }"#;
        let table = MockResponseTable::from_json(json).unwrap();
        assert_eq!(table.len(), 1);

        let reply = table.respond("Hi");
        assert_eq!(reply.content, "Hello there!");
        assert_eq!(reply.suggestion.as_deref(), Some("What products do you offer?"));
        assert_ne!(reply.timestamp, "2020-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(MockResponseTable::from_json("not json").is_err());
    }

    #[test]
    fn test_builtin_entries_carry_suggestions() {
        let table = MockResponseTable::builtin();
        assert!(!table.is_empty());

        let reply = table.respond("Is there a free trial?");
        assert_eq!(reply.suggestion.as_deref(), Some("How do I get started?"));
        assert!(!reply.content.contains("Question:"));

        let reply = table.respond("How do I get started?");
        assert!(reply.suggestion.is_none());
    }
}
