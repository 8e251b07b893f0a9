//! Mock UI implementation for testing.
//!
//! `MockUI` implements the [`UserInterface`] trait, captures all output for
//! later assertion, and replays queued responses for confirm, input, and
//! editor interactions.

use std::collections::VecDeque;

use crate::error::Result;

use super::UserInterface;

/// Mock UI for tests: captured output plus scripted responses.
#[derive(Debug, Default)]
pub struct MockUI {
    messages: Vec<String>,
    successes: Vec<String>,
    errors: Vec<String>,
    confirms_shown: Vec<String>,
    inputs_shown: Vec<String>,
    edits_shown: Vec<(String, String)>,
    confirm_responses: VecDeque<bool>,
    input_responses: VecDeque<String>,
    edit_responses: VecDeque<Option<String>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next confirm prompt. Unqueued confirms answer
    /// with their default.
    pub fn queue_confirm_response(&mut self, response: bool) {
        self.confirm_responses.push_back(response);
    }

    /// Queue an answer for the next input prompt. Unqueued inputs answer with
    /// their default, or an empty string without one.
    pub fn queue_input_response(&mut self, response: &str) {
        self.input_responses.push_back(response.to_string());
    }

    /// Queue the outcome of the next editor session. Unqueued sessions return
    /// the seed unchanged, as if the user saved without editing.
    pub fn queue_edit_response(&mut self, response: Option<String>) {
        self.edit_responses.push_back(response);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn confirms_shown(&self) -> &[String] {
        &self.confirms_shown
    }

    pub fn inputs_shown(&self) -> &[String] {
        &self.inputs_shown
    }

    /// Editor sessions shown, as `(seed, extension)` pairs.
    pub fn edits_shown(&self) -> &[(String, String)] {
        &self.edits_shown
    }

    /// Check if a specific message was shown (substring match).
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.confirms_shown.push(question.to_string());
        Ok(self.confirm_responses.pop_front().unwrap_or(default))
    }

    fn input(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        self.inputs_shown.push(question.to_string());
        Ok(self
            .input_responses
            .pop_front()
            .unwrap_or_else(|| default.unwrap_or_default().to_string()))
    }

    fn edit(&mut self, seed: &str, extension: &str) -> Result<Option<String>> {
        self.edits_shown
            .push((seed.to_string(), extension.to_string()));
        Ok(self
            .edit_responses
            .pop_front()
            .unwrap_or_else(|| Some(seed.to_string())))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.success("done");
        ui.error("bad");
        assert!(ui.has_message("hello"));
        assert_eq!(ui.successes(), ["done".to_string()]);
        assert_eq!(ui.errors(), ["bad".to_string()]);
    }

    #[test]
    fn confirm_uses_queue_then_default() {
        let mut ui = MockUI::new();
        ui.queue_confirm_response(false);
        assert!(!ui.confirm("Proceed?", true).unwrap());
        assert!(ui.confirm("Proceed?", true).unwrap());
        assert_eq!(ui.confirms_shown().len(), 2);
    }

    #[test]
    fn input_uses_queue_then_default() {
        let mut ui = MockUI::new();
        ui.queue_input_response("typed");
        assert_eq!(ui.input("Name?", Some("fallback")).unwrap(), "typed");
        assert_eq!(ui.input("Name?", Some("fallback")).unwrap(), "fallback");
        assert_eq!(ui.input("Name?", None).unwrap(), "");
    }

    #[test]
    fn edit_returns_seed_unless_queued() {
        let mut ui = MockUI::new();
        assert_eq!(ui.edit("seed", ".toml").unwrap().as_deref(), Some("seed"));
        ui.queue_edit_response(None);
        assert_eq!(ui.edit("seed", ".toml").unwrap(), None);
        assert_eq!(ui.edits_shown().len(), 2);
    }
}
