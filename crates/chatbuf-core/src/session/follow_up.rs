//! "Do you want more info?" follow-up gate
//!
//! When the assistant closes a reply with the follow-up question, the next
//! user input is treated as an answer to it: `yes` goes to the model, `no`
//! and anything unrecognised get a fixed reply without a model call.

use crate::llm::ChatMessage;
use serde::{Deserialize, Serialize};

/// Directive that makes the model ask the follow-up question after every answer
pub const KIDS_DIRECTIVE: &str = "You are a helpful assistant for kids. \
Always answer so a 10-year-old can understand. \
After each answer, ask: 'Do you want more info?' \
If user says 'yes', give more info and ask again. \
If user says 'no', ask what else you can help with.";

/// What to do with a user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUpDecision {
    /// Send the turn to the model
    Forward,
    /// Answer with this fixed reply instead of calling the model
    Reply(String),
}

/// Yes/no gate after the follow-up question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowUpGate {
    /// Question the assistant ends its replies with
    pub question: String,
    /// Reply when the user declines
    pub decline_reply: String,
    /// Reply when the input is neither yes nor no
    pub reprompt_reply: String,
}

impl Default for FollowUpGate {
    fn default() -> Self {
        Self {
            question: "Do you want more info?".to_string(),
            decline_reply: "Okay! What else can I help you with?".to_string(),
            reprompt_reply: "Please answer 'yes' or 'no'. Do you want more info?".to_string(),
        }
    }
}

impl FollowUpGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `reply` ends by asking the follow-up question
    pub fn is_pending(&self, reply: &ChatMessage) -> bool {
        reply.is_assistant() && reply.content.trim_end().ends_with(self.question.as_str())
    }

    /// Decide how to handle `input` given the latest assistant reply
    pub fn decide(&self, last_assistant: Option<&ChatMessage>, input: &str) -> FollowUpDecision {
        if !last_assistant.is_some_and(|reply| self.is_pending(reply)) {
            return FollowUpDecision::Forward;
        }

        match input.trim().to_lowercase().as_str() {
            "yes" | "y" => FollowUpDecision::Forward,
            "no" | "n" => FollowUpDecision::Reply(self.decline_reply.clone()),
            _ => FollowUpDecision::Reply(self.reprompt_reply.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asked() -> ChatMessage {
        ChatMessage::assistant("Volcanoes are mountains that erupt. Do you want more info?  ")
    }

    #[test]
    fn test_forwards_when_no_question_pending() {
        let gate = FollowUpGate::new();
        assert_eq!(gate.decide(None, "no"), FollowUpDecision::Forward);
        let plain = ChatMessage::assistant("Volcanoes are mountains.");
        assert_eq!(gate.decide(Some(&plain), "no"), FollowUpDecision::Forward);
    }

    #[test]
    fn test_yes_forwards() {
        let gate = FollowUpGate::new();
        assert_eq!(gate.decide(Some(&asked()), "Yes"), FollowUpDecision::Forward);
        assert_eq!(gate.decide(Some(&asked()), " y "), FollowUpDecision::Forward);
    }

    #[test]
    fn test_no_declines() {
        let gate = FollowUpGate::new();
        assert_eq!(
            gate.decide(Some(&asked()), "NO"),
            FollowUpDecision::Reply("Okay! What else can I help you with?".to_string())
        );
    }

    #[test]
    fn test_other_input_reprompts() {
        let gate = FollowUpGate::new();
        assert_eq!(
            gate.decide(Some(&asked()), "tell me about sharks"),
            FollowUpDecision::Reply(gate.reprompt_reply.clone())
        );
    }

    #[test]
    fn test_reprompt_keeps_question_pending() {
        let gate = FollowUpGate::new();
        let reprompt = ChatMessage::assistant(gate.reprompt_reply.clone());
        assert!(gate.is_pending(&reprompt));

        let decline = ChatMessage::assistant(gate.decline_reply.clone());
        assert!(!gate.is_pending(&decline));
    }
}
