//! Token usage tracking across the turns of a session.

use std::collections::HashMap;

use crate::TokenUsage;

/// Cumulative token usage, in total and per model.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    by_model: HashMap<String, TokenUsage>,
    /// Number of committed turns recorded.
    turn_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed turn. Providers do not always report usage, in
    /// which case only the turn count moves.
    pub fn record(&mut self, model: &str, usage: Option<&TokenUsage>) {
        self.turn_count += 1;

        let Some(usage) = usage else {
            return;
        };
        self.total.input_tokens += usage.input_tokens;
        self.total.output_tokens += usage.output_tokens;

        let entry = self.by_model.entry(model.to_string()).or_default();
        entry.input_tokens += usage.input_tokens;
        entry.output_tokens += usage.output_tokens;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_model(&self, model: &str) -> Option<&TokenUsage> {
        self.by_model.get(model)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input: u64, output: u64) -> TokenUsage {
        TokenUsage {
            input_tokens: input,
            output_tokens: output,
        }
    }

    #[test]
    fn record_accumulates_per_model() {
        let mut tracker = TokenTracker::new();
        tracker.record("gemini-2.5-pro", Some(&usage(10, 20)));
        tracker.record("gemini-2.5-pro", Some(&usage(5, 5)));
        tracker.record("gemini-2.5-flash", Some(&usage(1, 2)));

        assert_eq!(tracker.total_tokens(), 43);
        assert_eq!(tracker.for_model("gemini-2.5-pro"), Some(&usage(15, 25)));
        assert_eq!(tracker.for_model("gemini-2.5-flash"), Some(&usage(1, 2)));
        assert_eq!(tracker.turn_count(), 3);
    }

    #[test]
    fn missing_usage_only_counts_turn() {
        let mut tracker = TokenTracker::new();
        tracker.record("gemini-2.5-pro", None);
        assert_eq!(tracker.turn_count(), 1);
        assert_eq!(tracker.total_tokens(), 0);
        assert!(tracker.for_model("gemini-2.5-pro").is_none());
    }
}
