use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accumulated conversational context. The QA service produces it and reads
/// it back on the next turn; this side only carries it between rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Value);

impl History {
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for History {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// What the QA service reports after (re)loading the email corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusInfo {
    pub emails: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn history_round_trips_untouched() {
        let raw = json!([{"role": "user", "content": "any shape the service likes"}]);
        let history: History = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&history).unwrap(), raw);
    }
}
