use parking_lot::Mutex;
use std::collections::HashMap;

use crate::models::ChatMessage;

/// Session used when a request does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// Bounded per-session chat history. Each session keeps at most `limit`
/// messages, dropping the oldest first.
pub struct HistoryStore {
    limit: usize,
    sessions: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Snapshot of a session's messages, oldest first.
    pub fn messages(&self, session: &str) -> Vec<ChatMessage> {
        self.sessions
            .lock()
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    /// Append one user/assistant exchange and trim to the limit.
    pub fn record_exchange(&self, session: &str, user: &str, assistant: &str) {
        let mut sessions = self.sessions.lock();
        let history = sessions.entry(session.to_string()).or_default();
        history.push(ChatMessage::user(user));
        history.push(ChatMessage::assistant(assistant));

        if history.len() > self.limit {
            let excess = history.len() - self.limit;
            history.drain(..excess);
        }
    }

    pub fn len(&self, session: &str) -> usize {
        self.sessions.lock().get(session).map_or(0, Vec::len)
    }

    pub fn clear(&self, session: &str) {
        self.sessions.lock().remove(session);
    }
}
