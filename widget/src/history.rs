//! Conversation history persisted in a session-scoped store.
//!
//! DESIGN
//! ======
//! The full turn list is serialized as a JSON array under [`HISTORY_KEY`]
//! and overwritten on every append. Loading never fails: an absent, empty,
//! or unreadable blob is replaced by a single assistant welcome turn, which
//! is persisted and becomes the new baseline.

use tracing::{debug, warn};

use crate::store::{SessionStore, StoreError};
use crate::types::Turn;

/// Store key holding the serialized conversation.
pub const HISTORY_KEY: &str = "chat-history";

pub struct ConversationHistory<S> {
    store: S,
    turns: Vec<Turn>,
    welcome: String,
}

impl<S: SessionStore> ConversationHistory<S> {
    /// Restore the conversation from `store`, seeding `welcome` when there is
    /// nothing usable to restore.
    pub fn load(store: S, welcome: &str) -> Self {
        let mut history = Self { store, turns: Vec::new(), welcome: welcome.to_owned() };

        match history.store.get(HISTORY_KEY).map(|raw| serde_json::from_str::<Vec<Turn>>(&raw)) {
            Some(Ok(turns)) if !turns.is_empty() => {
                debug!(turns = turns.len(), "restored chat history");
                history.turns = turns;
            }
            Some(Err(e)) => {
                warn!(error = %e, "discarding unreadable chat history");
                history.seed();
            }
            Some(Ok(_)) | None => history.seed(),
        }

        history
    }

    /// Append a turn and persist the whole conversation.
    ///
    /// The turn is kept in memory even if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store rejects the write.
    pub fn append(&mut self, turn: Turn) -> Result<(), StoreError> {
        self.turns.push(turn);
        self.persist()
    }

    /// Render every turn in stored order, most recent last.
    pub fn replay(&self, mut render: impl FnMut(&Turn)) {
        for turn in &self.turns {
            render(turn);
        }
    }

    /// Drop the conversation and start over from the welcome turn.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store rejects the write.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.turns = vec![Turn::assistant(self.welcome.clone())];
        self.persist()
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `n` turns (fewer if the conversation is shorter).
    #[must_use]
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn seed(&mut self) {
        self.turns = vec![Turn::assistant(self.welcome.clone())];
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist seeded chat history");
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.turns).unwrap_or_else(|_| "[]".to_owned());
        self.store.set(HISTORY_KEY, &raw)
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
