use super::*;
use crate::store::{FileStore, MemoryStore};
use crate::types::Role;

const WELCOME: &str = "Hello! How can I help?";

// =============================================================================
// load
// =============================================================================

#[test]
fn missing_history_seeds_welcome_and_persists() {
    let history = ConversationHistory::load(MemoryStore::new(), WELCOME);
    assert_eq!(history.turns(), &[Turn::assistant(WELCOME)]);

    let raw = history.store().get(HISTORY_KEY).unwrap();
    let stored: Vec<Turn> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, vec![Turn::assistant(WELCOME)]);
}

#[test]
fn corrupt_history_is_reseeded() {
    for garbage in ["{not json", "42", r#"[{"role":"robot","content":"x"}]"#, "[]"] {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, garbage).unwrap();

        let history = ConversationHistory::load(store, WELCOME);
        assert_eq!(history.len(), 1, "input {garbage:?}");
        assert_eq!(history.turns()[0].role, Role::Assistant);
        assert_eq!(history.turns()[0].content, WELCOME);
    }
}

#[test]
fn reseed_overwrites_corrupt_blob() {
    let mut store = MemoryStore::new();
    store.set(HISTORY_KEY, "garbage").unwrap();
    let history = ConversationHistory::load(store, WELCOME);

    let again = ConversationHistory::load(history.into_store(), "different welcome");
    assert_eq!(again.turns(), &[Turn::assistant(WELCOME)]);
}

// =============================================================================
// append + round trip
// =============================================================================

#[test]
fn append_then_load_reproduces_turns() {
    let mut history = ConversationHistory::load(MemoryStore::new(), WELCOME);
    history.append(Turn::user("hi")).unwrap();
    history.append(Turn::assistant("hello there")).unwrap();
    history.append(Turn::user("what do you build?")).unwrap();
    let expected = history.turns().to_vec();

    let restored = ConversationHistory::load(history.into_store(), WELCOME);
    assert_eq!(restored.turns(), expected.as_slice());
    assert_eq!(restored.len(), 4);
}

#[test]
fn round_trip_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileStore::open(dir.path()).unwrap();
        let mut history = ConversationHistory::load(store, WELCOME);
        history.append(Turn::user("សួស្តី")).unwrap();
    }
    let store = FileStore::open(dir.path()).unwrap();
    let history = ConversationHistory::load(store, WELCOME);
    assert_eq!(history.turns(), &[Turn::assistant(WELCOME), Turn::user("សួស្តី")]);
}

// =============================================================================
// replay / recent / clear
// =============================================================================

#[test]
fn replay_renders_in_stored_order() {
    let mut history = ConversationHistory::load(MemoryStore::new(), WELCOME);
    history.append(Turn::user("one")).unwrap();
    history.append(Turn::assistant("two")).unwrap();

    let mut rendered = Vec::new();
    history.replay(|t| rendered.push(t.content.clone()));
    assert_eq!(rendered, vec![WELCOME.to_owned(), "one".to_owned(), "two".to_owned()]);
}

#[test]
fn recent_returns_trailing_turns() {
    let mut history = ConversationHistory::load(MemoryStore::new(), WELCOME);
    for i in 0..5 {
        history.append(Turn::user(format!("m{i}"))).unwrap();
    }
    let recent = history.recent(2);
    assert_eq!(recent, &[Turn::user("m3"), Turn::user("m4")]);
    assert_eq!(history.recent(100).len(), 6);
}

#[test]
fn clear_reseeds_and_persists() {
    let mut history = ConversationHistory::load(MemoryStore::new(), WELCOME);
    history.append(Turn::user("forget me")).unwrap();
    history.clear().unwrap();
    assert_eq!(history.turns(), &[Turn::assistant(WELCOME)]);

    let restored = ConversationHistory::load(history.into_store(), WELCOME);
    assert_eq!(restored.len(), 1);
}

// =============================================================================
// store failures
// =============================================================================

struct ReadOnlyStore;

impl SessionStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::InvalidKey(key.to_owned()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[test]
fn load_survives_failing_store() {
    let history = ConversationHistory::load(ReadOnlyStore, WELCOME);
    assert_eq!(history.len(), 1);
}

#[test]
fn append_keeps_turn_when_persist_fails() {
    let mut history = ConversationHistory::load(ReadOnlyStore, WELCOME);
    assert!(history.append(Turn::user("still here")).is_err());
    assert_eq!(history.len(), 2);
}
