//! Saved sessions: named snapshots of a document and its variables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub id: u64,
    pub name: String,
    pub content: String,
    /// Variable name → formatted value.
    pub variables: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl SavedSession {
    /// `created_at` in RFC 3339 form.
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at.to_rfc3339()
    }
}

pub trait SessionStore {
    fn create(
        &mut self,
        name: &str,
        content: &str,
        variables: BTreeMap<String, String>,
    ) -> SavedSession;
    fn get(&self, id: u64) -> Option<&SavedSession>;
    fn list(&self) -> Vec<&SavedSession>;
    /// Returns false when no session has that id.
    fn delete(&mut self, id: u64) -> bool;

    /// Save the session's current text and published variables.
    fn save(&mut self, name: &str, session: &Session) -> SavedSession {
        let variables = session.variables().into_iter().collect();
        self.create(name, session.text(), variables)
    }
}

/// In-memory store; ids are handed out from 1 and never reused.
#[derive(Debug)]
pub struct MemSessionStore {
    sessions: BTreeMap<u64, SavedSession>,
    next_id: u64,
}

impl Default for MemSessionStore {
    fn default() -> Self {
        Self {
            sessions: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl MemSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemSessionStore {
    fn create(
        &mut self,
        name: &str,
        content: &str,
        variables: BTreeMap<String, String>,
    ) -> SavedSession {
        let id = self.next_id;
        self.next_id += 1;
        let saved = SavedSession {
            id,
            name: name.to_string(),
            content: content.to_string(),
            variables,
            created_at: Utc::now(),
        };
        self.sessions.insert(id, saved.clone());
        saved
    }

    fn get(&self, id: u64) -> Option<&SavedSession> {
        self.sessions.get(&id)
    }

    fn list(&self) -> Vec<&SavedSession> {
        self.sessions.values().collect()
    }

    fn delete(&mut self, id: u64) -> bool {
        self.sessions.remove(&id).is_some()
    }
}
