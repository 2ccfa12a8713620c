//! Cached-query bookkeeping. Every list/detail fetch is keyed; mutations
//! and realtime change events bump the versions of the keys they touch,
//! which re-runs any mounted resource reading that key.

use std::collections::HashMap;

use dioxus::prelude::*;

use crate::models::WatchedTable;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Drives,
    Drive(String),
    MyRegistrations,
    AllRegistrations,
    Messages(String),
    Students,
}

/// Which cached queries a change on `table` invalidates. Registration
/// changes also touch the drive lists because they carry derived
/// registration counts.
pub fn affected_by_change(table: WatchedTable, company_id: Option<&str>, key: &QueryKey) -> bool {
    match table {
        WatchedTable::Companies => matches!(key, QueryKey::Drives | QueryKey::Drive(_)),
        WatchedTable::Registrations => match key {
            QueryKey::MyRegistrations | QueryKey::AllRegistrations | QueryKey::Drives => true,
            QueryKey::Drive(id) => company_id.map_or(true, |cid| cid == id),
            _ => false,
        },
        WatchedTable::Messages => match key {
            QueryKey::Messages(id) => company_id.map_or(true, |cid| cid == id),
            _ => false,
        },
    }
}

/// Per-key version counters behind signals, provided once at the app root.
#[derive(Clone, Copy)]
pub struct QueryClient {
    versions: Signal<HashMap<QueryKey, Signal<u64>>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            versions: Signal::new_in_scope(HashMap::new(), ScopeId::ROOT),
        }
    }

    /// The version signal for a key, created on first use. Signals live in
    /// the root scope so they outlast the screens that read them. The map
    /// itself is peeked, not read: callers subscribe to one key's version,
    /// never to the whole registry.
    pub fn version_signal(&self, key: &QueryKey) -> Signal<u64> {
        if let Some(existing) = self.versions.peek().get(key) {
            return *existing;
        }
        let created = Signal::new_in_scope(0u64, ScopeId::ROOT);
        let mut versions = self.versions;
        versions.write().insert(key.clone(), created);
        created
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.invalidate_where(|k| k == key);
    }

    pub fn invalidate_where(&self, pred: impl Fn(&QueryKey) -> bool) {
        let entries: Vec<(QueryKey, Signal<u64>)> = self
            .versions
            .peek()
            .iter()
            .map(|(k, s)| (k.clone(), *s))
            .collect();
        for (key, signal) in entries {
            if pred(&key) {
                let mut signal = signal;
                let next = *signal.peek() + 1;
                signal.set(next);
            }
        }
    }

    /// Apply a realtime change notification from the backend.
    pub fn apply_change(&self, table: WatchedTable, company_id: Option<&str>) {
        self.invalidate_where(|key| affected_by_change(table, company_id, key));
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_changes_touch_drive_queries_only() {
        let key_hits = |key: &QueryKey| affected_by_change(WatchedTable::Companies, None, key);

        assert!(key_hits(&QueryKey::Drives));
        assert!(key_hits(&QueryKey::Drive("d1".to_string())));
        assert!(!key_hits(&QueryKey::MyRegistrations));
        assert!(!key_hits(&QueryKey::Messages("d1".to_string())));
    }

    #[test]
    fn registration_changes_also_invalidate_drive_counts() {
        let hits = |key: &QueryKey| {
            affected_by_change(WatchedTable::Registrations, Some("d1"), key)
        };

        assert!(hits(&QueryKey::MyRegistrations));
        assert!(hits(&QueryKey::AllRegistrations));
        assert!(hits(&QueryKey::Drives));
        assert!(hits(&QueryKey::Drive("d1".to_string())));
        assert!(!hits(&QueryKey::Drive("other".to_string())));
        assert!(!hits(&QueryKey::Messages("d1".to_string())));
    }

    #[test]
    fn message_changes_stay_scoped_to_their_drive() {
        let hits =
            |key: &QueryKey| affected_by_change(WatchedTable::Messages, Some("d1"), key);

        assert!(hits(&QueryKey::Messages("d1".to_string())));
        assert!(!hits(&QueryKey::Messages("other".to_string())));
        assert!(!hits(&QueryKey::Drives));
    }

    #[test]
    fn unscoped_message_change_invalidates_every_thread() {
        assert!(affected_by_change(
            WatchedTable::Messages,
            None,
            &QueryKey::Messages("any".to_string())
        ));
    }
}
