//! In-memory manifest storage

use std::sync::Arc;

use aims_core::Manifest;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// A stored manifest with its write history
#[derive(Debug, Clone)]
pub struct StoredManifest {
    pub manifest: Manifest,
    /// Incremented on every write to the same `did`, starting at 1
    pub revision: u64,
    pub stored_at: DateTime<Utc>,
}

/// Outcome of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub revision: u64,
    pub created: bool,
}

/// Shared registry state, keyed by the manifest's `did` string
///
/// Writes are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    manifests: Arc<DashMap<String, StoredManifest>>,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the manifest stored under its `did`
    pub fn upsert(&self, manifest: Manifest) -> WriteOutcome {
        let stored_at = Utc::now();
        match self.manifests.entry(manifest.did.clone()) {
            Entry::Occupied(mut entry) => {
                let revision = entry.get().revision + 1;
                entry.insert(StoredManifest {
                    manifest,
                    revision,
                    stored_at,
                });
                WriteOutcome {
                    revision,
                    created: false,
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(StoredManifest {
                    manifest,
                    revision: 1,
                    stored_at,
                });
                WriteOutcome {
                    revision: 1,
                    created: true,
                }
            }
        }
    }

    pub fn get(&self, did: &str) -> Option<StoredManifest> {
        self.manifests.get(did).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_tracks_revisions() {
        let state = RegistryState::new();
        let did = "did:aims:web:example.com:agent";

        let first = state.upsert(Manifest::new(did));
        assert_eq!(first, WriteOutcome { revision: 1, created: true });

        let second = state.upsert(Manifest::new(did).with_model_card_url("https://example.com/card"));
        assert_eq!(second, WriteOutcome { revision: 2, created: false });

        let stored = state.get(did).unwrap();
        assert_eq!(stored.revision, 2);
        assert_eq!(stored.manifest.model_card_url.as_deref(), Some("https://example.com/card"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let state = RegistryState::new();
        let handle = state.clone();
        handle.upsert(Manifest::new("did:aims:key:z6Mk:agent"));
        assert!(state.get("did:aims:key:z6Mk:agent").is_some());
        assert!(state.get("did:aims:key:z6Mk:other").is_none());
    }
}
