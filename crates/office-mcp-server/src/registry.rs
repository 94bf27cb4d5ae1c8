//! Session registry: the set of documents open right now
//!
//! Sessions are created in two steps. [`SessionRegistry::create`] reserves an
//! id with an initializing entry before the backend builds anything, and
//! [`SessionRegistry::complete`] publishes the finished handle (or
//! [`SessionRegistry::rollback`] drops the reservation). Initializing entries
//! are invisible to lookups and listings.
//!
//! Metadata lives beside the handle rather than inside its lock, so listing
//! never waits on a document that is busy in an adapter call.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use office_mcp_core::DocumentKind;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{OfficeError, OfficeResult};
use crate::session::{Backend, DocumentHandle, SessionMetadata};

/// A published session: metadata plus the document behind its exclusion lock
#[derive(Debug, Clone)]
pub struct Session {
    pub metadata: SessionMetadata,
    pub handle: Arc<Mutex<DocumentHandle>>,
}

#[derive(Debug)]
enum Entry {
    Initializing(SessionMetadata),
    Ready {
        metadata: SessionMetadata,
        handle: Arc<Mutex<DocumentHandle>>,
    },
}

impl Entry {
    fn ready_mut(&mut self) -> Option<&mut SessionMetadata> {
        match self {
            Entry::Ready { metadata, .. } => Some(metadata),
            Entry::Initializing(_) => None,
        }
    }
}

/// Maps session ids to documents, in creation order
#[derive(Debug, Default)]
pub struct SessionRegistry {
    entries: RwLock<IndexMap<String, Entry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a new id for a document the backend is about to build
    pub async fn create(&self, kind: DocumentKind, backend: Backend, title: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let metadata = SessionMetadata {
            id: id.clone(),
            kind,
            backend,
            title: title.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            file_path: None,
            dirty: false,
        };
        self.entries
            .write()
            .await
            .insert(id.clone(), Entry::Initializing(metadata));
        id
    }

    /// Publish the built document under a reserved id
    pub async fn complete(&self, id: &str, handle: DocumentHandle) -> OfficeResult<Session> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| OfficeError::SessionNotFound(id.to_string()))?;
        let metadata = match entry {
            Entry::Initializing(metadata) => metadata.clone(),
            Entry::Ready { .. } => {
                return Err(OfficeError::internal(format!("session {id} completed twice")))
            }
        };
        let handle = Arc::new(Mutex::new(handle));
        *entry = Entry::Ready {
            metadata: metadata.clone(),
            handle: handle.clone(),
        };
        Ok(Session { metadata, handle })
    }

    /// Drop a reservation whose document could not be built
    pub async fn rollback(&self, id: &str) {
        let mut entries = self.entries.write().await;
        if matches!(entries.get(id), Some(Entry::Initializing(_))) {
            entries.shift_remove(id);
        }
    }

    /// Look up a published session
    pub async fn get(&self, id: &str) -> OfficeResult<Session> {
        match self.entries.read().await.get(id) {
            Some(Entry::Ready { metadata, handle }) => Ok(Session {
                metadata: metadata.clone(),
                handle: handle.clone(),
            }),
            _ => Err(OfficeError::SessionNotFound(id.to_string())),
        }
    }

    pub async fn metadata(&self, id: &str) -> OfficeResult<SessionMetadata> {
        self.get(id).await.map(|session| session.metadata)
    }

    /// Published sessions in creation order, optionally of one kind
    pub async fn list(&self, kind: Option<DocumentKind>) -> Vec<SessionMetadata> {
        self.entries
            .read()
            .await
            .values()
            .filter_map(|entry| match entry {
                Entry::Ready { metadata, .. } => Some(metadata),
                Entry::Initializing(_) => None,
            })
            .filter(|metadata| kind.map_or(true, |k| metadata.kind == k))
            .cloned()
            .collect()
    }

    /// Number of published sessions of a kind
    pub async fn count(&self, kind: DocumentKind) -> usize {
        self.list(Some(kind)).await.len()
    }

    /// Remove a session, returning its final metadata
    pub async fn remove(&self, id: &str) -> OfficeResult<SessionMetadata> {
        let mut entries = self.entries.write().await;
        match entries.get(id) {
            Some(Entry::Ready { .. }) => {}
            _ => return Err(OfficeError::SessionNotFound(id.to_string())),
        }
        match entries.shift_remove(id) {
            Some(Entry::Ready { metadata, .. }) => Ok(metadata),
            _ => Err(OfficeError::SessionNotFound(id.to_string())),
        }
    }

    /// Record a successful mutation
    pub async fn mark_dirty(&self, id: &str) -> OfficeResult<()> {
        self.update(id, |metadata| metadata.dirty = true).await
    }

    /// Record a successful save
    pub async fn mark_saved(&self, id: &str, file_path: &str) -> OfficeResult<()> {
        self.update(id, |metadata| {
            metadata.dirty = false;
            metadata.file_path = Some(file_path.to_string());
        })
        .await
    }

    async fn update(&self, id: &str, f: impl FnOnce(&mut SessionMetadata)) -> OfficeResult<()> {
        let mut entries = self.entries.write().await;
        let metadata = entries
            .get_mut(id)
            .and_then(Entry::ready_mut)
            .ok_or_else(|| OfficeError::SessionNotFound(id.to_string()))?;
        f(metadata);
        Ok(())
    }
}
