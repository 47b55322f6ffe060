//! Session storage.
//!
//! Checkout state lives per browsing session and dies with the process —
//! there is deliberately no persistence. The trait exists so the route
//! handlers are written against an interface rather than a concrete map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::SessionId;
use domain::CheckoutSession;
use tokio::sync::RwLock;

/// Storage for checkout sessions.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a fresh session and returns its id.
    async fn create(&self) -> SessionId;

    /// Loads a session by id, or None if the id is unknown.
    async fn load(&self, id: SessionId) -> Option<CheckoutSession>;

    /// Stores the session under the given id, replacing any previous state.
    async fn save(&self, id: SessionId, session: CheckoutSession);
}

/// In-memory session store backed by a `RwLock`ed map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, CheckoutSession>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions
            .write()
            .await
            .insert(id, CheckoutSession::new());
        id
    }

    async fn load(&self, id: SessionId) -> Option<CheckoutSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    async fn save(&self, id: SessionId, session: CheckoutSession) {
        self.sessions.write().await.insert(id, session);
    }
}
