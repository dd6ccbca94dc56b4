//! Per-session state keyed by a cookie
//!
//! Every browser session owns an independent copy of its service state
//! (inventory records, uploaded table). State lives only in process memory
//! and is dropped once the session has been idle longer than the configured
//! timeout.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Cookie carrying the session UUID
pub const SESSION_COOKIE: &str = "dashkit_session";

/// Session identifier extracted from the request cookie
///
/// A request without a valid cookie gets a fresh id; `attach` then emits the
/// matching `Set-Cookie` header on the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId {
    id: Uuid,
    is_new: bool,
}

impl SessionId {
    /// Read the session cookie, or mint a new id
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok());

        match existing {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: Uuid::new_v4(),
                is_new: true,
            },
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True when the request carried no usable cookie
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// `Set-Cookie` value for this session
    pub fn cookie_header(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id)
    }

    /// Convert into a response, adding `Set-Cookie` for new sessions
    pub fn attach(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&self.cookie_header()) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

struct SessionEntry<T> {
    data: T,
    last_seen: Instant,
}

/// In-memory map from session id to service state
pub struct SessionStore<T> {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry<T>>>>,
    idle_timeout: Duration,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            idle_timeout: self.idle_timeout,
        }
    }
}

impl<T> SessionStore<T>
where
    T: Send + Sync,
{
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Run `f` against the session's state, creating it with `init` if absent
    ///
    /// Idle sessions are swept first, so an expired session comes back fresh.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        init: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.idle_timeout);

        let entry = sessions.entry(id).or_insert_with(|| {
            info!("Session {} created", id);
            SessionEntry {
                data: init(),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
        f(&mut entry.data)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn sweep(sessions: &mut HashMap<Uuid, SessionEntry<T>>, idle_timeout: Duration) {
        sessions.retain(|id, entry| {
            let keep = entry.last_seen.elapsed() < idle_timeout;
            if !keep {
                debug!("Session {} evicted after {:?} idle", id, entry.last_seen.elapsed());
            }
            keep
        });
    }
}
