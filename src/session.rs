//! Server-side sessions.
//!
//! Session data lives in an in-memory moka cache keyed by a random id. The
//! browser only holds `<id>.<hex hmac>` in the `almid_session` cookie; a cookie
//! whose signature does not match the secret key is treated as absent.

use std::{fmt, future::ready, time::Duration};

use axum::http::{HeaderMap, header};
use hmac::{digest::InvalidLength, Hmac, Mac};
use moka::{
    future::Cache,
    ops::compute::{CompResult, Op},
};
use serde::Serialize;
use sha2::Sha256;
use tracing::{debug, trace};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "almid_session";

/// Who is logged in. Copied from the users row at login time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
    pub role: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
    Info,
}

/// A one-shot message shown on the next rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Error, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Info, message: message.into() }
    }
}

/// Everything the server remembers about one browser.
///
/// `identity` is `None` for anonymous sessions, which exist only to carry
/// flashes to the login page.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub identity: Option<Identity>,
    pub flashes: Vec<Flash>,
}

impl Session {
    pub fn authenticated(identity: Identity) -> Self {
        Self { identity: Some(identity), flashes: Vec::new() }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, Session>,
    mac: HmacSha256,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("entries", &self.sessions.entry_count())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Sessions not touched for `idle` are evicted.
    pub fn new(secret_key: &str, idle: Duration) -> Result<Self, InvalidLength> {
        let sessions = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(idle)
            .build();

        let mac = HmacSha256::new_from_slice(secret_key.as_bytes())?;
        Ok(Self { sessions, mac })
    }

    /// Stores `session` under a fresh id and returns the id.
    pub async fn create(&self, session: Session) -> String {
        let id = Uuid::new_v4().simple().to_string();
        debug!(authenticated = session.identity.is_some(), "Creating session");
        self.sessions.insert(id.clone(), session).await;
        id
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).await
    }

    pub async fn remove(&self, id: &str) {
        trace!("Removing session");
        self.sessions.invalidate(id).await;
    }

    /// Queues a flash on an existing session. Returns false if the session is gone.
    ///
    /// The update is atomic per entry, so a concurrent `remove` is never undone.
    pub async fn push_flash(&self, id: &str, flash: Flash) -> bool {
        let result = self
            .sessions
            .entry_by_ref(id)
            .and_compute_with(|entry| {
                let op = match entry {
                    Some(entry) => {
                        let mut session = entry.into_value();
                        session.flashes.push(flash);
                        Op::Put(session)
                    }
                    None => Op::Nop,
                };
                ready(op)
            })
            .await;

        let stored = matches!(result, CompResult::ReplacedWith(_));
        if !stored {
            trace!("No such session, flash dropped");
        }
        stored
    }

    /// Drains the queued flashes of a session.
    pub async fn take_flashes(&self, id: &str) -> Vec<Flash> {
        let mut taken = Vec::new();

        self.sessions
            .entry_by_ref(id)
            .and_compute_with(|entry| {
                let op = match entry {
                    Some(entry) if !entry.value().flashes.is_empty() => {
                        let mut session = entry.into_value();
                        taken = std::mem::take(&mut session.flashes);
                        Op::Put(session)
                    }
                    _ => Op::Nop,
                };
                ready(op)
            })
            .await;

        taken
    }

    /// Cookie value for a session id: `<id>.<hex signature>`.
    pub fn sign(&self, id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        format!("{}.{}", id, hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns the session id if the signature matches.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (id, signature) = value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(id.to_string())
    }

    /// Extracts and verifies the session id from the request's cookies.
    pub fn session_id_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| self.verify(value))
    }

    /// `Set-Cookie` value that hands `id` to the browser.
    pub fn cookie(&self, id: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.sign(id)
        )
    }

    /// `Set-Cookie` value that makes the browser forget its session.
    pub fn removal_cookie() -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
    }
}
