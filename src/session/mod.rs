//! Session-cookie continuity between calls.
//!
//! The service hands back a `JSESSIONID` cookie on the first call and
//! expects it echoed on subsequent ones, keyed per credential set. The
//! store never fails a request over persistence trouble: load and store
//! problems are logged and the call proceeds cookieless.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

/// Cookie name the service uses for session affinity.
pub const SESSION_COOKIE_NAME: &str = "JSESSIONID";

/// Stable per-credential key. Only the hash ever touches disk or logs.
pub fn account_key(username: &str, password: &str, api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(api_key.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

/// One persisted session entry in the JSON backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "sessionID")]
    pub token: String,
    pub timestamp: String,
}

/// Caller-supplied persistence, for hosts that keep sessions in their own
/// storage.
pub struct SessionHooks {
    pub load: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
    pub store: Box<dyn Fn(&str, &str) + Send + Sync>,
}

/// Where session tokens live between calls.
pub enum SessionBackend {
    /// One `cookie_<accountkey>.txt` file per credential set under the
    /// given directory. The default.
    CookieFile(PathBuf),
    /// A single `cookies.json` map of account key to [`Session`].
    JsonFile(PathBuf),
    /// Delegated to caller hooks; the account key is passed through.
    External(SessionHooks),
    /// No continuity at all.
    Disabled,
}

pub struct SessionStore {
    key: String,
    backend: SessionBackend,
}

impl SessionStore {
    pub fn new(key: String, backend: SessionBackend) -> Self {
        Self { key, backend }
    }

    /// The token to echo on the next request, if any.
    pub fn token(&self) -> Option<String> {
        match &self.backend {
            SessionBackend::CookieFile(dir) => {
                let path = self.cookie_path(dir);
                let content = fs::read_to_string(&path).ok()?;
                let content = content.trim();
                if content.is_empty() {
                    return None;
                }
                match content.strip_prefix(concat_prefix().as_str()) {
                    Some(token) if !token.is_empty() => Some(token.to_string()),
                    _ => {
                        // Anything else in the file is not ours; start over.
                        warn!(path = %path.display(), "cookie file held foreign content, truncating");
                        if let Err(e) = fs::write(&path, "") {
                            warn!(path = %path.display(), error = %e, "failed to truncate cookie file");
                        }
                        None
                    }
                }
            }
            SessionBackend::JsonFile(path) => {
                let sessions = self.read_json_sessions(path)?;
                sessions.get(&self.key).map(|s| s.token.clone())
            }
            SessionBackend::External(hooks) => (hooks.load)(&self.key),
            SessionBackend::Disabled => None,
        }
    }

    /// Captures a fresh token from the response's `Set-Cookie` headers, if
    /// one was issued.
    pub fn observe(&self, headers: &[(String, String)]) {
        let Some(token) = extract_session_token(headers) else {
            return;
        };
        match &self.backend {
            SessionBackend::CookieFile(dir) => {
                let path = self.cookie_path(dir);
                let line = format!("{}{token}", concat_prefix());
                if let Err(e) = fs::write(&path, line) {
                    warn!(path = %path.display(), error = %e, "failed to persist session cookie");
                }
            }
            SessionBackend::JsonFile(path) => {
                let mut sessions = self.read_json_sessions(path).unwrap_or_default();
                sessions.insert(
                    self.key.clone(),
                    Session {
                        token,
                        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                    },
                );
                match serde_json::to_string(&sessions) {
                    Ok(json) => {
                        if let Err(e) = fs::write(path, json) {
                            warn!(path = %path.display(), error = %e, "failed to persist session store");
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to encode session store"),
                }
            }
            SessionBackend::External(hooks) => (hooks.store)(&self.key, &token),
            SessionBackend::Disabled => {}
        }
    }

    fn cookie_path(&self, dir: &PathBuf) -> PathBuf {
        dir.join(format!("cookie_{}.txt", self.key))
    }

    fn read_json_sessions(
        &self,
        path: &PathBuf,
    ) -> Option<std::collections::BTreeMap<String, Session>> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(sessions) => Some(sessions),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "session store unreadable, resetting");
                if let Err(e) = fs::write(path, "{}") {
                    warn!(path = %path.display(), error = %e, "failed to reset session store");
                }
                None
            }
        }
    }
}

fn concat_prefix() -> String {
    format!("{SESSION_COOKIE_NAME}=")
}

/// Scans `Set-Cookie` headers for the session cookie and returns its bare
/// token value.
pub fn extract_session_token(headers: &[(String, String)]) -> Option<String> {
    for (name, value) in headers {
        if !name.eq_ignore_ascii_case("set-cookie") {
            continue;
        }
        for cookie in value.split(',') {
            let cookie = cookie.trim();
            if let Some(rest) = cookie.strip_prefix(concat_prefix().as_str()) {
                let token = rest.split(';').next().unwrap_or("").trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}
