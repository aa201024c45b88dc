use std::fmt;

use url::Url;

use crate::dashboard::state::Dashboard;

/// Query parameter carrying the signed-in user.
pub const IDENTITY_PARAM: &str = "user_id";

/// Opaque token naming the signed-in user for every remote call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull the identity out of an incoming request URL. Empty values count as absent.
pub fn resolve(url: &Url) -> Option<Identity> {
    url.query_pairs()
        .find(|(k, _)| k == IDENTITY_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .map(Identity)
}

/// Same as [`resolve`] for a raw URL string. Unparseable input is absent.
pub fn resolve_str(raw: &str) -> Option<Identity> {
    match Url::parse(raw) {
        Ok(u) => resolve(&u),
        Err(e) => {
            log::warn!("could not parse request URL '{raw}': {e}");
            None
        }
    }
}

/// Everything that lives for as long as one identity is signed in.
#[derive(Clone)]
pub struct SessionContext {
    pub identity: Identity,
    pub generation: u64,
    pub dashboard: Dashboard,
}

/// Turns identity observations into session transitions.
#[derive(Debug, Default)]
pub struct SessionTracker {
    current: Option<Identity>,
    generation: u64,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Returns a new context only when a present identity differs from the
    /// current one. The caller runs exactly one sync cycle per returned context.
    pub fn observe(&mut self, identity: Option<Identity>) -> Option<SessionContext> {
        match identity {
            None => {
                if let Some(old) = self.current.take() {
                    log::info!("session for {old} ended");
                }
                None
            }
            Some(id) if self.current.as_ref() == Some(&id) => None,
            Some(id) => {
                self.generation += 1;
                self.current = Some(id.clone());
                log::info!("session {} started for {id}", self.generation);
                Some(SessionContext {
                    identity: id,
                    generation: self.generation,
                    dashboard: Dashboard::awaiting_first_cycle(),
                })
            }
        }
    }
}
