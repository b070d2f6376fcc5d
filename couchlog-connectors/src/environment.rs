//! Host environment adapter.
//!
//! [`TraktEnvironment`] is the production [`EnvironmentPort`]: the host
//! application feeds it connectivity changes and the user's access token,
//! and the executor reads its gates before every action.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};
use zeroize::Zeroizing;

use couchlog_exec::{ClientError, ClientResult, EnvironmentPort, TrackerPort};

use crate::config::TraktConfig;
use crate::trakt_rest::TraktRestClient;

/// Production environment: connectivity flag plus an in-memory token slot.
///
/// The token lives only in memory and is zeroized on drop. Credentials are
/// read fresh for every client acquisition, so storing a new token after
/// an auth failure takes effect on the very next request.
pub struct TraktEnvironment {
    /// Connector configuration used for every built client
    config: TraktConfig,
    /// Network reachability, kept current by the host
    online: AtomicBool,
    /// User access token, if connected
    access_token: RwLock<Option<Zeroizing<String>>>,
}

impl TraktEnvironment {
    /// Create an environment with no stored credentials.
    ///
    /// Reachability starts out true; the host should feed real
    /// connectivity changes via [`TraktEnvironment::set_online`].
    pub fn new(config: TraktConfig) -> Self {
        Self {
            config,
            online: AtomicBool::new(true),
            access_token: RwLock::new(None),
        }
    }

    /// Update the connectivity flag.
    pub fn set_online(&self, online: bool) {
        debug!(online, "Connectivity changed");
        self.online.store(online, Ordering::SeqCst);
    }

    /// Store the user's access token, replacing any previous one.
    pub fn store_credentials(&self, access_token: impl Into<String>) {
        let mut slot = self.access_token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Zeroizing::new(access_token.into()));
        info!("Tracker credentials stored");
    }

    /// Drop the stored access token.
    pub fn clear_credentials(&self) {
        let mut slot = self.access_token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        info!("Tracker credentials cleared");
    }
}

#[async_trait]
impl EnvironmentPort for TraktEnvironment {
    fn is_network_reachable(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn has_valid_credentials(&self) -> bool {
        let slot = self.access_token.read().unwrap_or_else(PoisonError::into_inner);
        matches!(slot.as_ref(), Some(token) if !token.is_empty())
    }

    async fn authenticated_client(&self) -> ClientResult<Arc<dyn TrackerPort>> {
        let token = {
            let slot = self.access_token.read().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(token) if !token.is_empty() => String::clone(token),
                _ => {
                    return Err(ClientError::Credentials(
                        "No access token stored".to_string(),
                    ))
                },
            }
        };

        // A fresh client per request: token changes need no teardown
        let client = TraktRestClient::new(&self.config, token);
        Ok(Arc::new(client))
    }
}

// =============================================================================
// Tests
// =============================================================================
