//! TTL'd pool of OEM clients.
//!
//! Building a client is cheap but each one carries a connection pool worth
//! reusing across requests to the same endpoint. Entries expire after an
//! idle TTL so credential rotations take effect without a restart.

use crate::{ClientError, OemClient, OemEndpoint};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Idle expiry for pooled clients.
const DEFAULT_CLIENT_TTL_SECS: u64 = 300;

type PoolKey = (String, String, String, bool);

struct PoolEntry {
    client: Arc<OemClient>,
    last_used: Instant,
}

/// Shared, mutex-guarded client pool keyed by endpoint identity
/// (URL, user, password, TLS mode).
pub struct ClientPool {
    ttl: Duration,
    entries: Mutex<HashMap<PoolKey, PoolEntry>>,
}

impl Default for ClientPool {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CLIENT_TTL_SECS))
    }
}

impl ClientPool {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a pooled client for an endpoint, building one on first use or
    /// after expiry. Expired entries are evicted on every access.
    pub fn get(&self, endpoint: &OemEndpoint) -> Result<Arc<OemClient>, ClientError> {
        let key = pool_key(endpoint);
        let now = Instant::now();

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        entries.retain(|_, entry| now.duration_since(entry.last_used) <= self.ttl);

        if let Some(entry) = entries.get_mut(&key) {
            entry.last_used = now;
            return Ok(Arc::clone(&entry.client));
        }

        debug!(endpoint = %endpoint.name, "building OEM client");
        let client = Arc::new(OemClient::connect(endpoint)?);
        entries.insert(
            key,
            PoolEntry {
                client: Arc::clone(&client),
                last_used: now,
            },
        );
        Ok(client)
    }

    /// Number of live (unexpired) entries; used by tests and diagnostics.
    pub fn len(&self) -> usize {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn pool_key(endpoint: &OemEndpoint) -> PoolKey {
    (
        endpoint.endpoint.clone(),
        endpoint.user.clone(),
        endpoint.password.clone(),
        endpoint.verify_ssl,
    )
}
