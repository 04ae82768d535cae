//! Single-slot token cache with single-flight refresh.
//!
//! One cached token per process (a single tenant/app identity). A valid
//! cached token is served without any network access; concurrent misses
//! collapse into one shared in-flight fetch, and every waiter receives the
//! same token or the same classified error. A failed fetch leaves the slot
//! empty, so the next call retries; there is no negative caching.

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

use graph_core::error::Result;

use crate::fetcher::TokenSource;
use crate::token::AccessToken;

type SharedFetch = Shared<BoxFuture<'static, Result<AccessToken>>>;

#[derive(Default)]
struct Slot {
    cached: Option<AccessToken>,
    in_flight: Option<SharedFetch>,
}

/// One-slot cache in front of a [`TokenSource`].
///
/// Constructor-injected and owned by the component that needs it; there is
/// no process-global cache state. The mutex guards the slot only and is
/// never held across an await.
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    slot: Mutex<Slot>,
}

impl TokenCache {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Return the cached token, or fetch one if the slot is empty or stale.
    #[instrument(skip(self))]
    pub async fn get_token(&self) -> Result<AccessToken> {
        let fetch = {
            let mut slot = self.slot.lock().expect("token cache lock poisoned");

            if let Some(token) = &slot.cached {
                if !token.is_expired_at(Utc::now()) {
                    return Ok(token.clone());
                }
                debug!("Cached token expired");
            }

            match &slot.in_flight {
                Some(fetch) => fetch.clone(),
                None => {
                    debug!("Starting token fetch");
                    let source = Arc::clone(&self.source);
                    let fetch = async move { source.fetch().await }.boxed().shared();
                    slot.in_flight = Some(fetch.clone());
                    fetch
                }
            }
        };

        let result = fetch.clone().await;

        let mut slot = self.slot.lock().expect("token cache lock poisoned");

        // Only the flight we awaited may be retired; a later caller may
        // already have started a new one after a failure.
        if slot
            .in_flight
            .as_ref()
            .is_some_and(|current| current.ptr_eq(&fetch))
        {
            slot.in_flight = None;
            if let Ok(token) = &result {
                slot.cached = Some(token.clone());
            }
        }

        result
    }
}
