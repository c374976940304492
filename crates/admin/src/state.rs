//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::bundles::{Cancellation, CatalogProvider, PollPolicy};
use crate::config::AppConfig;
use crate::middleware::SessionTokenVerifier;
use crate::shopify::ShopifyCatalogProvider;

/// Application state shared across all handlers.
///
/// Generic over the catalog provider so the router can run against a
/// scripted catalog in tests.
pub struct AppState<P = ShopifyCatalogProvider> {
    inner: Arc<AppStateInner<P>>,
}

struct AppStateInner<P> {
    config: AppConfig,
    pool: SqlitePool,
    catalogs: P,
    session_tokens: SessionTokenVerifier,
    poll_policy: PollPolicy,
    creation_slots: Arc<Semaphore>,
    cancellation: Cancellation,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: CatalogProvider> AppState<P> {
    /// Build application state.
    ///
    /// `cancellation` stops in-flight bundle polling; fire its handle on shutdown.
    #[must_use]
    pub fn new(
        config: AppConfig,
        pool: SqlitePool,
        catalogs: P,
        cancellation: Cancellation,
    ) -> Self {
        let session_tokens = SessionTokenVerifier::new(&config.shopify);
        let poll_policy = PollPolicy::from(&config.bundles);
        let creation_slots = Arc::new(Semaphore::new(config.bundles.max_concurrent_creations));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalogs,
                session_tokens,
                poll_policy,
                creation_slots,
                cancellation,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Factory for request-scoped catalog clients.
    #[must_use]
    pub fn catalogs(&self) -> &P {
        &self.inner.catalogs
    }

    #[must_use]
    pub fn session_tokens(&self) -> &SessionTokenVerifier {
        &self.inner.session_tokens
    }

    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        self.inner.poll_policy
    }

    #[must_use]
    pub fn cancellation(&self) -> &Cancellation {
        &self.inner.cancellation
    }

    /// Claim one of the bounded bundle-creation slots without waiting.
    ///
    /// Returns `None` when every slot is taken. The slot is released when the
    /// permit is dropped.
    #[must_use]
    pub fn try_acquire_creation_slot(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.inner.creation_slots).try_acquire_owned().ok()
    }
}
