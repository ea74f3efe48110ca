//! Retry decorator for provider adapters.
//!
//! [`ProviderAdapter`]'s contract says implementations are expected to retry
//! transient connection errors themselves (base ~1s backoff, up to 3
//! attempts) before surfacing [`SyncError::ConnectionError`]. Concrete
//! provider clients are out of scope here, so this wraps any adapter with
//! that retry behavior once, rather than leaving every future provider to
//! reimplement it.

use std::time::Duration;

use async_trait::async_trait;

use aggregator_core::errors::{Error, Result, SyncError};
use aggregator_core::sync::{ProviderAdapter, ProviderSyncResult};

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_secs(1);

fn is_retriable(err: &Error) -> bool {
    matches!(err, Error::Sync(SyncError::ConnectionError { .. }))
}

/// Wraps a [`ProviderAdapter`] with exponential backoff on connection errors.
pub struct RetryingAdapter<A> {
    inner: A,
}

impl<A: ProviderAdapter> RetryingAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: ProviderAdapter> ProviderAdapter for RetryingAdapter<A> {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    async fn sync_all(&self) -> Result<ProviderSyncResult> {
        let mut attempt = 0;
        loop {
            match self.inner.sync_all().await {
                Ok(result) => return Ok(result),
                Err(err) if attempt + 1 < MAX_ATTEMPTS && is_retriable(&err) => {
                    let delay = BASE_BACKOFF * 2u32.pow(attempt);
                    log::warn!(
                        "provider '{}' sync attempt {} failed ({}), retrying in {:?}",
                        self.inner.provider_name(),
                        attempt + 1,
                        err,
                        delay,
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct FlakyAdapter {
        calls: AtomicU32,
        fail_times: u32,
    }

    #[async_trait]
    impl ProviderAdapter for FlakyAdapter {
        fn provider_name(&self) -> &str {
            "flaky"
        }

        async fn sync_all(&self) -> Result<ProviderSyncResult> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_times {
                return Err(Error::Sync(SyncError::ConnectionError {
                    provider: "flaky".to_string(),
                    message: "connection reset".to_string(),
                }));
            }
            Ok(ProviderSyncResult::default())
        }
    }

    #[tokio::test]
    async fn retries_transient_connection_errors_until_success() {
        let adapter = RetryingAdapter::new(FlakyAdapter {
            calls: AtomicU32::new(0),
            fail_times: 2,
        });
        let result = adapter.sync_all().await;
        assert!(result.is_ok());
        assert_eq!(adapter.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let adapter = RetryingAdapter::new(FlakyAdapter {
            calls: AtomicU32::new(0),
            fail_times: 10,
        });
        let result = adapter.sync_all().await;
        assert!(result.is_err());
        assert_eq!(adapter.inner.calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn does_not_retry_non_connection_errors() {
        struct AuthFailAdapter;
        #[async_trait]
        impl ProviderAdapter for AuthFailAdapter {
            fn provider_name(&self) -> &str {
                "auth-fail"
            }
            async fn sync_all(&self) -> Result<ProviderSyncResult> {
                Err(Error::Sync(SyncError::AuthError {
                    provider: "auth-fail".to_string(),
                    message: "expired token".to_string(),
                }))
            }
        }
        let adapter = RetryingAdapter::new(AuthFailAdapter);
        let result = adapter.sync_all().await;
        assert!(result.is_err());
    }
}
