use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    errors::Error,
    ports::DomainStatusApi,
    status::{ApiReply, DomainStatus, StatusResult},
};

/// Wraps the remote API with a timeout and folds every failure into a `StatusResult`.
#[derive(Clone)]
pub struct StatusChecker {
    api: Arc<dyn DomainStatusApi>,
    timeout: Duration,
}

impl StatusChecker {
    pub fn new(api: Arc<dyn DomainStatusApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Check one domain. Never fails: errors become `Outcome::Error` for this domain only.
    pub async fn check(&self, domain: &str) -> StatusResult {
        let reply = match tokio::time::timeout(self.timeout, self.api.check_domain(domain)).await
        {
            Ok(r) => r,
            Err(_) => Err(Error::Timeout(self.timeout)),
        };

        match reply {
            Ok(ApiReply::Success { status, ip }) => {
                let mapped = DomainStatus::from_remote(&status);
                if mapped == DomainStatus::Unknown {
                    warn!(domain, status = %status, "unrecognized status from remote API");
                }
                debug!(domain, status = %mapped, "domain checked");
                StatusResult::status(domain, mapped, ip.filter(|s| !s.trim().is_empty()))
            }
            Ok(ApiReply::Failure { message }) => {
                warn!(domain, "remote API reported an error: {message}");
                StatusResult::error(domain, message)
            }
            Err(e) => {
                warn!(domain, "status check failed: {e}");
                StatusResult::error(domain, e.user_message())
            }
        }
    }
}
