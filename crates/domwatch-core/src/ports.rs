use async_trait::async_trait;

use crate::{status::ApiReply, Result};

/// Hexagonal port for the remote domain-status API.
///
/// Implementations must not do network I/O when they are not configured (missing
/// token): return `Error::Config` straight away.
#[async_trait]
pub trait DomainStatusApi: Send + Sync {
    async fn check_domain(&self, domain: &str) -> Result<ApiReply>;
}
