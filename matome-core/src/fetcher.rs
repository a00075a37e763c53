use async_trait::async_trait;
use serde_json::Value;

use crate::error::MatomeError;
use crate::service::ServiceName;
use crate::types::RequestDescriptor;

/// Connector seam: performs exactly one outbound GET for a resolved
/// descriptor and decodes the JSON body.
///
/// Implementations must be shareable across concurrent legs. Retries, if
/// any, are the caller's responsibility; none are performed at this layer.
#[async_trait]
pub trait ServiceFetcher: Send + Sync {
    /// Stable connector name used in logs.
    fn name(&self) -> &'static str;

    /// Execute the descriptor's GET and parse the response body as JSON.
    ///
    /// # Errors
    /// Returns [`MatomeError::Upstream`] on connection failure, non-2xx
    /// status, or an unparseable body.
    async fn fetch(
        &self,
        service: ServiceName,
        descriptor: &RequestDescriptor,
    ) -> Result<Value, MatomeError>;
}
