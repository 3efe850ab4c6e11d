use async_trait::async_trait;
use serde_json::Value;

use crate::api_client::RequestClient;
use crate::error::{Error, ValidationError};
use crate::types::{Endpoint, Query, QueryKind};

/// Identifiers must be present and made of decimal digits only.
pub fn check_identifier(kind: QueryKind, identifier: &str) -> Result<(), ValidationError> {
    let what = kind.identifier_name();
    if identifier.is_empty() {
        return Err(ValidationError::Missing { what });
    }
    if !identifier.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric { what });
    }
    Ok(())
}

/// One upstream provider: where each query goes and how its answer reads.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn http(&self) -> &RequestClient;

    fn build_endpoint(&self, query: &Query) -> Endpoint;

    /// Renders a provider payload for `query`. `subject` names the driver
    /// in headings.
    fn format(&self, query: &Query, data: &Value, subject: &str) -> String;

    fn validate(&self, kind: QueryKind, identifier: &str) -> bool {
        check_identifier(kind, identifier).is_ok()
    }

    async fn fetch(&self, query: &Query) -> Result<Value, Error> {
        check_identifier(query.kind(), query.identifier())?;
        let endpoint = self.build_endpoint(query);
        tracing::debug!(kind = %query.kind(), path = endpoint.path, "dispatching query");
        Ok(self
            .http()
            .request(endpoint.path, &endpoint.params, endpoint.method)
            .await?)
    }

    async fn fetch_and_format(&self, query: &Query, subject: &str) -> Result<String, Error> {
        let data = self.fetch(query).await?;
        Ok(self.format(query, &data, subject))
    }
}
