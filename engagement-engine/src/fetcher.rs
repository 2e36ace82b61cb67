//! One fetch + one validation per resource.

use std::sync::Arc;

use engagement_core::{
    CommonConfig, CommonConfigSchema, FetchError, PartnerConfig, PartnerConfigSchema, PartnerKey,
    Schema,
};

use crate::transport::{ConfigTransport, COMMON_RESOURCE};

/// Fetches and validates configuration records.
///
/// Validation runs only after a successful fetch. Failures are returned
/// unchanged: no retry, no fallback value.
#[derive(Clone)]
pub struct ConfigFetcher {
    transport: Arc<dyn ConfigTransport>,
    common_schema: Arc<dyn Schema<CommonConfig>>,
    partner_schema: Arc<dyn Schema<PartnerConfig>>,
}

impl ConfigFetcher {
    /// Fetcher using the default serde-backed schemas.
    pub fn new(transport: Arc<dyn ConfigTransport>) -> Self {
        Self::with_schemas(
            transport,
            Arc::new(CommonConfigSchema),
            Arc::new(PartnerConfigSchema),
        )
    }

    pub fn with_schemas(
        transport: Arc<dyn ConfigTransport>,
        common_schema: Arc<dyn Schema<CommonConfig>>,
        partner_schema: Arc<dyn Schema<PartnerConfig>>,
    ) -> Self {
        Self {
            transport,
            common_schema,
            partner_schema,
        }
    }

    pub fn transport(&self) -> &Arc<dyn ConfigTransport> {
        &self.transport
    }

    pub async fn fetch_common(&self) -> Result<CommonConfig, FetchError> {
        let body = self.transport.get(COMMON_RESOURCE).await?;
        Ok(self.common_schema.validate(&body)?)
    }

    pub async fn fetch_partner(&self, key: &PartnerKey) -> Result<PartnerConfig, FetchError> {
        let body = self.transport.get(&key.0).await?;
        Ok(self.partner_schema.validate(&body)?)
    }
}
