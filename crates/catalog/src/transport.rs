use crate::CatalogError;
use crate::request::CatalogRequest;

/// Status and body of one upstream round-trip, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can carry a [`CatalogRequest`] to the upstream catalog.
///
/// Only transport failures (connection refused, DNS, reading the body) are
/// errors here; non-success statuses come back as a [`RawResponse`].
#[async_trait::async_trait]
pub trait CatalogTransport: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, request: &CatalogRequest) -> Result<RawResponse, CatalogError>;
}
