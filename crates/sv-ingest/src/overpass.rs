//! Overpass API access.
//!
//! One relation per request: the relation itself, recursed down to its ways
//! and nodes, with way geometry inlined (`out geom`) so the assembler never
//! has to resolve node ids.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use sv_core::OsmId;
use sv_geometry::OverpassResponse;

use crate::{IngestError, IngestResult};

/// Public Overpass instance with good latency for north-eastern France.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass.kumi.systems/api/interpreter";

const USER_AGENT: &str = concat!("rust_sv/", env!("CARGO_PKG_VERSION"));

/// Overpass QL for a full relation with inlined geometry.
pub fn build_query(relation: OsmId) -> String {
    format!("[out:json][timeout:50];\nrelation({relation});\n(._;>;);\nout geom;")
}

/// Anything that can turn a relation id into raw Overpass elements.
///
/// [`OverpassClient`] talks to the real API; tests substitute canned
/// responses.
pub trait OverpassFetch: Send + Sync {
    fn fetch_relation(
        &self,
        relation: OsmId,
    ) -> impl Future<Output = IngestResult<OverpassResponse>> + Send;
}

/// HTTP client for an Overpass interpreter endpoint.
#[derive(Clone, Debug)]
pub struct OverpassClient {
    http:     reqwest::Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(endpoint: impl Into<String>) -> IngestResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| IngestError::Transport(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl OverpassFetch for OverpassClient {
    async fn fetch_relation(&self, relation: OsmId) -> IngestResult<OverpassResponse> {
        let query = build_query(relation);
        debug!(%relation, endpoint = %self.endpoint, "Overpass query:\n{query}");

        // `form` sets the x-www-form-urlencoded content type and encodes the
        // query as `data=…`.
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        debug!(%relation, %status, "Overpass response");
        if !status.is_success() {
            return Err(IngestError::Upstream { status: status.as_u16() });
        }

        response
            .json::<OverpassResponse>()
            .await
            .map_err(|e| IngestError::Transport(e.to_string()))
    }
}
