use async_trait::async_trait;
use viario_model::{
    HighwaySection, Municipality, MunicipalityId, RoadSegment, RoadSegmentDetail, SegmentId,
};

pub mod fake;
pub mod sqlite;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

/// Read-only access to the registry. The HTTP layer talks only to this
/// trait; production wires a SQLite snapshot, tests wire `FakeRegistry`.
#[async_trait]
pub trait RegistryBackend: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;

    /// Cheap reachability probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn municipalities(&self) -> Result<Vec<Municipality>, StoreError>;

    async fn segments_by_municipality(
        &self,
        municipality: MunicipalityId,
    ) -> Result<Vec<RoadSegment>, StoreError>;

    async fn segment_detail(
        &self,
        segment: SegmentId,
    ) -> Result<Option<RoadSegmentDetail>, StoreError>;

    async fn highway_names(&self) -> Result<Vec<String>, StoreError>;

    async fn highway_sections(&self, name: &str) -> Result<Vec<HighwaySection>, StoreError>;
}
