// SPDX-License-Identifier: Apache-2.0

use crate::store::{RegistryBackend, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;
use viario_model::{
    HighwaySection, Municipality, MunicipalityId, RoadSegment, RoadSegmentDetail, SegmentId,
};

/// In-memory registry for tests.
pub struct FakeRegistry {
    pub municipalities: Mutex<Vec<Municipality>>,
    pub segments: Mutex<HashMap<i64, Vec<RoadSegment>>>,
    pub details: Mutex<HashMap<i64, RoadSegmentDetail>>,
    pub sections: Mutex<HashMap<String, Vec<HighwaySection>>>,
    pub healthy: AtomicBool,
    /// Counts every data/ping access; tests assert that denied requests
    /// never reach the store.
    pub calls: AtomicU64,
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self {
            municipalities: Mutex::new(Vec::new()),
            segments: Mutex::new(HashMap::new()),
            details: Mutex::new(HashMap::new()),
            sections: Mutex::new(HashMap::new()),
            healthy: AtomicBool::new(true),
            calls: AtomicU64::new(0),
        }
    }
}

impl FakeRegistry {
    fn record_call(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.healthy.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(StoreError("fake registry marked unhealthy".to_string()))
        }
    }
}

#[async_trait]
impl RegistryBackend for FakeRegistry {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.record_call()
    }

    async fn municipalities(&self) -> Result<Vec<Municipality>, StoreError> {
        self.record_call()?;
        Ok(self.municipalities.lock().await.clone())
    }

    async fn segments_by_municipality(
        &self,
        municipality: MunicipalityId,
    ) -> Result<Vec<RoadSegment>, StoreError> {
        self.record_call()?;
        Ok(self
            .segments
            .lock()
            .await
            .get(&municipality.as_i64())
            .cloned()
            .unwrap_or_default())
    }

    async fn segment_detail(
        &self,
        segment: SegmentId,
    ) -> Result<Option<RoadSegmentDetail>, StoreError> {
        self.record_call()?;
        Ok(self.details.lock().await.get(&segment.as_i64()).cloned())
    }

    async fn highway_names(&self) -> Result<Vec<String>, StoreError> {
        self.record_call()?;
        let mut names: Vec<String> = self.sections.lock().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn highway_sections(&self, name: &str) -> Result<Vec<HighwaySection>, StoreError> {
        self.record_call()?;
        Ok(self
            .sections
            .lock()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default())
    }
}
