use crate::document::TimezoneDocument;
use crate::loader::TimezoneRegionStore;
use crate::region::{Coordinate, PolygonRing, TimezoneId, TimezoneRegion};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    documents: Vec<TimezoneDocument>,
    spatial_index: bool,
    insert_calls: usize,
}

/// Store fake that keeps documents in insertion order.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub(crate) fn with_documents(count: usize) -> Self {
        let documents = (0..count)
            .map(|index| {
                let offset = index as f64;
                TimezoneDocument::from(TimezoneRegion {
                    timezone_id: TimezoneId::try_from("Etc/UTC").unwrap(),
                    polygon: PolygonRing::try_from(vec![
                        Coordinate { x: offset, y: 0.0 },
                        Coordinate { x: offset + 1.0, y: 1.0 },
                        Coordinate { x: offset + 1.0, y: 0.0 },
                    ])
                    .unwrap(),
                })
            })
            .collect();
        Self {
            state: Mutex::new(State {
                documents,
                ..State::default()
            }),
        }
    }

    pub(crate) fn documents(&self) -> Vec<TimezoneDocument> {
        self.state.lock().unwrap().documents.clone()
    }

    pub(crate) fn has_spatial_index(&self) -> bool {
        self.state.lock().unwrap().spatial_index
    }

    pub(crate) fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }
}

#[async_trait]
impl TimezoneRegionStore for InMemoryStore {
    async fn delete_all(&self) -> anyhow::Result<u64> {
        let mut state = self.state.lock().unwrap();
        let deleted = state.documents.len() as u64;
        state.documents.clear();
        Ok(deleted)
    }

    async fn insert_many(&self, documents: &[TimezoneDocument]) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        state.documents.extend_from_slice(documents);
        Ok(())
    }

    async fn ensure_spatial_index(&self) -> anyhow::Result<()> {
        self.state.lock().unwrap().spatial_index = true;
        Ok(())
    }
}
