use dashmap::DashMap;
use std::sync::Arc;

/// Stable identity of one upload slot within a batch. Progress is always
/// addressed by this id, never by position in a list, so slots cannot shift
/// as other uploads finish out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub file_name: String,
    pub percentage: u8,
    pub status: UploadStatus,
}

/// Progress sink fed by a transport while bytes move.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, transferred: u64, total: u64);
}

/// Batch-scoped progress state, keyed by stable upload id.
#[derive(Debug, Default)]
pub struct ProgressRegistry {
    slots: DashMap<UploadId, UploadProgress>,
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: UploadId, file_name: &str) {
        self.slots.insert(
            id,
            UploadProgress {
                file_name: file_name.to_string(),
                percentage: 0,
                status: UploadStatus::InFlight,
            },
        );
    }

    /// Records transfer progress. Percentages never move backwards while the
    /// upload is in flight; stale or out-of-order updates are dropped.
    pub fn update(&self, id: UploadId, transferred: u64, total: u64) {
        let percentage = percentage_of(transferred, total);
        if let Some(mut slot) = self.slots.get_mut(&id) {
            if slot.status == UploadStatus::InFlight && percentage > slot.percentage {
                slot.percentage = percentage;
            }
        }
    }

    pub fn mark_succeeded(&self, id: UploadId) {
        if let Some(mut slot) = self.slots.get_mut(&id) {
            slot.percentage = 100;
            slot.status = UploadStatus::Succeeded;
        }
    }

    /// A failed upload resets to zero so the slot reads "nothing kept".
    pub fn mark_failed(&self, id: UploadId) {
        if let Some(mut slot) = self.slots.get_mut(&id) {
            slot.percentage = 0;
            slot.status = UploadStatus::Failed;
        }
    }

    pub fn get(&self, id: UploadId) -> Option<UploadProgress> {
        self.slots.get(&id).map(|slot| slot.clone())
    }

    /// Snapshot in stable id order, for rendering.
    pub fn snapshot(&self) -> Vec<(UploadId, UploadProgress)> {
        let mut all: Vec<_> = self
            .slots
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Starting a new batch discards every slot from the previous one.
    pub fn clear(&self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn percentage_of(transferred: u64, total: u64) -> u8 {
    if total == 0 {
        // Zero-byte files are done the moment they start.
        return 100;
    }
    (((transferred as f64 / total as f64) * 100.0).round() as u8).min(100)
}

/// Binds a transport's byte callbacks to one registry slot.
pub struct SlotSink {
    registry: Arc<ProgressRegistry>,
    id: UploadId,
}

impl SlotSink {
    pub fn new(registry: Arc<ProgressRegistry>, id: UploadId) -> Self {
        Self { registry, id }
    }
}

impl ProgressSink for SlotSink {
    fn on_progress(&self, transferred: u64, total: u64) {
        self.registry.update(self.id, transferred, total);
    }
}
