use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// GET /dashboard/summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub blocks: u64,
    pub surveys: u64,
    pub acquisitions: u64,
    pub acquisition_media: u64,
    pub processing: u64,
    pub processing_media: u64,
    pub interpretations: u64,
    pub interpretation_media: u64,
    /// Estimated archive volume in TB (0.5 TB per processing media record)
    pub data_volume_tb: f64,
    /// Requisition count per approval status label
    pub requisitions_by_status: BTreeMap<String, u64>,
}
