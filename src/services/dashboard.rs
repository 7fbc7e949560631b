//! Read-only counters for the dashboard

use sea_orm::{ActiveEnum, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::BTreeMap;

use crate::entities::prelude::Requisitions;
use crate::entities::requisitions::{self, ApprovalStatus};
use crate::models::dashboard::DashboardSummary;
use crate::services::catalog::{CatalogError, CatalogKind, CatalogService};

/// Archive volume attributed to one processing media record
pub const TB_PER_PROCESSING_MEDIA: f64 = 0.5;

/// Estimated data volume in TB, rounded to one decimal
pub fn data_volume_tb(processing_media_count: u64) -> f64 {
    (processing_media_count as f64 * TB_PER_PROCESSING_MEDIA * 10.0).round() / 10.0
}

#[derive(Clone)]
pub struct DashboardService {
    db: DatabaseConnection,
    catalog: CatalogService,
}

impl DashboardService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            catalog: CatalogService::new(db.clone()),
            db,
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, CatalogError> {
        let mut counts = BTreeMap::new();
        for kind in CatalogKind::ALL {
            counts.insert(kind.slug(), self.catalog.count(kind).await?);
        }
        let count_of = |kind: CatalogKind| counts.get(kind.slug()).copied().unwrap_or(0);

        Ok(DashboardSummary {
            blocks: count_of(CatalogKind::Block),
            surveys: count_of(CatalogKind::Survey),
            acquisitions: count_of(CatalogKind::Acquisition),
            acquisition_media: count_of(CatalogKind::AcquisitionMedia),
            processing: count_of(CatalogKind::Processing),
            processing_media: count_of(CatalogKind::ProcessingMedia),
            interpretations: count_of(CatalogKind::Interpretation),
            interpretation_media: count_of(CatalogKind::InterpretationMedia),
            data_volume_tb: data_volume_tb(count_of(CatalogKind::ProcessingMedia)),
            requisitions_by_status: self.requisitions_by_status().await?,
        })
    }

    async fn requisitions_by_status(&self) -> Result<BTreeMap<String, u64>, DbErr> {
        let mut by_status = BTreeMap::new();
        for status in [
            ApprovalStatus::PendingL2Approval,
            ApprovalStatus::L2Approved,
            ApprovalStatus::L2Declined,
            ApprovalStatus::L3Approved,
            ApprovalStatus::L3Declined,
        ] {
            let count = Requisitions::find()
                .filter(requisitions::Column::CurrentApprovalStatus.eq(status))
                .count(&self.db)
                .await?;
            by_status.insert(status.to_value(), count);
        }
        Ok(by_status)
    }
}
