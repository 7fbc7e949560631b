//! Catalog record submission for the seismic data forms
//!
//! Block, survey, acquisition, processing and interpretation records (plus
//! the media variants) are flat field maps. They are checked for their
//! required fields, keyed by the kind's id field and stored as submitted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::entities::catalog_records;
use crate::entities::prelude::CatalogRecords;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("{kind} with {field} '{key}' already exists")]
    Duplicate {
        kind: &'static str,
        field: &'static str,
        key: String,
    },
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// The eight catalog forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Block,
    Survey,
    Acquisition,
    AcquisitionMedia,
    Processing,
    ProcessingMedia,
    Interpretation,
    InterpretationMedia,
}

const BLOCK_FIELDS: &[&str] = &[
    "block_id", "block_name", "basin_name", "block_type", "environment", "off_type", "block_status", "area",
    "effective_date", "block_duration", "relinquish_date", "admin_basin", "operator", "current_phase",
    "original_area", "current_phase_area", "file_name",
];

const SURVEY_FIELDS: &[&str] = &[
    "block_id", "survey_id", "survey_lib_no", "survey_name", "survey_environ", "survey_area", "survey_area_km",
    "sig_no", "company", "type_of_data", "year_of_acquisition", "survey_type", "multi_block",
    "multi_block_details", "remarks",
];

const ACQUISITION_FIELDS: &[&str] = &[
    "survey_id", "acquisition_id", "data_acq_by", "record_length", "samp_rate", "no_of_channel",
    "type_of_shooting", "source_type", "shot_interval", "shot_line_interval", "group_interval",
    "data_received_from", "date_of_received", "receival_interval", "receiver_line_interval", "floor_location",
    "acq_bin_size", "acq_issued", "acq_issue_date", "acq_issue_details", "file_name", "file_size", "file_type",
    "file_content", "remarks", "copex_status",
];

const ACQUISITION_MEDIA_FIELDS: &[&str] = &[
    "acq_serial_num", "acquisition_id", "acquisition_media_id", "cart_number", "line_name", "org_cart_number",
    "fsp", "lsp", "ff", "lf", "rack", "box", "shelf", "date_cat", "media_type", "data_type", "data_format",
    "original_copy", "archival_media_id", "catalog_by", "remarks", "qc_done_yes_no", "qc_done_by", "status",
    "dam_status", "transcrp_tape_yn", "transcrp_yr", "transcribed_by_wc", "copex_status",
];

const PROCESSING_FIELDS: &[&str] = &[
    "survey_id", "processing_id", "version", "data_processed_by", "processing_year", "processing_centre_name",
    "received_from", "date_of_receiving", "processing_software", "bin_size", "sampling_interval", "fold",
    "record_length", "multi_volume", "multi_volume_details", "reprocessing_done", "proc_issued",
    "proc_issue_date", "proc_issue_details", "processing_type", "file_name", "file_size", "file_type",
    "file_content", "remarks",
];

const PROCESSING_MEDIA_FIELDS: &[&str] = &[
    "pro_serial_num", "processing_id", "processing_media_id", "pre_post_identifier", "cart_number",
    "org_cart_number", "line_name", "file_seq_no", "fcdp", "lcdp", "fsp", "lsp", "first_inline", "last_inline",
    "first_xline", "last_xline", "floor_location", "box", "rack", "shelf", "date_cat", "data_type", "data_format",
    "catalog_by", "media_type", "original_copy", "archival_media_id", "remarks", "qc_done_yes_no", "qc_done_by",
    "status", "dam_status", "transcrp_tape_yn", "transcrp_yr", "transcribed_by_wc",
];

const INTERPRETATION_FIELDS: &[&str] = &[
    "myindex", "version", "projTitle", "sbasin", "blockName", "blockType", "mygroup", "objective",
    "inputDataType", "appSwUsed", "interpretationYear", "interpreter", "mediaDetails", "backupDetails", "file",
    "lkm", "sqm", "submittedOn", "SubmittedBy", "receivedOn", "receivedBy", "survey_id", "multi_volume",
    "multi_volume_details", "TypeOfData",
];

const INTERPRETATION_MEDIA_FIELDS: &[&str] = &[
    "integ_media_id", "survey_id", "integ_id", "BarCode", "MediaType", "ContentsOfMedia", "DataFormat", "Rack",
    "Shelf", "Box", "Remarks", "floor_location", "status", "dam_status", "org_cart_number", "archival_media_id",
    "transcrp_tape_yn", "transcrp_yr", "transcribed_by_wc", "date_cat", "catalog_by", "original_copy",
];

impl CatalogKind {
    pub const ALL: [CatalogKind; 8] = [
        CatalogKind::Block,
        CatalogKind::Survey,
        CatalogKind::Acquisition,
        CatalogKind::AcquisitionMedia,
        CatalogKind::Processing,
        CatalogKind::ProcessingMedia,
        CatalogKind::Interpretation,
        CatalogKind::InterpretationMedia,
    ];

    /// Value stored in catalog_records.kind
    pub fn slug(self) -> &'static str {
        match self {
            CatalogKind::Block => "block",
            CatalogKind::Survey => "survey",
            CatalogKind::Acquisition => "acquisition",
            CatalogKind::AcquisitionMedia => "acquisition_media",
            CatalogKind::Processing => "processing",
            CatalogKind::ProcessingMedia => "processing_media",
            CatalogKind::Interpretation => "interpretation",
            CatalogKind::InterpretationMedia => "interpretation_media",
        }
    }

    /// Route prefix, matching the paths the web client calls
    pub fn path(self) -> &'static str {
        match self {
            CatalogKind::Block => "/blocks",
            CatalogKind::Survey => "/surveys",
            CatalogKind::Acquisition => "/acquisition",
            CatalogKind::AcquisitionMedia => "/acquisition-media",
            CatalogKind::Processing => "/processing",
            CatalogKind::ProcessingMedia => "/processing-media",
            CatalogKind::Interpretation => "/interpretation",
            CatalogKind::InterpretationMedia => "/interpretation-media",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Block => "Block",
            CatalogKind::Survey => "Survey",
            CatalogKind::Acquisition => "Acquisition",
            CatalogKind::AcquisitionMedia => "Acquisition media",
            CatalogKind::Processing => "Processing",
            CatalogKind::ProcessingMedia => "Processing media",
            CatalogKind::Interpretation => "Interpretation",
            CatalogKind::InterpretationMedia => "Interpretation media",
        }
    }

    /// Field whose value identifies a record within its kind
    pub fn key_field(self) -> &'static str {
        match self {
            CatalogKind::Block => "block_id",
            CatalogKind::Survey => "survey_id",
            CatalogKind::Acquisition => "acquisition_id",
            CatalogKind::AcquisitionMedia => "acquisition_media_id",
            CatalogKind::Processing => "processing_id",
            CatalogKind::ProcessingMedia => "processing_media_id",
            CatalogKind::Interpretation => "myindex",
            CatalogKind::InterpretationMedia => "integ_media_id",
        }
    }

    /// JSON key of the `/ids` response, e.g. "block_ids"
    pub fn ids_key(self) -> String {
        format!("{}_ids", self.slug())
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            CatalogKind::Block => BLOCK_FIELDS,
            CatalogKind::Survey => SURVEY_FIELDS,
            CatalogKind::Acquisition => ACQUISITION_FIELDS,
            CatalogKind::AcquisitionMedia => ACQUISITION_MEDIA_FIELDS,
            CatalogKind::Processing => PROCESSING_FIELDS,
            CatalogKind::ProcessingMedia => PROCESSING_MEDIA_FIELDS,
            CatalogKind::Interpretation => INTERPRETATION_FIELDS,
            CatalogKind::InterpretationMedia => INTERPRETATION_MEDIA_FIELDS,
        }
    }

    pub fn success_message(self) -> String {
        format!("{} data inserted successfully", self.label())
    }
}

/// Required fields absent from `fields`. A present `null` counts as given.
pub fn missing_fields(kind: CatalogKind, fields: &Map<String, Value>) -> Vec<String> {
    kind.required_fields()
        .iter()
        .filter(|name| !fields.contains_key(**name))
        .map(|name| name.to_string())
        .collect()
}

/// Key value as a string; numbers are accepted as-is, blanks are missing
pub fn record_key(kind: CatalogKind, fields: &Map<String, Value>) -> Option<String> {
    match fields.get(kind.key_field())? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Clone)]
pub struct CatalogService {
    db: DatabaseConnection,
}

impl CatalogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn submit(
        &self,
        kind: CatalogKind,
        fields: Map<String, Value>,
    ) -> Result<catalog_records::Model, CatalogError> {
        let missing = missing_fields(kind, &fields);
        if !missing.is_empty() {
            return Err(CatalogError::MissingFields(missing));
        }

        let key = record_key(kind, &fields)
            .ok_or_else(|| CatalogError::MissingFields(vec![kind.key_field().to_string()]))?;

        let existing = CatalogRecords::find()
            .filter(catalog_records::Column::Kind.eq(kind.slug()))
            .filter(catalog_records::Column::RecordKey.eq(key.as_str()))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(CatalogError::Duplicate {
                kind: kind.label(),
                field: kind.key_field(),
                key,
            });
        }

        let record = catalog_records::ActiveModel {
            kind: Set(kind.slug().to_string()),
            record_key: Set(key.clone()),
            fields: Set(Value::Object(fields)),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        // A concurrent submission can still win the (kind, record_key) index
        let stored = record.insert(&self.db).await.map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => CatalogError::Duplicate {
                kind: kind.label(),
                field: kind.key_field(),
                key,
            },
            _ => CatalogError::Database(err),
        })?;
        info!(kind = kind.slug(), key = %stored.record_key, "Catalog record stored");

        Ok(stored)
    }

    pub async fn count(&self, kind: CatalogKind) -> Result<u64, CatalogError> {
        let count = CatalogRecords::find()
            .filter(catalog_records::Column::Kind.eq(kind.slug()))
            .count(&self.db)
            .await?;
        debug!(kind = kind.slug(), count, "Counted catalog records");
        Ok(count)
    }

    /// Record keys of one kind, ascending
    pub async fn ids(&self, kind: CatalogKind) -> Result<Vec<String>, CatalogError> {
        let keys = CatalogRecords::find()
            .select_only()
            .column(catalog_records::Column::RecordKey)
            .filter(catalog_records::Column::Kind.eq(kind.slug()))
            .order_by(catalog_records::Column::RecordKey, Order::Asc)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(keys)
    }
}
