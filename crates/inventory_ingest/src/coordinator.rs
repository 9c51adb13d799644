//! Upload-readiness filtering and batch submission.

use crate::{Result, UploadClient, UploadError};
use chrono::{DateTime, Utc};
use inventory_core::{PipelineConfig, RawRecord, ValidationIssue, ValidationResult, UPLOAD_FIELDS};
use serde::Serialize;
use tracing::{debug, info};

/// Rows that will be sent to the inventory endpoint.
///
/// Serializes as `{"diamonds": [...]}`, each row an object in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestionBatch {
    diamonds: Vec<RawRecord>,
}

impl IngestionBatch {
    /// Creates a batch from rows.
    pub fn new(diamonds: Vec<RawRecord>) -> Self {
        Self { diamonds }
    }

    /// Rows in the batch.
    pub fn records(&self) -> &[RawRecord] {
        &self.diamonds
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.diamonds.len()
    }

    /// Returns true if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.diamonds.is_empty()
    }
}

/// Outcome of the upload-readiness filter.
///
/// Rows that passed validation but miss an upload field are held back and
/// described by `warnings`. The validation result itself is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestionPlan {
    /// Rows ready for upload
    pub batch: IngestionBatch,
    /// Row numbers held back, ascending
    pub excluded_rows: Vec<usize>,
    /// One warning per missing upload field of a held-back row
    pub warnings: Vec<ValidationIssue>,
}

impl IngestionPlan {
    /// Returns true if every accepted row is in the batch.
    pub fn is_complete(&self) -> bool {
        self.excluded_rows.is_empty()
    }
}

/// Proof of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReceipt {
    /// Rows sent and accepted
    pub accepted: usize,
    /// Rows held back by the readiness filter
    pub excluded: usize,
    /// HTTP status of the endpoint reply
    pub status: u16,
    /// When the endpoint answered
    pub completed_at: DateTime<Utc>,
}

/// Splits the accepted rows of `result` into upload-complete rows and rows
/// held back for missing one of `upload_fields`.
///
/// This needs no endpoint, so it also serves dry runs.
pub fn plan_batch(result: &ValidationResult, upload_fields: &[String]) -> IngestionPlan {
    let mut plan = IngestionPlan::default();

    for record in &result.valid_rows {
        let missing: Vec<&String> = upload_fields
            .iter()
            .filter(|field| !record.has_value(field))
            .collect();

        if missing.is_empty() {
            plan.batch.diamonds.push(record.clone());
            continue;
        }

        debug!(
            "Row {} held back from upload, missing {} field(s)",
            record.row(),
            missing.len()
        );
        plan.excluded_rows.push(record.row());
        plan.warnings.extend(missing.into_iter().map(|field| {
            ValidationIssue::warning(
                record.row(),
                field.as_str(),
                record.get(field).unwrap_or_default(),
                format!("{} is required for upload", field),
            )
        }));
    }

    plan
}

/// Filters accepted rows for upload and sends them as one batch.
pub struct IngestionCoordinator {
    client: Box<dyn UploadClient>,
    upload_fields: Vec<String>,
}

impl IngestionCoordinator {
    /// Creates a coordinator requiring the standard upload fields.
    pub fn new(client: impl UploadClient + 'static) -> Self {
        Self {
            client: Box::new(client),
            upload_fields: UPLOAD_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Creates a coordinator requiring the upload fields of `config`.
    pub fn from_config(client: impl UploadClient + 'static, config: &PipelineConfig) -> Self {
        Self::new(client).with_upload_fields(config.upload_fields.iter().cloned())
    }

    /// Replaces the set of fields a row must fill to be uploaded.
    pub fn with_upload_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.upload_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Fields a row must fill to be uploaded.
    pub fn upload_fields(&self) -> &[String] {
        &self.upload_fields
    }

    /// Applies the readiness filter to the accepted rows of `result`.
    pub fn plan(&self, result: &ValidationResult) -> IngestionPlan {
        plan_batch(result, &self.upload_fields)
    }

    /// Uploads every upload-complete row of `result` in one request.
    ///
    /// # Errors
    ///
    /// - `UploadError::NotReady` if the result is not valid as a whole
    /// - `UploadError::EmptyBatch` if no accepted row is upload-complete
    /// - the client's error if the request fails or is rejected
    pub async fn upload(&self, result: &ValidationResult) -> Result<UploadReceipt> {
        if !result.is_valid() {
            return Err(UploadError::NotReady {
                errors: result.error_count(),
                missing_columns: result.missing_mandatory_columns.len(),
            });
        }

        let plan = self.plan(result);
        self.submit(&plan).await
    }

    /// Sends the batch of an existing plan.
    pub async fn submit(&self, plan: &IngestionPlan) -> Result<UploadReceipt> {
        if plan.batch.is_empty() {
            return Err(UploadError::EmptyBatch);
        }

        info!(
            "Uploading {} diamonds ({} held back)",
            plan.batch.len(),
            plan.excluded_rows.len()
        );
        let response = self.client.upload(&plan.batch).await?;

        let receipt = UploadReceipt {
            accepted: plan.batch.len(),
            excluded: plan.excluded_rows.len(),
            status: response.status,
            completed_at: Utc::now(),
        };
        info!("Upload accepted with HTTP {}", receipt.status);

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UploadResponse;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// Records every batch and answers with a fixed outcome.
    #[derive(Clone)]
    struct FakeClient {
        reject_with: Option<u16>,
        batches: Arc<Mutex<Vec<IngestionBatch>>>,
    }

    impl FakeClient {
        fn accepting() -> Self {
            Self {
                reject_with: None,
                batches: Arc::default(),
            }
        }

        fn rejecting(status: u16) -> Self {
            Self {
                reject_with: Some(status),
                batches: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl UploadClient for FakeClient {
        async fn upload(&self, batch: &IngestionBatch) -> Result<UploadResponse> {
            self.batches.lock().unwrap().push(batch.clone());
            match self.reject_with {
                Some(status) => Err(UploadError::Rejected {
                    status,
                    body: "duplicate stock number".to_string(),
                }),
                None => Ok(UploadResponse {
                    status: 201,
                    body: "{}".to_string(),
                }),
            }
        }
    }

    fn complete_row(row: usize, stock: &str) -> RawRecord {
        let values = [
            ("VendorStockNumber", stock),
            ("Shape", "RD"),
            ("Weight", "1.01"),
            ("Color", "G"),
            ("Clarity", "VS1"),
            ("Cut", "EX"),
            ("Lab", "GIA"),
            ("CertificateNumber", "2141438171"),
            ("Price", "5000"),
        ];
        RawRecord::new(
            row,
            values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn without(record: RawRecord, field: &str) -> RawRecord {
        let values = record
            .iter()
            .filter(|(name, _)| *name != field)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RawRecord::new(record.row(), values)
    }

    fn result(rows: Vec<RawRecord>) -> ValidationResult {
        ValidationResult {
            total_rows: rows.len(),
            valid_rows: rows,
            invalid_row_count: 0,
            issues: Vec::new(),
            missing_mandatory_columns: Vec::new(),
            missing_optional_columns: Vec::new(),
        }
    }

    #[test]
    fn test_plan_holds_back_incomplete_rows() {
        let coordinator = IngestionCoordinator::new(FakeClient::accepting());
        let validation = result(vec![
            complete_row(1, "A"),
            without(complete_row(2, "B"), "Cut"),
            without(without(complete_row(3, "C"), "Cut"), "CertificateNumber"),
        ]);

        let plan = coordinator.plan(&validation);

        assert_eq!(plan.batch.len(), 1);
        assert_eq!(plan.excluded_rows, vec![2, 3]);
        let warnings: Vec<(usize, &str)> = plan
            .warnings
            .iter()
            .map(|w| (w.row, w.field.as_str()))
            .collect();
        assert_eq!(
            warnings,
            vec![(2, "Cut"), (3, "Cut"), (3, "CertificateNumber")]
        );
        assert_eq!(plan.warnings[0].message, "Cut is required for upload");
        assert!(plan.warnings.iter().all(|w| !w.is_error()));
        assert!(!plan.is_complete());

        assert_eq!(validation.valid_rows.len(), 3);
        assert!(validation.issues.is_empty());
    }

    #[test]
    fn test_custom_upload_fields() {
        let coordinator =
            IngestionCoordinator::new(FakeClient::accepting()).with_upload_fields(["Price"]);
        let plan = coordinator.plan(&result(vec![without(complete_row(1, "A"), "Cut")]));
        assert!(plan.is_complete());
        assert_eq!(plan.batch.len(), 1);
    }

    #[test]
    fn test_batch_wire_format() {
        let batch = IngestionBatch::new(vec![RawRecord::new(
            1,
            vec![
                ("VendorStockNumber".to_string(), "A".to_string()),
                ("Price".to_string(), "5000".to_string()),
            ],
        )]);
        assert_eq!(
            serde_json::to_string(&batch).unwrap(),
            r#"{"diamonds":[{"VendorStockNumber":"A","Price":"5000"}]}"#
        );
    }

    #[tokio::test]
    async fn test_upload_sends_one_batch() {
        let client = FakeClient::accepting();
        let coordinator = IngestionCoordinator::new(client.clone());
        let validation = result(vec![
            complete_row(1, "A"),
            complete_row(2, "B"),
            without(complete_row(3, "C"), "Lab"),
        ]);

        let receipt = coordinator.upload(&validation).await.unwrap();

        assert_eq!(receipt.accepted, 2);
        assert_eq!(receipt.excluded, 1);
        assert_eq!(receipt.status, 201);
        let batches = client.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_result_is_refused() {
        let client = FakeClient::accepting();
        let coordinator = IngestionCoordinator::new(client.clone());
        let mut validation = result(vec![complete_row(1, "A")]);
        validation.missing_mandatory_columns = vec!["Lab".to_string()];

        let err = coordinator.upload(&validation).await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::NotReady {
                errors: 0,
                missing_columns: 1
            }
        ));
        assert!(client.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_is_refused() {
        let coordinator = IngestionCoordinator::new(FakeClient::accepting());
        let validation = result(vec![without(complete_row(1, "A"), "Price")]);

        let err = coordinator.upload(&validation).await.unwrap_err();
        assert!(matches!(err, UploadError::EmptyBatch));
    }

    #[tokio::test]
    async fn test_rejection_is_surfaced_verbatim() {
        let coordinator = IngestionCoordinator::new(FakeClient::rejecting(409));
        let err = coordinator
            .upload(&result(vec![complete_row(1, "A")]))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Upload rejected with HTTP 409: duplicate stock number"
        );
    }
}
