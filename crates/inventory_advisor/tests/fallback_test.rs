//! The advisory pass must never change a finished validation run.

use async_trait::async_trait;
use inventory_advisor::{
    AdvisoryError, EnrichmentAdvisor, InferenceClient, InferenceRequest, InferenceResponse,
};
use inventory_core::{AdvisorySource, FieldCatalog};
use inventory_validator::ValidationEngine;
use pretty_assertions::assert_eq;

/// Fails every call the way a dropped connection would.
struct UnreachableClient;

#[async_trait]
impl InferenceClient for UnreachableClient {
    async fn complete(
        &self,
        _request: &InferenceRequest,
    ) -> inventory_advisor::Result<InferenceResponse> {
        Err(AdvisoryError::Other("connection refused".to_string()))
    }
}

/// Answers with a rejected status.
struct RejectingClient;

#[async_trait]
impl InferenceClient for RejectingClient {
    async fn complete(
        &self,
        _request: &InferenceRequest,
    ) -> inventory_advisor::Result<InferenceResponse> {
        Err(AdvisoryError::Status {
            status: 503,
            body: "upstream unavailable".to_string(),
        })
    }
}

const EXPORT: &str = "Shape\tWeight\tColor\tClarity\tVendorStockNumber\tLab\tPrice\n\
                      RD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n\
                      xx\t1.01\tG\tVS1\tSTK2\tGIA\t5000\n\
                      PS\t-1\tE\tIF\tSTK3\tAGS\t3100\n\
                      OV\t0.5\tD\tSI2\tSTK4\tGIA\t900\n";

#[tokio::test]
async fn test_network_failure_yields_fallback_and_keeps_result() {
    let engine = ValidationEngine::new(FieldCatalog::diamond());
    let parsed = engine.parse(EXPORT).unwrap();
    let result = engine.validate_parsed(&parsed);
    let before = result.clone();

    let advisor = EnrichmentAdvisor::new(UnreachableClient, FieldCatalog::diamond());
    let advisory = advisor.advise(&result, &parsed.records).await;

    assert_eq!(advisory.source, AdvisorySource::Fallback);
    assert_eq!(advisory.data_quality_score, 0.5);
    assert!(advisory.auto_corrections.is_empty());
    assert!(!advisory.suggestions.is_empty());
    assert_eq!(result, before);
}

#[tokio::test]
async fn test_rejected_status_yields_fallback() {
    let engine = ValidationEngine::new(FieldCatalog::diamond());
    let result = engine.validate_text(EXPORT).unwrap();

    let advisor = EnrichmentAdvisor::new(RejectingClient, FieldCatalog::diamond());

    let err = advisor.try_advise(&result, &[]).await.unwrap_err();
    assert_eq!(err.to_string(), "Advisory endpoint returned HTTP 503: upstream unavailable");

    let advisory = advisor.advise(&result, &[]).await;
    assert!(advisory.is_fallback());
    assert_eq!(advisory, inventory_core::AdvisoryResult::fallback(&result));
}
