//! The advisory pass.

use crate::{extract_json_object, AdvisoryError, InferenceClient, InferenceRequest, Result};
use inventory_core::{
    AdvisoryConfig, AdvisoryResult, AdvisorySource, AutoCorrection, FieldCatalog, RawRecord,
    ValidationResult, DEFAULT_ADVISORY_MAX_ISSUES, DEFAULT_ADVISORY_MAX_ROWS,
    DEFAULT_TIMEOUT_SECS,
};
use serde::Deserialize;
use std::fmt::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Suggestion payload embedded in the model reply.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ModelPayload {
    suggestions: Vec<String>,
    follow_up_questions: Vec<String>,
    auto_corrections: Vec<AutoCorrection>,
    data_quality_score: Option<f64>,
    common_issues: Vec<String>,
}

/// Best-effort advisor on top of a finished validation run.
///
/// The advisor reads a [`ValidationResult`] and never modifies it. Whatever
/// goes wrong with the collaborator, [`advise`](Self::advise) returns an
/// [`AdvisoryResult`], falling back to [`AdvisoryResult::fallback`].
pub struct EnrichmentAdvisor {
    client: Box<dyn InferenceClient>,
    catalog: FieldCatalog,
    max_issues: usize,
    max_rows: usize,
    timeout: Duration,
}

impl EnrichmentAdvisor {
    /// Creates an advisor with default sample limits and timeout.
    pub fn new(client: impl InferenceClient + 'static, catalog: FieldCatalog) -> Self {
        Self {
            client: Box::new(client),
            catalog,
            max_issues: DEFAULT_ADVISORY_MAX_ISSUES,
            max_rows: DEFAULT_ADVISORY_MAX_ROWS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Creates an advisor using the limits and timeout of `config`.
    pub fn from_config(
        client: impl InferenceClient + 'static,
        catalog: FieldCatalog,
        config: &AdvisoryConfig,
    ) -> Self {
        Self::new(client, catalog)
            .with_limits(config.max_issues, config.max_rows)
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Caps the number of issues and rows included in the prompt.
    pub fn with_limits(mut self, max_issues: usize, max_rows: usize) -> Self {
        self.max_issues = max_issues;
        self.max_rows = max_rows;
        self
    }

    /// Sets the overall time allowed for one call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the advisory pass.
    ///
    /// `rows` is the sample source, usually every parsed record of the file
    /// so that rejected rows can be shown to the model too.
    pub async fn advise(&self, result: &ValidationResult, rows: &[RawRecord]) -> AdvisoryResult {
        match self.try_advise(result, rows).await {
            Ok(advisory) => {
                info!(
                    "Advisory pass produced {} suggestions and {} corrections",
                    advisory.suggestions.len(),
                    advisory.auto_corrections.len()
                );
                advisory
            }
            Err(err) => {
                warn!("Advisory pass failed, using fallback: {}", err);
                AdvisoryResult::fallback(result)
            }
        }
    }

    /// Runs the advisory pass and reports failures instead of falling back.
    pub async fn try_advise(
        &self,
        result: &ValidationResult,
        rows: &[RawRecord],
    ) -> Result<AdvisoryResult> {
        let request = InferenceRequest::new(self.build_prompt(result, rows));
        debug!("Advisory prompt is {} bytes", request.message.len());

        let reply = tokio::time::timeout(self.timeout, self.client.complete(&request))
            .await
            .map_err(|_| AdvisoryError::Timeout(self.timeout))??;

        let json = extract_json_object(&reply.response).ok_or(AdvisoryError::MissingPayload)?;
        let payload: ModelPayload = serde_json::from_str(json)?;

        Ok(self.sanitize(payload, result))
    }

    /// Builds the prompt from a bounded sample of the run.
    pub fn build_prompt(&self, result: &ValidationResult, rows: &[RawRecord]) -> String {
        let summary = result.summary();
        let mut prompt = String::from(
            "You are reviewing the validation outcome of a diamond inventory export.\n",
        );

        let _ = writeln!(
            prompt,
            "Rows: {} total, {} valid, {} invalid. Errors: {}. Warnings: {}.",
            summary.total, summary.valid, summary.invalid, summary.errors, summary.warnings
        );
        if !result.missing_mandatory_columns.is_empty() {
            let _ = writeln!(
                prompt,
                "Missing mandatory columns: {}.",
                result.missing_mandatory_columns.join(", ")
            );
        }

        if !result.issues.is_empty() {
            let _ = writeln!(prompt, "\nIssues:");
            for issue in result.issues.iter().take(self.max_issues) {
                let _ = writeln!(
                    prompt,
                    "- row {} {} = '{}': {} ({})",
                    issue.row, issue.field, issue.raw_value, issue.message, issue.severity
                );
            }
            if result.issues.len() > self.max_issues {
                let _ = writeln!(
                    prompt,
                    "- ... and {} more",
                    result.issues.len() - self.max_issues
                );
            }
        }

        let sample: Vec<&RawRecord> = rows.iter().take(self.max_rows).collect();
        if !sample.is_empty() {
            let _ = writeln!(prompt, "\nSample rows:");
            for record in sample {
                let json = serde_json::to_string(record).unwrap_or_default();
                let _ = writeln!(prompt, "- row {}: {}", record.row(), json);
            }
        }

        prompt.push_str(
            "\nReply with a JSON object of the form \
             {\"suggestions\": [string], \"followUpQuestions\": [string], \
             \"autoCorrections\": [{\"row\": number, \"field\": string, \"from\": string, \
             \"to\": string, \"confidence\": number}], \"dataQualityScore\": number between 0 and 1, \
             \"commonIssues\": [string]}.",
        );

        prompt
    }

    /// Clamps scores and drops corrections for fields outside the catalog.
    fn sanitize(&self, payload: ModelPayload, result: &ValidationResult) -> AdvisoryResult {
        let data_quality_score = payload
            .data_quality_score
            .filter(|score| score.is_finite())
            .map(|score| score.clamp(0.0, 1.0))
            .unwrap_or_else(|| AdvisoryResult::fallback(result).data_quality_score);

        let auto_corrections = payload
            .auto_corrections
            .into_iter()
            .filter(|correction| {
                let known = self.catalog.contains(&correction.field);
                if !known {
                    debug!("Dropping correction for unknown field '{}'", correction.field);
                }
                known
            })
            .map(|mut correction| {
                correction.confidence = if correction.confidence.is_finite() {
                    correction.confidence.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                correction
            })
            .collect();

        AdvisoryResult {
            data_quality_score,
            suggestions: payload.suggestions,
            follow_up_questions: payload.follow_up_questions,
            auto_corrections,
            common_issues: payload.common_issues,
            source: AdvisorySource::Model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InferenceResponse;
    use async_trait::async_trait;
    use inventory_core::ValidationIssue;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Replies with a canned text and remembers the last prompt.
    struct CannedClient {
        reply: String,
        last_prompt: Mutex<Option<String>>,
    }

    impl CannedClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl InferenceClient for CannedClient {
        async fn complete(&self, request: &InferenceRequest) -> Result<InferenceResponse> {
            *self.last_prompt.lock().unwrap() = Some(request.message.clone());
            Ok(InferenceResponse {
                response: self.reply.clone(),
            })
        }
    }

    struct SlowClient;

    #[async_trait]
    impl InferenceClient for SlowClient {
        async fn complete(&self, _request: &InferenceRequest) -> Result<InferenceResponse> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(InferenceResponse {
                response: "{}".to_string(),
            })
        }
    }

    fn record(row: usize, shape: &str) -> RawRecord {
        RawRecord::new(row, vec![("Shape".to_string(), shape.to_string())])
    }

    fn result() -> ValidationResult {
        ValidationResult {
            total_rows: 4,
            valid_rows: vec![record(1, "RD"), record(3, "PS"), record(4, "OV")],
            invalid_row_count: 1,
            issues: vec![ValidationIssue::error(2, "Shape", "rnd", "Invalid shape 'rnd'")],
            missing_mandatory_columns: Vec::new(),
            missing_optional_columns: Vec::new(),
        }
    }

    fn advisor(reply: &str) -> EnrichmentAdvisor {
        EnrichmentAdvisor::new(CannedClient::new(reply), FieldCatalog::diamond())
    }

    #[tokio::test]
    async fn test_model_reply_is_parsed() {
        let reply = r#"Here is my review:
{"suggestions": ["Use RD for round"], "followUpQuestions": ["Which system exported this?"],
 "autoCorrections": [{"row": 2, "field": "Shape", "from": "rnd", "to": "RD", "confidence": 0.93}],
 "dataQualityScore": 0.75, "commonIssues": ["Non-standard shape codes"]}
Let me know if you need more."#;

        let advisory = advisor(reply).advise(&result(), &[]).await;

        assert_eq!(advisory.source, AdvisorySource::Model);
        assert_eq!(advisory.data_quality_score, 0.75);
        assert_eq!(advisory.suggestions, vec!["Use RD for round"]);
        assert_eq!(advisory.common_issues, vec!["Non-standard shape codes"]);
        assert_eq!(
            advisory.auto_corrections,
            vec![AutoCorrection {
                row: 2,
                field: "Shape".to_string(),
                from: "rnd".to_string(),
                to: "RD".to_string(),
                confidence: 0.93,
            }]
        );
    }

    #[tokio::test]
    async fn test_reply_is_sanitized() {
        let reply = r#"{"dataQualityScore": 7.5, "autoCorrections": [
            {"row": 2, "field": "Shape", "from": "rnd", "to": "RD", "confidence": 1.7},
            {"row": 2, "field": "Sparkle", "from": "lots", "to": "some", "confidence": 0.5}
        ]}"#;

        let advisory = advisor(reply).advise(&result(), &[]).await;

        assert_eq!(advisory.data_quality_score, 1.0);
        assert_eq!(advisory.auto_corrections.len(), 1);
        assert_eq!(advisory.auto_corrections[0].confidence, 1.0);
        assert!(advisory.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_score_uses_valid_ratio() {
        let advisory = advisor(r#"{"suggestions": ["ok"]}"#)
            .advise(&result(), &[])
            .await;
        assert_eq!(advisory.source, AdvisorySource::Model);
        assert_eq!(advisory.data_quality_score, 0.75);
    }

    #[tokio::test]
    async fn test_unparsable_reply_falls_back() {
        let advisory = advisor("I am unable to help.").advise(&result(), &[]).await;
        assert!(advisory.is_fallback());
        assert_eq!(advisory.data_quality_score, 0.75);

        let err = advisor("I am unable to help.")
            .try_advise(&result(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::MissingPayload));
    }

    #[tokio::test]
    async fn test_wrong_shape_falls_back() {
        let err = advisor(r#"{"suggestions": "not a list"}"#)
            .try_advise(&result(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::Payload(_)));
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let advisor = EnrichmentAdvisor::new(SlowClient, FieldCatalog::diamond())
            .with_timeout(Duration::from_millis(50));

        let err = advisor.try_advise(&result(), &[]).await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Timeout(_)));
        assert!(advisor.advise(&result(), &[]).await.is_fallback());
    }

    #[tokio::test]
    async fn test_prompt_sample_is_bounded() {
        let client = CannedClient::new("{}");
        let advisor = EnrichmentAdvisor::new(client, FieldCatalog::diamond()).with_limits(1, 2);

        let mut validation = result();
        validation
            .issues
            .push(ValidationIssue::warning(3, "Image", "x", "Image is not a valid URL"));
        let rows = vec![record(1, "RD"), record(2, "rnd"), record(3, "PS")];

        let prompt = advisor.build_prompt(&validation, &rows);
        assert!(prompt.contains("row 2 Shape = 'rnd'"));
        assert!(!prompt.contains("Image is not a valid URL"));
        assert!(prompt.contains("- ... and 1 more"));
        assert!(prompt.contains(r#"- row 2: {"Shape":"rnd"}"#));
        assert!(!prompt.contains(r#"- row 3: "#));
    }

    #[tokio::test]
    async fn test_client_receives_prompt() {
        let client = std::sync::Arc::new(CannedClient::new("{}"));

        struct Shared(std::sync::Arc<CannedClient>);

        #[async_trait]
        impl InferenceClient for Shared {
            async fn complete(&self, request: &InferenceRequest) -> Result<InferenceResponse> {
                self.0.complete(request).await
            }
        }

        let advisor = EnrichmentAdvisor::new(Shared(client.clone()), FieldCatalog::diamond());
        advisor.advise(&result(), &[record(1, "RD")]).await;

        let prompt = client.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Rows: 4 total, 3 valid, 1 invalid"));
    }
}
