use anyhow::{bail, Context, Result};
use inventory_core::UploadConfig;
use inventory_ingest::{plan_batch, HttpUploadClient, IngestionCoordinator};
use tracing::info;

use super::{is_json, InputArgs, Pipeline};
use crate::output;

pub async fn execute(
    input: &InputArgs,
    endpoint: Option<String>,
    token: Option<String>,
    dry_run: bool,
    format: &str,
) -> Result<()> {
    info!("Preparing upload of inventory file: {}", input.file.display());

    let pipeline = Pipeline::run(input)?;
    let result = &pipeline.result;

    if !result.is_valid() {
        output::print_validation_report(result, format)?;
        if !is_json(format) {
            output::print_error("Upload blocked: fix the errors above and try again");
        }
        std::process::exit(1);
    }

    let plan = plan_batch(result, &pipeline.config.upload_fields);
    output::print_plan(&plan, format)?;

    if dry_run {
        if !is_json(format) {
            output::print_info("Dry run: nothing was uploaded");
        }
        return Ok(());
    }

    let mut config = match (endpoint, pipeline.config.upload.clone()) {
        (Some(endpoint), Some(configured)) => UploadConfig {
            endpoint,
            ..configured
        },
        (Some(endpoint), None) => UploadConfig::new(endpoint),
        (None, Some(configured)) => configured,
        (None, None) => bail!(
            "No upload endpoint configured. Pass --endpoint, set DICE_UPLOAD_URL, \
             or add an `upload` section to the config file"
        ),
    };
    if token.is_some() {
        config.token = token;
    }

    let client =
        HttpUploadClient::from_config(&config).context("Failed to create upload client")?;
    let coordinator = IngestionCoordinator::from_config(client, &pipeline.config);

    let receipt = coordinator
        .submit(&plan)
        .await
        .with_context(|| format!("Upload to {} failed", config.endpoint))?;

    output::print_receipt(&receipt, format)?;

    Ok(())
}
