use anyhow::{bail, Context, Result};
use inventory_advisor::{EnrichmentAdvisor, HttpInferenceClient};
use inventory_core::AdvisoryConfig;
use tracing::info;

use super::{InputArgs, Pipeline};
use crate::output;

pub async fn execute(input: &InputArgs, endpoint: Option<String>, format: &str) -> Result<()> {
    info!("Advising on inventory file: {}", input.file.display());

    let pipeline = Pipeline::run(input)?;

    let config = match (endpoint, pipeline.config.advisory.clone()) {
        (Some(endpoint), Some(configured)) => AdvisoryConfig {
            endpoint,
            ..configured
        },
        (Some(endpoint), None) => AdvisoryConfig::new(endpoint),
        (None, Some(configured)) => configured,
        (None, None) => bail!(
            "No advisory endpoint configured. Pass --endpoint, set DICE_ADVISOR_URL, \
             or add an `advisory` section to the config file"
        ),
    };

    let client = HttpInferenceClient::from_config(&config)
        .context("Failed to create advisory client")?;
    let advisor = EnrichmentAdvisor::from_config(client, pipeline.catalog.clone(), &config);

    let advisory = advisor
        .advise(&pipeline.result, &pipeline.parsed.records)
        .await;

    output::print_validation_report(&pipeline.result, format)?;
    output::print_advisory(&advisory, format)?;

    if !pipeline.result.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}
