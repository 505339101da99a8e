use tracing::info;

use crate::app::{export_summary_json, print_report, run_local};
use crate::error::{AppError, AppResult, ValidationError};

use super::types::RunPlan;

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let outcome = run_local(&plan).await?;

    if !plan.quiet {
        print_report(&plan, &outcome);
    }

    if let Some(path) = plan.summary_export.as_deref() {
        export_summary_json(path, &plan, &outcome).await?;
        info!("Summary written to {}", path);
    }

    if outcome.verdict.passed {
        return Ok(());
    }
    Err(AppError::validation(ValidationError::ThresholdsFailed {
        failed: outcome.verdict.failed_rules(),
        total: outcome.verdict.thresholds.len(),
    }))
}
