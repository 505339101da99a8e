use tokio::io::{AsyncWriteExt, BufWriter};

use crate::entry::RunPlan;

use super::runner::RunOutcome;

/// Writes the verdict, run metadata and aggregates as pretty JSON.
pub(crate) async fn export_summary_json(
    path: &str,
    plan: &RunPlan,
    outcome: &RunOutcome,
) -> Result<(), std::io::Error> {
    let payload = serde_json::json!({
        "preset": plan.preset,
        "base_url": plan.base_url.as_str(),
        "targets": plan
            .targets
            .iter()
            .map(|target| serde_json::json!({
                "name": target.name,
                "url": target.url.as_str(),
            }))
            .collect::<Vec<_>>(),
        "iterations": outcome.report.iterations,
        "peak_workers": outcome.report.peak_workers,
        "interrupted": outcome.report.interrupted,
        "passed": outcome.verdict.passed,
        "summary": outcome.verdict.summary,
        "thresholds": outcome.verdict.thresholds,
    });

    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let json = serde_json::to_vec_pretty(&payload).map_err(std::io::Error::other)?;
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
