use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::checks::{AssertionEngine, Verdict};
use crate::entry::RunPlan;
use crate::error::AppResult;
use crate::load::{DriverReport, LoadDriver, WorkerTask};
use crate::probe::{HttpProbe, Probe, ProbeTarget};
use crate::shutdown::ShutdownSender;
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

pub(crate) struct RunOutcome {
    pub(crate) report: DriverReport,
    pub(crate) verdict: Verdict,
}

/// One worker iteration: probe every target in order and record each result.
struct ProbeRound {
    probe: Arc<dyn Probe>,
    targets: Vec<ProbeTarget>,
    engine: Arc<AssertionEngine>,
}

#[async_trait]
impl WorkerTask for ProbeRound {
    async fn iterate(&self, _worker_id: usize) {
        for (index, target) in self.targets.iter().enumerate() {
            let result = self.probe.probe(index, target).await;
            drop(self.engine.evaluate(result));
        }
    }
}

/// Runs the plan against the real HTTP probe, stopping early on Ctrl+C or
/// SIGTERM.
pub(crate) async fn run_local(plan: &RunPlan) -> AppResult<RunOutcome> {
    let probe: Arc<dyn Probe> = Arc::new(HttpProbe::new(&plan.probe)?);
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let outcome = execute(plan, probe, &shutdown_tx).await;

    drop(shutdown_tx.send(()));
    signal_handle.await?;
    Ok(outcome)
}

pub(crate) async fn execute(
    plan: &RunPlan,
    probe: Arc<dyn Probe>,
    shutdown_tx: &ShutdownSender,
) -> RunOutcome {
    let engine = Arc::new(AssertionEngine::from_targets(&plan.targets));
    let round = Arc::new(ProbeRound {
        probe,
        targets: plan.targets.clone(),
        engine: Arc::clone(&engine),
    });

    info!(
        "Starting {} run against {}: {} target(s), {} stage(s) over {:?}, peak {} worker(s)",
        plan.preset.as_str(),
        plan.base_url,
        plan.targets.len(),
        plan.profile.stages().len(),
        plan.profile.total_duration(),
        plan.profile.peak_target()
    );
    let driver = LoadDriver::new(plan.profile.clone(), plan.driver);
    let report = driver.run(round, shutdown_tx).await;

    let verdict = engine.finalize(&plan.thresholds, report.elapsed);
    info!(
        "Run finished: {} iteration(s), {} probe(s), {} of {} threshold(s) failed",
        report.iterations,
        verdict.summary.total_probes,
        verdict.failed_rules(),
        verdict.thresholds.len()
    );
    RunOutcome { report, verdict }
}
