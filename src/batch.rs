//! Parallel evaluation of independent models
//!
//! Each model is analyzed on the rayon pool with no shared mutable state, so
//! one model's failure never affects another's result. Results come back in
//! input order.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::types::{DeclineModel, IprModel, MaterialBalanceStudy, WellTest};

/// Run `perform_analysis` on every decline model.
pub fn analyze_declines(models: &mut [DeclineModel], config: &EngineConfig) -> Vec<EngineResult<()>> {
    let results: Vec<EngineResult<()>> = models
        .par_iter_mut()
        .map(|model| model.perform_analysis(config).map(|_| ()))
        .collect();
    log_summary("decline", &results);
    results
}

/// Calibrate each IPR model against its paired well test.
pub fn calibrate_iprs(jobs: &mut [(IprModel, WellTest)], config: &EngineConfig) -> Vec<EngineResult<()>> {
    let results: Vec<EngineResult<()>> = jobs
        .par_iter_mut()
        .map(|(model, test)| model.calibrate(*test, config).map(|_| ()))
        .collect();
    log_summary("ipr", &results);
    results
}

/// Run the Havlena-Odeh analysis on every study.
pub fn analyze_studies(studies: &mut [MaterialBalanceStudy], config: &EngineConfig) -> Vec<EngineResult<()>> {
    let results: Vec<EngineResult<()>> = studies
        .par_iter_mut()
        .map(|study| study.perform_havlena_odeh_analysis(config).map(|_| ()))
        .collect();
    log_summary("material_balance", &results);
    results
}

fn log_summary(kind: &str, results: &[EngineResult<()>]) {
    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(kind, total = results.len(), failed, "Batch finished with failures");
    } else {
        info!(kind, total = results.len(), "Batch finished");
    }
}
