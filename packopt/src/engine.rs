use anyhow::Result;
use boxpack::entities::{ComparisonResult, Container, Item, PackingResult};
use boxpack::util::{CancelToken, assertions};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::allocator::{ContainerPlan, allocate};
use crate::comparator::compare;
use crate::config::PackConfig;
use crate::opt::{Algorithm, SolveCtx};
use crate::progress::Progress;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Run the configured algorithm
    #[default]
    Single,
    /// Run several algorithms and rank them
    Compare,
}

/// A complete packing request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackRequest {
    pub container: Container,
    /// When non-empty, filled in order instead of copies of `container`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<Container>,
    pub items: Vec<Item>,
    #[serde(default)]
    pub parameters: PackConfig,
    #[serde(default)]
    pub mode: Mode,
    /// Algorithms to compare, all of them when absent. Ignored in single mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithms: Option<Vec<Algorithm>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Single(PackingResult),
    Comparison(ComparisonResult),
}

/// Message sent back for a request: either a progress update or the terminal success/failure.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PackingResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PackResponse {
    pub fn progress(pct: u8) -> Self {
        PackResponse {
            success: true,
            progress: Some(pct),
            result: None,
            comparison: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        PackResponse {
            success: false,
            progress: None,
            result: None,
            comparison: None,
            error: Some(error.into()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.progress.is_none()
    }
}

impl From<Outcome> for PackResponse {
    fn from(outcome: Outcome) -> Self {
        let (result, comparison) = match outcome {
            Outcome::Single(result) => (Some(result), None),
            Outcome::Comparison(comparison) => (None, Some(comparison)),
        };
        PackResponse {
            success: true,
            progress: None,
            result,
            comparison,
            error: None,
        }
    }
}

impl From<Result<Outcome>> for PackResponse {
    fn from(outcome: Result<Outcome>) -> Self {
        match outcome {
            Ok(outcome) => outcome.into(),
            Err(err) => PackResponse::failure(err.to_string()),
        }
    }
}

/// Executes a request from start to finish on the calling thread.
///
/// `progress` receives monotonic percentages, ending at 100 on success.
/// Returns [`Cancelled`](boxpack::util::Cancelled) (wrapped) as soon as `cancel` is triggered.
pub fn run(request: &PackRequest, cancel: CancelToken, progress: Progress) -> Result<Outcome> {
    let config = request.parameters;
    config.validate()?;
    debug!("[ENGINE] {config:?}");

    let mut ctx = SolveCtx::from_seed(config.prng_seed, cancel, progress);
    let plan = ContainerPlan::new(
        &request.container,
        &request.containers,
        config.container_count,
    );
    info!(
        "[ENGINE] {} items, {} container(s), {:?} mode",
        request.items.len(),
        plan.slots.len(),
        request.mode
    );

    let outcome = match request.mode {
        Mode::Single => {
            let strategy = config.algorithm.strategy(&config);
            let result = allocate(strategy.as_ref(), &plan, &request.items, &mut ctx)?
                .with_algorithm_name(strategy.name());
            debug_assert!(assertions::result_is_valid(&result, &request.items));
            Outcome::Single(result)
        }
        Mode::Compare => {
            let algorithms = request.algorithms.as_deref().unwrap_or(&Algorithm::ALL);
            let comparison = compare(algorithms, &config, &plan, &request.items, &mut ctx)?;
            debug_assert!(
                comparison
                    .results
                    .iter()
                    .all(|r| assertions::result_is_valid(r, &request.items))
            );
            Outcome::Comparison(comparison)
        }
    };

    ctx.progress.finish();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_request_parses() {
        let json = r#"{
            "container": {"id": "c", "width": 10, "height": 10, "depth": 10},
            "items": [{"id": "i1", "name": "Box", "width": 1, "height": 2, "depth": 3, "weight": 4.5}]
        }"#;
        let request: PackRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.mode, Mode::Single);
        assert!(request.containers.is_empty());
        assert_eq!(request.parameters, PackConfig::default());
        assert_eq!(request.items[0].weight, Some(4.5));
    }

    #[test]
    fn compare_request_parses() {
        let json = r#"{
            "container": {"id": "c", "width": 10, "height": 10, "depth": 10},
            "items": [],
            "parameters": {"gridResolution": 2, "containerCount": 2},
            "mode": "compare",
            "algorithms": ["ffd", "sa"]
        }"#;
        let request: PackRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.mode, Mode::Compare);
        assert_eq!(
            request.algorithms,
            Some(vec![Algorithm::FirstFitDecreasing, Algorithm::SimulatedAnnealing])
        );
        assert_eq!(request.parameters.grid_resolution, 2.0);
    }

    #[test]
    fn responses_omit_absent_fields() {
        let json = serde_json::to_string(&PackResponse::progress(42)).unwrap();
        assert_eq!(json, r#"{"success":true,"progress":42}"#);
        let json = serde_json::to_string(&PackResponse::failure("boom")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"boom"}"#);
    }
}
