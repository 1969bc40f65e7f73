use boxpack::entities::{ComparisonResult, PackingResult};
use serde::{Deserialize, Serialize};

use crate::config::PackConfig;
use crate::engine::{Outcome, PackRequest};

/// Contents of a solution file: the request, the parameters actually used and the outcome.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PackOutput {
    pub request: PackRequest,
    pub config: PackConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PackingResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
}

impl PackOutput {
    pub fn new(request: PackRequest, outcome: Outcome) -> Self {
        let config = request.parameters;
        let (result, comparison) = match outcome {
            Outcome::Single(result) => (Some(result), None),
            Outcome::Comparison(comparison) => (None, Some(comparison)),
        };
        PackOutput {
            request,
            config,
            result,
            comparison,
        }
    }
}
