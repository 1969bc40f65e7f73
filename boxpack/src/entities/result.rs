use serde::{Deserialize, Serialize};

use crate::entities::{Container, Item, PackedItem};

/// Outcome of packing a set of items into one or more containers.
///
/// For multi-container runs, the top-level `container`, `packed_items`, `utilization`, `total_volume` and `used_volume`
/// mirror the first container so single-container consumers keep working.
/// The breakdown of every container lives in `containers`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingResult {
    pub container: Container,
    pub packed_items: Vec<PackedItem>,
    /// Items which were not placed, in their original orientation
    pub unpacked_items: Vec<Item>,
    /// Percentage of the container volume used by packed items
    pub utilization: f64,
    pub total_volume: f64,
    pub used_volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<ContainerResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_utilization: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_multi_container: Option<bool>,
}

impl PackingResult {
    /// The utilization used to rank results: aggregated over all containers when available.
    pub fn effective_utilization(&self) -> f64 {
        self.total_utilization.unwrap_or(self.utilization)
    }

    /// All packed items of the run, across every container.
    pub fn all_packed_items(&self) -> Box<dyn Iterator<Item = &PackedItem> + '_> {
        match &self.containers {
            Some(containers) => Box::new(containers.iter().flat_map(|c| c.packed_items.iter())),
            None => Box::new(self.packed_items.iter()),
        }
    }

    pub fn with_algorithm_name(mut self, name: impl Into<String>) -> Self {
        self.algorithm_name = Some(name.into());
        self
    }

    pub fn stats(&self) -> PackingStats {
        let (packed_count, packed_weight) = self
            .all_packed_items()
            .fold((0, 0.0), |(n, w), pi| (n + 1, w + pi.item.weight.unwrap_or(0.0)));
        let unpacked_weight: f64 = self
            .unpacked_items
            .iter()
            .map(|i| i.weight.unwrap_or(0.0))
            .sum();
        let total_weight = packed_weight + unpacked_weight;
        PackingStats {
            packed_count,
            unpacked_count: self.unpacked_items.len(),
            packed_weight,
            total_weight,
            has_weight_data: total_weight > 0.0,
        }
    }
}

/// One container's slice of a multi-container run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResult {
    /// Distinguishes containers with the same dimensions
    pub id: String,
    pub container: Container,
    pub packed_items: Vec<PackedItem>,
    pub utilization: f64,
    pub total_volume: f64,
    pub used_volume: f64,
}

impl ContainerResult {
    /// Splits a single-container result into its [`ContainerResult`] and the items it left unpacked.
    pub fn split(result: PackingResult) -> (ContainerResult, Vec<Item>) {
        let PackingResult {
            container,
            packed_items,
            unpacked_items,
            utilization,
            total_volume,
            used_volume,
            ..
        } = result;
        let container_result = ContainerResult {
            id: container.id.clone(),
            container,
            packed_items,
            utilization,
            total_volume,
            used_volume,
        };
        (container_result, unpacked_items)
    }
}

/// Results of several strategies on identical input, best first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub results: Vec<PackingResult>,
    pub best_algorithm: String,
}

/// Summary counters of a [`PackingResult`]. Absent weights count as 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingStats {
    pub packed_count: usize,
    pub unpacked_count: usize,
    pub packed_weight: f64,
    pub total_weight: f64,
    pub has_weight_data: bool,
}
