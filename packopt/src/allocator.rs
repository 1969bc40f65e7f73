use anyhow::Result;
use boxpack::entities::{Container, ContainerResult, Item, PackingResult};
use boxpack::geometry::utilization;
use log::info;

use crate::opt::{SolveCtx, Strategy};

/// The containers a run fills, one after the other.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerPlan {
    /// Describes the run when no container gets used at all
    pub template: Container,
    pub slots: Vec<Container>,
}

impl ContainerPlan {
    /// An explicit, non-empty container list is used as is.
    /// Otherwise the template is copied `container_count` times, each copy with a derived id.
    /// A single copy keeps the template's id.
    pub fn new(template: &Container, explicit: &[Container], container_count: usize) -> Self {
        let slots = match (explicit, container_count) {
            ([_, ..], _) => explicit.to_vec(),
            ([], 1) => vec![template.clone()],
            ([], n) => (0..n).map(|i| template.derive(i)).collect(),
        };
        ContainerPlan {
            template: template.clone(),
            slots,
        }
    }

    pub fn is_multi_container(&self) -> bool {
        self.slots.len() > 1
    }
}

/// Runs `strategy` on every container of the plan in turn, each on the items the previous ones left unpacked.
///
/// A plan with a single container produces that strategy's result as is.
/// Otherwise the result aggregates all containers, with the first one mirrored at the top level.
pub fn allocate(
    strategy: &dyn Strategy,
    plan: &ContainerPlan,
    items: &[Item],
    ctx: &mut SolveCtx,
) -> Result<PackingResult> {
    if let [container] = plan.slots.as_slice() {
        return strategy.pack(container, items, ctx);
    }

    let n_slots = plan.slots.len();
    let (container_results, leftovers) = plan.slots.iter().enumerate().try_fold(
        (Vec::<ContainerResult>::new(), items.to_vec()),
        |(mut filled, remaining), (i, container)| -> Result<_> {
            if remaining.is_empty() {
                return Ok((filled, remaining));
            }
            ctx.progress
                .enter(i as f64 / n_slots as f64, (i + 1) as f64 / n_slots as f64);
            let result = strategy.pack(container, &remaining, ctx)?;
            ctx.progress.leave();

            let (container_result, unpacked) = ContainerResult::split(result);
            info!(
                "[ALLOC] container {} ({}/{}): {} items packed, {:.3}% utilization, {} items left",
                container_result.id,
                i + 1,
                n_slots,
                container_result.packed_items.len(),
                container_result.utilization,
                unpacked.len()
            );
            filled.push(container_result);
            Ok((filled, unpacked))
        },
    )?;

    let total_volume: f64 = container_results.iter().map(|c| c.total_volume).sum();
    let used_volume: f64 = container_results.iter().map(|c| c.used_volume).sum();
    let total_utilization = utilization(total_volume, used_volume);
    info!(
        "[ALLOC] {} of {} containers used, {:.3}% total utilization, {} items unpacked",
        container_results.len(),
        n_slots,
        total_utilization,
        leftovers.len()
    );

    let result = match container_results.first() {
        Some(first) => PackingResult {
            container: first.container.clone(),
            packed_items: first.packed_items.clone(),
            unpacked_items: leftovers,
            utilization: first.utilization,
            total_volume: first.total_volume,
            used_volume: first.used_volume,
            algorithm_name: None,
            containers: None,
            total_utilization: None,
            is_multi_container: None,
        },
        None => PackingResult {
            container: plan.template.clone(),
            packed_items: vec![],
            unpacked_items: leftovers,
            utilization: 0.0,
            total_volume: plan.template.volume(),
            used_volume: 0.0,
            algorithm_name: None,
            containers: None,
            total_utilization: None,
            is_multi_container: None,
        },
    };

    Ok(PackingResult {
        containers: Some(container_results),
        total_utilization: Some(total_utilization),
        is_multi_container: Some(plan.is_multi_container()),
        ..result
    })
}
