use std::collections::HashMap;

use itertools::Itertools;
use log::error;

use crate::entities::{Container, ContainerResult, Item, PackedItem, PackingResult};
use crate::geometry::{fits, overlaps, utilization};
//Various checks to verify correctness of produced results
//Used in debug_assert!() blocks and tests

pub fn layout_is_collision_free(packed_items: &[PackedItem]) -> bool {
    for (a, b) in packed_items.iter().tuple_combinations() {
        if overlaps(&a.cuboid(), &b.cuboid()) {
            error!(
                "collision detected between item {} at {} and item {} at {}",
                a.id(),
                a.position,
                b.id(),
                b.position
            );
            return false;
        }
    }
    true
}

pub fn items_within_container(packed_items: &[PackedItem], container: &Container) -> bool {
    packed_items.iter().all(|pi| {
        let inside = fits(pi.item.dims, pi.position, container.dims);
        if !inside {
            error!(
                "item {} ({}) at {} exceeds container {} ({})",
                pi.id(),
                pi.item.dims,
                pi.position,
                container.id,
                container.dims
            );
        }
        inside
    })
}

/// Equality up to accumulated floating point error
fn approx_eq(a: f64, b: f64) -> bool {
    float_cmp::approx_eq!(f64, a, b, epsilon = 1e-9, ulps = 4)
}

fn volumes_match(
    packed_items: &[PackedItem],
    container: &Container,
    total_volume: f64,
    used_volume: f64,
    util: f64,
) -> bool {
    let expected_used: f64 = packed_items.iter().map(|pi| pi.volume()).sum();
    approx_eq(total_volume, container.volume())
        && approx_eq(used_volume, expected_used)
        && approx_eq(util, utilization(total_volume, used_volume))
}

/// Checks the volume bookkeeping of the top-level result and of every container slice.
pub fn volumes_consistent(result: &PackingResult) -> bool {
    let top = volumes_match(
        &result.packed_items,
        &result.container,
        result.total_volume,
        result.used_volume,
        result.utilization,
    );
    let slices = result.containers.iter().flatten().all(|c| {
        let ContainerResult {
            container,
            packed_items,
            utilization,
            total_volume,
            used_volume,
            ..
        } = c;
        volumes_match(
            packed_items,
            container,
            *total_volume,
            *used_volume,
            *utilization,
        )
    });
    let aggregate = match (&result.containers, result.total_utilization) {
        (Some(containers), Some(total_util)) => {
            let total: f64 = containers.iter().map(|c| c.total_volume).sum();
            let used: f64 = containers.iter().map(|c| c.used_volume).sum();
            approx_eq(total_util, utilization(total, used))
        }
        _ => true,
    };
    if !(top && slices && aggregate) {
        error!("volume bookkeeping mismatch (top: {top}, slices: {slices}, aggregate: {aggregate})");
    }
    top && slices && aggregate
}

/// Every packed item and every unpacked item must correspond one-to-one with an input item,
/// packed items only differing in the order of their dimensions.
pub fn items_conserved(result: &PackingResult, input: &[Item]) -> bool {
    let mut remaining: HashMap<&str, Vec<&Item>> = HashMap::new();
    for item in input {
        remaining.entry(item.id.as_str()).or_default().push(item);
    }

    let mut take = |id: &str, matches: &dyn Fn(&Item) -> bool| -> bool {
        let Some(candidates) = remaining.get_mut(id) else {
            error!("item {id} does not occur in the input (or occurs too often in the result)");
            return false;
        };
        match candidates.iter().position(|c| matches(c)) {
            Some(idx) => {
                candidates.swap_remove(idx);
                if candidates.is_empty() {
                    remaining.remove(id);
                }
                true
            }
            None => {
                error!("item {id} in the result does not match its input dimensions");
                false
            }
        }
    };

    for pi in result.all_packed_items() {
        let sound = |src: &Item| {
            pi.item.dims.same_multiset(&src.dims) && pi.rotated == (pi.item.dims != src.dims)
        };
        if !take(pi.id(), &sound) {
            return false;
        }
    }
    for item in &result.unpacked_items {
        if !take(&item.id, &|src: &Item| src.dims == item.dims) {
            return false;
        }
    }
    if !remaining.is_empty() {
        error!(
            "{} input items are neither packed nor unpacked",
            remaining.values().map(|v| v.len()).sum::<usize>()
        );
        return false;
    }
    true
}

/// Every invariant a [`PackingResult`] must satisfy with respect to its input items.
pub fn result_is_valid(result: &PackingResult, input: &[Item]) -> bool {
    let containers_valid = match &result.containers {
        Some(containers) => containers.iter().all(|c| {
            layout_is_collision_free(&c.packed_items)
                && items_within_container(&c.packed_items, &c.container)
        }),
        None => {
            layout_is_collision_free(&result.packed_items)
                && items_within_container(&result.packed_items, &result.container)
        }
    };
    containers_valid && volumes_consistent(result) && items_conserved(result, input)
}
