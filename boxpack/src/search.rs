use ordered_float::NotNan;

use crate::entities::{Layout, PackedItem};
use crate::geometry::primitives::{Dims, Point};
use crate::geometry::{OrientedDims, orientations};
use crate::util::{CancelToken, Cancelled};

/// Slack applied when counting grid steps, so that accumulated floating point error
/// does not drop the last position along an axis (e.g. 3 steps of 0.1 into 0.3).
const GRID_EPS: f64 = 1e-9;

/// Candidate coordinates along one axis: `0, step, 2*step, ...` up to `container_extent - item_extent`.
fn axis_positions(
    container_extent: f64,
    item_extent: f64,
    step: f64,
) -> impl Iterator<Item = f64> + Clone {
    let limit = container_extent - item_extent;
    let n_positions = match limit >= 0.0 {
        true => (limit / step + GRID_EPS).floor() as usize + 1,
        false => 0,
    };
    (0..n_positions).map(move |i| f64::min(i as f64 * step, limit))
}

/// All lower-corner positions of the scan grid for a box of `item` dimensions inside `container`.
///
/// Iteration order is significant: `y` (layers, bottom-up) in the outer loop, then `z`, then `x`.
pub fn grid_positions(container: Dims, item: Dims, step: f64) -> impl Iterator<Item = Point> {
    debug_assert!(step > 0.0, "grid resolution must be positive: {step}");
    let xs = axis_positions(container.width, item.width, step);
    let ys = axis_positions(container.height, item.height, step);
    let zs = axis_positions(container.depth, item.depth, step);

    ys.flat_map(move |y| {
        let xs = xs.clone();
        zs.clone()
            .flat_map(move |z| xs.clone().map(move |x| Point::new(x, y, z)))
    })
}

/// The cost best-fit assigns to a candidate position, lower is better.
///
/// Sum of the coordinates (bias towards the origin) plus twice the distance to the
/// nearest lower corner of an already placed item (bias towards existing clusters).
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug, Eq, Ord)]
pub struct WasteScore(NotNan<f64>);

impl WasteScore {
    const PROXIMITY_WEIGHT: f64 = 2.0;

    pub fn new(position: Point, placed_items: &[PackedItem]) -> Self {
        let mut waste = position.coordinate_sum();
        let nearest = placed_items
            .iter()
            .map(|pi| pi.position.distance(&position))
            .min_by(f64::total_cmp);
        if let Some(distance) = nearest {
            waste += distance * Self::PROXIMITY_WEIGHT;
        }
        WasteScore(NotNan::new(waste).expect("waste score is NaN"))
    }

    pub fn value(&self) -> f64 {
        self.0.into_inner()
    }
}

/// Grid-scan placement search over a [`Layout`], shared by every sequencing strategy.
///
/// Keeps track of how many candidate positions were evaluated and aborts with [`Cancelled`]
/// as soon as its [`CancelToken`] is triggered.
pub struct GridSearch<'a> {
    /// Step between consecutive candidate positions on every axis
    pub step: f64,
    pub cancel: &'a CancelToken,
    pub n_evaluated: usize,
}

impl<'a> GridSearch<'a> {
    pub fn new(step: f64, cancel: &'a CancelToken) -> Self {
        GridSearch {
            step,
            cancel,
            n_evaluated: 0,
        }
    }

    /// First grid position (in scan order) where a box of `dims` fits without overlap.
    pub fn first_fit(&mut self, layout: &Layout, dims: Dims) -> Result<Option<Point>, Cancelled> {
        for position in grid_positions(layout.container().dims, dims, self.step) {
            self.cancel.check()?;
            self.n_evaluated += 1;
            if layout.is_free(dims, position) {
                return Ok(Some(position));
            }
        }
        Ok(None)
    }

    /// Feasible grid position with the lowest [`WasteScore`]. Ties keep the earliest position in scan order.
    pub fn best_fit(&mut self, layout: &Layout, dims: Dims) -> Result<Option<Point>, Cancelled> {
        let mut best: Option<(Point, WasteScore)> = None;
        for position in grid_positions(layout.container().dims, dims, self.step) {
            self.cancel.check()?;
            self.n_evaluated += 1;
            if !layout.is_free(dims, position) {
                continue;
            }
            let score = WasteScore::new(position, layout.placed_items());
            let improves = match &best {
                Some((_, best_score)) => score < *best_score,
                None => true,
            };
            if improves {
                best = Some((position, score));
            }
        }
        Ok(best.map(|(position, _)| position))
    }

    /// Tries the six orientations of `dims` in order, returning the first one for which [`GridSearch::first_fit`] succeeds.
    pub fn first_fit_oriented(
        &mut self,
        layout: &Layout,
        dims: Dims,
    ) -> Result<Option<(OrientedDims, Point)>, Cancelled> {
        for oriented in orientations(dims) {
            if let Some(position) = self.first_fit(layout, oriented.dims)? {
                return Ok(Some((oriented, position)));
            }
        }
        Ok(None)
    }
}
