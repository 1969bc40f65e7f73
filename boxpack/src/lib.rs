//! The base `boxpack` crate: everything needed to place axis-aligned boxes inside rectangular containers.
//!
//! Sequencing strategies (first-fit-decreasing, best-fit, metaheuristics) live in `packopt`
//! and are built on top of the [`search`] primitives exposed here.

/// Entities to model 3D container loading problems
pub mod entities;

/// Geometric primitives, orientations and the overlap/containment kernel
pub mod geometry;

/// Grid-scan placement search shared by all strategies
pub mod search;

/// Helper functions which do not belong to any specific module
pub mod util;
