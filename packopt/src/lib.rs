use std::sync::LazyLock;
use std::time::Instant;

pub mod allocator;
pub mod comparator;
pub mod config;
pub mod engine;
pub mod io;
pub mod opt;
pub mod progress;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);
