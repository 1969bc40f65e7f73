/// Set of functions used throughout to assure the correctness of produced layouts.
pub mod assertions;

mod cancel;

#[doc(inline)]
pub use cancel::{CancelToken, Cancelled};
