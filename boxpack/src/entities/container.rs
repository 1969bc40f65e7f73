use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::Dims;

/// A rectangular container in which [`Item`](crate::entities::Item)s can be placed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    #[serde(flatten)]
    pub dims: Dims,
}

impl Container {
    pub fn new(id: impl Into<String>, dims: Dims) -> Self {
        Container {
            id: id.into(),
            dims,
        }
    }

    /// A copy of this container used as the `index`-th (0-based) slot of a multi-container run.
    pub fn derive(&self, index: usize) -> Container {
        Container {
            id: format!("{}-{}", self.id, index + 1),
            dims: self.dims,
        }
    }

    pub fn volume(&self) -> f64 {
        self.dims.volume()
    }
}
