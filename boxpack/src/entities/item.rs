use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::Dims;

/// Box to be placed in a [`Container`](crate::entities::Container)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub dims: Dims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dims: Dims) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            dims,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn volume(&self) -> f64 {
        self.dims.volume()
    }
}
