// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

mod evaluator;
mod weights;

pub use evaluator::{evaluate, EdgeCost, InvalidCost, PhysicalLength};
pub use weights::{Dimension, PreferenceWeights, WeightsError};
