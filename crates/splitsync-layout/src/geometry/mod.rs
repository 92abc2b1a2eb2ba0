mod inference;
mod types;

pub use inference::{infer, infer_layout, match_shape, DegenerateLayout, InferredLayout};
pub use types::*;
