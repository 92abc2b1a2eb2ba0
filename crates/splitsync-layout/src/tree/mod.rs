mod operations;
mod traversal;
mod types;

pub use operations::SIZE_TOLERANCE;
pub use types::*;
