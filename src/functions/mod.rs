pub mod primitives;
pub mod registry;
pub mod traits;

pub use registry::{PrimitiveId, PrimitiveSet};
pub use traits::Primitive;
