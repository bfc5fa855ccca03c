pub mod scene;
pub mod shot;
pub mod target;

pub use scene::*;
pub use shot::*;
pub use target::{lookup, Distance, Ring, TargetProfile};
