mod category;
mod coord;
mod place;

pub use category::*;
pub use coord::*;
pub use place::*;
