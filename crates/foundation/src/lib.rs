pub mod ids;
pub mod math;
pub mod time;

pub use ids::*;
pub use time::*;
