pub mod ecef;
pub mod geodesy;
pub mod position;
pub mod vec;

pub use ecef::*;
pub use geodesy::*;
pub use position::*;
pub use vec::*;
