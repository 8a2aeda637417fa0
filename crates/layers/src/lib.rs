pub mod catalog;
pub mod category;
pub mod error;
pub mod layer;
pub mod notify;
pub mod registry;

pub use catalog::*;
pub use category::*;
pub use error::*;
pub use layer::*;
pub use notify::*;
pub use registry::*;
