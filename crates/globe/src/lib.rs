pub mod config;
pub mod error;
pub mod globe;
pub mod interaction;
pub mod projection;

pub use config::*;
pub use error::*;
pub use globe::*;
pub use interaction::*;
pub use projection::*;
