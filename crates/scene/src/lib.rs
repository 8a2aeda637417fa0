pub mod event;
pub mod globe;
pub mod headless;
pub mod picking;
pub mod renderable;
pub mod surface;

pub use event::*;
pub use globe::*;
pub use headless::*;
pub use picking::*;
pub use renderable::*;
pub use surface::*;
