pub mod camera;
pub mod event_bus;
pub mod location;

pub use camera::*;
pub use event_bus::*;
pub use location::*;
