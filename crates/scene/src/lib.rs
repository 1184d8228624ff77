pub mod features;
pub mod filter;
pub mod picking;
pub mod place;
pub mod selection;

pub use features::*;
pub use filter::*;
pub use picking::*;
pub use place::*;
pub use selection::*;
