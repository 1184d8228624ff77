pub mod config;
pub mod contribute;
pub mod host;
pub mod screen;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{Command, ExplorerConfig};
pub use host::{Host, Message, UiEvent};
pub use screen::MapScreen;
pub use view::{BrowseMode, MapViewModel};
