pub mod api;
pub mod bookmarks;
pub mod error;
pub mod http;
pub mod protocol;
pub mod repository;
pub mod request;
pub mod reviews;
pub mod session;

pub use api::*;
pub use bookmarks::*;
pub use error::*;
pub use http::*;
pub use repository::*;
pub use request::*;
pub use reviews::*;
pub use session::*;
