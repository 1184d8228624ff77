//! Wire types for the places backend that are not part of the place model.
//!
//! Routes (JSON over HTTP, success = 2xx):
//! - `GET /places`
//! - `POST /places`
//! - `GET /bookmarks` (header `x-user-id`)
//! - `POST /bookmarks`
//! - `DELETE /bookmarks/{placeId}`
//! - `GET /reviews/place/{placeId}`
//! - `POST /reviews`

use scene::PlaceId;
use serde::{Deserialize, Serialize};

/// Header carrying the signed-in user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

pub const PLACES_PATH: &str = "/places";
pub const BOOKMARKS_PATH: &str = "/bookmarks";
pub const REVIEWS_PATH: &str = "/reviews";

pub fn bookmark_path(place: &PlaceId) -> String {
    format!("{BOOKMARKS_PATH}/{place}")
}

pub fn place_reviews_path(place: &PlaceId) -> String {
    format!("{REVIEWS_PATH}/place/{place}")
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Element of the `GET /bookmarks` response. The backend returns full place
/// rows; only the id is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookmarkEntry {
    pub id: PlaceId,
}

/// `POST /bookmarks` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub place_id: PlaceId,
}
