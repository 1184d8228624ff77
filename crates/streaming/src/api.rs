use std::future::Future;
use std::pin::Pin;

use scene::{NewPlace, NewReview, Place, PlaceId, Review};

use crate::error::ApiError;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backend operations consumed by the map screen.
///
/// Implementations must be `Send + Sync` so fetches can run on background
/// tasks. Methods return boxed futures for dyn-compatibility.
pub trait PlacesApi: Send + Sync {
    fn list_places(&self) -> BoxFuture<'_, Result<Vec<Place>, ApiError>>;

    fn create_place(&self, place: NewPlace) -> BoxFuture<'_, Result<(), ApiError>>;

    /// Ids of the places bookmarked by `user_id`.
    fn list_bookmarks(&self, user_id: String) -> BoxFuture<'_, Result<Vec<PlaceId>, ApiError>>;

    fn add_bookmark(&self, user_id: String, place: PlaceId) -> BoxFuture<'_, Result<(), ApiError>>;

    fn remove_bookmark(
        &self,
        user_id: String,
        place: PlaceId,
    ) -> BoxFuture<'_, Result<(), ApiError>>;

    fn list_reviews(&self, place: PlaceId) -> BoxFuture<'_, Result<Vec<Review>, ApiError>>;

    fn submit_review(&self, review: NewReview) -> BoxFuture<'_, Result<(), ApiError>>;
}
