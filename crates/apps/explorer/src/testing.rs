//! In-memory backend for orchestration tests.

use std::sync::Mutex;

use scene::{Category, NewPlace, NewReview, Place, PlaceId, Review, ReviewAuthor};
use streaming::{ApiError, BoxFuture, PlacesApi};

#[derive(Default)]
pub struct StubApi {
    pub places: Mutex<Vec<Place>>,
    pub bookmarks: Mutex<Vec<PlaceId>>,
    pub reviews: Mutex<Vec<Review>>,
    /// Bodies accepted by `create_place`.
    pub created: Mutex<Vec<NewPlace>>,
    /// When set, every call fails with this status.
    pub fail_status: Mutex<Option<u16>>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn with_places(places: Vec<Place>) -> Self {
        let api = Self::default();
        *api.places.lock().unwrap() = places;
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(&self, call: String) -> Result<(), ApiError> {
        if let Some(status) = *self.fail_status.lock().unwrap() {
            return Err(ApiError::Server {
                status,
                message: Some("stub failure".into()),
            });
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl PlacesApi for StubApi {
    fn list_places(&self) -> BoxFuture<'_, Result<Vec<Place>, ApiError>> {
        let result = self
            .outcome("list".into())
            .map(|()| self.places.lock().unwrap().clone());
        Box::pin(async move { result })
    }

    fn create_place(&self, place: NewPlace) -> BoxFuture<'_, Result<(), ApiError>> {
        let result = self.outcome(format!("create {}", place.name));
        if result.is_ok() {
            self.created.lock().unwrap().push(place);
        }
        Box::pin(async move { result })
    }

    fn list_bookmarks(&self, user_id: String) -> BoxFuture<'_, Result<Vec<PlaceId>, ApiError>> {
        let result = self
            .outcome(format!("bookmarks {user_id}"))
            .map(|()| self.bookmarks.lock().unwrap().clone());
        Box::pin(async move { result })
    }

    fn add_bookmark(&self, user_id: String, place: PlaceId) -> BoxFuture<'_, Result<(), ApiError>> {
        let result = self.outcome(format!("add {user_id} {place}"));
        if result.is_ok() {
            self.bookmarks.lock().unwrap().push(place);
        }
        Box::pin(async move { result })
    }

    fn remove_bookmark(
        &self,
        user_id: String,
        place: PlaceId,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        let result = self.outcome(format!("remove {user_id} {place}"));
        if result.is_ok() {
            self.bookmarks.lock().unwrap().retain(|id| id != &place);
        }
        Box::pin(async move { result })
    }

    fn list_reviews(&self, place: PlaceId) -> BoxFuture<'_, Result<Vec<Review>, ApiError>> {
        let result = self
            .outcome(format!("reviews {place}"))
            .map(|()| self.reviews.lock().unwrap().clone());
        Box::pin(async move { result })
    }

    fn submit_review(&self, review: NewReview) -> BoxFuture<'_, Result<(), ApiError>> {
        let result = self.outcome(format!("review {} {}", review.place_id, review.rating));
        Box::pin(async move { result })
    }
}

pub fn place(id: &str, name: &str, category: Category, lat: f64, lng: f64) -> Place {
    Place {
        id: PlaceId::new(id),
        name: name.to_string(),
        category,
        lat,
        lng,
        rating: None,
        avg_rating: None,
        rating_count: None,
        image_url: None,
        images: Vec::new(),
        description: None,
    }
}

pub fn review(id: &str, rating: u8) -> Review {
    Review {
        id: id.to_string(),
        rating,
        text: String::new(),
        created_at: "2024-05-01T10:00:00Z".to_string(),
        user: ReviewAuthor {
            display_name: "Ana".to_string(),
            avatar_url: None,
        },
    }
}
