use std::sync::Arc;

use scene::{NewReview, PlaceId, Review};
use tracing::info;

use crate::api::PlacesApi;
use crate::error::ApiError;
use crate::session::Session;

pub struct ReviewClient {
    api: Arc<dyn PlacesApi>,
    session: Session,
}

impl ReviewClient {
    pub fn new(api: Arc<dyn PlacesApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub async fn list(&self, place: &PlaceId) -> Result<Vec<Review>, ApiError> {
        self.api.list_reviews(place.clone()).await
    }

    /// Validates and posts a review authored by the signed-in user.
    pub async fn submit(
        &self,
        place: &PlaceId,
        rating: u8,
        text: impl Into<String>,
    ) -> Result<(), ApiError> {
        let user_id = self.session.require_user()?.to_string();
        let review = NewReview {
            place_id: place.clone(),
            rating,
            text: text.into(),
            user_id,
        };
        review.validate()?;
        self.api.submit_review(review).await?;
        info!(place = %place, rating, "review submitted");
        Ok(())
    }
}
