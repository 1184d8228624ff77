//! reqwest-backed implementation of [`PlacesApi`].

use reqwest::{Client, RequestBuilder};
use scene::{NewPlace, NewReview, Place, PlaceId, Review};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{BoxFuture, PlacesApi};
use crate::error::ApiError;
use crate::protocol::{
    BOOKMARKS_PATH, BookmarkEntry, ErrorBody, NewBookmark, PLACES_PATH, REVIEWS_PATH,
    USER_ID_HEADER, bookmark_path, place_reviews_path,
};

/// HTTP client for the places backend rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `req` and returns the raw body of a 2xx response.
    async fn execute(&self, route: &str, req: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let resp = req.send().await.map_err(|e| ApiError::network(route, e))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| ApiError::network(route, e))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            warn!(%status, route, "backend rejected request");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        debug!(%status, route, bytes = body.len(), "backend response");
        Ok(body.to_vec())
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        route: &str,
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.execute(route, req).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::decode(route, e))
    }
}

impl PlacesApi for HttpApi {
    fn list_places(&self) -> BoxFuture<'_, Result<Vec<Place>, ApiError>> {
        Box::pin(async move {
            let req = self.client.get(self.url(PLACES_PATH));
            self.fetch_json("GET /places", req).await
        })
    }

    fn create_place(&self, place: NewPlace) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            let req = self.client.post(self.url(PLACES_PATH)).json(&place);
            self.execute("POST /places", req).await.map(|_| ())
        })
    }

    fn list_bookmarks(&self, user_id: String) -> BoxFuture<'_, Result<Vec<PlaceId>, ApiError>> {
        Box::pin(async move {
            let req = self
                .client
                .get(self.url(BOOKMARKS_PATH))
                .header(USER_ID_HEADER, user_id);
            let entries: Vec<BookmarkEntry> = self.fetch_json("GET /bookmarks", req).await?;
            Ok(entries.into_iter().map(|e| e.id).collect())
        })
    }

    fn add_bookmark(&self, user_id: String, place: PlaceId) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            let req = self
                .client
                .post(self.url(BOOKMARKS_PATH))
                .header(USER_ID_HEADER, user_id)
                .json(&NewBookmark { place_id: place });
            self.execute("POST /bookmarks", req).await.map(|_| ())
        })
    }

    fn remove_bookmark(
        &self,
        user_id: String,
        place: PlaceId,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            let req = self
                .client
                .delete(self.url(&bookmark_path(&place)))
                .header(USER_ID_HEADER, user_id);
            self.execute("DELETE /bookmarks/{id}", req).await.map(|_| ())
        })
    }

    fn list_reviews(&self, place: PlaceId) -> BoxFuture<'_, Result<Vec<Review>, ApiError>> {
        Box::pin(async move {
            let req = self.client.get(self.url(&place_reviews_path(&place)));
            self.fetch_json("GET /reviews/place/{id}", req).await
        })
    }

    fn submit_review(&self, review: NewReview) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            let req = self.client.post(self.url(REVIEWS_PATH)).json(&review);
            self.execute("POST /reviews", req).await.map(|_| ())
        })
    }
}
