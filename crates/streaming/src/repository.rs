use std::sync::Arc;

use scene::Place;
use tracing::{debug, info, warn};

use crate::api::PlacesApi;
use crate::error::FetchError;
use crate::request::{Request, RequestSequence};

/// Cached place dataset with a stale-response guard.
///
/// Ordering contract:
/// - Every refresh is tagged with a monotonically increasing [`Request`].
/// - Only the response to the most recently *issued* request may replace the
///   cache; anything older is discarded, whatever order responses arrive in.
/// - A successful response replaces the whole list in one step. A failure
///   leaves the previous list untouched.
pub struct PlaceRepository {
    api: Arc<dyn PlacesApi>,
    sequence: RequestSequence,
    places: Arc<[Place]>,
    loaded_from: Option<Request>,
}

/// A refresh that has been issued but not yet awaited.
///
/// Owns everything it needs, so it can be moved onto a background task.
pub struct PendingRefresh {
    request: Request,
    api: Arc<dyn PlacesApi>,
}

impl PendingRefresh {
    pub fn request(&self) -> Request {
        self.request
    }

    pub async fn run(self) -> RefreshResponse {
        let result = self.api.list_places().await;
        RefreshResponse {
            request: self.request,
            result,
        }
    }
}

/// Outcome of a [`PendingRefresh`], delivered back to the repository owner.
#[derive(Debug)]
pub struct RefreshResponse {
    pub request: Request,
    pub result: Result<Vec<Place>, FetchError>,
}

impl PlaceRepository {
    pub fn new(api: Arc<dyn PlacesApi>) -> Self {
        Self {
            api,
            sequence: RequestSequence::new(),
            places: Arc::from(Vec::new()),
            loaded_from: None,
        }
    }

    /// Snapshot of the current cache. Readers keep their snapshot even if a
    /// later refresh replaces the cache.
    pub fn places(&self) -> Arc<[Place]> {
        Arc::clone(&self.places)
    }

    /// Request whose response produced the current cache, if any.
    pub fn loaded_from(&self) -> Option<Request> {
        self.loaded_from
    }

    pub fn latest_request(&self) -> Option<Request> {
        self.sequence.latest()
    }

    pub fn api(&self) -> &Arc<dyn PlacesApi> {
        &self.api
    }

    /// Issues a new refresh, superseding any still in flight.
    pub fn begin_refresh(&mut self) -> PendingRefresh {
        let request = self.sequence.issue();
        info!(request = request.0, "refreshing places");
        PendingRefresh {
            request,
            api: Arc::clone(&self.api),
        }
    }

    /// Applies a response if it answers the latest issued request.
    ///
    /// Returns the new snapshot on success, [`FetchError::Superseded`] for a
    /// stale response, or the fetch error itself.
    pub fn complete(&mut self, response: RefreshResponse) -> Result<Arc<[Place]>, FetchError> {
        let RefreshResponse { request, result } = response;
        if !self.sequence.is_latest(request) {
            debug!(
                request = request.0,
                latest = ?self.sequence.latest().map(|r| r.0),
                "discarding superseded places response"
            );
            return Err(FetchError::Superseded(request));
        }
        match result {
            Ok(places) => {
                info!(request = request.0, count = places.len(), "places refreshed");
                self.places = Arc::from(places);
                self.loaded_from = Some(request);
                Ok(self.places())
            }
            Err(err) => {
                warn!(request = request.0, error = %err, "places refresh failed; keeping cache");
                Err(err)
            }
        }
    }

    /// Issues a refresh and applies its response.
    pub async fn refresh(&mut self) -> Result<Arc<[Place]>, FetchError> {
        let pending = self.begin_refresh();
        let response = pending.run().await;
        self.complete(response)
    }
}
