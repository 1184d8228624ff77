use std::collections::BTreeSet;
use std::sync::Arc;

use scene::PlaceId;
use serde::Serialize;
use tracing::info;

use crate::api::PlacesApi;
use crate::error::ApiError;
use crate::session::Session;

/// Ids of the places the signed-in user bookmarked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BookmarkSet(BTreeSet<PlaceId>);

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &PlaceId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaceId> + '_ {
        self.0.iter()
    }

    pub fn set(&mut self, id: PlaceId, bookmarked: bool) {
        if bookmarked {
            self.0.insert(id);
        } else {
            self.0.remove(&id);
        }
    }
}

impl FromIterator<PlaceId> for BookmarkSet {
    fn from_iter<T: IntoIterator<Item = PlaceId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct BookmarkClient {
    api: Arc<dyn PlacesApi>,
    session: Session,
}

impl BookmarkClient {
    pub fn new(api: Arc<dyn PlacesApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub async fn load(&self) -> Result<BookmarkSet, ApiError> {
        let user = self.session.require_user()?.to_string();
        let ids = self.api.list_bookmarks(user).await?;
        Ok(ids.into_iter().collect())
    }

    /// Flips the bookmark on `place`.
    ///
    /// Removes when `set` has it, adds otherwise; `set` only changes after the
    /// backend accepted the request. Returns the new bookmarked state.
    pub async fn toggle(&self, set: &mut BookmarkSet, place: &PlaceId) -> Result<bool, ApiError> {
        let bookmarked = self.flip(place, set.contains(place)).await?;
        set.set(place.clone(), bookmarked);
        Ok(bookmarked)
    }

    /// Sends the request that flips a bookmark currently in state
    /// `bookmarked`, without touching any local set. Returns the new state.
    pub async fn flip(&self, place: &PlaceId, bookmarked: bool) -> Result<bool, ApiError> {
        let user = self.session.require_user()?.to_string();
        if bookmarked {
            self.api.remove_bookmark(user, place.clone()).await?;
        } else {
            self.api.add_bookmark(user, place.clone()).await?;
        }
        info!(place = %place, bookmarked = !bookmarked, "bookmark toggled");
        Ok(!bookmarked)
    }
}
