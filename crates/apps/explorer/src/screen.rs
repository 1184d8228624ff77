//! Map screen orchestration.
//!
//! `MapScreen` exclusively owns the place cache, filter criteria, selection
//! and viewport state. Every method is an event handler run to completion on
//! the event loop; background work only hands results back through
//! [`MapScreen::on_places_loaded`] and friends.

use std::sync::Arc;

use foundation::LatLng;
use runtime::{
    CameraCommand, EventBus, LocationError, Notice, NoticeKind, Permission, ViewportController,
};
use scene::{
    Category, ClusterConfig, FilterCriteria, MapSource, NewPlace, Place, PlaceId, Review,
    SelectionEvent, SelectionMachine, SelectionState, TapEvent, TapTarget, dispatch_tap,
    feature_collection,
};
use streaming::{
    ApiError, BookmarkSet, FetchErrorKind, PendingRefresh, PlaceRepository, PlacesApi,
    RefreshResponse,
};
use tracing::{debug, info, warn};

use crate::contribute::ContributeError;
use crate::view::{BrowseMode, MapViewModel, PlaceDetail, category_chips};

pub struct MapScreen {
    repository: PlaceRepository,
    criteria: FilterCriteria,
    filtered: Vec<Place>,
    selection: SelectionMachine,
    viewport: ViewportController,
    camera: EventBus<CameraCommand>,
    notices: EventBus<Notice>,
    bookmarks: BookmarkSet,
    browse_mode: BrowseMode,
    user_location: Option<LatLng>,
    permission: Option<Permission>,
    cluster: ClusterConfig,
    /// Place whose reviews were last requested; older responses are dropped.
    reviews_wanted: Option<PlaceId>,
    reviews: Option<(PlaceId, Vec<Review>)>,
}

impl MapScreen {
    pub fn new(api: Arc<dyn PlacesApi>, cluster: ClusterConfig) -> Self {
        Self {
            repository: PlaceRepository::new(api),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            selection: SelectionMachine::new(),
            viewport: ViewportController::new(),
            camera: EventBus::new(),
            notices: EventBus::new(),
            bookmarks: BookmarkSet::new(),
            browse_mode: BrowseMode::default(),
            user_location: None,
            permission: None,
            cluster,
            reviews_wanted: None,
            reviews: None,
        }
    }

    // --- lifecycle -------------------------------------------------------

    /// The screen became visible: selection, filters and browse mode go back
    /// to their defaults and a fresh place fetch is issued. The caller runs
    /// the returned refresh off-loop.
    pub fn on_focus(&mut self) -> PendingRefresh {
        self.selection.apply(SelectionEvent::FocusGained);
        self.criteria = FilterCriteria::default();
        self.browse_mode = BrowseMode::default();
        self.recompute();
        self.refresh()
    }

    /// Issues a place fetch without touching selection.
    pub fn refresh(&mut self) -> PendingRefresh {
        self.repository.begin_refresh()
    }

    pub fn on_places_loaded(&mut self, response: RefreshResponse) {
        match self.repository.complete(response) {
            Ok(_) => self.recompute(),
            Err(err) if err.kind() == FetchErrorKind::Superseded => {}
            Err(err) => self.notices.emit(Notice::new(
                NoticeKind::FetchFailed,
                format!("Failed to load places: {err}"),
            )),
        }
    }

    pub fn on_bookmarks_loaded(&mut self, bookmarks: BookmarkSet) {
        self.bookmarks = bookmarks;
    }

    /// Applies a finished toggle to the current set, not to the one the
    /// toggle started from.
    pub fn on_bookmark_toggled(&mut self, place: PlaceId, result: Result<bool, ApiError>) {
        match result {
            Ok(bookmarked) => self.bookmarks.set(place, bookmarked),
            Err(err) => self.notices.emit(Notice::new(
                NoticeKind::ActionFailed,
                format!("Could not update bookmark: {err}"),
            )),
        }
    }

    /// Marks `place` as the one whose reviews should be shown next.
    pub fn request_reviews(&mut self, place: PlaceId) {
        self.reviews_wanted = Some(place);
    }

    pub fn on_reviews_loaded(&mut self, place: PlaceId, result: Result<Vec<Review>, ApiError>) {
        if self.reviews_wanted.as_ref() != Some(&place) {
            debug!(%place, "dropping reviews for a place no longer shown");
            return;
        }
        match result {
            Ok(reviews) => self.reviews = Some((place, reviews)),
            Err(err) => self.notices.emit(Notice::new(
                NoticeKind::FetchFailed,
                format!("Failed to load reviews: {err}"),
            )),
        }
    }

    pub fn on_review_submitted(&mut self, place: &PlaceId, result: Result<(), ApiError>) {
        match result {
            Ok(()) => info!(%place, "review posted"),
            Err(err) => self.notices.emit(Notice::new(
                NoticeKind::ActionFailed,
                format!("Could not post review: {err}"),
            )),
        }
    }

    pub fn on_place_added(&mut self, result: &Result<NewPlace, ContributeError>) {
        let notice = match result {
            Ok(place) => {
                info!(name = %place.name, "place added");
                return;
            }
            Err(ContributeError::Location(LocationError::PermissionDenied)) => Notice::new(
                NoticeKind::PermissionDenied,
                LocationError::PermissionDenied.to_string(),
            ),
            Err(ContributeError::Location(err)) => {
                Notice::new(NoticeKind::LocationUnavailable, err.to_string())
            }
            Err(ContributeError::Api(err)) => {
                warn!(%err, "add place failed");
                Notice::new(NoticeKind::ActionFailed, format!("Could not add place: {err}"))
            }
        };
        self.notices.emit(notice);
    }

    pub fn on_permission(&mut self, permission: Permission) {
        self.permission = Some(permission);
        if permission == Permission::Denied {
            self.viewport.disable_follow();
            self.user_location = None;
            self.notices.emit(Notice::new(
                NoticeKind::PermissionDenied,
                LocationError::PermissionDenied.to_string(),
            ));
        }
    }

    pub fn on_user_location(&mut self, location: LatLng) {
        if self.permission == Some(Permission::Denied) {
            return;
        }
        self.user_location = Some(location);
    }

    // --- search & filters -------------------------------------------------

    /// Filtering is passive: no camera change.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
        self.recompute();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.criteria.category = category;
        self.recompute();
    }

    pub fn set_browse_mode(&mut self, mode: BrowseMode) {
        self.browse_mode = mode;
    }

    /// Recomputes the result set and frames it.
    pub fn submit_search(&mut self) {
        self.recompute();
        let points: Vec<LatLng> = self.filtered.iter().map(Place::coordinate).collect();
        if let Some(cmd) = self.viewport.frame(&points) {
            self.camera.emit(cmd);
        }
        info!(query = %self.criteria.query, results = self.filtered.len(), "search submitted");
    }

    // --- map & list gestures ---------------------------------------------

    /// Single dispatch point for taps on the map surface.
    pub fn on_map_tap(&mut self, event: TapEvent) {
        match dispatch_tap(event) {
            TapTarget::Place(place) => {
                debug!(place = %place.id, "place feature tapped");
                self.selection.apply(SelectionEvent::FeatureTapped(place));
            }
            TapTarget::Cluster {
                coordinate,
                point_count,
            } => {
                debug!(point_count, "cluster tapped");
                let cmd = self.viewport.zoom_to_cluster(coordinate);
                self.camera.emit(cmd);
            }
            TapTarget::Background(coordinate) => {
                self.selection.apply(SelectionEvent::MapPress(coordinate));
            }
        }
    }

    pub fn on_map_long_press(&mut self, coordinate: LatLng) {
        self.selection.apply(SelectionEvent::LongPress(coordinate));
    }

    /// The user panned or zoomed by hand.
    pub fn on_camera_gesture(&mut self) {
        self.viewport.on_user_gesture();
    }

    pub fn on_list_item_tap(&mut self, place: Place) {
        let cmd = self.viewport.focus_on(place.coordinate());
        self.selection.apply(SelectionEvent::ListItemTapped(place));
        self.camera.emit(cmd);
    }

    /// List tap by id; ids missing from the cache are ignored.
    pub fn on_list_item_tap_id(&mut self, id: &PlaceId) {
        let found = self.repository.places().iter().find(|p| &p.id == id).cloned();
        if let Some(place) = found {
            self.on_list_item_tap(place);
        }
    }

    pub fn close_details(&mut self) {
        self.selection.apply(SelectionEvent::DetailClosed);
    }

    pub fn recenter(&mut self) {
        match self.viewport.recenter_on_user(self.user_location) {
            Ok(cmd) => self.camera.emit(cmd),
            Err(_) if self.permission == Some(Permission::Denied) => self.notices.emit(Notice::new(
                NoticeKind::PermissionDenied,
                LocationError::PermissionDenied.to_string(),
            )),
            Err(err) => self
                .notices
                .emit(Notice::new(NoticeKind::LocationUnavailable, err.to_string())),
        }
    }

    /// Starts the add-place flow, consuming the pending pin if there is one.
    ///
    /// `None` means the new place goes at the user's current position. Call
    /// this only once the draft has passed validation.
    pub fn begin_add_place(&mut self) -> Option<LatLng> {
        self.selection.submit_add_place()
    }

    pub fn report(&mut self, notice: Notice) {
        self.notices.emit(notice);
    }

    // --- outputs ----------------------------------------------------------

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn filtered(&self) -> &[Place] {
        &self.filtered
    }

    pub fn places(&self) -> Arc<[Place]> {
        self.repository.places()
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    pub fn follow_mode(&self) -> bool {
        self.viewport.follow_mode()
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.user_location
    }

    pub fn reviews_for(&self, place: &PlaceId) -> Option<&[Review]> {
        match &self.reviews {
            Some((id, reviews)) if id == place => Some(reviews),
            _ => None,
        }
    }

    pub fn drain_camera_commands(&mut self) -> Vec<CameraCommand> {
        self.camera.drain()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub fn view(&self) -> MapViewModel {
        let selection = self.selection.state().clone();
        let detail = selection.selected_place().map(|place| PlaceDetail {
            rating: place.display_rating(),
            review_count: place.review_count(),
            bookmarked: self.bookmarks.contains(&place.id),
            reviews: self.reviews_for(&place.id).map(<[Review]>::to_vec).unwrap_or_default(),
            place: place.clone(),
        });
        let list = match self.browse_mode {
            BrowseMode::Explore => self.filtered.clone(),
            BrowseMode::Bookmarks => self
                .repository
                .places()
                .iter()
                .filter(|p| self.bookmarks.contains(&p.id))
                .cloned()
                .collect(),
        };
        MapViewModel {
            source: MapSource {
                shape: feature_collection(&self.filtered),
                cluster: self.cluster,
            },
            query: self.criteria.query.clone(),
            categories: category_chips(self.criteria.category),
            browse_mode: self.browse_mode,
            list,
            overlays: selection.overlays(),
            selection,
            detail,
            follow_user: self.viewport.follow_mode(),
            user_location: self.user_location,
        }
    }

    fn recompute(&mut self) {
        self.filtered = scene::apply(&self.repository.places(), &self.criteria);
    }
}
