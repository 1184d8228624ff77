//! Headless event loop around [`MapScreen`].
//!
//! Ordering contract:
//! - The screen is only touched from the loop; background tasks hand results
//!   back as [`Message`]s over one channel.
//! - Each tracked task posts all of its messages before its `TaskDone`, so
//!   once the in-flight count reaches zero every result has been applied.
//! - The live location feed never finishes and is not tracked. Its fixes are
//!   applied whenever the loop next runs.

use std::future::Future;
use std::sync::Arc;

use foundation::LatLng;
use futures_util::StreamExt;
use runtime::{LocationProvider, Notice, NoticeKind, Permission};
use scene::{Category, NewPlace, PlaceDraft, PlaceId, Review, TapEvent};
use streaming::{
    ApiError, BookmarkClient, BookmarkSet, PendingRefresh, PlacesApi, RefreshResponse,
    ReviewClient, Session,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::contribute::{ContributeError, check_draft, submit_new_place};
use crate::screen::MapScreen;
use crate::view::BrowseMode;

#[derive(Debug)]
pub enum Message {
    PlacesLoaded(RefreshResponse),
    BookmarksLoaded(Result<BookmarkSet, ApiError>),
    BookmarkToggled {
        place: PlaceId,
        result: Result<bool, ApiError>,
    },
    ReviewsLoaded {
        place: PlaceId,
        result: Result<Vec<Review>, ApiError>,
    },
    ReviewSubmitted {
        place: PlaceId,
        result: Result<(), ApiError>,
    },
    PlaceAdded(Result<NewPlace, ContributeError>),
    Permission(Permission),
    Location(LatLng),
    /// Permission is granted and the first fix was posted; start live tracking.
    WatchLocation,
    TaskDone,
}

/// User input forwarded by the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Focus,
    SetQuery(String),
    SetCategory(Option<Category>),
    SetBrowseMode(BrowseMode),
    SubmitSearch,
    MapTap(TapEvent),
    LongPress(LatLng),
    ListItemTap(PlaceId),
    CloseDetails,
    Recenter,
    CameraGesture,
}

pub struct Host {
    screen: MapScreen,
    api: Arc<dyn PlacesApi>,
    location: Arc<dyn LocationProvider>,
    session: Session,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    in_flight: usize,
    watch: Option<JoinHandle<()>>,
}

impl Host {
    pub fn new(
        screen: MapScreen,
        api: Arc<dyn PlacesApi>,
        location: Arc<dyn LocationProvider>,
        session: Session,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            screen,
            api,
            location,
            session,
            tx,
            rx,
            in_flight: 0,
            watch: None,
        }
    }

    pub fn screen(&self) -> &MapScreen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut MapScreen {
        &mut self.screen
    }

    /// Asks for location permission and reads the first fix. Live tracking
    /// starts once that has been applied.
    pub fn start_location(&mut self) {
        let provider = Arc::clone(&self.location);
        let tx = self.tx.clone();
        self.spawn(async move {
            let permission = provider.request_foreground_permission().await;
            let _ = tx.send(Message::Permission(permission));
            if permission == Permission::Denied {
                return;
            }
            match provider.current_position().await {
                Ok(position) => {
                    let _ = tx.send(Message::Location(position));
                }
                Err(err) => debug!(%err, "no initial position"),
            }
            let _ = tx.send(Message::WatchLocation);
        });
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Focus => self.focus(),
            UiEvent::SetQuery(query) => self.screen.set_query(query),
            UiEvent::SetCategory(category) => self.screen.set_category(category),
            UiEvent::SetBrowseMode(mode) => self.screen.set_browse_mode(mode),
            UiEvent::SubmitSearch => self.screen.submit_search(),
            UiEvent::MapTap(tap) => self.screen.on_map_tap(tap),
            UiEvent::LongPress(coordinate) => self.screen.on_map_long_press(coordinate),
            UiEvent::ListItemTap(id) => self.screen.on_list_item_tap_id(&id),
            UiEvent::CloseDetails => self.screen.close_details(),
            UiEvent::Recenter => self.screen.recenter(),
            UiEvent::CameraGesture => self.screen.on_camera_gesture(),
        }
    }

    /// Applies messages until no tracked task is left running.
    pub async fn run_until_idle(&mut self) {
        while self.in_flight > 0 {
            if !self.step().await {
                break;
            }
        }
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message);
        }
    }

    /// Waits for one message and applies it. `false` once the channel closed.
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.handle(message);
                true
            }
            None => false,
        }
    }

    /// Flips the bookmark on `place` in the background. The result is applied
    /// to whatever the bookmark set is when it arrives.
    pub fn toggle_bookmark(&mut self, place: PlaceId) -> Result<(), ApiError> {
        if let Err(err) = self.session.require_user() {
            self.screen.on_bookmark_toggled(place, Err(ApiError::SessionRequired));
            return Err(err);
        }
        let bookmarked = self.screen.bookmarks().contains(&place);
        let client = BookmarkClient::new(Arc::clone(&self.api), self.session.clone());
        let tx = self.tx.clone();
        self.spawn(async move {
            let result = client.flip(&place, bookmarked).await;
            let _ = tx.send(Message::BookmarkToggled { place, result });
        });
        Ok(())
    }

    pub fn load_reviews(&mut self, place: PlaceId) {
        self.screen.request_reviews(place.clone());
        let client = ReviewClient::new(Arc::clone(&self.api), self.session.clone());
        let tx = self.tx.clone();
        self.spawn(async move {
            let result = client.list(&place).await;
            let _ = tx.send(Message::ReviewsLoaded { place, result });
        });
    }

    /// Posts a review; on success the place's reviews and ratings are reloaded.
    pub fn submit_review(&mut self, place: PlaceId, rating: u8, text: impl Into<String>) {
        let client = ReviewClient::new(Arc::clone(&self.api), self.session.clone());
        let text = text.into();
        let tx = self.tx.clone();
        self.spawn(async move {
            let result = client.submit(&place, rating, text).await;
            let _ = tx.send(Message::ReviewSubmitted { place, result });
        });
    }

    /// Submits `draft` at the pending pin, or at the device position when
    /// there is none.
    ///
    /// An anonymous session or an incomplete form is rejected right away and
    /// the pin stays in place for a corrected retry. Otherwise the pin is
    /// consumed and the request runs in the background; the place list is
    /// refreshed once the backend accepted it.
    pub fn add_place(&mut self, draft: PlaceDraft) -> Result<(), ContributeError> {
        if let Err(err) = check_draft(&self.session, &draft) {
            let rejected: Result<NewPlace, ContributeError> = Err(err);
            self.screen.on_place_added(&rejected);
            return rejected.map(drop);
        }
        let pinned = self.screen.begin_add_place();
        let api = Arc::clone(&self.api);
        let location = Arc::clone(&self.location);
        let session = self.session.clone();
        let tx = self.tx.clone();
        self.spawn(async move {
            let result =
                submit_new_place(api.as_ref(), location.as_ref(), &session, draft, pinned).await;
            let _ = tx.send(Message::PlaceAdded(result));
        });
        Ok(())
    }

    fn focus(&mut self) {
        let pending = self.screen.on_focus();
        self.spawn_refresh(pending);
        if self.session.user_id().is_some() {
            let client = BookmarkClient::new(Arc::clone(&self.api), self.session.clone());
            let tx = self.tx.clone();
            self.spawn(async move {
                let _ = tx.send(Message::BookmarksLoaded(client.load().await));
            });
        }
    }

    fn spawn_refresh(&mut self, pending: PendingRefresh) {
        let tx = self.tx.clone();
        self.spawn(async move {
            let _ = tx.send(Message::PlacesLoaded(pending.run().await));
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            task.await;
            let _ = tx.send(Message::TaskDone);
        });
    }

    fn start_watch(&mut self) {
        let mut updates = self.location.watch_position();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            while let Some(position) = updates.next().await {
                if tx.send(Message::Location(position)).is_err() {
                    break;
                }
            }
        });
        if let Some(previous) = self.watch.replace(handle) {
            previous.abort();
        }
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::PlacesLoaded(response) => self.screen.on_places_loaded(response),
            Message::BookmarksLoaded(Ok(set)) => self.screen.on_bookmarks_loaded(set),
            Message::BookmarksLoaded(Err(err)) => {
                warn!(%err, "bookmark load failed");
                self.screen.report(Notice::new(
                    NoticeKind::FetchFailed,
                    format!("Failed to load bookmarks: {err}"),
                ));
            }
            Message::BookmarkToggled { place, result } => {
                self.screen.on_bookmark_toggled(place, result)
            }
            Message::ReviewsLoaded { place, result } => self.screen.on_reviews_loaded(place, result),
            Message::ReviewSubmitted { place, result } => {
                let posted = result.is_ok();
                self.screen.on_review_submitted(&place, result);
                if posted {
                    self.load_reviews(place);
                    let pending = self.screen.refresh();
                    self.spawn_refresh(pending);
                }
            }
            Message::PlaceAdded(result) => {
                self.screen.on_place_added(&result);
                if result.is_ok() {
                    let pending = self.screen.refresh();
                    self.spawn_refresh(pending);
                }
            }
            Message::Permission(permission) => self.screen.on_permission(permission),
            Message::Location(position) => self.screen.on_user_location(position),
            Message::WatchLocation => self.start_watch(),
            Message::TaskDone => self.in_flight = self.in_flight.saturating_sub(1),
        }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.abort();
        }
    }
}
