use foundation::LatLng;
use scene::{Category, MapSource, Overlays, Place, Review, SelectionState};
use serde::Serialize;

/// What the browse sheet lists.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseMode {
    /// The filtered result set.
    #[default]
    Explore,
    /// Bookmarked places from the current cache.
    Bookmarks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    pub category: Option<Category>,
    pub label: &'static str,
    pub selected: bool,
}

/// Chip row: "All" first, then every category in display order.
pub fn category_chips(selected: Option<Category>) -> Vec<CategoryChip> {
    std::iter::once(None)
        .chain(Category::ALL.into_iter().map(Some))
        .map(|category| CategoryChip {
            category,
            label: category.map_or("All", Category::label),
            selected: category == selected,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetail {
    pub place: Place,
    pub rating: f64,
    pub review_count: u32,
    pub bookmarked: bool,
    /// Empty until the reviews for this place have been loaded.
    pub reviews: Vec<Review>,
}

/// Render-ready state of the map screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapViewModel {
    pub source: MapSource,
    pub query: String,
    pub categories: Vec<CategoryChip>,
    pub browse_mode: BrowseMode,
    pub list: Vec<Place>,
    pub selection: SelectionState,
    pub overlays: Overlays,
    pub detail: Option<PlaceDetail>,
    pub follow_user: bool,
    pub user_location: Option<LatLng>,
}
