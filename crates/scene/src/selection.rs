use foundation::LatLng;
use serde::Serialize;

use crate::place::Place;

/// Mutually exclusive selection state of the map screen.
///
/// Overlay visibility is derived from this single value, never stored as
/// independent flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    Idle,
    PendingPin {
        coordinate: LatLng,
    },
    PlaceSelected {
        place: Box<Place>,
    },
}

impl SelectionState {
    pub fn pending_pin(&self) -> Option<LatLng> {
        match self {
            SelectionState::PendingPin { coordinate } => Some(*coordinate),
            _ => None,
        }
    }

    pub fn selected_place(&self) -> Option<&Place> {
        match self {
            SelectionState::PlaceSelected { place } => Some(&**place),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    pub fn overlays(&self) -> Overlays {
        Overlays {
            browse_sheet: self.selected_place().is_none(),
            detail_sheet: self.selected_place().is_some(),
            pending_pin: self.pending_pin(),
        }
    }
}

/// Render-ready overlay visibility derived from a [`SelectionState`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Overlays {
    pub browse_sheet: bool,
    pub detail_sheet: bool,
    pub pending_pin: Option<LatLng>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// Long press on the map background.
    LongPress(LatLng),
    /// Plain press on the map background. Without a coordinate the press only
    /// dismisses the current selection.
    MapPress(Option<LatLng>),
    /// A rendered, non-cluster place feature was tapped.
    FeatureTapped(Place),
    /// A card in the browse list was tapped.
    ListItemTapped(Place),
    DetailClosed,
    FocusGained,
}

/// Selection transitions for the map screen.
///
/// | event                     | from            | to                  |
/// |---------------------------|-----------------|---------------------|
/// | long press / press at C   | any             | `PendingPin{C}`     |
/// | press without coordinate  | any             | `Idle`              |
/// | feature / list item tap P | any             | `PlaceSelected{P}`  |
/// | detail closed             | `PlaceSelected` | `Idle`              |
/// | focus gained              | any             | `Idle`              |
/// | add place submitted       | `PendingPin{C}` | `Idle`, yields C    |
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionMachine {
    state: SelectionState,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Applies `event`.
    ///
    /// Returns `true` if the state changed.
    pub fn apply(&mut self, event: SelectionEvent) -> bool {
        let next = match event {
            SelectionEvent::LongPress(coordinate) | SelectionEvent::MapPress(Some(coordinate)) => {
                SelectionState::PendingPin { coordinate }
            }
            SelectionEvent::MapPress(None) | SelectionEvent::FocusGained => SelectionState::Idle,
            SelectionEvent::FeatureTapped(place) | SelectionEvent::ListItemTapped(place) => {
                SelectionState::PlaceSelected {
                    place: Box::new(place),
                }
            }
            SelectionEvent::DetailClosed => match &self.state {
                SelectionState::PlaceSelected { .. } => SelectionState::Idle,
                _ => return false,
            },
        };
        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }

    /// Consumes the pending pin as the coordinate of a new place.
    ///
    /// Leaves any other state untouched and returns `None` for it; the add
    /// place flow then falls back to the user's current position.
    pub fn submit_add_place(&mut self) -> Option<LatLng> {
        let coordinate = self.state.pending_pin()?;
        self.state = SelectionState::Idle;
        Some(coordinate)
    }
}
