use std::fmt;

use foundation::LatLng;
use runtime::{LocationError, LocationProvider};
use scene::{NewPlace, PlaceDraft};
use streaming::{ApiError, PlacesApi, Session};
use tracing::info;

#[derive(Debug)]
pub enum ContributeError {
    Api(ApiError),
    Location(LocationError),
}

impl fmt::Display for ContributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributeError::Api(err) => write!(f, "{err}"),
            ContributeError::Location(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ContributeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContributeError::Api(err) => Some(err),
            ContributeError::Location(err) => Some(err),
        }
    }
}

impl From<ApiError> for ContributeError {
    fn from(err: ApiError) -> Self {
        ContributeError::Api(err)
    }
}

impl From<LocationError> for ContributeError {
    fn from(err: LocationError) -> Self {
        ContributeError::Location(err)
    }
}

/// Checks that don't need a coordinate: a signed-in user and a complete form.
///
/// Run this before consuming the pending pin, so a rejected form keeps it.
pub fn check_draft(session: &Session, draft: &PlaceDraft) -> Result<(), ContributeError> {
    session.require_user()?;
    draft.validate().map_err(ApiError::from)?;
    Ok(())
}

/// Posts `draft` as a new place.
///
/// The place goes at `pinned` when the user dropped a pin, otherwise at the
/// device's current position. Nothing is sent if the session is anonymous or
/// the draft fails validation.
pub async fn submit_new_place(
    api: &dyn PlacesApi,
    location: &dyn LocationProvider,
    session: &Session,
    draft: PlaceDraft,
    pinned: Option<LatLng>,
) -> Result<NewPlace, ContributeError> {
    check_draft(session, &draft)?;
    let user = session.require_user()?.to_string();
    let coordinate = match pinned {
        Some(coordinate) => coordinate,
        None => location.current_position().await?,
    };
    let place = draft
        .into_new_place(coordinate, user)
        .map_err(ApiError::from)?;
    api.create_place(place.clone()).await?;
    info!(name = %place.name, lat = place.lat, lng = place.lng, "place submitted");
    Ok(place)
}

#[cfg(test)]
mod tests {
    use foundation::LatLng;
    use pretty_assertions::assert_eq;
    use runtime::{FixedLocation, LocationError};
    use scene::{Category, PlaceDraft};
    use streaming::{ApiError, Session};

    use super::{ContributeError, check_draft, submit_new_place};
    use crate::testing::StubApi;

    fn draft() -> PlaceDraft {
        PlaceDraft {
            name: "  Tide Pools ".into(),
            description: "Low tide only".into(),
            category: Some(Category::Beach),
            tags: "kids,swim".into(),
        }
    }

    #[tokio::test]
    async fn pin_wins_over_device_position() {
        let api = StubApi::default();
        let pin = LatLng::new(43.1, 16.2);
        let device = FixedLocation::at(LatLng::new(1.0, 1.0));
        let placed = submit_new_place(&api, &device, &Session::signed_in("u1"), draft(), Some(pin))
            .await
            .unwrap();
        assert_eq!((placed.lat, placed.lng), (43.1, 16.2));
        assert_eq!(placed.name, "Tide Pools");
        assert_eq!(placed.created_by, "u1");
        assert_eq!(api.calls(), vec!["create Tide Pools".to_string()]);
    }

    #[tokio::test]
    async fn falls_back_to_device_position() {
        let api = StubApi::default();
        let device = FixedLocation::at(LatLng::new(45.0, 15.0));
        let placed = submit_new_place(&api, &device, &Session::signed_in("u1"), draft(), None)
            .await
            .unwrap();
        assert_eq!((placed.lat, placed.lng), (45.0, 15.0));
    }

    #[tokio::test]
    async fn no_pin_and_no_fix_sends_nothing() {
        let api = StubApi::default();
        let err = submit_new_place(
            &api,
            &FixedLocation::unknown(),
            &Session::signed_in("u1"),
            draft(),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ContributeError::Location(LocationError::Unavailable)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_draft_and_anonymous_session_are_rejected() {
        let api = StubApi::default();
        let device = FixedLocation::at(LatLng::new(45.0, 15.0));
        let mut nameless = draft();
        nameless.name = "   ".into();
        let err = submit_new_place(&api, &device, &Session::signed_in("u1"), nameless, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ContributeError::Api(ApiError::Invalid(_))));

        let err = submit_new_place(&api, &device, &Session::anonymous(), draft(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ContributeError::Api(ApiError::SessionRequired)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn draft_check_needs_no_location() {
        assert!(check_draft(&Session::signed_in("u1"), &draft()).is_ok());
        assert!(matches!(
            check_draft(&Session::anonymous(), &draft()),
            Err(ContributeError::Api(ApiError::SessionRequired))
        ));
        let no_category = PlaceDraft {
            category: None,
            ..draft()
        };
        assert!(matches!(
            check_draft(&Session::signed_in("u1"), &no_category),
            Err(ContributeError::Api(ApiError::Invalid(_)))
        ));
    }
}
