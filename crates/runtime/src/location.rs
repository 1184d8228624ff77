use foundation::LatLng;
use futures_util::future::BoxFuture;
use futures_util::stream::{self, BoxStream, StreamExt};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// No fix yet, or the device could not produce one.
    Unavailable,
    PermissionDenied,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Unavailable => write!(f, "location not available yet"),
            LocationError::PermissionDenied => write!(f, "permission to access location was denied"),
        }
    }
}

impl std::error::Error for LocationError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Device location collaborator.
pub trait LocationProvider: Send + Sync {
    fn request_foreground_permission(&self) -> BoxFuture<'_, Permission>;

    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, LocationError>>;

    /// Live position updates. Ends when the provider stops tracking.
    fn watch_position(&self) -> BoxStream<'static, LatLng>;
}

/// Provider pinned to a configured position, or to none at all.
#[derive(Debug, Clone, Default)]
pub struct FixedLocation {
    position: Option<LatLng>,
    permission: Option<Permission>,
}

impl FixedLocation {
    pub fn at(position: LatLng) -> Self {
        Self {
            position: Some(position),
            permission: Some(Permission::Granted),
        }
    }

    /// Grants permission but never produces a fix.
    pub fn unknown() -> Self {
        Self {
            position: None,
            permission: Some(Permission::Granted),
        }
    }

    pub fn denied() -> Self {
        Self {
            position: None,
            permission: Some(Permission::Denied),
        }
    }

    fn permission(&self) -> Permission {
        self.permission.unwrap_or(Permission::Denied)
    }
}

impl LocationProvider for FixedLocation {
    fn request_foreground_permission(&self) -> BoxFuture<'_, Permission> {
        let permission = self.permission();
        Box::pin(async move { permission })
    }

    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, LocationError>> {
        let result = match self.permission() {
            Permission::Denied => Err(LocationError::PermissionDenied),
            Permission::Granted => self.position.ok_or(LocationError::Unavailable),
        };
        Box::pin(async move { result })
    }

    fn watch_position(&self) -> BoxStream<'static, LatLng> {
        match (self.permission(), self.position) {
            (Permission::Granted, Some(p)) => stream::iter([p]).boxed(),
            _ => stream::empty().boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedLocation, LocationError, LocationProvider, Permission};
    use foundation::LatLng;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn fixed_position_is_reported_once_granted() {
        let p = LatLng::new(45.8, 15.9);
        let loc = FixedLocation::at(p);
        assert_eq!(loc.request_foreground_permission().await, Permission::Granted);
        assert_eq!(loc.current_position().await, Ok(p));
        let seen: Vec<LatLng> = loc.watch_position().collect().await;
        assert_eq!(seen, vec![p]);
    }

    #[tokio::test]
    async fn denied_provider_yields_nothing() {
        let loc = FixedLocation::denied();
        assert_eq!(loc.request_foreground_permission().await, Permission::Denied);
        assert_eq!(loc.current_position().await, Err(LocationError::PermissionDenied));
        assert_eq!(loc.watch_position().count().await, 0);

        let unknown = FixedLocation::unknown();
        assert_eq!(unknown.current_position().await, Err(LocationError::Unavailable));
    }
}
