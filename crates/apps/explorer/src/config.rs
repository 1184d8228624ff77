use clap::{Parser, Subcommand};
use foundation::LatLng;
use runtime::FixedLocation;
use scene::{Category, ClusterConfig, DEFAULT_CLUSTER_MAX_ZOOM, DEFAULT_CLUSTER_RADIUS_PX};
use streaming::Session;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless place explorer for the map screen")]
pub struct ExplorerConfig {
    /// Places backend base URL
    #[arg(long, env = "PLACES_API_URL", default_value = "http://127.0.0.1:3002")]
    pub api_url: String,

    /// Signed-in user id; bookmarks, reviews and new places need one
    #[arg(long, env = "PLACES_USER_ID")]
    pub user_id: Option<String>,

    /// Cluster radius in screen pixels
    #[arg(long, env = "PLACES_CLUSTER_RADIUS", default_value_t = DEFAULT_CLUSTER_RADIUS_PX)]
    pub cluster_radius: u32,

    /// Highest zoom at which points are still clustered
    #[arg(long, env = "PLACES_CLUSTER_MAX_ZOOM", default_value_t = DEFAULT_CLUSTER_MAX_ZOOM)]
    pub cluster_max_zoom: u8,

    /// Simulated device latitude
    #[arg(long, env = "PLACES_DEVICE_LAT", allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Simulated device longitude
    #[arg(long, env = "PLACES_DEVICE_LNG", allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Simulate a denied location permission
    #[arg(long, env = "PLACES_DENY_LOCATION", conflicts_with_all = ["lat", "lng"])]
    pub deny_location: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load places, apply a search and print the resulting view
    Browse {
        /// Free-text query matched against name and category
        #[arg(long, default_value = "")]
        query: String,

        /// Category filter (e.g. "Beach", "Café", "Art Gallery")
        #[arg(long)]
        category: Option<Category>,

        /// List bookmarked places instead of search results
        #[arg(long)]
        bookmarks: bool,
    },

    /// Toggle the bookmark on a place
    Bookmark {
        #[arg(long)]
        place: String,
    },

    /// List reviews of a place
    Reviews {
        #[arg(long)]
        place: String,
    },

    /// Post a review
    Review {
        #[arg(long)]
        place: String,

        /// Star rating, 1..=5
        #[arg(long)]
        rating: u8,

        #[arg(long, default_value = "")]
        text: String,
    },

    /// Contribute a new place at a pin, or at the device position
    AddPlace {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: Category,

        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,

        /// Pin latitude; the device position is used when omitted
        #[arg(long, allow_hyphen_values = true, requires = "pin_lng")]
        pin_lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "pin_lat")]
        pin_lng: Option<f64>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Browse {
            query: String::new(),
            category: None,
            bookmarks: false,
        }
    }
}

impl ExplorerConfig {
    pub fn location(&self) -> FixedLocation {
        if self.deny_location {
            return FixedLocation::denied();
        }
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => FixedLocation::at(LatLng::new(lat, lng)),
            _ => FixedLocation::unknown(),
        }
    }

    pub fn session(&self) -> Session {
        match self.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Session::signed_in(id),
            _ => Session::anonymous(),
        }
    }

    pub fn cluster(&self) -> ClusterConfig {
        ClusterConfig {
            radius: self.cluster_radius,
            max_zoom: self.cluster_max_zoom,
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use scene::Category;

    use super::{Command, ExplorerConfig};

    #[test]
    fn defaults() {
        let cfg = ExplorerConfig::try_parse_from(["explorer", "--api-url", "http://x"]).unwrap();
        assert_eq!(cfg.api_url, "http://x");
        assert_eq!(cfg.cluster().radius, 50);
        assert_eq!(cfg.cluster().max_zoom, 14);
        assert_eq!(cfg.session().user_id(), None);
        assert_eq!(cfg.command(), Command::default());
    }

    #[test]
    fn browse_accepts_category_labels_and_negative_coordinates() {
        let cfg = ExplorerConfig::try_parse_from([
            "explorer",
            "--api-url",
            "http://x",
            "--user-id",
            "u1",
            "--lat",
            "-33.9",
            "--lng",
            "-70.6",
            "browse",
            "--query",
            "bar",
            "--category",
            "Café",
        ])
        .unwrap();
        assert_eq!(cfg.session().user_id(), Some("u1"));
        assert_eq!((cfg.lat, cfg.lng), (Some(-33.9), Some(-70.6)));
        assert_eq!(
            cfg.command(),
            Command::Browse {
                query: "bar".into(),
                category: Some(Category::Cafe),
                bookmarks: false
            }
        );
    }

    #[test]
    fn cluster_settings_come_from_flags() {
        let cfg = ExplorerConfig::try_parse_from([
            "explorer",
            "--api-url",
            "http://x",
            "--cluster-radius",
            "80",
            "--cluster-max-zoom",
            "12",
        ])
        .unwrap();
        assert_eq!(cfg.cluster().radius, 80);
        assert_eq!(cfg.cluster().max_zoom, 12);
    }

    #[test]
    fn every_setting_has_an_env_var() {
        use clap::CommandFactory;

        let cmd = <ExplorerConfig as CommandFactory>::command();
        let env_of = |id: &str| {
            cmd.get_arguments()
                .find(|a| a.get_id() == id)
                .and_then(|a| a.get_env())
                .map(|v| v.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("api_url").as_deref(), Some("PLACES_API_URL"));
        assert_eq!(env_of("user_id").as_deref(), Some("PLACES_USER_ID"));
        assert_eq!(env_of("cluster_radius").as_deref(), Some("PLACES_CLUSTER_RADIUS"));
        assert_eq!(env_of("cluster_max_zoom").as_deref(), Some("PLACES_CLUSTER_MAX_ZOOM"));
        assert_eq!(env_of("lat").as_deref(), Some("PLACES_DEVICE_LAT"));
        assert_eq!(env_of("deny_location").as_deref(), Some("PLACES_DENY_LOCATION"));
    }

    #[test]
    fn rejects_unknown_category() {
        let err = ExplorerConfig::try_parse_from([
            "explorer", "--api-url", "http://x", "browse", "--category", "Casino",
        ]);
        assert!(err.is_err());
    }
}
