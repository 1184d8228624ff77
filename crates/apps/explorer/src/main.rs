use std::sync::Arc;

use clap::Parser;
use explorer::{BrowseMode, Command, ExplorerConfig, Host, MapScreen, UiEvent};
use runtime::LocationProvider;
use scene::{PlaceDraft, PlaceId};
use serde_json::json;
use streaming::{HttpApi, PlacesApi};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ExplorerConfig::parse();
    let api: Arc<dyn PlacesApi> = Arc::new(HttpApi::new(&config.api_url));
    let location: Arc<dyn LocationProvider> = Arc::new(config.location());
    let screen = MapScreen::new(Arc::clone(&api), config.cluster());
    let mut host = Host::new(screen, api, location, config.session());
    info!(api = %config.api_url, "explorer starting");

    host.start_location();
    host.apply(UiEvent::Focus);
    host.run_until_idle().await;

    let command = config.command();
    let output = match &command {
        Command::Browse {
            query,
            category,
            bookmarks,
        } => {
            host.apply(UiEvent::SetQuery(query.clone()));
            host.apply(UiEvent::SetCategory(*category));
            if *bookmarks {
                host.apply(UiEvent::SetBrowseMode(BrowseMode::Bookmarks));
            }
            host.apply(UiEvent::SubmitSearch);
            let screen = host.screen_mut();
            json!({
                "view": screen.view(),
                "camera": screen.drain_camera_commands(),
            })
        }
        Command::Bookmark { place } => {
            let id = PlaceId::new(place.as_str());
            let sent = host.toggle_bookmark(id.clone()).is_ok();
            host.run_until_idle().await;
            json!({
                "place": id,
                "sent": sent,
                "bookmarked": host.screen().bookmarks().contains(&id),
            })
        }
        Command::Reviews { place } => {
            let id = PlaceId::new(place.as_str());
            host.load_reviews(id.clone());
            host.run_until_idle().await;
            json!(host.screen().reviews_for(&id).unwrap_or_default())
        }
        Command::Review {
            place,
            rating,
            text,
        } => {
            let id = PlaceId::new(place.as_str());
            host.submit_review(id.clone(), *rating, text.as_str());
            host.run_until_idle().await;
            json!(host.screen().reviews_for(&id).unwrap_or_default())
        }
        Command::AddPlace {
            name,
            category,
            description,
            tags,
            pin_lat,
            pin_lng,
        } => {
            if let (Some(lat), Some(lng)) = (pin_lat, pin_lng) {
                host.apply(UiEvent::LongPress((*lat, *lng).into()));
            }
            let draft = PlaceDraft {
                name: name.clone(),
                description: description.clone(),
                category: Some(*category),
                tags: tags.clone(),
            };
            let sent = host.add_place(draft).is_ok();
            host.run_until_idle().await;
            json!({ "sent": sent, "places": host.screen().places().len() })
        }
    };

    for notice in host.screen_mut().drain_notices() {
        warn!(kind = ?notice.kind, "{}", notice.message);
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
