//! Closed data model for places, reviews and the contribution payloads.
//!
//! Every inbound record is validated at deserialization time: a payload that
//! does not fit the model fails to decode instead of leaking partial values.

use std::fmt;
use std::str::FromStr;

use foundation::LatLng;
use serde::{Deserialize, Serialize};

/// Opaque, backend-assigned place identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Beach,
    #[serde(rename = "Café", alias = "Cafe")]
    Cafe,
    Park,
    Viewpoint,
    Restaurant,
    #[serde(rename = "Art Gallery")]
    ArtGallery,
    Museum,
    Theater,
    Market,
    Library,
    Plaza,
}

impl Category {
    /// Chip order for the category selector.
    pub const ALL: [Category; 11] = [
        Category::Beach,
        Category::Cafe,
        Category::Park,
        Category::Viewpoint,
        Category::Restaurant,
        Category::ArtGallery,
        Category::Museum,
        Category::Theater,
        Category::Market,
        Category::Library,
        Category::Plaza,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Beach => "Beach",
            Category::Cafe => "Café",
            Category::Park => "Park",
            Category::Viewpoint => "Viewpoint",
            Category::Restaurant => "Restaurant",
            Category::ArtGallery => "Art Gallery",
            Category::Museum => "Museum",
            Category::Theater => "Theater",
            Category::Market => "Market",
            Category::Library => "Library",
            Category::Plaza => "Plaza",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive match on the label; unaccented "Cafe" is accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("cafe") {
            return Ok(Category::Cafe);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Client-side validation failures for inbound records and outbound drafts.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingField(&'static str),
    InvalidCoordinate { lat: f64, lng: f64 },
    RatingOutOfRange(u8),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "{field} is required"),
            ValidationError::InvalidCoordinate { lat, lng } => {
                write!(f, "coordinate out of range: lat={lat} lng={lng}")
            }
            ValidationError::RatingOutOfRange(r) => {
                write!(f, "rating must be between 1 and 5, got {r}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Geotagged point of interest, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PlaceRecord")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub category: Category,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Place {
    pub fn coordinate(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Average rating when the backend aggregated one, else the seed rating, else 0.
    pub fn display_rating(&self) -> f64 {
        self.avg_rating.or(self.rating).unwrap_or(0.0)
    }

    pub fn review_count(&self) -> u32 {
        self.rating_count.unwrap_or(0)
    }
}

/// Wire shape of a place before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceRecord {
    id: PlaceId,
    name: String,
    category: Category,
    lat: f64,
    lng: f64,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    avg_rating: Option<f64>,
    #[serde(default)]
    rating_count: Option<u32>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<PlaceRecord> for Place {
    type Error = ValidationError;

    fn try_from(r: PlaceRecord) -> Result<Self, Self::Error> {
        if r.id.as_str().is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if r.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if !LatLng::new(r.lat, r.lng).is_valid() {
            return Err(ValidationError::InvalidCoordinate {
                lat: r.lat,
                lng: r.lng,
            });
        }
        Ok(Place {
            id: r.id,
            name: r.name,
            category: r.category,
            lat: r.lat,
            lng: r.lng,
            rating: r.rating,
            avg_rating: r.avg_rating,
            rating_count: r.rating_count,
            image_url: r.image_url,
            images: r.images.unwrap_or_default(),
            description: r.description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    pub created_at: String,
    pub user: ReviewAuthor,
}

/// `POST /reviews` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub place_id: PlaceId,
    pub rating: u8,
    pub text: String,
    pub user_id: String,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        if self.user_id.is_empty() {
            return Err(ValidationError::MissingField("userId"));
        }
        Ok(())
    }
}

/// `POST /places` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub tags: String,
    pub lat: f64,
    pub lng: f64,
    pub created_by: String,
}

/// User-entered fields of the "add place" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceDraft {
    pub name: String,
    pub description: String,
    pub category: Option<Category>,
    pub tags: String,
}

impl PlaceDraft {
    /// Form checks that do not depend on where the place goes.
    pub fn validate(&self) -> Result<Category, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        self.category.ok_or(ValidationError::MissingField("category"))
    }

    /// Validates the form and binds it to a coordinate and author.
    pub fn into_new_place(
        self,
        coordinate: LatLng,
        created_by: impl Into<String>,
    ) -> Result<NewPlace, ValidationError> {
        let category = self.validate()?;
        let name = self.name.trim().to_string();
        if !coordinate.is_valid() {
            return Err(ValidationError::InvalidCoordinate {
                lat: coordinate.lat,
                lng: coordinate.lng,
            });
        }
        Ok(NewPlace {
            name,
            description: self.description,
            category,
            tags: self.tags,
            lat: coordinate.lat,
            lng: coordinate.lng,
            created_by: created_by.into(),
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Category, Place, PlaceId};

    pub fn place(id: &str, name: &str, category: Category, lat: f64, lng: f64) -> Place {
        Place {
            id: PlaceId::new(id),
            name: name.to_string(),
            category,
            lat,
            lng,
            rating: None,
            avg_rating: None,
            rating_count: None,
            image_url: None,
            images: Vec::new(),
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, NewReview, Place, PlaceDraft, PlaceId, ValidationError};
    use foundation::LatLng;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_backend_place_payload() {
        let raw = json!({
            "id": "p1",
            "name": "Hidden Beach",
            "category": "Beach",
            "lat": 43.5,
            "lng": 16.4,
            "rating": 4.5,
            "imageUrl": "http://img/1.jpg",
            "description": null
        });
        let place: Place = serde_json::from_value(raw).unwrap();
        assert_eq!(place.id, PlaceId::new("p1"));
        assert_eq!(place.category, Category::Beach);
        assert_eq!(place.image_url.as_deref(), Some("http://img/1.jpg"));
        assert_eq!(place.description, None);
        assert!(place.images.is_empty());
        assert_eq!(place.coordinate(), LatLng::new(43.5, 16.4));
    }

    #[test]
    fn cafe_is_written_accented_and_read_either_way() {
        let raw = json!({"id": "c", "name": "Kava", "category": "Cafe", "lat": 0.0, "lng": 0.0});
        let place: Place = serde_json::from_value(raw).unwrap();
        assert_eq!(place.category, Category::Cafe);
        assert_eq!(serde_json::to_value(place).unwrap()["category"], "Café");
        assert_eq!(Category::Cafe.label(), "Café");
        assert_eq!("café".parse::<Category>(), Ok(Category::Cafe));
        assert_eq!("Cafe".parse::<Category>(), Ok(Category::Cafe));
        assert_eq!("art gallery".parse::<Category>(), Ok(Category::ArtGallery));
        assert!("Zoo".parse::<Category>().is_err());
    }

    #[test]
    fn rejects_records_outside_the_model() {
        let unknown = json!({"id": "x", "name": "X", "category": "Zoo", "lat": 0.0, "lng": 0.0});
        assert!(serde_json::from_value::<Place>(unknown).is_err());

        let bad_lat = json!({"id": "x", "name": "X", "category": "Park", "lat": 91.0, "lng": 0.0});
        assert!(serde_json::from_value::<Place>(bad_lat).is_err());

        let no_name = json!({"id": "x", "name": " ", "category": "Park", "lat": 0.0, "lng": 0.0});
        assert!(serde_json::from_value::<Place>(no_name).is_err());

        let missing_lng = json!({"id": "x", "name": "X", "category": "Park", "lat": 0.0});
        assert!(serde_json::from_value::<Place>(missing_lng).is_err());
    }

    #[test]
    fn display_rating_prefers_average() {
        let mut p = super::fixtures::place("p", "P", Category::Park, 0.0, 0.0);
        assert_eq!(p.display_rating(), 0.0);
        p.rating = Some(3.0);
        assert_eq!(p.display_rating(), 3.0);
        p.avg_rating = Some(4.2);
        p.rating_count = Some(7);
        assert_eq!(p.display_rating(), 4.2);
        assert_eq!(p.review_count(), 7);
    }

    #[test]
    fn serializes_camel_case_and_skips_empty_fields() {
        let mut p = super::fixtures::place("p", "P", Category::ArtGallery, 1.0, 2.0);
        p.image_url = Some("u".into());
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "id": "p", "name": "P", "category": "Art Gallery",
                "lat": 1.0, "lng": 2.0, "imageUrl": "u"
            })
        );
    }

    #[test]
    fn draft_requires_name_and_category() {
        let coord = LatLng::new(45.0, 15.0);
        let err = PlaceDraft::default().into_new_place(coord, "u1").unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));
        assert_eq!(PlaceDraft::default().validate(), Err(ValidationError::MissingField("name")));

        let draft = PlaceDraft {
            name: "Spot".into(),
            ..PlaceDraft::default()
        };
        let err = draft.into_new_place(coord, "u1").unwrap_err();
        assert_eq!(err, ValidationError::MissingField("category"));

        let draft = PlaceDraft {
            name: " Spot ".into(),
            category: Some(Category::Viewpoint),
            tags: "sunset, quiet".into(),
            ..PlaceDraft::default()
        };
        let new_place = draft.into_new_place(coord, "u1").unwrap();
        assert_eq!(new_place.name, "Spot");
        let body = serde_json::to_value(&new_place).unwrap();
        assert_eq!(body["createdBy"], "u1");
        assert_eq!(body["category"], "Viewpoint");
        assert_eq!(body["lat"], 45.0);
    }

    #[test]
    fn review_rating_must_be_one_to_five() {
        let mut review = NewReview {
            place_id: PlaceId::new("p"),
            rating: 0,
            text: String::new(),
            user_id: "u".into(),
        };
        assert_eq!(review.validate(), Err(ValidationError::RatingOutOfRange(0)));
        review.rating = 6;
        assert!(review.validate().is_err());
        review.rating = 5;
        assert_eq!(review.validate(), Ok(()));
        let body = serde_json::to_value(&review).unwrap();
        assert_eq!(body["placeId"], "p");
    }
}
