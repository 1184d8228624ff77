use serde::{Deserialize, Serialize};

use crate::place::{Category, Place};

/// Free-text query plus an optional category selector.
///
/// Empty query and `None` category match every place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    pub category: Option<Category>,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    pub fn matches(&self, place: &Place) -> bool {
        matches_query(place, &self.query.to_lowercase()) && self.matches_category(place)
    }

    fn matches_category(&self, place: &Place) -> bool {
        self.category.is_none_or(|c| c == place.category)
    }
}

fn matches_query(place: &Place, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }
    place.name.to_lowercase().contains(query_lower)
        || place.category.label().to_lowercase().contains(query_lower)
}

/// Stable filter: output keeps input order and the input is left untouched.
pub fn apply(places: &[Place], criteria: &FilterCriteria) -> Vec<Place> {
    let query_lower = criteria.query.to_lowercase();
    places
        .iter()
        .filter(|p| matches_query(p, &query_lower) && criteria.matches_category(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FilterCriteria, apply};
    use crate::place::fixtures::place;
    use crate::place::{Category, Place};
    use pretty_assertions::assert_eq;

    fn names(places: &[Place]) -> Vec<&str> {
        places.iter().map(|p| p.name.as_str()).collect()
    }

    fn sample() -> Vec<Place> {
        vec![
            place("1", "Beach Bar", Category::Cafe, 43.50, 16.44),
            place("2", "City Park", Category::Park, 43.51, 16.45),
            place("3", "Barrel Museum", Category::Museum, 43.52, 16.46),
            place("4", "Old Library", Category::Library, 43.53, 16.47),
            place("5", "Sunset Point", Category::Viewpoint, 43.54, 16.48),
        ]
    }

    #[test]
    fn query_matches_name_case_insensitively() {
        let places = vec![
            place("1", "Beach Bar", Category::Cafe, 0.0, 0.0),
            place("2", "City Park", Category::Park, 0.0, 0.0),
        ];
        let got = apply(&places, &FilterCriteria::new("bar", None));
        assert_eq!(names(&got), vec!["Beach Bar"]);

        let got = apply(&places, &FilterCriteria::new("BAR", None));
        assert_eq!(names(&got), vec!["Beach Bar"]);
    }

    #[test]
    fn query_matches_category_label() {
        let got = apply(&sample(), &FilterCriteria::new("park", None));
        assert_eq!(names(&got), vec!["City Park"]);

        let got = apply(&sample(), &FilterCriteria::new("view", None));
        assert_eq!(names(&got), vec!["Sunset Point"]);

        let got = apply(&sample(), &FilterCriteria::new("CAFÉ", None));
        assert_eq!(names(&got), vec!["Beach Bar"]);
    }

    #[test]
    fn empty_criteria_match_all_in_order() {
        let places = sample();
        let got = apply(&places, &FilterCriteria::default());
        assert_eq!(got, places);
    }

    #[test]
    fn category_and_query_combine() {
        let got = apply(&sample(), &FilterCriteria::new("bar", Some(Category::Museum)));
        assert_eq!(names(&got), vec!["Barrel Museum"]);

        let got = apply(&sample(), &FilterCriteria::new("", Some(Category::Library)));
        assert_eq!(names(&got), vec!["Old Library"]);

        let got = apply(&sample(), &FilterCriteria::new("park", Some(Category::Cafe)));
        assert!(got.is_empty());
    }

    #[test]
    fn result_is_exactly_the_matching_subset() {
        let places = sample();
        let before = places.clone();
        let queries = ["", "a", "bar", "PARK", "o", "zzz", " "];
        let categories = [None, Some(Category::Cafe), Some(Category::Museum), Some(Category::Beach)];
        for q in queries {
            for c in categories {
                let criteria = FilterCriteria::new(q, c);
                let got = apply(&places, &criteria);
                let expected: Vec<Place> =
                    places.iter().filter(|p| criteria.matches(p)).cloned().collect();
                assert_eq!(got, expected, "query={q:?} category={c:?}");
            }
        }
        assert_eq!(places, before);
    }
}
