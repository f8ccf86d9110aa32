//! Resolver filters and their in-memory translations

use uuid::Uuid;

use super::models::{Comment, GeoPoint, Post, Profile, SavedPost};
use crate::source::RowFilter;

/// Profile discovery filters; absent fields do not constrain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverFilter {
    pub profession: Option<String>,
    pub city: Option<String>,
    /// Profile must list every one of these
    pub specialties: Vec<String>,
}

impl DiscoverFilter {
    fn matches_profile(&self, profile: &Profile) -> bool {
        let same = |want: &Option<String>, have: &Option<String>| match want {
            Some(want) => have.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(want)),
            None => true,
        };
        same(&self.profession, &profile.profession)
            && same(&self.city, &profile.city)
            && self
                .specialties
                .iter()
                .all(|s| profile.specialties.iter().any(|p| p.eq_ignore_ascii_case(s)))
    }
}

impl RowFilter<Profile> for DiscoverFilter {
    fn matches(&self, row: &Profile) -> bool {
        self.matches_profile(row)
    }
}

/// Profiles within `radius_km` of `center`
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFilter {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub profession: Option<String>,
    pub specialties: Vec<String>,
}

impl RowFilter<Profile> for LocationFilter {
    fn matches(&self, row: &Profile) -> bool {
        let attributes = DiscoverFilter {
            profession: self.profession.clone(),
            city: None,
            specialties: self.specialties.clone(),
        };
        attributes.matches_profile(row)
            && row
                .location
                .is_some_and(|at| at.distance_km(&self.center) <= self.radius_km)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub author_id: Option<Uuid>,
}

impl RowFilter<Post> for FeedFilter {
    fn matches(&self, row: &Post) -> bool {
        self.author_id.map_or(true, |author| row.author_id == author)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPostsFilter {
    pub user_id: Uuid,
}

impl RowFilter<SavedPost> for SavedPostsFilter {
    fn matches(&self, row: &SavedPost) -> bool {
        row.user_id == self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentsFilter {
    pub post_id: Uuid,
}

impl RowFilter<Comment> for CommentsFilter {
    fn matches(&self, row: &Comment) -> bool {
        row.post_id == self.post_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DateTime;
    use chrono::{TimeZone, Utc};

    fn profile(profession: &str, city: &str, specialties: &[&str], at: Option<GeoPoint>) -> Profile {
        Profile {
            id: Uuid::from_u128(1),
            user_id: Uuid::from_u128(2),
            profession: Some(profession.to_string()),
            city: Some(city.to_string()),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            verified: true,
            location: at,
            created_at: DateTime(Utc.timestamp_opt(0, 0).unwrap()),
        }
    }

    #[test]
    fn test_discover_filter() {
        let p = profile("Therapist", "Lisbon", &["anxiety", "couples"], None);
        assert!(DiscoverFilter::default().matches(&p));
        assert!(DiscoverFilter {
            profession: Some("therapist".to_string()),
            city: Some("LISBON".to_string()),
            specialties: vec!["couples".to_string()],
        }
        .matches(&p));
        assert!(!DiscoverFilter {
            specialties: vec!["couples".to_string(), "grief".to_string()],
            ..Default::default()
        }
        .matches(&p));
        assert!(!DiscoverFilter {
            city: Some("Porto".to_string()),
            ..Default::default()
        }
        .matches(&p));
    }

    #[test]
    fn test_location_filter() {
        let lisbon = GeoPoint::new(38.7223, -9.1393);
        let porto = GeoPoint::new(41.1579, -8.6291);
        let filter = LocationFilter {
            center: lisbon,
            radius_km: 50.0,
            profession: None,
            specialties: Vec::new(),
        };
        assert!(filter.matches(&profile("x", "Lisbon", &[], Some(lisbon))));
        assert!(!filter.matches(&profile("x", "Porto", &[], Some(porto))));
        assert!(!filter.matches(&profile("x", "Nowhere", &[], None)));
    }
}
