//! Paginated node types

use async_graphql::{InputObject, SimpleObject};
use chrono::Utc;
use uuid::Uuid;

use crate::cursor::{CursorId, CursorRow};
use crate::types::DateTime;

/// Geographic coordinate in decimal degrees
#[derive(SimpleObject, InputObject, Debug, Clone, Copy, PartialEq)]
#[graphql(input_name = "LocationInput")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    const EARTH_RADIUS_KM: f64 = 6371.0088;

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance (haversine)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * Self::EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profession: Option<String>,
    pub city: Option<String>,
    pub specialties: Vec<String>,
    pub verified: bool,
    pub location: Option<GeoPoint>,
    pub created_at: DateTime,
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime,
}

/// A post saved by a user; ordered by when it was saved
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct SavedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub saved_at: DateTime,
    pub post: Post,
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime,
}

macro_rules! cursor_row {
    ($ty:ty, $ts:ident) => {
        impl CursorRow for $ty {
            fn cursor_id(&self) -> CursorId {
                CursorId::from(self.id)
            }

            fn created_at(&self) -> Option<chrono::DateTime<Utc>> {
                Some(self.$ts.0)
            }
        }
    };
}

cursor_row!(Profile, created_at);
cursor_row!(Post, created_at);
cursor_row!(SavedPost, saved_at);
cursor_row!(Comment, created_at);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_km() {
        let paris = GeoPoint::new(48.8566, 2.3522);
        let london = GeoPoint::new(51.5074, -0.1278);
        let d = paris.distance_km(&london);
        assert!((d - 343.5).abs() < 2.0, "distance was {}", d);
        assert_eq!(paris.distance_km(&paris), 0.0);
    }
}
