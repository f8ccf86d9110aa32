use async_graphql::{Context, Object, Result};

use super::filters::{DiscoverFilter, LocationFilter};
use super::models::{GeoPoint, Profile};
use super::{page_request, RowSources};
use crate::pagination::Connection;
use crate::source::paginate;
use crate::GraphQLError;

#[derive(Default)]
pub struct DiscoverQuery;

#[Object]
impl DiscoverQuery {
    /// Profiles matching the given filters, newest first
    async fn discover(
        &self,
        ctx: &Context<'_>,
        profession: Option<String>,
        city: Option<String>,
        specialties: Option<Vec<String>>,
        cursor: Option<String>,
        limit: Option<i32>,
    ) -> Result<Connection<Profile>> {
        let request = page_request(ctx, cursor, limit);
        let sources = ctx.data::<RowSources>()?;
        let filter = DiscoverFilter {
            profession,
            city,
            specialties: specialties.unwrap_or_default(),
        };
        Ok(paginate(sources.profiles.as_ref(), filter, &request).await?)
    }

    /// Profiles within `radius` kilometres of `location`, newest first
    async fn search_profiles_by_location(
        &self,
        ctx: &Context<'_>,
        location: GeoPoint,
        radius: f64,
        profession: Option<String>,
        specialties: Option<Vec<String>>,
        cursor: Option<String>,
        limit: Option<i32>,
    ) -> Result<Connection<Profile>> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GraphQLError::InvalidArgument(format!(
                "radius must be a positive number of kilometres, got {}",
                radius
            ))
            .into());
        }
        if !(-90.0..=90.0).contains(&location.latitude)
            || !(-180.0..=180.0).contains(&location.longitude)
        {
            return Err(GraphQLError::InvalidArgument("location is out of range".to_string()).into());
        }

        let request = page_request(ctx, cursor, limit);
        let sources = ctx.data::<RowSources>()?;
        let filter = LocationFilter {
            center: location,
            radius_km: radius,
            profession,
            specialties: specialties.unwrap_or_default(),
        };
        Ok(paginate(sources.nearby_profiles.as_ref(), filter, &request).await?)
    }
}
