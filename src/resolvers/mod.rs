//! Paginated GraphQL resolvers
//!
//! Each resolver owns its filter; cursor handling and page assembly go
//! through [`paginate`](crate::source::paginate) so every list pages the same
//! way. Row sources and [`PaginationConfig`] are schema data, the viewer is
//! request data (see [`with_viewer`](crate::context::with_viewer)).

mod discover;
mod feed;
mod filters;
mod models;

use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, MergedObject, Schema};

use crate::config::PaginationConfig;
use crate::pagination::{PageRequest, PaginationArgs};
use crate::source::RowSource;

pub use discover::DiscoverQuery;
pub use feed::FeedQuery;
pub use filters::{CommentsFilter, DiscoverFilter, FeedFilter, LocationFilter, SavedPostsFilter};
pub use models::{Comment, GeoPoint, Post, Profile, SavedPost};

/// Row-fetch collaborators for every paginated list
#[derive(Clone)]
pub struct RowSources {
    pub profiles: Arc<dyn RowSource<DiscoverFilter, Profile>>,
    pub nearby_profiles: Arc<dyn RowSource<LocationFilter, Profile>>,
    pub posts: Arc<dyn RowSource<FeedFilter, Post>>,
    pub saved_posts: Arc<dyn RowSource<SavedPostsFilter, SavedPost>>,
    pub comments: Arc<dyn RowSource<CommentsFilter, Comment>>,
}

#[derive(MergedObject, Default)]
pub struct QueryRoot(DiscoverQuery, FeedQuery);

pub type SocialSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(sources: RowSources, config: PaginationConfig) -> SocialSchema {
    Schema::build(QueryRoot::default(), EmptyMutation, EmptySubscription)
        .data(sources)
        .data(config.normalized())
        .finish()
}

fn page_request(ctx: &Context<'_>, cursor: Option<String>, limit: Option<i32>) -> PageRequest {
    let config = ctx.data_opt::<PaginationConfig>().copied().unwrap_or_default();
    PaginationArgs::new(cursor, limit).parse(&config)
}
