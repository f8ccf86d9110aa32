use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use super::filters::{CommentsFilter, FeedFilter, SavedPostsFilter};
use super::models::{Comment, Post, SavedPost};
use super::{page_request, RowSources};
use crate::context::require_viewer;
use crate::pagination::Connection;
use crate::source::paginate;

#[derive(Default)]
pub struct FeedQuery;

#[Object]
impl FeedQuery {
    /// Posts, newest first, optionally from a single author
    async fn feed(
        &self,
        ctx: &Context<'_>,
        author_id: Option<Uuid>,
        cursor: Option<String>,
        limit: Option<i32>,
    ) -> Result<Connection<Post>> {
        let request = page_request(ctx, cursor, limit);
        let sources = ctx.data::<RowSources>()?;
        Ok(paginate(sources.posts.as_ref(), FeedFilter { author_id }, &request).await?)
    }

    /// Posts saved by the viewer, most recently saved first
    async fn saved_posts(
        &self,
        ctx: &Context<'_>,
        cursor: Option<String>,
        limit: Option<i32>,
    ) -> Result<Connection<SavedPost>> {
        let user_id = require_viewer(ctx)?;
        let request = page_request(ctx, cursor, limit);
        let sources = ctx.data::<RowSources>()?;
        Ok(paginate(sources.saved_posts.as_ref(), SavedPostsFilter { user_id }, &request).await?)
    }

    /// Comments on a post, newest first
    async fn comments(
        &self,
        ctx: &Context<'_>,
        post_id: Uuid,
        cursor: Option<String>,
        limit: Option<i32>,
    ) -> Result<Connection<Comment>> {
        let request = page_request(ctx, cursor, limit);
        let sources = ctx.data::<RowSources>()?;
        Ok(paginate(sources.comments.as_ref(), CommentsFilter { post_id }, &request).await?)
    }
}
