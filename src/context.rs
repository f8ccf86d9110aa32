//! Request context helpers
//!
//! The HTTP layer authenticates the caller and attaches the viewer's user
//! id to the GraphQL request; resolvers read it back from the context.

use async_graphql::{Context, Request};
use uuid::Uuid;

/// Authenticated user behind the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Uuid);

impl Viewer {
    /// Parse the value of an `x-user-id` header
    ///
    /// # Example
    ///
    /// ```rust
    /// use async_graphql::Request;
    /// use social_graphql_helpers::context::{with_viewer, Viewer};
    ///
    /// let viewer = Viewer::from_header_value("67e55044-10b1-426f-9247-bb680e5fe0c8");
    /// assert!(viewer.is_some());
    /// let request = with_viewer(Request::new("{ savedPosts { edges { cursor } } }"), viewer);
    /// # let _ = request;
    /// ```
    pub fn from_header_value(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Viewer)
    }
}

/// Attach the viewer, if any, to a request before execution
pub fn with_viewer(request: Request, viewer: Option<Viewer>) -> Request {
    match viewer {
        Some(viewer) => request.data(viewer),
        None => request,
    }
}

/// Get the viewer's user id from GraphQL context
///
/// # Example
///
/// ```rust,no_run
/// use async_graphql::Context;
/// use social_graphql_helpers::context::viewer_id;
///
/// fn resolver(ctx: &Context<'_>) -> Option<uuid::Uuid> {
///     viewer_id(ctx)
/// }
/// ```
pub fn viewer_id(ctx: &Context<'_>) -> Option<Uuid> {
    ctx.data_opt::<Viewer>().map(|v| v.0)
}

/// Like [`viewer_id`], failing with [`GraphQLError::MissingViewer`](crate::GraphQLError::MissingViewer)
pub fn require_viewer(ctx: &Context<'_>) -> crate::Result<Uuid> {
    viewer_id(ctx).ok_or(crate::GraphQLError::MissingViewer)
}
