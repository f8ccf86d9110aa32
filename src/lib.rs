//! # social-graphql-helpers
//!
//! GraphQL utilities for the social backend.
//!
//! ## Features
//!
//! - **Cursor Codec** - Opaque base64url cursors over `{id, createdAt}` positions
//! - **Cursor Pagination** - Relay-style connections with over-fetch next-page detection
//! - **Boundary Predicates** - Keyset "strictly after cursor" conditions for storage backends
//! - **Row Sources** - Injected row-fetch collaborators, with an in-memory implementation
//! - **Resolvers** - Paginated discover, location search, feed, saved posts and comments
//!
//! ## Usage
//!
//! ```rust
//! use social_graphql_helpers::pagination::{Connection, PaginationArgs};
//! use social_graphql_helpers::PaginationConfig;
//!
//! let request = PaginationArgs { cursor: None, limit: Some(5) }.parse(&PaginationConfig::default());
//! assert_eq!(request.fetch_size(), 6);
//!
//! let page: Connection<social_graphql_helpers::resolvers::Post> = request.finish(Vec::new()).unwrap();
//! assert!(page.edges.is_empty());
//! ```

pub mod boundary;
pub mod config;
pub mod context;
pub mod cursor;
pub mod memory;
pub mod pagination;
pub mod resolvers;
pub mod source;
pub mod types;

pub use boundary::{Comparison, Op, Predicate};
pub use config::PaginationConfig;
pub use context::{require_viewer, viewer_id, with_viewer, Viewer};
pub use cursor::{CursorCodec, CursorId, CursorPosition, CursorRow};
pub use memory::MemoryRowSource;
pub use pagination::{clamp_limit, Connection, Edge, PageInfo, PageRequest, PaginationArgs};
pub use resolvers::{build_schema, RowSources, SocialSchema};
pub use source::{paginate, RowFilter, RowQuery, RowSource};
pub use types::DateTime;

use thiserror::Error;

/// GraphQL errors
#[derive(Error, Debug)]
pub enum GraphQLError {
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Failed to encode cursor: {0}")]
    EncodingFailure(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Row fetch failed: {0}")]
    RowFetch(String),

    #[error("This field requires an authenticated viewer")]
    MissingViewer,
}

/// Result type for GraphQL operations
pub type Result<T> = std::result::Result<T, GraphQLError>;
