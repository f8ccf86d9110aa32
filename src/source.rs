//! Row-fetch collaborators
//!
//! Storage access is injected through [`RowSource`] rather than reached
//! through a global client, so every paginated resolver can run against a
//! real backend or against [`MemoryRowSource`](crate::memory::MemoryRowSource).

use async_trait::async_trait;
use tracing::debug;

use crate::boundary::Predicate;
use crate::cursor::CursorRow;
use crate::pagination::{Connection, PageRequest};

/// One bounded, ordered row query
#[derive(Debug, Clone)]
pub struct RowQuery<F> {
    /// Resolver-specific filter predicates
    pub filter: F,
    /// Keyset boundary; `None` starts from the head of the list
    pub after: Option<Predicate>,
    /// Maximum number of rows to return
    pub limit: usize,
}

/// Source of rows for one paginated list
///
/// Implementations return rows matching `filter` and `after`, ordered by
/// `(created_at DESC, id DESC)`, at most `limit` of them. Failures are
/// reported as [`GraphQLError::RowFetch`](crate::GraphQLError::RowFetch).
#[async_trait]
pub trait RowSource<F, R>: Send + Sync
where
    F: Send + Sync + 'static,
    R: Send + 'static,
{
    async fn fetch(&self, query: RowQuery<F>) -> crate::Result<Vec<R>>;
}

/// In-memory translation of a resolver filter
pub trait RowFilter<R>: Send + Sync {
    fn matches(&self, row: &R) -> bool;
}

/// No filtering
impl<R> RowFilter<R> for () {
    fn matches(&self, _row: &R) -> bool {
        true
    }
}

/// Fetch and assemble one page
///
/// Requests `limit + 1` rows strictly after the cursor and turns the window
/// into a [`Connection`]. A fetch error is returned as-is and no page is built.
pub async fn paginate<S, F, R>(
    source: &S,
    filter: F,
    request: &PageRequest,
) -> crate::Result<Connection<R>>
where
    S: RowSource<F, R> + ?Sized,
    F: Send + Sync + 'static,
    R: CursorRow + Send + 'static,
{
    let query = RowQuery {
        filter,
        after: request.boundary(),
        limit: request.fetch_size(),
    };
    debug!(
        limit = request.limit,
        has_cursor = request.cursor.is_some(),
        "Fetching page rows"
    );
    let rows = source.fetch(query).await?;
    request.finish(rows)
}
