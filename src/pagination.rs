//! Relay-style cursor pagination
//!
//! Resolvers follow an over-fetch protocol: parse the caller's arguments
//! into a [`PageRequest`], fetch `fetch_size()` rows (one more than the
//! limit) strictly after the cursor under `(created_at DESC, id DESC)`, then
//! hand the rows to [`PageRequest::finish`]. The extra row only signals that
//! a next page exists and never reaches the response.

use std::borrow::Cow;

use async_graphql::{Object, OutputType, SimpleObject, TypeName};
use serde::Deserialize;
use tracing::debug;

use crate::boundary::Predicate;
use crate::config::PaginationConfig;
use crate::cursor::{CursorCodec, CursorPosition, CursorRow};

/// Page information
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Edge in a connection
#[derive(Debug, Clone)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

impl<T: OutputType> TypeName for Edge<T> {
    fn type_name() -> Cow<'static, str> {
        format!("{}Edge", <T as OutputType>::type_name()).into()
    }
}

#[Object(name_type)]
impl<T: OutputType> Edge<T> {
    /// Resumes immediately after this node
    async fn cursor(&self) -> &str {
        &self.cursor
    }

    async fn node(&self) -> &T {
        &self.node
    }
}

/// Connection (paginated result)
#[derive(Debug, Clone)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

impl<T: OutputType> TypeName for Connection<T> {
    fn type_name() -> Cow<'static, str> {
        format!("{}Connection", <T as OutputType>::type_name()).into()
    }
}

#[Object(name_type)]
impl<T: OutputType> Connection<T> {
    async fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    async fn page_info(&self) -> &PageInfo {
        &self.page_info
    }
}

impl<T> Connection<T> {
    /// Build a page from an already-trimmed row window
    ///
    /// The flags are passed through as given. An empty window always yields
    /// [`Connection::empty`], whatever the flags say: a page with no rows has
    /// no cursor to continue from.
    pub fn build(rows: Vec<T>, has_next_page: bool, has_previous_page: bool) -> crate::Result<Self>
    where
        T: CursorRow,
    {
        if rows.is_empty() {
            return Ok(Self::empty());
        }

        let edges = rows
            .into_iter()
            .map(|node| {
                let cursor = CursorCodec::encode(&node.cursor_position())?;
                Ok(Edge { cursor, node })
            })
            .collect::<crate::Result<Vec<_>>>()?;

        let start_cursor = edges.first().map(|e| e.cursor.clone());
        let end_cursor = edges.last().map(|e| e.cursor.clone());

        debug!(
            edges = edges.len(),
            has_next_page, has_previous_page, "Built connection page"
        );

        Ok(Self {
            edges,
            page_info: PageInfo {
                has_next_page,
                has_previous_page,
                start_cursor,
                end_cursor,
            },
        })
    }

    /// Create empty connection
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo {
                has_next_page: false,
                has_previous_page: false,
                start_cursor: None,
                end_cursor: None,
            },
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }
}

/// Clamp a caller-supplied page size
///
/// `None`, zero and negative values select `default_limit`; anything else is
/// capped at `max_limit`.
pub fn clamp_limit(requested: Option<i32>, default_limit: usize, max_limit: usize) -> usize {
    match requested {
        Some(n) if n > 0 => (n as usize).min(max_limit),
        _ => default_limit,
    }
}

/// Pagination arguments as supplied on a GraphQL field
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationArgs {
    pub cursor: Option<String>,
    pub limit: Option<i32>,
}

impl PaginationArgs {
    pub fn new(cursor: Option<String>, limit: Option<i32>) -> Self {
        Self { cursor, limit }
    }

    /// Normalize into a bounded request
    ///
    /// `limit` is always at least 1, even for a hand-built config with zero bounds.
    pub fn parse(&self, config: &PaginationConfig) -> PageRequest {
        let config = config.normalized();
        PageRequest {
            limit: clamp_limit(self.limit, config.default_limit, config.max_limit),
            cursor: CursorCodec::decode(self.cursor.as_deref()),
        }
    }

    /// Normalize with the default bounds (10, capped at 50)
    pub fn into_request(self) -> PageRequest {
        self.parse(&PaginationConfig::default())
    }
}

/// Validated query intent
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub limit: usize,
    /// `None` means first page
    pub cursor: Option<CursorPosition>,
}

impl PageRequest {
    /// Number of rows to fetch, including the sentinel
    pub fn fetch_size(&self) -> usize {
        self.limit + 1
    }

    /// Rows the next fetch must be restricted to
    pub fn boundary(&self) -> Option<Predicate> {
        self.cursor.as_ref().map(Predicate::after)
    }

    /// Whether the caller has already moved past the start of the list
    ///
    /// This does not check that a non-empty previous page exists; a stale
    /// cursor pointing at the first row still reports `true`.
    pub fn has_previous_page(&self) -> bool {
        self.cursor.is_some()
    }

    /// Drop the sentinel row, if fetched, and report whether it was there
    pub fn split_window<T>(&self, mut rows: Vec<T>) -> (Vec<T>, bool) {
        let has_next_page = rows.len() > self.limit;
        rows.truncate(self.limit);
        (rows, has_next_page)
    }

    /// Turn an over-fetched window into the page for this request
    pub fn finish<T: CursorRow>(&self, rows: Vec<T>) -> crate::Result<Connection<T>> {
        let (rows, has_next_page) = self.split_window(rows);
        Connection::build(rows, has_next_page, self.has_previous_page())
    }
}
