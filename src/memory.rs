//! In-memory row source

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cursor::CursorRow;
use crate::source::{RowFilter, RowQuery, RowSource};

/// Rows held in memory, served under the keyset protocol
///
/// Used for tests and local development. Rows may be inserted between
/// fetches to simulate concurrent writes.
pub struct MemoryRowSource<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> MemoryRowSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub async fn insert(&self, row: R) {
        self.rows.write().await.push(row);
    }

    pub async fn extend(&self, rows: impl IntoIterator<Item = R>) {
        self.rows.write().await.extend(rows);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<R> Default for MemoryRowSource<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl<F, R> RowSource<F, R> for MemoryRowSource<R>
where
    F: RowFilter<R> + 'static,
    R: CursorRow + Clone + Send + Sync + 'static,
{
    async fn fetch(&self, query: RowQuery<F>) -> crate::Result<Vec<R>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<R> = rows
            .iter()
            .filter(|row| query.filter.matches(row))
            .filter(|row| query.after.as_ref().map_or(true, |p| p.matches(*row)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        matched.truncate(query.limit);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorId;
    use crate::pagination::{Connection, PaginationArgs};
    use crate::source::paginate;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        created_at: DateTime<Utc>,
        even: bool,
    }

    impl CursorRow for Row {
        fn cursor_id(&self) -> CursorId {
            CursorId::Int(self.id)
        }

        fn created_at(&self) -> Option<DateTime<Utc>> {
            Some(self.created_at)
        }
    }

    #[derive(Clone)]
    struct EvenOnly;

    impl RowFilter<Row> for EvenOnly {
        fn matches(&self, row: &Row) -> bool {
            row.even
        }
    }

    fn row(created: i64, id: i64) -> Row {
        Row {
            id,
            created_at: Utc.timestamp_opt(created, 0).unwrap(),
            even: id % 2 == 0,
        }
    }

    fn ids(page: &Connection<Row>) -> Vec<i64> {
        page.nodes().map(|r| r.id).collect()
    }

    async fn walk<F: RowFilter<Row> + Clone + 'static>(
        source: &MemoryRowSource<Row>,
        filter: F,
        limit: i32,
    ) -> Vec<i64> {
        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let request = PaginationArgs::new(cursor, Some(limit)).into_request();
            let page = paginate(source, filter.clone(), &request).await.unwrap();
            seen.extend(ids(&page));
            if !page.page_info.has_next_page {
                return seen;
            }
            cursor = page.page_info.end_cursor;
        }
    }

    fn shared_timestamps() -> Vec<Row> {
        vec![row(9, 3), row(10, 5), row(9, 4), row(8, 1), row(9, 2), row(7, 6)]
    }

    #[tokio::test]
    async fn test_orders_by_created_at_then_id_descending() {
        let source = MemoryRowSource::new(shared_timestamps());
        let request = PaginationArgs::new(None, Some(10)).into_request();
        let page = paginate(&source, (), &request).await.unwrap();
        assert_eq!(ids(&page), vec![5, 4, 3, 2, 1, 6]);
        assert!(!page.page_info.has_next_page);
    }

    #[tokio::test]
    async fn test_walk_is_gap_and_duplicate_free_across_ties() {
        let source = MemoryRowSource::new(shared_timestamps());
        for limit in 1..=6 {
            assert_eq!(walk(&source, (), limit).await, vec![5, 4, 3, 2, 1, 6]);
        }
    }

    #[tokio::test]
    async fn test_filter_applies_before_limit() {
        let source = MemoryRowSource::new(shared_timestamps());
        assert_eq!(walk(&source, EvenOnly, 1).await, vec![4, 2, 6]);
    }

    #[tokio::test]
    async fn test_same_cursor_yields_identical_pages() {
        let source = MemoryRowSource::new(shared_timestamps());
        let first = paginate(&source, (), &PaginationArgs::new(None, Some(2)).into_request())
            .await
            .unwrap();
        let args = PaginationArgs::new(first.page_info.end_cursor.clone(), Some(2));

        let a = paginate(&source, (), &args.clone().into_request()).await.unwrap();
        let b = paginate(&source, (), &args.into_request()).await.unwrap();

        assert_eq!(ids(&a), ids(&b));
        assert_eq!(a.page_info, b.page_info);
    }

    #[tokio::test]
    async fn test_head_insertion_does_not_shift_issued_cursor() {
        let source = MemoryRowSource::new(shared_timestamps());
        let first = paginate(&source, (), &PaginationArgs::new(None, Some(2)).into_request())
            .await
            .unwrap();
        assert_eq!(ids(&first), vec![5, 4]);

        source.insert(row(100, 7)).await;
        source.insert(row(10, 8)).await;
        assert_eq!(source.len().await, 8);

        let rest = {
            let mut seen = ids(&first);
            let mut cursor = first.page_info.end_cursor.clone();
            while let Some(token) = cursor {
                let request = PaginationArgs::new(Some(token), Some(2)).into_request();
                let page = paginate(&source, (), &request).await.unwrap();
                seen.extend(ids(&page));
                cursor = page.page_info.end_cursor.filter(|_| page.page_info.has_next_page);
            }
            seen
        };
        assert_eq!(rest, vec![5, 4, 3, 2, 1, 6]);
    }

    #[tokio::test]
    async fn test_walk_past_untimestamped_rows_is_duplicate_free() {
        #[derive(Debug, Clone)]
        struct Draft {
            id: i64,
            created_at: Option<DateTime<Utc>>,
        }

        impl CursorRow for Draft {
            fn cursor_id(&self) -> CursorId {
                CursorId::Int(self.id)
            }

            fn created_at(&self) -> Option<DateTime<Utc>> {
                self.created_at
            }
        }

        let draft = |id, at: Option<i64>| Draft {
            id,
            created_at: at.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
        };
        let source = MemoryRowSource::new(vec![
            draft(1, Some(10)),
            draft(5, None),
            draft(3, None),
            draft(0, Some(2)),
        ]);

        for limit in 1..=4 {
            let mut seen = Vec::new();
            let mut cursor = None;
            loop {
                let request = PaginationArgs::new(cursor, Some(limit)).into_request();
                let page = paginate(&source, (), &request).await.unwrap();
                seen.extend(page.nodes().map(|d| d.id));
                if !page.page_info.has_next_page {
                    break;
                }
                cursor = page.page_info.end_cursor;
            }
            assert_eq!(seen, vec![1, 0, 5, 3], "limit {}", limit);
        }
    }

    #[tokio::test]
    async fn test_empty_source() {
        let source = MemoryRowSource::<Row>::default();
        assert!(source.is_empty().await);
        let page = paginate(&source, (), &PaginationArgs::default().into_request())
            .await
            .unwrap();
        assert!(page.edges.is_empty());
        assert!(!page.page_info.has_next_page);
    }
}
