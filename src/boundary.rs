//! Keyset boundary predicates
//!
//! Under the `(created_at DESC, id DESC)` order, "strictly after a cursor"
//! is `created_at < c.created_at OR (created_at = c.created_at AND id < c.id)`.
//! A cursor without a timestamp comes from a row sorted after every
//! timestamped row, so only `created_at IS NULL AND id < c.id` follows it.
//! The predicate is kept in logical form so each storage collaborator can
//! translate it into its own query language. [`Predicate::matches`] is the
//! in-memory translation and [`Predicate::to_postgrest`] the PostgREST one.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::cursor::{CursorId, CursorPosition, CursorRow};

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Eq,
}

impl Op {
    fn holds<T: PartialOrd>(self, left: &T, right: &T) -> bool {
        match self {
            Op::Lt => left < right,
            Op::Eq => left == right,
        }
    }

    fn postgrest(self) -> &'static str {
        match self {
            Op::Lt => "lt",
            Op::Eq => "eq",
        }
    }
}

/// Comparison of one sort-key column against a cursor value
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    CreatedAt(Op, DateTime<Utc>),
    CreatedAtIsNull,
    Id(Op, CursorId),
}

/// Logical row predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare(Comparison),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Rows strictly after `cursor`
    ///
    /// A cursor without `createdAt` only admits untimestamped rows with a
    /// smaller `id`.
    pub fn after(cursor: &CursorPosition) -> Self {
        let id_lt = Predicate::Compare(Comparison::Id(Op::Lt, cursor.id.clone()));
        match cursor.created_at {
            Some(created_at) => Predicate::Or(vec![
                Predicate::Compare(Comparison::CreatedAt(Op::Lt, created_at)),
                Predicate::And(vec![
                    Predicate::Compare(Comparison::CreatedAt(Op::Eq, created_at)),
                    id_lt,
                ]),
            ]),
            None => Predicate::And(vec![
                Predicate::Compare(Comparison::CreatedAtIsNull),
                id_lt,
            ]),
        }
    }

    /// Evaluate against a row
    ///
    /// A row without a timestamp is below every timestamp, matching where
    /// [`CursorRow::sort_key`] places it.
    pub fn matches<R: CursorRow + ?Sized>(&self, row: &R) -> bool {
        match self {
            Predicate::Compare(Comparison::CreatedAt(op, value)) => {
                op.holds(&row.created_at(), &Some(*value))
            }
            Predicate::Compare(Comparison::CreatedAtIsNull) => row.created_at().is_none(),
            Predicate::Compare(Comparison::Id(op, value)) => op.holds(&row.cursor_id(), value),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(row)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(row)),
        }
    }

    /// Render as a PostgREST logical filter, e.g.
    /// `or(created_at.lt.2024-01-01T00:00:00Z,and(created_at.eq.2024-01-01T00:00:00Z,id.lt.5))`
    pub fn to_postgrest(&self) -> String {
        match self {
            Predicate::Compare(Comparison::CreatedAt(op, value)) => format!(
                "created_at.{}.{}",
                op.postgrest(),
                value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            Predicate::Compare(Comparison::CreatedAtIsNull) => "created_at.is.null".to_string(),
            Predicate::Compare(Comparison::Id(op, value)) => {
                format!("id.{}.{}", op.postgrest(), postgrest_value(value))
            }
            Predicate::And(parts) => format!("and({})", join_postgrest(parts)),
            Predicate::Or(parts) => format!("or({})", join_postgrest(parts)),
        }
    }
}

fn join_postgrest(parts: &[Predicate]) -> String {
    parts
        .iter()
        .map(Predicate::to_postgrest)
        .collect::<Vec<_>>()
        .join(",")
}

// Values containing PostgREST delimiters must be double-quoted.
fn postgrest_value(id: &CursorId) -> String {
    match id {
        CursorId::Int(n) => n.to_string(),
        CursorId::Str(s) if s.contains([',', '(', ')', '"', '\\']) => {
            format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
        }
        CursorId::Str(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Row {
        id: i64,
        created_at: Option<DateTime<Utc>>,
    }

    impl CursorRow for Row {
        fn cursor_id(&self) -> CursorId {
            CursorId::Int(self.id)
        }

        fn created_at(&self) -> Option<DateTime<Utc>> {
            self.created_at
        }
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn row(created: i64, id: i64) -> Row {
        Row {
            id,
            created_at: Some(ts(created)),
        }
    }

    #[test]
    fn test_boundary_excludes_cursor_row_and_later_ties() {
        let cursor = CursorPosition::new(4).with_created_at(ts(9));
        let after = Predicate::after(&cursor);

        assert!(after.matches(&row(9, 3)));
        assert!(!after.matches(&row(9, 4)));
        assert!(!after.matches(&row(9, 5)));
        assert!(after.matches(&row(8, 100)));
        assert!(!after.matches(&row(10, 1)));
    }

    #[test]
    fn test_boundary_without_created_at_stays_among_untimestamped_rows() {
        let after = Predicate::after(&CursorPosition::new(4));
        assert_eq!(
            after,
            Predicate::And(vec![
                Predicate::Compare(Comparison::CreatedAtIsNull),
                Predicate::Compare(Comparison::Id(Op::Lt, CursorId::Int(4))),
            ])
        );
        let undated = |id| Row {
            id,
            created_at: None,
        };
        assert!(after.matches(&undated(3)));
        assert!(!after.matches(&undated(4)));
        assert!(!after.matches(&undated(5)));
        assert!(!after.matches(&row(100, 3)));
        assert!(!after.matches(&row(0, 1)));
    }

    #[test]
    fn test_untimestamped_rows_follow_timestamped_ones() {
        let after = Predicate::after(&CursorPosition::new(1).with_created_at(ts(0)));
        let undated = Row {
            id: 50,
            created_at: None,
        };
        assert!(after.matches(&undated));
    }

    #[test]
    fn test_to_postgrest() {
        let cursor = CursorPosition::new(5).with_created_at(ts(0));
        assert_eq!(
            Predicate::after(&cursor).to_postgrest(),
            "or(created_at.lt.1970-01-01T00:00:00Z,and(created_at.eq.1970-01-01T00:00:00Z,id.lt.5))"
        );
    }

    #[test]
    fn test_to_postgrest_quotes_reserved_characters() {
        let after = Predicate::after(&CursorPosition::new("a,b"));
        assert_eq!(after.to_postgrest(), "and(created_at.is.null,id.lt.\"a,b\")");

        let plain = Predicate::after(&CursorPosition::new("post-1"));
        assert_eq!(plain.to_postgrest(), "and(created_at.is.null,id.lt.post-1)");
    }
}
