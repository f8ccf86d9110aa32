//! Opaque cursor tokens
//!
//! A cursor is the URL-safe, unpadded base64 encoding of a UTF-8 JSON object
//! `{"id": <string|number>, "createdAt"?: <ISO-8601 string>}`. Clients must
//! treat the token as opaque; the format is kept stable so previously issued
//! cursors keep resuming.

use std::fmt;

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

/// base64url without padding on encode; padded tokens are still accepted.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Unique row identifier carried in a cursor
///
/// Integers order numerically and strings lexicographically. Integer ids
/// sort before string ids.
///
/// Numeric ids must fit in an `i64`. A fractional id or one above
/// `i64::MAX` does not decode, so a cursor carrying it is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CursorId {
    Int(i64),
    Str(String),
}

impl CursorId {
    fn is_blank(&self) -> bool {
        matches!(self, CursorId::Str(s) if s.is_empty())
    }
}

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorId::Int(n) => write!(f, "{}", n),
            CursorId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CursorId {
    fn from(id: i64) -> Self {
        CursorId::Int(id)
    }
}

impl From<String> for CursorId {
    fn from(id: String) -> Self {
        CursorId::Str(id)
    }
}

impl From<&str> for CursorId {
    fn from(id: &str) -> Self {
        CursorId::Str(id.to_string())
    }
}

impl From<Uuid> for CursorId {
    fn from(id: Uuid) -> Self {
        CursorId::Str(id.to_string())
    }
}

/// Decoded contents of a cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    pub id: CursorId,

    /// Secondary ordering key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Additional sort keys, preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CursorPosition {
    pub fn new(id: impl Into<CursorId>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// An empty string id counts as a missing id.
    fn validate(&self) -> crate::Result<()> {
        if self.id.is_blank() {
            return Err(crate::GraphQLError::InvalidCursor("missing id".to_string()));
        }
        Ok(())
    }
}

/// A row that can be addressed by a cursor
///
/// Paginated lists are ordered by `(created_at DESC, id DESC)`. Rows without
/// a timestamp sort after every timestamped row.
pub trait CursorRow {
    fn cursor_id(&self) -> CursorId;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Composite sort key, compared descending
    fn sort_key(&self) -> (Option<DateTime<Utc>>, CursorId) {
        (self.created_at(), self.cursor_id())
    }

    /// Position that resumes immediately after this row
    fn cursor_position(&self) -> CursorPosition {
        CursorPosition {
            id: self.cursor_id(),
            created_at: self.created_at(),
            extra: Map::new(),
        }
    }
}

/// Cursor encoding/decoding
pub struct CursorCodec;

impl CursorCodec {
    /// Encode a position into an opaque token
    ///
    /// Fails only when the position itself is malformed, which means a row
    /// without a usable id reached the builder.
    pub fn encode(position: &CursorPosition) -> crate::Result<String> {
        position
            .validate()
            .map_err(|e| crate::GraphQLError::EncodingFailure(e.to_string()))?;
        let json = serde_json::to_string(position)
            .map_err(|e| crate::GraphQLError::EncodingFailure(e.to_string()))?;
        Ok(BASE64URL.encode(json.as_bytes()))
    }

    /// Strictly decode a token, reporting why it was rejected
    pub fn try_decode(cursor: &str) -> crate::Result<CursorPosition> {
        let bytes = BASE64URL
            .decode(cursor.as_bytes())
            .map_err(|e| crate::GraphQLError::InvalidCursor(e.to_string()))?;
        let json = String::from_utf8(bytes)
            .map_err(|e| crate::GraphQLError::InvalidCursor(e.to_string()))?;
        let position: CursorPosition = serde_json::from_str(&json)
            .map_err(|e| crate::GraphQLError::InvalidCursor(e.to_string()))?;
        position.validate()?;
        Ok(position)
    }

    /// Decode a caller-supplied token
    ///
    /// `None` or an empty token means "first page". A token that fails to
    /// decode also yields `None`, so a stale or tampered cursor restarts
    /// pagination instead of failing the query.
    pub fn decode(cursor: Option<&str>) -> Option<CursorPosition> {
        let cursor = cursor.filter(|c| !c.is_empty())?;
        match Self::try_decode(cursor) {
            Ok(position) => Some(position),
            Err(e) => {
                warn!(error = %e, "Ignoring unusable pagination cursor");
                None
            }
        }
    }
}
