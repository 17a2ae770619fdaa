//! Common types used throughout Solidafy Pager
//!
//! This module contains shared type definitions, type aliases,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Opaque position in a server-ordered listing (the last seen record id)
pub type CursorId = u64;

// ============================================================================
// Pagination Mode
// ============================================================================

/// How fetched pages are combined in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Each fetch replaces the displayed set ("page 1 of N")
    #[default]
    Replace,
    /// Forward fetches are concatenated onto the displayed set (infinite scroll)
    Append,
}

impl std::str::FromStr for PaginationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" | "paged" => Ok(Self::Replace),
            "append" | "infinite" => Ok(Self::Append),
            other => Err(format!("unknown pagination mode: {other}")),
        }
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Navigation requested from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// First page after mount or reset
    Initial,
    /// Follow `next_cursor`
    Next,
    /// Step back to the previous cursor
    Previous,
    /// Re-fetch the first page with the current search term
    Reload,
}

impl Direction {
    /// Directions that always fetch from the first page
    pub fn starts_over(&self) -> bool {
        matches!(self, Self::Initial | Self::Reload)
    }
}

// ============================================================================
// Records
// ============================================================================

/// User record returned by the reference listing endpoint
///
/// The controller is generic over its record type; this is the shape the
/// `users` endpoint serves and what the CLI uses by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, rename = "type")]
    pub user_type: String,
    #[serde(default)]
    pub email: String,
}
