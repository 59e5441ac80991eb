//! Request DTOs for the bridge API
//!
//! Defines the query string accepted by the catalog endpoint.

use serde::Deserialize;

/// What a catalog request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    /// `ac=class`: category list
    Class,
    /// `ac=detail`: item details with play URLs
    Detail,
    /// anything else: one page of a category listing
    List,
}

/// Query string of `GET /:account`.
///
/// # Fields
/// - `ac`: action selector (`class`, `detail`, or listing when absent)
/// - `t`: category id to list
/// - `pg`: 1-based page number
/// - `wd`: search term
/// - `ids`: comma-separated item ids for `detail`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub ac: Option<String>,
    #[serde(default)]
    pub t: Option<String>,
    #[serde(default)]
    pub pg: Option<String>,
    #[serde(default)]
    pub wd: Option<String>,
    #[serde(default)]
    pub ids: Option<String>,
}

impl CatalogQuery {
    /// Resolves the requested action.
    pub fn action(&self) -> CatalogAction {
        match self.ac.as_deref() {
            Some("class") => CatalogAction::Class,
            Some("detail") => CatalogAction::Detail,
            _ => CatalogAction::List,
        }
    }

    /// Requested page, 1-based. Missing, malformed or non-positive values mean 1.
    pub fn page(&self) -> u32 {
        self.pg
            .as_deref()
            .and_then(|pg| pg.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Category id, empty when listing across all categories.
    pub fn category(&self) -> &str {
        self.t.as_deref().unwrap_or("")
    }

    /// Search term, empty when not searching.
    pub fn search(&self) -> &str {
        self.wd.as_deref().unwrap_or("")
    }

    /// Item ids of a detail request, in request order.
    pub fn detail_ids(&self) -> Vec<&str> {
        self.ids
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.action() == CatalogAction::Detail && self.detail_ids().is_empty() {
            return Some("ids is required for ac=detail".to_string());
        }
        None
    }
}
