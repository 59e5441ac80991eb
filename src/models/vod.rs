//! VOD catalog API DTOs
//!
//! Field names follow the catalog wire format (`vod_*`, `type_*`).

use serde::Serialize;

/// Response code for a successful catalog call.
pub const CODE_OK: i32 = 1;

/// Message carried by every catalog response.
pub const MSG_LIST: &str = "数据列表";

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VodClass {
    pub type_id: String,
    pub type_name: String,
}

/// A catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VodItem {
    pub vod_id: String,
    pub type_id: String,
    pub vod_name: String,
    pub vod_sub: String,
    pub vod_pic: String,
    pub vod_overview: String,
    pub vod_year: i32,
    pub vod_area: String,
    pub vod_time: String,
    /// Runtime in minutes
    pub vod_duration: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vod_play_from: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vod_play_url: String,
    pub vod_total: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vod_content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vod_blurb: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vod_remarks: String,
}

/// Envelope shared by every catalog response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VodResponse {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(rename = "pagecount", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<VodItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<Vec<VodClass>>,
}

impl VodResponse {
    fn empty() -> Self {
        Self {
            code: CODE_OK,
            msg: MSG_LIST.to_string(),
            page: None,
            page_count: None,
            limit: None,
            total: None,
            list: None,
            class: None,
        }
    }

    /// Category listing (`ac=class`).
    pub fn classes(class: Vec<VodClass>) -> Self {
        Self {
            class: Some(class),
            ..Self::empty()
        }
    }

    /// Detail listing (`ac=detail`).
    pub fn details(list: Vec<VodItem>) -> Self {
        Self {
            list: Some(list),
            ..Self::empty()
        }
    }

    /// One page of a category listing.
    pub fn page(page: u32, page_count: i64, limit: u32, total: i64, list: Vec<VodItem>) -> Self {
        Self {
            page: Some(page.to_string()),
            page_count: Some(page_count),
            limit: Some(limit.to_string()),
            total: Some(total),
            list: Some(list),
            ..Self::empty()
        }
    }

    /// A listing whose only item carries `message` as its name, so catalog
    /// clients display it.
    pub fn message_item(message: impl Into<String>) -> Self {
        Self::details(vec![VodItem {
            vod_name: message.into(),
            ..VodItem::default()
        }])
    }
}
