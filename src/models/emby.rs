//! Emby API DTOs
//!
//! Only the fields the bridge reads are declared; everything else in Emby's
//! payloads is ignored. Missing fields fall back to their defaults.

use std::collections::HashMap;

use serde::Deserialize;

/// A library item (view, series, season, episode or movie).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmbyItem {
    pub name: String,
    pub series_name: String,
    pub season_name: String,
    pub id: String,
    pub overview: String,
    /// Runtime in 100ns ticks
    pub run_time_ticks: i64,
    pub production_year: i32,
    pub is_folder: bool,
    #[serde(rename = "Type")]
    pub item_type: String,
    pub image_tags: HashMap<String, String>,
    pub date_last_content_added: String,
    pub user_data: EmbyUserData,
}

impl EmbyItem {
    /// Tag of the primary image, empty when the item has none.
    pub fn primary_image_tag(&self) -> &str {
        self.image_tags.get("Primary").map(String::as_str).unwrap_or("")
    }
}

/// Per-user playback counters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmbyUserData {
    pub play_count: i64,
    pub unplayed_item_count: i64,
}

impl EmbyUserData {
    /// Watched plus unwatched children, i.e. the episode count of a series.
    pub fn total_count(&self) -> i64 {
        self.play_count + self.unplayed_item_count
    }
}

/// Paged item query result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmbyItemsResponse {
    pub items: Vec<EmbyItem>,
    pub total_record_count: i64,
}

/// Successful `authenticatebyname` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmbyAuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<EmbyUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmbyUser {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_deserialize() {
        let json = r#"{
            "Name": "Pilot",
            "SeasonName": "Season 1",
            "Id": "42",
            "RunTimeTicks": 36000000000,
            "IsFolder": false,
            "Type": "Episode",
            "ImageTags": {"Primary": "abc"},
            "UserData": {"PlayCount": 2, "UnplayedItemCount": 3},
            "SomethingElse": [1, 2, 3]
        }"#;
        let item: EmbyItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.name, "Pilot");
        assert_eq!(item.item_type, "Episode");
        assert_eq!(item.primary_image_tag(), "abc");
        assert_eq!(item.user_data.total_count(), 5);
        assert!(item.overview.is_empty());
    }

    #[test]
    fn test_auth_response_without_user() {
        let auth: EmbyAuthResponse = serde_json::from_str(r#"{"AccessToken":"tok"}"#).unwrap();
        assert_eq!(auth.access_token, "tok");
        assert!(auth.user.is_none());
    }

    #[test]
    fn test_items_response_defaults() {
        let resp: EmbyItemsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.items.is_empty());
        assert_eq!(resp.total_record_count, 0);
    }
}
