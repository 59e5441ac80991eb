//! Emby → VOD conversion
//!
//! Pure field mapping, link construction and pagination arithmetic. Nothing
//! here performs I/O.

use crate::models::{EmbyItem, VodClass, VodItem};
use crate::upstream::{Account, AuthSession};

/// Emby runtime ticks (100ns) per minute.
pub const TICKS_PER_MINUTE: i64 = 600_000_000;

/// Catalog source name for playable entries.
pub const PLAY_FROM: &str = "emby";

/// Separator between episodes in a play URL list.
const EPISODE_SEPARATOR: &str = "#";

// == Links ==
/// Builds client-facing URLs into one Emby server.
#[derive(Debug, Clone)]
pub struct Links {
    base_url: String,
    /// Encoded session parameters appended to stream URLs
    session_query: String,
}

impl Links {
    pub fn new(account: &Account, session: &AuthSession) -> Self {
        Self {
            base_url: account.base_url.clone(),
            session_query: session.query_string(),
        }
    }

    /// Poster URL of an item.
    pub fn image(&self, item: &EmbyItem) -> String {
        format!(
            "{}/emby/Items/{}/Images/Primary?maxHeight=375&maxWidth=250&tag={}&quality=90",
            self.base_url,
            urlencoding::encode(&item.id),
            urlencoding::encode(item.primary_image_tag())
        )
    }

    /// Direct stream URL of a video item, authenticated by query parameters.
    pub fn play(&self, item_id: &str) -> String {
        format!(
            "{}/emby/videos/{}/original.mp4?{}",
            self.base_url,
            urlencoding::encode(item_id),
            self.session_query
        )
    }

    /// `#`-joined `"{season}{episode}${url}"` playlist of a series.
    pub fn playlist(&self, episodes: &[EmbyItem]) -> String {
        episodes
            .iter()
            .map(|ep| format!("{}{}${}", ep.season_name, ep.name, self.play(&ep.id)))
            .collect::<Vec<_>>()
            .join(EPISODE_SEPARATOR)
    }
}

// == Mapping ==
/// A library view becomes a catalog category.
pub fn to_vod_class(item: &EmbyItem) -> VodClass {
    VodClass {
        type_id: item.id.clone(),
        type_name: item.name.clone(),
    }
}

/// A series in a category listing.
pub fn to_list_item(links: &Links, type_id: &str, item: &EmbyItem) -> VodItem {
    let total = item.user_data.total_count();

    VodItem {
        vod_id: item.id.clone(),
        type_id: type_id.to_string(),
        vod_name: item.name.clone(),
        vod_sub: item.overview.clone(),
        vod_pic: links.image(item),
        vod_overview: item.overview.clone(),
        vod_blurb: item.overview.clone(),
        vod_year: item.production_year,
        vod_time: item.date_last_content_added.clone(),
        vod_total: total,
        vod_remarks: format!("更新至：{}", total),
        ..VodItem::default()
    }
}

/// A single item with its play URL. For folders the caller replaces the
/// play URL with the episode playlist.
pub fn to_detail_item(links: &Links, item: &EmbyItem) -> VodItem {
    VodItem {
        vod_id: item.id.clone(),
        vod_name: item.name.clone(),
        vod_sub: item.overview.clone(),
        vod_pic: links.image(item),
        vod_overview: item.overview.clone(),
        vod_content: item.overview.clone(),
        vod_year: item.production_year,
        vod_duration: ticks_to_minutes(item.run_time_ticks),
        vod_total: item.user_data.total_count(),
        vod_play_from: PLAY_FROM.to_string(),
        vod_play_url: links.play(&item.id),
        ..VodItem::default()
    }
}

/// Whole minutes in a tick count.
pub fn ticks_to_minutes(ticks: i64) -> i64 {
    ticks / TICKS_PER_MINUTE
}

// == Pagination ==
/// Zero-based index of the first item on `page`.
///
/// `page` is 1-based: page 1 starts at index 0.
pub fn start_index(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}

/// Number of pages needed for `total` items, at least one.
pub fn page_count(total: i64, page_size: u32) -> i64 {
    let size = i64::from(page_size.max(1));
    let total = total.max(0);
    (total / size + i64::from(total % size != 0)).max(1)
}
