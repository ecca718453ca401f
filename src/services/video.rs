//! Video search (YouTube Data API v3).

use crate::errors::{Error, Result};
use serde::Deserialize;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Results returned per search.
pub const MAX_RESULTS: u8 = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    /// Video title
    pub title: String,
    /// Uploading channel
    pub channel: String,
    /// Watch URL
    pub url: String,
}

fn into_videos(response: SearchResponse) -> Vec<Video> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            Some(Video {
                title: super::trivia::decode_entities(&item.snippet.title),
                channel: item.snippet.channel_title,
                url: format!("https://www.youtube.com/watch?v={id}"),
            })
        })
        .collect()
}

/// Searches videos matching `query`.
pub async fn search_videos(client: &reqwest::Client, api_key: &str, query: &str) -> Result<Vec<Video>> {
    let max_results = MAX_RESULTS.to_string();
    let response: SearchResponse = super::get_json(
        client,
        "Video search",
        SEARCH_URL,
        &[
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("q", query),
            ("key", api_key),
        ],
    )
    .await?;

    let videos = into_videos(response);
    if videos.is_empty() {
        return Err(Error::ExternalService {
            service: "Video search",
            message: format!("no videos found for \"{query}\""),
        });
    }
    Ok(videos)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_search_skips_channels() {
        let body = r#"{
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "abc123"},
                 "snippet": {"title": "Rust &amp; Iron", "channelTitle": "Smithy"}},
                {"id": {"kind": "youtube#channel", "channelId": "UC1"},
                 "snippet": {"title": "A channel", "channelTitle": "A channel"}}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let videos = into_videos(response);

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Rust & Iron");
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=abc123");
    }
}
