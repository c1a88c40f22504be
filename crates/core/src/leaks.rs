//! Latest posts of a leaks and rumours subreddit.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::FeedError;

const SITE: &str = "https://www.reddit.com";
const USER_AGENT: &str = concat!("release-radar/", env!("CARGO_PKG_VERSION"));

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern is valid")
});

/// A listing entry ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakPost {
    /// Listing identifier.
    pub id: String,
    /// Decoded title.
    pub title: String,
    /// Absolute URL of the discussion.
    pub url: String,
    /// Publication time.
    pub published: DateTime<Utc>,
    /// Posting account, when known.
    pub author: Option<String>,
    /// Subreddit flair such as `Rumour` or `Verified`.
    pub flair: Option<String>,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: RawPost,
}

#[derive(Deserialize)]
struct RawPost {
    id: String,
    title: String,
    permalink: String,
    created_utc: f64,
    #[serde(default)]
    stickied: bool,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    link_flair_text: Option<String>,
}

impl RawPost {
    fn into_post(self) -> Option<LeakPost> {
        let published = Utc.timestamp_opt(self.created_utc as i64, 0).single()?;
        let url = if self.permalink.starts_with("http") {
            self.permalink
        } else {
            format!("{SITE}{}", self.permalink)
        };
        Some(LeakPost {
            id: self.id,
            title: decode_entities(&self.title),
            url,
            published,
            author: self.author,
            flair: self
                .link_flair_text
                .map(|flair| decode_entities(&flair))
                .filter(|flair| !flair.trim().is_empty()),
        })
    }
}

/// Client for the listing JSON endpoint.
#[derive(Debug, Clone)]
pub struct LeaksFeed {
    client: reqwest::Client,
    url: String,
}

impl LeaksFeed {
    /// Build a client for a listing URL such as `https://www.reddit.com/r/<sub>/new.json`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: url.trim().to_string(),
        })
    }

    /// Listing URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the listing, newest first, without pinned posts.
    pub async fn fetch(&self) -> Result<Vec<LeakPost>, FeedError> {
        debug!(url = %self.url, "fetching leaks listing");
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let posts = parse_listing(&body)?;
        info!(count = posts.len(), "leaks listing loaded");
        Ok(posts)
    }
}

/// Decode a listing document, dropping stickied posts.
pub fn parse_listing(body: &str) -> Result<Vec<LeakPost>, FeedError> {
    let listing: Listing = serde_json::from_str(body)
        .map_err(|err| FeedError::Malformed(format!("unexpected listing shape: {err}")))?;
    Ok(listing
        .data
        .children
        .into_iter()
        .map(|child| child.data)
        .filter(|post| !post.stickied)
        .filter_map(RawPost::into_post)
        .collect())
}

/// Replace HTML character references. Unknown names are left untouched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(decimal) = body.strip_prefix('#') {
                decimal.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_string(), |ch| ch.to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "eacute" => 'é',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "kind": "Listing",
        "data": {
            "after": "t3_next",
            "children": [
                { "kind": "t3", "data": {
                    "id": "rules", "title": "Subreddit rules", "stickied": true,
                    "permalink": "/r/GamingLeaksAndRumours/comments/rules/", "created_utc": 1700000000.0
                }},
                { "kind": "t3", "data": {
                    "id": "abc123", "title": "Silksong &amp; Hades &quot;II&quot; dated &#8211; rumour",
                    "permalink": "/r/GamingLeaksAndRumours/comments/abc123/silksong/",
                    "created_utc": 1772323200.0, "author": "insider", "link_flair_text": "Rumour"
                }},
                { "kind": "t3", "data": {
                    "id": "def456", "title": "Plain title",
                    "permalink": "/r/GamingLeaksAndRumours/comments/def456/plain/",
                    "created_utc": 1772300000, "link_flair_text": ""
                }}
            ]
        }
    }"#;

    #[test]
    fn drops_stickied_posts_and_decodes_titles() {
        let posts = parse_listing(LISTING).unwrap();
        assert_eq!(posts.len(), 2);

        let first = &posts[0];
        assert_eq!(first.id, "abc123");
        assert_eq!(first.title, "Silksong & Hades \"II\" dated – rumour");
        assert_eq!(
            first.url,
            "https://www.reddit.com/r/GamingLeaksAndRumours/comments/abc123/silksong/"
        );
        assert_eq!(first.published.timestamp(), 1_772_323_200);
        assert_eq!(first.author.as_deref(), Some("insider"));
        assert_eq!(first.flair.as_deref(), Some("Rumour"));

        assert_eq!(posts[1].author, None);
        assert_eq!(posts[1].flair, None);
    }

    #[test]
    fn malformed_listing_is_reported() {
        assert!(matches!(parse_listing("{\"data\": 3}"), Err(FeedError::Malformed(_))));
        assert!(matches!(parse_listing("<html>"), Err(FeedError::Malformed(_))));
    }

    #[test]
    fn empty_listing_is_fine() {
        assert!(parse_listing(r#"{"data":{"children":[]}}"#).unwrap().is_empty());
    }

    #[test]
    fn entity_decoding() {
        assert_eq!(decode_entities("no entities"), "no entities");
        assert_eq!(decode_entities("&lt;b&gt; &#39;x&#x27;"), "<b> 'x'");
        assert_eq!(decode_entities("&amp;amp;"), "&amp;");
        assert_eq!(decode_entities("&bogus; & alone"), "&bogus; & alone");
    }
}
