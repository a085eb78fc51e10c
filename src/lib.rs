pub mod catalogue;
pub mod config;
pub mod crawl;
pub mod detail;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod schedule;

use std::path::Path;

use reqwest::Url;
use serde::{Serialize, Serializer};

pub use crate::error::{Result, ScrapeError};

/// One film as scraped from a programme page and its detail page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Movie {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ObjectId")]
    pub object_id: String,
    #[serde(rename = "URL", serialize_with = "serialize_url")]
    pub url: Option<Url>,
    #[serde(rename = "Schedule")]
    pub schedule: Vec<ScheduleItem>,
    #[serde(rename = "Pitch")]
    pub pitch: String,
    #[serde(rename = "Programme")]
    pub programme: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl Movie {
    /// True once both the title and the detail address are known.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && self.url.is_some()
    }
}

/// A single screening slot decoded from the schedule feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleItem {
    pub date_str: String,
    #[serde(rename = "Date")]
    pub event_format: String,
    pub time_str: String,
    pub venue: String,
    pub venue_room: String,
    #[serde(rename = "QAndA")]
    pub q_and_a: bool,
    pub premium: bool,
    pub press: bool,
    pub school: bool,
    pub industry: bool,
}

/// Everything collected during a crawl, in discovery order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Movies {
    #[serde(rename = "Movies")]
    pub movies: Vec<Movie>,
}

fn serialize_url<S: Serializer>(
    url: &Option<Url>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match url {
        Some(url) => serializer.serialize_str(url.as_str()),
        None => serializer.serialize_none(),
    }
}

/// Source of page bodies. The crawler only ever needs "GET this, give me the text".
#[async_trait::async_trait]
pub trait PageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Serialize the collected movies and write them to `path` in one go.
pub fn write_json(movies: &Movies, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(movies)?;
    std::fs::write(path, json)?;
    Ok(())
}
