use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::{Result, ScrapeError};

pub const DEFAULT_ORIGIN: &str = "http://www.tiff.net";
pub const DEFAULT_SCHEDULE_ENDPOINT: &str = "http://tiff.net//ajax/whats-on-film/";
pub const PROGRAMMES_BASE: &str = "http://www.tiff.net/festivals/thefestival/programmes/";
pub const DEFAULT_OUTPUT: &str = "/tmp/Tiff2014.json";
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_secs(5);

/// Festival programmes, crawled in this order.
pub const PROGRAMME_NAMES: &[&str] = &[
    "future-projections",
    "tiff-docs",
    "discovery",
    "midnight-madness",
    "galapresentations",
    "masters",
    "specialpresentations",
    "mavericks",
    "contemporary-world-cinema",
    "contemporary-world-speakers",
    "wavelengths-all",
    "kids",
    "city-to-city",
    "short-cuts-canada",
    "short-cuts-international",
    "cinematheque",
    "vanguard",
    "next-wave",
    "special-events",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programme {
    pub name: String,
    pub url: String,
}

impl Programme {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: format!("{}{}", PROGRAMMES_BASE, name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Base that catalogue links are resolved against.
    pub origin: Url,
    /// Schedule feed prefix; the object id is appended verbatim.
    pub schedule_endpoint: String,
    pub programmes: Vec<Programme>,
    /// Pause before every detail page request.
    pub detail_delay: Duration,
    pub output: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            schedule_endpoint: DEFAULT_SCHEDULE_ENDPOINT.to_string(),
            programmes: PROGRAMME_NAMES.iter().map(|name| Programme::new(name)).collect(),
            detail_delay: DEFAULT_DETAIL_DELAY,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl CrawlConfig {
    pub fn with_origin(mut self, origin: &str) -> Result<Self> {
        self.origin = Url::parse(origin).map_err(|e| ScrapeError::InvalidUrl {
            url: origin.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self)
    }

    /// Keep only the named programmes, in table order. Unknown names are rejected.
    pub fn select_programmes(mut self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.programmes.iter().any(|p| &p.name == *name))
        {
            return Err(ScrapeError::UnknownProgramme(unknown.clone()));
        }
        self.programmes.retain(|p| names.contains(&p.name));
        Ok(self)
    }
}
