//! Film detail pages: pitch, description and the object id that keys the
//! screening schedule feed.

use std::time::Duration;

use ego_tree::NodeRef;
use scraper::{Html, Node};

use crate::extract::{self, element, first_child_text};
use crate::{Movie, PageFetcher, Result, schedule};

/// Script assignment that carries the film's object id.
pub const OBJECT_ID_MARKER: &str = "var objectId = '";
pub const OBJECT_ID_LEN: usize = 10;

/// What a detail page contributed, collected in document order.
#[derive(Debug, Default, PartialEq)]
pub struct DetailScan {
    pub object_id: Option<String>,
    pub pitch: Option<String>,
    pub description_fragments: Vec<String>,
}

impl DetailScan {
    /// Merge into the movie under construction.
    pub fn apply(self, movie: &mut Movie) {
        if let Some(object_id) = self.object_id {
            movie.object_id = object_id;
        }
        if let Some(pitch) = self.pitch {
            movie.pitch = pitch;
        }
        for fragment in self.description_fragments {
            movie.description.push('\n');
            movie.description.push_str(&fragment);
        }
    }
}

/// Pull the object id out of an inline script body.
pub fn object_id(script: &str) -> Option<&str> {
    let start = script.find(OBJECT_ID_MARKER)? + OBJECT_ID_MARKER.len();
    script.get(start..start + OBJECT_ID_LEN)
}

fn visit(node: NodeRef<'_, Node>, scan: &mut DetailScan) {
    if element(node, "script").is_some()
        && let Some(body) = first_child_text(node)
        && body.contains(OBJECT_ID_MARKER)
    {
        match object_id(body) {
            Some(id) => scan.object_id = Some(id.to_string()),
            None => tracing::warn!("objectId assignment too short to read: {:?}", body.trim()),
        }
    }

    if element(node, "p").is_some() {
        if let Some(pitch) = extract::pitch(node) {
            scan.pitch = Some(pitch.to_string());
        }
        if let Some(fragment) = extract::description(node) {
            scan.description_fragments.push(fragment);
        }
    }
}

/// Walk the whole page, pre-order, and report what it holds.
pub fn scan(document: &Html) -> DetailScan {
    let mut scan = DetailScan::default();
    for node in document.tree.root().descendants() {
        visit(node, &mut scan);
    }
    scan
}

/// Fetch a film's detail page and its schedule, filling in `movie`.
///
/// Waits `delay` before the page request; the site does not tolerate
/// back-to-back hits.
pub async fn fill_movie<F: PageFetcher + ?Sized>(
    fetcher: &F,
    movie: &mut Movie,
    url: &str,
    schedule_endpoint: &str,
    delay: Duration,
) -> Result<()> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let body = fetcher.fetch_text(url).await?;
    let found = scan(&Html::parse_document(&body));
    let object_id = found.object_id.clone();
    found.apply(movie);

    if let Some(object_id) = object_id {
        movie.schedule = schedule::fetch_schedule(fetcher, schedule_endpoint, &object_id).await?;
    }
    Ok(())
}
