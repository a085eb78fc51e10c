//! Programme (catalogue) pages.
//!
//! A programme page lists films as a loose sequence of headings and links;
//! nothing in the markup groups a title with its link. The walker keeps one
//! movie under construction and treats it as finished the moment it has both
//! a title and a resolved link. The last heading seen before that moment wins,
//! so a link nested inside another film's block can pick up the wrong title.

use ego_tree::NodeRef;
use reqwest::Url;
use scraper::{Html, Node};

use crate::config::CrawlConfig;
use crate::{Movie, PageFetcher, Result, ScrapeError, detail, extract};

/// Field updates contributed by a single node.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CatalogueUpdate<'a> {
    pub name: Option<&'a str>,
    pub link: Option<&'a str>,
}

/// Look at one node of a programme page.
pub fn visit(node: NodeRef<'_, Node>) -> CatalogueUpdate<'_> {
    CatalogueUpdate {
        name: extract::title(node),
        link: extract::list_item_link(node).filter(|href| !href.is_empty()),
    }
}

/// Resolve a catalogue link against the site origin.
pub fn resolve(origin: &Url, href: &str) -> Result<Url> {
    origin.join(href).map_err(|e| ScrapeError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })
}

/// Walk a programme page and append every film it yields to `movies`.
///
/// Each film's detail page (and schedule) is fetched as soon as the film is
/// detected, before the walk moves on.
pub async fn walk<F: PageFetcher + ?Sized>(
    fetcher: &F,
    config: &CrawlConfig,
    programme: &str,
    document: &Html,
    movies: &mut Vec<Movie>,
) -> Result<()> {
    let mut current = Movie::default();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        let update = visit(node);
        if let Some(name) = update.name {
            current.name = name.to_string();
        }
        if let Some(href) = update.link {
            current.url = Some(resolve(&config.origin, href)?);
        }

        if current.is_complete()
            && let Some(url) = current.url.as_ref().map(|u| u.to_string())
        {
            tracing::info!("Parsing details for {} ({})", current.name, url);
            detail::fill_movie(
                fetcher,
                &mut current,
                &url,
                &config.schedule_endpoint,
                config.detail_delay,
            )
            .await?;
            current.programme = programme.to_string();
            tracing::info!("Done with {} ({})", current.name, current.object_id);
            movies.push(std::mem::take(&mut current));
        }

        stack.extend(node.children().rev());
    }

    if !current.name.is_empty() {
        tracing::debug!("{}: trailing title without a link: {}", programme, current.name);
    }
    Ok(())
}
