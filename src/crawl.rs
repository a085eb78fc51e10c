use scraper::Html;

use crate::config::{CrawlConfig, Programme};
use crate::{Movies, PageFetcher, Result, catalogue};

/// Drives a full festival crawl, one programme page at a time.
pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawl every configured programme and return what was found.
    pub async fn run(&self) -> Result<Movies> {
        let mut movies = Movies::default();
        for programme in &self.config.programmes {
            self.crawl_programme(programme, &mut movies).await?;
        }
        Ok(movies)
    }

    async fn crawl_programme(&self, programme: &Programme, movies: &mut Movies) -> Result<()> {
        tracing::info!("<-----Parsing Program: {}----->", programme.url);
        let body = self.fetcher.fetch_text(&programme.url).await?;
        let document = Html::parse_document(&body);

        let before = movies.movies.len();
        catalogue::walk(
            &self.fetcher,
            &self.config,
            &programme.name,
            &document,
            &mut movies.movies,
        )
        .await?;
        tracing::info!("{}: {} films", programme.name, movies.movies.len() - before);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Url;

    use super::*;
    use crate::ScrapeError;
    use crate::fetch::testing::StubFetcher;

    fn config(names: &[&str]) -> CrawlConfig {
        CrawlConfig {
            origin: Url::parse("http://site.test").unwrap(),
            schedule_endpoint: "http://site.test/feed/".to_string(),
            programmes: names
                .iter()
                .map(|name| Programme {
                    name: name.to_string(),
                    url: format!("http://site.test/programmes/{name}"),
                })
                .collect(),
            detail_delay: Duration::ZERO,
            ..CrawlConfig::default()
        }
    }

    #[tokio::test]
    async fn programmes_run_in_order_with_labels() {
        let fetcher = StubFetcher::default()
            .with_page(
                "http://site.test/programmes/masters",
                r#"<h1>Foo</h1><a class="list-item" href="/movies/foo">x</a>"#,
            )
            .with_page(
                "http://site.test/programmes/kids",
                r#"<h1>Bar</h1><a class="list-item" href="/movies/bar">x</a>"#,
            )
            .with_page("http://site.test/movies/foo", "<p>foo</p>")
            .with_page("http://site.test/movies/bar", "<p>bar</p>");

        let crawler = Crawler::new(fetcher, config(&["masters", "kids"]));
        let movies = crawler.run().await.unwrap();

        let summary: Vec<_> = movies
            .movies
            .iter()
            .map(|m| (m.name.as_str(), m.programme.as_str()))
            .collect();
        assert_eq!(summary, [("Foo", "masters"), ("Bar", "kids")]);
        assert_eq!(
            crawler.fetcher().requested(),
            [
                "http://site.test/programmes/masters",
                "http://site.test/movies/foo",
                "http://site.test/programmes/kids",
                "http://site.test/movies/bar",
            ]
        );
    }

    #[tokio::test]
    async fn missing_programme_page_aborts() {
        let crawler = Crawler::new(StubFetcher::default(), config(&["masters"]));
        let err = crawler.run().await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
    }
}
