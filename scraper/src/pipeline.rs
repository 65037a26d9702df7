use anyhow::{Context, Result};

use crate::browser::{launch, open_search_page, scroll_until_loaded, ScrollSettings};
use crate::extract::extract_candidates;
use crate::probe::{probe_batch, HttpFetcher, ProbedImage};

/// Base URL of the image search page.
pub const SEARCH_URL: &str = "https://www.pinterest.com/search/pins/";

/// How many result containers must be loaded before extraction runs.
pub const SCROLL_TARGET: usize = 250;

/// Build the search page URL for a query. The query is interpolated
/// verbatim; the browser's own navigation handles any escaping.
pub fn search_url(query: &str) -> String {
    format!("{}?q={}", SEARCH_URL, query)
}

/// Run the whole scrape: render the search page, scroll a batch of
/// results into the grid, extract candidates, then probe them all in
/// parallel. Candidates whose probe fails are dropped silently; a
/// launch or navigation failure is fatal.
pub fn scrape(query: &str) -> Result<Vec<ProbedImage>> {
    let browser = launch()?;
    let tab = open_search_page(&browser, &search_url(query))?;

    scroll_until_loaded(&tab, &ScrollSettings::default())?;
    let html = tab
        .get_content()
        .context("Failed to capture the rendered search page")?;

    // The renderer is done once the DOM is captured; release it before
    // any probing traffic starts.
    drop(tab);
    drop(browser);

    let candidates = extract_candidates(&html);
    let fetcher = HttpFetcher::new();

    Ok(probe_batch(&fetcher, &candidates))
}
