// Export the scraping pipeline modules
pub mod browser;
pub mod extract;
pub mod pipeline;
pub mod probe;

// Re-export tests for integration testing
#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::browser::{scroll_until_loaded, ScrollSettings, RESULT_ITEM_CLASS};
pub use crate::extract::{
    collapse_whitespace, extract_candidates, rewrite_image_src, ImageCandidate,
};
pub use crate::pipeline::{scrape, search_url, SCROLL_TARGET};
pub use crate::probe::{
    probe_batch, probe_candidate, HttpFetcher, ImageFetcher, ImagePrefix, ProbeInfo, ProbedImage,
};
