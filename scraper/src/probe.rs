use std::io::Read;
use std::thread;

use anyhow::{anyhow, Context, Result};
use imagesize::ImageType;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::extract::ImageCandidate;

/// How much of an image body the prober reads while looking for header
/// metadata.
pub const PROBE_PREFIX_BYTES: u64 = 256 * 1024;

/// Intrinsic metadata for one probed image. Field names follow the
/// shape the batch is reported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeInfo {
    pub width: usize,
    pub height: usize,
    #[serde(rename = "type")]
    pub format: String,
    pub mime: String,
    #[serde(rename = "wUnits")]
    pub w_units: String,
    #[serde(rename = "hUnits")]
    pub h_units: String,
    pub length: Option<u64>,
    pub url: String,
}

/// An [`ImageCandidate`] whose image metadata has been verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbedImage {
    pub image_src: String,
    pub title: String,
    pub probe: ProbeInfo,
}

/// The start of an image resource, enough to decode header metadata.
#[derive(Debug, Clone)]
pub struct ImagePrefix {
    pub bytes: Vec<u8>,
    pub content_length: Option<u64>,
}

/// Fetches the head of an image resource. The trait is the seam that
/// lets tests substitute canned bytes for live HTTP.
pub trait ImageFetcher {
    fn fetch_prefix(&self, url: &str) -> Result<ImagePrefix>;
}

/// Blocking HTTP fetcher used by the real pipeline.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        HttpFetcher {
            client: Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch_prefix(&self, url: &str) -> Result<ImagePrefix> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to request {}", url))?
            .error_for_status()
            .with_context(|| format!("Image request rejected for {}", url))?;

        let content_length = response.content_length();

        let mut bytes = Vec::new();
        response
            .take(PROBE_PREFIX_BYTES)
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read image header from {}", url))?;

        Ok(ImagePrefix {
            bytes,
            content_length,
        })
    }
}

/// Probe one candidate. Every failure — network, non-image content, a
/// format the decoder does not know — yields `None` rather than an
/// error, so a bad candidate never takes down the batch.
pub fn probe_candidate<F: ImageFetcher>(
    fetcher: &F,
    candidate: &ImageCandidate,
) -> Option<ProbedImage> {
    try_probe(fetcher, candidate).ok()
}

fn try_probe<F: ImageFetcher>(fetcher: &F, candidate: &ImageCandidate) -> Result<ProbedImage> {
    let prefix = fetcher.fetch_prefix(&candidate.image_src)?;

    let size = imagesize::blob_size(&prefix.bytes)
        .map_err(|e| anyhow!("Could not read image dimensions: {}", e))?;
    let kind = imagesize::image_type(&prefix.bytes)
        .map_err(|e| anyhow!("Could not detect image format: {}", e))?;
    let (format, mime) =
        format_and_mime(kind).ok_or_else(|| anyhow!("Unsupported image format"))?;

    Ok(ProbedImage {
        image_src: candidate.image_src.clone(),
        title: candidate.title.clone(),
        probe: ProbeInfo {
            width: size.width,
            height: size.height,
            format: format.to_string(),
            mime: mime.to_string(),
            w_units: "px".to_string(),
            h_units: "px".to_string(),
            length: prefix.content_length,
            url: candidate.image_src.clone(),
        },
    })
}

/// Probe every candidate in parallel, one worker per candidate, and
/// keep the survivors in batch order. A worker that fails or panics
/// drops only its own candidate.
pub fn probe_batch<F>(fetcher: &F, candidates: &[ImageCandidate]) -> Vec<ProbedImage>
where
    F: ImageFetcher + Sync,
{
    thread::scope(|scope| {
        let workers: Vec<_> = candidates
            .iter()
            .map(|candidate| scope.spawn(move || probe_candidate(fetcher, candidate)))
            .collect();

        workers
            .into_iter()
            .filter_map(|worker| worker.join().ok().flatten())
            .collect()
    })
}

/// Map a detected image type to its filename extension and MIME type.
fn format_and_mime(kind: ImageType) -> Option<(&'static str, &'static str)> {
    match kind {
        ImageType::Jpeg => Some(("jpg", "image/jpeg")),
        ImageType::Png => Some(("png", "image/png")),
        ImageType::Gif => Some(("gif", "image/gif")),
        ImageType::Webp => Some(("webp", "image/webp")),
        ImageType::Bmp => Some(("bmp", "image/bmp")),
        ImageType::Tiff => Some(("tiff", "image/tiff")),
        ImageType::Ico => Some(("ico", "image/x-icon")),
        _ => None,
    }
}
