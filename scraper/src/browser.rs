use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};

/// Class carried by one result container in the search grid.
pub const RESULT_ITEM_CLASS: &str = "Grid__Item";

/// Fixed viewport the search page is rendered at.
pub const WINDOW_SIZE: (u32, u32) = (1200, 800);

/// The CDP default is too short for a script-heavy result page, so
/// navigation waits get an explicit bound.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between scroll polls.
pub const SCROLL_TICK: Duration = Duration::from_millis(100);

/// How the infinite-scroll driver waits for results.
///
/// `timeout: None` means the driver polls forever if the page never
/// yields more than `target` results; callers that want a bounded wait
/// must set one explicitly.
#[derive(Debug, Clone)]
pub struct ScrollSettings {
    pub target: usize,
    pub tick: Duration,
    pub timeout: Option<Duration>,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        ScrollSettings {
            target: crate::pipeline::SCROLL_TARGET,
            tick: SCROLL_TICK,
            timeout: None,
        }
    }
}

/// Launch a headless browser with the fixed search viewport.
pub fn launch() -> Result<Browser> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some(WINDOW_SIZE))
        .build()
        .map_err(|e| anyhow!("Failed to build browser launch options: {}", e))?;

    Browser::new(options).context("Failed to launch headless browser")
}

/// Open a tab on the search page and wait for it to load.
pub fn open_search_page(browser: &Browser, url: &str) -> Result<Arc<Tab>> {
    let tab = browser.new_tab().context("Failed to open browser tab")?;
    tab.set_default_timeout(NAVIGATION_TIMEOUT);

    tab.navigate_to(url)
        .with_context(|| format!("Failed to navigate to {}", url))?;
    tab.wait_until_navigated()
        .context("Search page did not finish loading")?;

    Ok(tab)
}

/// Scroll the page until more than `settings.target` result containers
/// are loaded, returning the count seen on the final poll.
pub fn scroll_until_loaded(tab: &Tab, settings: &ScrollSettings) -> Result<usize> {
    let started = Instant::now();

    loop {
        let count = loaded_result_count(tab)?;
        if count > settings.target {
            return Ok(count);
        }

        if let Some(limit) = settings.timeout {
            if started.elapsed() >= limit {
                bail!(
                    "Gave up scrolling after {:?} with {} of {} results loaded",
                    limit,
                    count,
                    settings.target
                );
            }
        }

        thread::sleep(settings.tick);
    }
}

/// One driver tick: scroll to the bottom of the document and report how
/// many result containers the page currently holds.
fn loaded_result_count(tab: &Tab) -> Result<usize> {
    let script = format!(
        "window.scrollTo(0, document.body.scrollHeight); \
         document.getElementsByClassName('{}').length",
        RESULT_ITEM_CLASS
    );

    let result = tab
        .evaluate(&script, false)
        .context("Failed to run scroll script in page")?;

    let count = result
        .value
        .as_ref()
        .and_then(|value| value.as_u64())
        .ok_or_else(|| anyhow!("Scroll script returned a non-numeric result count"))?;

    Ok(count as usize)
}
