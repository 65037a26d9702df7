use std::time::Duration;

use anyhow::Result;

use crate::browser::{launch, scroll_until_loaded, ScrollSettings};

// A page that grows three result containers every 50ms, like a search
// grid streaming results in.
const GROWING_GRID: &str = "data:text/html,<html><body><script>setInterval(function(){for(var i=0;i<3;i++){var d=document.createElement('div');d.className='Grid__Item';document.body.appendChild(d);}},50);</script></body></html>";

const EMPTY_PAGE: &str = "data:text/html,<html><body></body></html>";

#[test]
#[ignore = "launches a local Chrome"]
fn test_scroll_resolves_once_count_exceeds_target() -> Result<()> {
    let browser = launch()?;
    let tab = browser.new_tab()?;
    tab.navigate_to(GROWING_GRID)?;
    tab.wait_until_navigated()?;

    let settings = ScrollSettings {
        target: 10,
        tick: Duration::from_millis(20),
        timeout: Some(Duration::from_secs(10)),
    };

    let count = scroll_until_loaded(&tab, &settings)?;
    assert!(count > settings.target);

    Ok(())
}

#[test]
#[ignore = "launches a local Chrome"]
fn test_scroll_times_out_when_the_grid_never_fills() -> Result<()> {
    let browser = launch()?;
    let tab = browser.new_tab()?;
    tab.navigate_to(EMPTY_PAGE)?;
    tab.wait_until_navigated()?;

    let settings = ScrollSettings {
        target: 10,
        tick: Duration::from_millis(20),
        timeout: Some(Duration::from_millis(300)),
    };

    assert!(scroll_until_loaded(&tab, &settings).is_err());

    Ok(())
}
