use anyhow::Result;
use pin_scraper::scrape;

fn main() -> Result<()> {
    // Get query from command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Please provide a search query as an argument");
        eprintln!("Usage: cargo run --bin scrape <QUERY>");
        std::process::exit(1);
    }

    let query = &args[1];
    let images = scrape(query)?;

    println!("Found {} images for \"{}\"", images.len(), query);

    let json = serde_json::to_string_pretty(&images)?;
    println!("{}", json);

    Ok(())
}
