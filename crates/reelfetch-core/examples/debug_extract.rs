//! Debug script to run the extractor chain against a post URL or a saved page
//!
//! Run with:
//!   cargo run --example debug_extract -p reelfetch-core -- https://www.instagram.com/p/SHORTCODE/
//!   cargo run --example debug_extract -p reelfetch-core -- --file debug_post.html

use reelfetch_core::{ExtractorChain, PageClient, PageContent, ReelScraper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(first) = args.next() else {
        println!("usage: debug_extract <post-url> | --file <page.html>");
        return Ok(());
    };

    if first == "--file" {
        let path = args.next().ok_or("missing file path")?;
        let html = std::fs::read_to_string(&path)?;
        return run_chain(&html).await;
    }

    println!("Extracting {first}...\n");
    let scraper = ReelScraper::new()?;
    match scraper.extract(Some(&first)).await {
        Ok(result) => {
            println!("✓ Strategy: {}", result.strategy);
            println!("  Video: {}", result.video_url.as_deref().unwrap_or("-"));
            println!("  Thumbnail: {}", result.thumbnail_url.as_deref().unwrap_or("-"));
            if result.transient {
                println!("  (transient in-browser source)");
            }
        }
        Err(e) => {
            println!("✗ Extraction failed: {e}");

            println!("\nFetching raw HTML for debugging...");
            let html = PageClient::new()?.fetch(&first).await?;
            std::fs::write("debug_post.html", &html)?;
            println!("HTML saved to debug_post.html");

            run_chain(&html).await?;
        }
    }

    Ok(())
}

async fn run_chain(html: &str) -> Result<(), Box<dyn std::error::Error>> {
    let chain = ExtractorChain::standard();
    println!("Strategies: {}", chain.names().join(", "));

    match chain.extract(&PageContent::from_html(html)).await {
        Ok(result) => println!("✓ {} -> {:?}", result.strategy, result.video_url),
        Err(e) => println!("✗ {e}"),
    }

    if let Some(start) = html.find("video_url") {
        let end = std::cmp::min(start + 300, html.len());
        let snippet = html.get(start..end).unwrap_or_default();
        println!("\n=== snippet around video_url ===\n{snippet}");
    }
    Ok(())
}
