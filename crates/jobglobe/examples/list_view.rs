//! List view of employers for a job search
//!
//! This example demonstrates the synchronous pipeline:
//! - Extracting a place or postal code from free text
//! - Resolving the postal code inside a state filter
//! - Listing the organizations at the resolved location

use jobglobe::{LocationPipeline, LocationQuery, RegionFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = LocationPipeline::new_embedded();

    let queries = [
        LocationQuery::new("react developer in ernakulam")
            .with_filter(RegionFilter::country("India").with_state("Kerala")),
        LocationQuery::new("backend jobs in bangalore")
            .with_filter(RegionFilter::country("India").with_state("Karnataka")),
        LocationQuery::new("designer near 673001"),
        LocationQuery::new("remote rust engineer"),
    ];

    for query in &queries {
        let resolution = pipeline.resolve(query);
        println!("Query: {:?}", query.text);
        println!("  Location: {}", resolution.extracted);
        match &resolution.postal {
            Some(postal) => println!("  Postal code: {} ({})", postal.postal_code, postal.region.name),
            None => println!("  Postal code: unresolved"),
        }

        let rows = pipeline.listings_for(&resolution);
        if rows.is_empty() {
            println!("  No organizations here");
        }
        for row in rows {
            println!(
                "  - {} [{} open] {}",
                row.organization, row.open_positions, row.address
            );
        }
        println!();
    }

    // Rows serialize for a JSON list endpoint
    let resolution = pipeline.resolve(&queries[0]);
    println!("{}", serde_json::to_string_pretty(&pipeline.listings_for(&resolution))?);

    Ok(())
}
