//! Bid Catalog Performance Lab
//!
//! Runs the timing suite followed by a small demo of loading, searching and
//! removing bids.

use bidtree::{Bid, Catalog};
use std::time::Duration;
use tracing::info;

mod latency_test;

/// Main entry point - runs performance tests and demo.
fn main() {
    tracing_subscriber::fmt::init();
    println!("=== Bid Catalog Performance Lab ===");

    latency_test::run_latency_tests();
    latency_test::run_throughput_test(Duration::from_secs(5));

    println!("\n=== Basic Demo ===");
    run_basic_demo();
}

fn show<'a>(label: &str, bids: impl Iterator<Item = &'a Bid>) {
    println!("{}:", label);
    for bid in bids {
        println!("  {}: {} | {} | {}", bid.id, bid.title, bid.amount, bid.fund);
    }
}

/// Loads three bids, queries them both ways and removes one.
fn run_basic_demo() {
    let mut catalog = Catalog::new();

    for (id, title, amount) in [
        ("A1", "Oak Desk", 500.0),
        ("B2", "Filing Cabinet", 300.0),
        ("C3", "Pickup Truck", 750.0),
    ] {
        if let Err(e) = catalog.insert(Bid::new(id, title, "General Fund", amount)) {
            println!("Insert failed: {}", e);
        }
    }

    show("By id", catalog.list_by_key());
    show("By amount", catalog.list_by_amount());
    match catalog.range_by_amount(300.0, 500.0) {
        Ok(hits) => show("Between $300 and $500", hits),
        Err(e) => println!("Range failed: {}", e),
    }

    // rejected: id already present, amount negative
    for bid in [
        Bid::new("A1", "Oak Desk", "General Fund", 10.0),
        Bid::new("D4", "Broken Chair", "General Fund", -5.0),
    ] {
        if let Err(e) = catalog.insert(bid) {
            println!("Rejected: {}", e);
        }
    }

    match catalog.remove("A1") {
        Ok(bid) => info!(id = %bid.id, "removed"),
        Err(e) => println!("Remove failed: {}", e),
    }
    println!("Lookup A1 after removal: {:?}", catalog.lookup("A1"));
    show("By amount after removal", catalog.list_by_amount());
    println!("Stats: {:?}", catalog.stats());
}
