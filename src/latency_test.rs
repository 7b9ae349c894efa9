//! Timing suite for the bid catalog.
//!
//! Measures latency of each catalog operation and sustained throughput of a
//! mixed workload:
//! - Shuffled vs sorted loading (balanced-ish vs degenerate trees)
//! - Id lookups, amount ranges, removals

use bidtree::{Bid, Catalog};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Runs complete latency test suite.
pub fn run_latency_tests() {
    println!(" Bid Catalog - Latency Tests\n");

    test_insert_latency();
    test_lookup_latency();
    test_range_latency();
    test_removal_latency();
}

/// Creates a bid with a random amount between $0 and $5000.
fn create_bid(n: u64, rng: &mut StdRng) -> Bid {
    let cents: u32 = rng.gen_range(0..500_000);
    Bid::new(
        format!("{:07}", n),
        "Surplus Lot",
        "General Fund",
        f64::from(cents) / 100.0,
    )
}

fn shuffled_catalog(n: u64, rng: &mut StdRng) -> (Catalog, Vec<u64>) {
    let mut ids: Vec<u64> = (0..n).collect();
    ids.shuffle(rng);
    let mut catalog = Catalog::new();
    for &id in &ids {
        catalog
            .insert(create_bid(id, rng))
            .expect("generated ids are unique");
    }
    (catalog, ids)
}

fn per_op(total: Duration, ops: u64) -> f64 {
    total.as_nanos() as f64 / ops as f64
}

/// Shuffled input keeps trees shallow, sorted input turns them into chains.
fn test_insert_latency() {
    println!(" Insert Latency Test");

    let mut rng = StdRng::seed_from_u64(1);
    let n = 10_000u64;

    let start = Instant::now();
    let (catalog, _) = shuffled_catalog(n, &mut rng);
    let shuffled = start.elapsed();
    let shuffled_stats = catalog.stats();

    let sorted_n = 2_000u64;
    let mut sorted = Catalog::new();
    let start = Instant::now();
    for id in 0..sorted_n {
        sorted
            .insert(create_bid(id, &mut rng))
            .expect("generated ids are unique");
    }
    let sorted_time = start.elapsed();

    println!(
        "  Shuffled ({} bids): {:.2} ns/insert, id height {}",
        n,
        per_op(shuffled, n),
        shuffled_stats.key_height
    );
    println!(
        "  Sorted ({} bids): {:.2} ns/insert, id height {}\n",
        sorted_n,
        per_op(sorted_time, sorted_n),
        sorted.stats().key_height
    );
}

/// Tests lookup performance for present and absent ids.
fn test_lookup_latency() {
    println!(" Lookup Latency Test");

    let mut rng = StdRng::seed_from_u64(2);
    let (catalog, ids) = shuffled_catalog(10_000, &mut rng);
    let keys: Vec<String> = ids.iter().map(|id| format!("{:07}", id)).collect();

    let iterations = 1_000_000u64;

    let start = Instant::now();
    for i in 0..iterations {
        black_box(catalog.lookup(&keys[(i as usize) % keys.len()]));
    }
    let hit = start.elapsed();

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(catalog.lookup("missing"));
    }
    let miss = start.elapsed();

    println!("  Hit: {:.2} ns/call", per_op(hit, iterations));
    println!("  Miss: {:.2} ns/call\n", per_op(miss, iterations));
}

/// Tests amount ranges of increasing width.
fn test_range_latency() {
    println!(" Amount Range Latency Test");

    let mut rng = StdRng::seed_from_u64(3);
    let (catalog, _) = shuffled_catalog(10_000, &mut rng);
    let iterations = 1_000u64;

    for &(low, high) in &[(100.0, 110.0), (1000.0, 2000.0), (0.0, 5000.0)] {
        let mut hits = 0usize;
        let start = Instant::now();
        for _ in 0..iterations {
            hits = black_box(
                catalog
                    .range_by_amount(low, high)
                    .expect("valid range")
                    .count(),
            );
        }
        println!(
            "  [{:>7.2}, {:>7.2}]: {:>6} hits, {:.2} ns/query",
            low,
            high,
            hits,
            per_op(start.elapsed(), iterations)
        );
    }
    println!();
}

/// Tests removal from both indexes.
fn test_removal_latency() {
    println!(" Removal Latency Test");

    let mut rng = StdRng::seed_from_u64(4);
    let (mut catalog, mut ids) = shuffled_catalog(10_000, &mut rng);
    ids.shuffle(&mut rng);
    let victims: Vec<String> = ids.iter().take(5_000).map(|id| format!("{:07}", id)).collect();

    let start = Instant::now();
    for id in &victims {
        black_box(catalog.remove(id)).ok();
    }
    let removed = start.elapsed();

    let start = Instant::now();
    for id in &victims {
        black_box(catalog.remove(id)).ok();
    }
    let absent = start.elapsed();

    println!("  Present id: {:.2} ns/remove", per_op(removed, victims.len() as u64));
    println!("  Absent id: {:.2} ns/remove", per_op(absent, victims.len() as u64));
    println!("  Remaining: {}\n", catalog.len());
}

/// Runs sustained mixed workload for `duration`.
///
/// Per step: insert a fresh bid, look one up, query a narrow range and,
/// every fourth step, remove an older bid.
pub fn run_throughput_test(duration: Duration) {
    println!(" Sustained Throughput Test ({} seconds)", duration.as_secs());

    let mut rng = StdRng::seed_from_u64(5);
    let mut catalog = Catalog::new();
    let mut next_id = 0u64;
    let mut ops = 0u64;
    let mut removed = 0u64;

    let start_time = Instant::now();
    while start_time.elapsed() < duration {
        // scatter ids so the id tree stays shallow
        let id = next_id.wrapping_mul(2_654_435_761) % 10_000_000;
        if catalog.insert(create_bid(id, &mut rng)).is_ok() {
            ops += 1;
        }
        next_id += 1;

        let probe = format!("{:07}", rng.gen_range(0..10_000_000u64));
        black_box(catalog.lookup(&probe));

        let low = f64::from(rng.gen_range(0..4_900u32));
        black_box(catalog.range_by_amount(low, low + 10.0).map(|r| r.count()).ok());
        ops += 2;

        if next_id % 4 == 0 {
            let old = (next_id / 2).wrapping_mul(2_654_435_761) % 10_000_000;
            if catalog.remove(&format!("{:07}", old)).is_ok() {
                removed += 1;
            }
            ops += 1;
        }
    }

    let elapsed = start_time.elapsed();
    println!("  Duration: {:.1} seconds", elapsed.as_secs_f64());
    println!("  Operations: {}", ops);
    println!("  Throughput: {:.0} ops/second", ops as f64 / elapsed.as_secs_f64());
    println!("  Removed: {}", removed);
    println!("  Final catalog: {:?}", catalog.stats());
}
