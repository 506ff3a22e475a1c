use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tazz_bloom::params::false_positive_rate;
use tazz_bloom::{recommended_parameters, BloomFilter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TARGET_FPR: f64 = 0.01;
const QUERY_COUNT: usize = 100_000;
const RNG_SEED: u64 = 0x5eed_b100;

struct Row {
    elements: usize,
    capacity_bits: usize,
    hash_count: usize,
    insert_rate: f64,
    query_rate: f64,
    false_positives: usize,
    observed_fpr: f64,
    theoretical_fpr: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let element_counts = [1_000usize, 10_000, 100_000, 1_000_000];
    info!(?element_counts, target_fpr = TARGET_FPR, "starting benchmark");

    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let mut results = Vec::new();

    for &n_elements in &element_counts {
        let params = recommended_parameters(n_elements, TARGET_FPR)?;
        let mut filter = BloomFilter::<u64>::new(params.capacity_bits, params.hash_count)?;

        // Inserted keys have the top bit clear and queries have it set
        let keys: Vec<u64> = (0..n_elements).map(|_| rng.gen::<u64>() >> 1).collect();
        let queries: Vec<u64> = (0..QUERY_COUNT)
            .map(|_| rng.gen::<u64>() | (1 << 63))
            .collect();

        let start = Instant::now();
        for key in &keys {
            filter.insert(key)?;
        }
        let insert_time = start.elapsed().as_secs_f64();

        let mut misses = 0;
        for key in &keys {
            if !filter.contains(key)? {
                misses += 1;
            }
        }
        if misses > 0 {
            warn!(misses, "false negatives detected");
        }

        let start = Instant::now();
        let mut false_positives = 0;
        for query in &queries {
            if filter.contains(query)? {
                false_positives += 1;
            }
        }
        let query_time = start.elapsed().as_secs_f64();

        let row = Row {
            elements: n_elements,
            capacity_bits: params.capacity_bits,
            hash_count: params.hash_count,
            insert_rate: n_elements as f64 / insert_time.max(f64::EPSILON),
            query_rate: QUERY_COUNT as f64 / query_time.max(f64::EPSILON),
            false_positives,
            observed_fpr: false_positives as f64 / QUERY_COUNT as f64,
            theoretical_fpr: false_positive_rate(
                params.capacity_bits,
                n_elements,
                params.hash_count,
            ),
        };
        info!(
            elements = row.elements,
            insert_rate = row.insert_rate,
            query_rate = row.query_rate,
            observed_fpr = row.observed_fpr,
            "done"
        );
        results.push(row);
    }

    println!("elements,capacity_bits,hash_count,insert_rate,query_rate,false_positives,observed_fpr,theoretical_fpr");
    for row in &results {
        println!(
            "{},{},{},{:.0},{:.0},{},{:.6},{:.6}",
            row.elements,
            row.capacity_bits,
            row.hash_count,
            row.insert_rate,
            row.query_rate,
            row.false_positives,
            row.observed_fpr,
            row.theoretical_fpr
        );
    }

    Ok(())
}
