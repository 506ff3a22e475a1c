//! Basic usage examples for tazz-bloom

use tazz_bloom::{
    recommended_parameters, AtomicBloomFilter, BloomFilter, FilterConfig, Murmur3Strategy,
    SipStrategy,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tazz Bloom Filter Examples ===\n");

    // Example 1: Basic Bloom Filter
    println!("1. Basic Bloom Filter:");
    let mut bloom = BloomFilter::<str>::new(1000, 4)?;

    let greetings = ["Hello, world", "Hello, again"];
    for item in greetings {
        bloom.insert(item)?;
    }

    for item in greetings {
        println!("  {:?} in filter: {}", item, bloom.contains(item)?);
    }
    for item in ["This is a test", "Hello, readers"] {
        println!("  {:?} in filter: {}", item, bloom.contains(item)?);
    }

    println!("  {}", bloom.stats());
    println!();

    // Example 2: Sizing for a target false positive rate
    println!("2. Sizing:");
    let params = recommended_parameters(100_000, 0.001)?;
    println!("  100k elements at 0.1%: {}", params);

    let config = FilterConfig::for_expected(100_000, 0.001)?;
    let mut sized = BloomFilter::<u64>::with_config(&config)?;
    for i in 0..100_000u64 {
        sized.insert(&i)?;
    }

    let false_positives = (100_000..200_000u64)
        .map(|i| sized.contains(&i))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|&hit| hit)
        .count();
    println!(
        "  Observed FPR on 100k unseen keys: {:.5}",
        false_positives as f64 / 100_000.0
    );
    println!();

    // Example 3: Builder
    println!("3. Builder:");
    let frozen = BloomFilter::<str>::builder()?
        .insert_all(["apple", "banana", "cherry"])?
        .build();
    println!("  banana in frozen filter: {}", frozen.contains("banana")?);
    println!("  durian in frozen filter: {}", frozen.contains("durian")?);
    println!();

    // Example 4: Alternative hash strategy
    println!("4. Murmur3 strategy:");
    let mut murmur = BloomFilter::<[u8], _, tazz_bloom::PackedBits>::with_strategy(
        4096,
        5,
        Murmur3Strategy::new(0xdead),
    )?;
    murmur.insert(b"raw bytes".as_slice())?;
    println!(
        "  raw bytes in filter: {}",
        murmur.contains(b"raw bytes".as_slice())?
    );
    println!();

    // Example 5: Concurrent inserts
    println!("5. Atomic backend:");
    let shared = AtomicBloomFilter::<u64>::with_strategy(1 << 20, 7, SipStrategy::default())?;
    std::thread::scope(|scope| {
        for t in 0..4u64 {
            let shared = &shared;
            scope.spawn(move || {
                for i in (t * 10_000)..((t + 1) * 10_000) {
                    shared
                        .insert_shared(&i)
                        .expect("integer keys are never empty");
                }
            });
        }
    });
    let found = (0..40_000u64)
        .filter(|i| shared.contains(i).unwrap_or(false))
        .count();
    println!("  Found: {}/40000", found);
    println!("  {}", shared.stats());

    Ok(())
}
