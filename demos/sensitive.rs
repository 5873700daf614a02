//! Example: loading a JSON vocabulary, scanning text and hot-swapping words.
//!
//! Run with: RUST_LOG=debug cargo run --example sensitive --features serde

use std::time::Instant;

use libsensitive::dfa::{read_words_json_from_file, DfaConfig, SharedDfa};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/sensitive_words.json");
    let words = read_words_json_from_file(path)?;
    let config = DfaConfig::default().with_capacity(100_000);
    let shared = SharedDfa::new(&words, config)?;

    let text = "This is a example, 你好. ".repeat(50);
    let start = Instant::now();
    let result = shared.check(&text, 20);
    let elapsed = start.elapsed();
    println!(
        "text length: {} bytes, scan took {} µs, found: {}",
        text.len(),
        elapsed.as_micros(),
        result.found
    );
    print!("{}", result.display(text.as_bytes()));

    // Replace the whole vocabulary; scans in flight keep the old one.
    shared.update(["example", "is a"])?;
    let result = shared.check(&text, 4);
    println!("\nafter update:");
    print!("{}", result.display(text.as_bytes()));

    Ok(())
}
