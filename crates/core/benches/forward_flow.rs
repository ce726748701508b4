//! Forward-flow throughput benchmark on a synthetic table.
//!
//! Usage: cargo bench --bench forward_flow

use forwardflow_core::{EmbeddingTable, ForwardFlowScorer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::io::Cursor;
use std::time::Instant;

const VOCAB: usize = 50_000;
const DIM: usize = 150;
const SEQUENCES: usize = 10_000;

fn synthetic_table_text(rng: &mut StdRng) -> String {
    let mut text = String::with_capacity(VOCAB * DIM * 10);
    let _ = writeln!(text, "{VOCAB} {DIM}");
    for i in 0..VOCAB {
        let _ = write!(text, "w{i}");
        for _ in 0..DIM {
            let _ = write!(text, " {:.6}", rng.gen_range(-1.0f32..1.0));
        }
        text.push('\n');
    }
    text
}

fn main() {
    println!("=== Forward flow benchmark: {VOCAB} tokens x {DIM}d ===");
    let mut rng = StdRng::seed_from_u64(42);

    print!("Generating table text...");
    let text = synthetic_table_text(&mut rng);
    println!(" {} MB", text.len() / (1024 * 1024));

    let t0 = Instant::now();
    let table = EmbeddingTable::from_reader(Cursor::new(text.as_bytes())).expect("valid table");
    let load = t0.elapsed();
    println!(
        "Load: {:.2}s ({:.0} rows/s), ~{} MB resident",
        load.as_secs_f64(),
        VOCAB as f64 / load.as_secs_f64(),
        table.estimate_memory_bytes() / (1024 * 1024)
    );

    let scorer = ForwardFlowScorer::new(&table);
    println!();
    println!("  length |   seq/s   | avg latency");
    println!("  -------+-----------+------------");
    for &len in &[2usize, 5, 10, 20, 50] {
        let sequences: Vec<Vec<String>> = (0..SEQUENCES)
            .map(|_| (0..len).map(|_| format!("w{}", rng.gen_range(0..VOCAB))).collect())
            .collect();

        let t0 = Instant::now();
        let mut checksum = 0.0f64;
        for seq in &sequences {
            checksum += scorer.score(seq).expect("all tokens in vocabulary");
        }
        let elapsed = t0.elapsed();
        println!(
            "  {:>6} | {:>9.0} | {:.1} us   (mean score {:.4})",
            len,
            SEQUENCES as f64 / elapsed.as_secs_f64(),
            elapsed.as_micros() as f64 / SEQUENCES as f64,
            checksum / SEQUENCES as f64
        );
    }

    println!();
    println!("=== Benchmark complete ===");
}
