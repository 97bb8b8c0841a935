//! Benchmark for `HilbertCurve::decode` / `encode` throughput
//!
//! Measures 1M random conversions at several grid orders, from a
//! 256x256 grid up to the full 2^32 x 2^32 grid.

use ipspace::HilbertCurve;
use rand::Rng;
use rand::SeedableRng;
use std::hint::black_box;
use std::time::Instant;

/// Decode every distance, then encode the resulting points back
fn bench_order<R: Rng>(rng: &mut R, depth: u32, num_tests: usize) {
    let curve = HilbertCurve::with_depth(depth).expect("valid depth");
    let distances: Vec<u64> = (0..num_tests)
        .map(|_| rng.random_range(0..=curve.max_distance()))
        .collect();

    let start = Instant::now();
    let mut points = Vec::with_capacity(num_tests);
    for &d in &distances {
        points.push(black_box(curve.decode(d).expect("in range")));
    }
    let decode_time = start.elapsed();

    let start = Instant::now();
    let mut checksum = 0_u64;
    for p in &points {
        checksum = checksum.wrapping_add(curve.encode(p.x, p.y).expect("in range"));
    }
    let encode_time = start.elapsed();

    println!(
        "order 2^{:<2}: {} decodes {:.2}ms, {} encodes {:.2}ms (checksum {:x})",
        depth,
        num_tests,
        decode_time.as_secs_f64() * 1000.0,
        num_tests,
        encode_time.as_secs_f64() * 1000.0,
        black_box(checksum)
    );
}

fn main() {
    println!("Hilbert Curve Conversion Benchmark");
    println!("==================================\n");

    let num_tests = 1_000_000;

    // Fixed seed for reproducibility
    let seed = 95756739_u64;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    for depth in [8, 12, 16, 24, 32] {
        bench_order(&mut rng, depth, num_tests);
    }
    println!();

    // Full walk of a 1024x1024 grid through the iterator
    let curve = HilbertCurve::new(1024).expect("valid order");
    let start = Instant::now();
    let count = curve.points().map(black_box).count();
    println!(
        "walk of {} cells: {:.2}ms",
        count,
        start.elapsed().as_secs_f64() * 1000.0
    );
}
