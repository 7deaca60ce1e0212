#![allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::cast_precision_loss
)]

//! Statistical check that `is_password_reused` does not leak match/no-match
//! through timing.
//!
//! Runs interleaved samples of a matching and a non-matching lookup against
//! the same history, then computes Welch's t-statistic over the two
//! sample populations. A `|t|` below the threshold means the two
//! distributions are statistically indistinguishable at this sample size —
//! exactly what the constant-time, full-traversal loop in
//! `is_password_reused` is supposed to guarantee.

use std::hint::black_box;
use std::time::Instant;
use vaultcore::{hash_password, is_password_reused, set_test_iterations, PasswordHistoryEntry};

const SAMPLES: usize = 400;
const WARMUP: usize = 50;
const HISTORY_LEN: usize = 10;
const T_THRESHOLD: f64 = 4.5;

fn build_history(matching_password: &str) -> Vec<PasswordHistoryEntry> {
    (0..HISTORY_LEN)
        .map(|_| hash_password(matching_password).expect("hash should succeed"))
        .collect()
}

fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

fn welchs_t(a: &[f64], b: &[f64]) -> f64 {
    let (mean_a, var_a) = mean_and_variance(a);
    let (mean_b, var_b) = mean_and_variance(b);
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let se = (var_a / n_a + var_b / n_b).sqrt();
    if se == 0.0 {
        return 0.0;
    }
    (mean_a - mean_b) / se
}

#[test]
fn reuse_detection_timing_is_independent_of_match_outcome() {
    // Keep PBKDF2 cheap enough to run hundreds of samples quickly, while
    // still exercising the real comparison/loop structure.
    set_test_iterations(50);

    let history = build_history("secret123");
    let matching = "secret123";
    let non_matching = "nomatch-entirely-different";

    for _ in 0..WARMUP {
        black_box(is_password_reused(matching, &history));
        black_box(is_password_reused(non_matching, &history));
    }

    let mut matching_samples = Vec::with_capacity(SAMPLES);
    let mut non_matching_samples = Vec::with_capacity(SAMPLES);

    for i in 0..SAMPLES {
        // Interleave to average out any drift (thermal throttling, scheduler
        // noise) across the run.
        if i % 2 == 0 {
            let start = Instant::now();
            black_box(is_password_reused(matching, &history));
            matching_samples.push(start.elapsed().as_nanos() as f64);

            let start = Instant::now();
            black_box(is_password_reused(non_matching, &history));
            non_matching_samples.push(start.elapsed().as_nanos() as f64);
        } else {
            let start = Instant::now();
            black_box(is_password_reused(non_matching, &history));
            non_matching_samples.push(start.elapsed().as_nanos() as f64);

            let start = Instant::now();
            black_box(is_password_reused(matching, &history));
            matching_samples.push(start.elapsed().as_nanos() as f64);
        }
    }

    let t = welchs_t(&matching_samples, &non_matching_samples);
    assert!(
        t.abs() < T_THRESHOLD,
        "timing distributions are distinguishable: |t| = {} (threshold {T_THRESHOLD})",
        t.abs()
    );
}
