// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles samples with a SEEDED generator and splits them into
// a training set and a held-out test set.
//
// The generator is ChaCha8 so the same seed gives the same split
// on every platform and every run; that is what makes retraining
// on unchanged data reproduce identical metrics.
//
// Sizes follow the usual convention: test = ceil(n × fraction),
// train = the rest. With the default 0.2 that is an 80/20 split.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Shuffle `samples` with `seed` and split into (train, test).
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total = samples.len();
    // The epsilon keeps 100 × 0.2 from ceiling to 21 on float noise.
    let test_len = ((total as f64) * test_fraction.clamp(0.0, 1.0) - 1e-9).ceil().max(0.0) as usize;
    let split_at = total - test_len.min(total);

    // split_off(n) leaves [0..n) in `samples` and returns [n..total)
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} train, {} test (seed {})",
        samples.len(),
        test.len(),
        seed
    );

    (samples, test)
}
