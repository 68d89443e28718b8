//! Short random identifiers for presets and history entries.

use rand::Rng;

/// Length of generated ids.
pub const SHORT_ID_LEN: usize = 5;

const SHORT_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A 5-character lowercase alphanumeric id drawn uniformly at random.
pub fn generate_short_id() -> String {
    let mut rng = rand::rng();
    (0..SHORT_ID_LEN)
        .map(|_| SHORT_ID_ALPHABET[rng.random_range(0..SHORT_ID_ALPHABET.len())] as char)
        .collect()
}

/// Generates ids until one is not taken according to `is_taken`.
pub fn generate_unique_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_short_id();
        if !is_taken(&id) {
            return id;
        }
    }
}
