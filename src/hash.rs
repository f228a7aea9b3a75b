use fnv::FnvHasher;
use murmur3::murmur3_32;
use std::hash::Hasher;
use std::io::Cursor;

/// A type alias for the hash function used by the Bloom filter.
///
/// Takes an item and computes `num_hashes` raw bit positions for it.
/// Positions are not reduced to the bit-vector size here; the owning
/// [`BitStore`](crate::BitStore) folds them into range.
pub type HashFunction = fn(item: &[u8], num_hashes: usize) -> Vec<u64>;

pub(crate) fn hash_murmur32(key: &[u8]) -> u32 {
    let mut cursor = Cursor::new(key);
    murmur3_32(&mut cursor, 0).expect("Failed to compute Murmur3 hash")
}

pub(crate) fn hash_fnv32(key: &[u8]) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish() as u32
}

/// Double hashing: position i = h1 + i * h2, Kirsch-Mitzenmacher style.
pub fn default_hash_function(item: &[u8], num_hashes: usize) -> Vec<u64> {
    let h1 = u64::from(hash_murmur32(item));
    let h2 = u64::from(hash_fnv32(item));
    (0..num_hashes as u64)
        .map(|i| h1.wrapping_add(i.wrapping_mul(h2)))
        .collect()
}

pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> u64 {
    let ln2 = std::f64::consts::LN_2;
    ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as u64
}

pub fn optimal_num_hashes(n: usize, m: u64) -> usize {
    ((m as f64 / n as f64) * std::f64::consts::LN_2).round() as usize
}
