//! A best-effort perceptual fingerprint (spec §4.7): advisory only, never
//! read by the analyzer and never affects `ImageAnalysis`. With no image
//! decoding crate in the dependency stack, this samples raw file bytes at
//! fixed strides rather than decoding pixels — good enough to flag
//! byte-identical or near-identical re-submissions, not a substitute for a
//! DCT-based perceptual hash.

const SAMPLE_BITS: usize = 64;

/// Computes a 64-bit hash (rendered as 16 hex characters) from evenly
/// spaced byte samples of `bytes`, each bit set when its sample is at or
/// above the mean of all samples.
pub fn compute_phash(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "0".repeat(SAMPLE_BITS / 4);
    }

    let stride = (bytes.len() / SAMPLE_BITS).max(1);
    let samples: Vec<u8> = (0..SAMPLE_BITS)
        .map(|i| bytes[(i * stride).min(bytes.len() - 1)])
        .collect();

    let mean = samples.iter().map(|&b| b as u32).sum::<u32>() / samples.len() as u32;

    let mut value: u64 = 0;
    for (i, &sample) in samples.iter().enumerate() {
        if sample as u32 >= mean {
            value |= 1 << i;
        }
    }
    format!("{value:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_hash_identically() {
        let data = b"some pretend image bytes, repeated for length padding purposes here";
        assert_eq!(compute_phash(data), compute_phash(data));
    }

    #[test]
    fn very_different_buffers_usually_differ() {
        let a = vec![0u8; 256];
        let b = vec![255u8; 256];
        assert_ne!(compute_phash(&a), compute_phash(&b));
    }

    #[test]
    fn empty_input_does_not_panic() {
        assert_eq!(compute_phash(&[]).len(), 16);
    }
}
