//! Checksum utilities for image integrity verification

use crate::types::ChecksumAlgorithm;
use sha2::{Digest, Sha256, Sha512};

/// Compute the hex-encoded digest of an in-memory buffer.
///
/// Uploaded frames are hashed before they hit disk; the digest prefix
/// becomes part of the storage key.
pub fn compute_bytes_checksum(bytes: &[u8], algorithm: ChecksumAlgorithm) -> String {
    match algorithm {
        ChecksumAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        ChecksumAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_bytes_checksum_sha256() {
        let checksum = compute_bytes_checksum(b"hello world", ChecksumAlgorithm::Sha256);
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_bytes_checksum_sha512_length() {
        let checksum = compute_bytes_checksum(b"hello world", ChecksumAlgorithm::Sha512);
        assert_eq!(checksum.len(), 128);
    }

    #[test]
    fn test_distinct_content_distinct_digest() {
        let first = compute_bytes_checksum(b"first capture", ChecksumAlgorithm::Sha256);
        let second = compute_bytes_checksum(b"second capture", ChecksumAlgorithm::Sha256);
        assert_ne!(first, second);
    }
}
