//! Embedding dimension validation.
//!
//! `dim` is a store-wide constant fixed at engine creation; it must be one
//! of the sizes below. Vectors are stored 32-byte aligned by the pool
//! subsystem (see `codegraph-pool`), not by this crate.

use crate::error::{Error, Result};

/// Dimensions the engine accepts for embeddings.
pub const ALLOWED_DIMENSIONS: &[usize] = &[64, 128, 256, 384, 512, 768, 1024, 1536, 3072];

/// Validate that `dim` is one of the allowed embedding dimensions.
pub fn validate_dimension(dim: usize) -> Result<()> {
    if ALLOWED_DIMENSIONS.contains(&dim) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "unsupported embedding dimension {dim}; must be one of {ALLOWED_DIMENSIONS:?}"
        )))
    }
}

/// Validate that a vector's length matches the store-wide dimension.
pub fn validate_vector_len(vector: &[f32], expected: usize) -> Result<()> {
    if vector.len() == expected {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected,
            actual: vector.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_listed_dimension() {
        for &d in ALLOWED_DIMENSIONS {
            assert!(validate_dimension(d).is_ok());
        }
    }

    #[test]
    fn rejects_arbitrary_dimension() {
        assert!(validate_dimension(100).is_err());
    }

    #[test]
    fn vector_len_mismatch_is_reported() {
        let v = vec![0.0f32; 100];
        let err = validate_vector_len(&v, 128).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 128,
                actual: 100
            }
        ));
    }
}
