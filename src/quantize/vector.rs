use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::constants::EMBEDDING_DIM;

use super::error::QuantizeError;

/// Fixed-length int8 embedding, the only vector shape that crosses the worker boundary.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EmbeddingVector([i8; EMBEDDING_DIM]);

impl std::fmt::Debug for EmbeddingVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingVector")
            .field("dim", &EMBEDDING_DIM)
            .field("head", &&self.0[..8])
            .finish()
    }
}

impl EmbeddingVector {
    /// Wraps already-quantized components.
    pub const fn from_components(components: [i8; EMBEDDING_DIM]) -> Self {
        Self(components)
    }

    /// All-zero vector. Its similarity to anything is `0`.
    pub const fn zeros() -> Self {
        Self([0; EMBEDDING_DIM])
    }

    /// Copies components out of a slice that must be exactly [`EMBEDDING_DIM`] long.
    pub fn try_from_slice(components: &[i8]) -> Result<Self, QuantizeError> {
        let array: [i8; EMBEDDING_DIM] =
            components
                .try_into()
                .map_err(|_| QuantizeError::Dimension {
                    expected: EMBEDDING_DIM,
                    actual: components.len(),
                })?;
        Ok(Self(array))
    }

    /// Reinterprets raw two's-complement bytes as components.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, QuantizeError> {
        Self::try_from_slice(bytemuck::cast_slice::<u8, i8>(bytes))
    }

    /// Decodes the standard-alphabet base64 form used by embedding set files.
    pub fn from_base64(encoded: &str) -> Result<Self, QuantizeError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::from_bytes(&bytes)
    }

    /// Encodes as standard-alphabet base64 (with padding).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    #[inline]
    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.0)
    }

    /// Squared L2 norm in the integer domain.
    #[inline]
    pub fn norm_sq(&self) -> i64 {
        self.0.iter().map(|&v| i64::from(v) * i64::from(v)).sum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }
}

impl AsRef<[i8]> for EmbeddingVector {
    fn as_ref(&self) -> &[i8] {
        &self.0
    }
}
