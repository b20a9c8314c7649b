//! Tagged, length-carrying container for a homogeneous array of values.

use crate::error::{Error, Result};
use crate::registry::Scalar;
use crate::types::TypeTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically-typed array value.
///
/// Carries a runtime [`TypeTag`], an element count, and the encoded
/// elements in one contiguous buffer. The buffer length always equals
/// `len * tag.width()`; the fallible constructor enforces this for data
/// arriving from outside the crate.
///
/// A `Variant` owns its buffer. Whether a consumer *of* the variant owns
/// it is the business of [`crate::ArrayHandle`], which either adopts the
/// variant or borrows it in place.
#[derive(Clone, PartialEq, Serialize)]
pub struct Variant {
    tag: TypeTag,
    len: usize,
    data: Vec<u8>,
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            tag: TypeTag,
            len: usize,
            data: Vec<u8>,
        }

        // Route through the checked constructor so decoded variants carry
        // the same length invariant as locally built ones.
        let raw = Raw::deserialize(deserializer)?;
        Variant::from_raw_parts(raw.tag, raw.len, raw.data).map_err(serde::de::Error::custom)
    }
}

impl Variant {
    /// An empty array of the given element type.
    pub fn empty(tag: TypeTag) -> Self {
        Variant {
            tag,
            len: 0,
            data: Vec::new(),
        }
    }

    /// Encode a typed slice into a variant.
    pub fn from_slice<T: Scalar>(values: &[T]) -> Self {
        let mut data = vec![0u8; values.len() * T::WIDTH];
        for (value, chunk) in values.iter().zip(data.chunks_exact_mut(T::WIDTH)) {
            value.encode(chunk);
        }
        Variant {
            tag: T::TAG,
            len: values.len(),
            data,
        }
    }

    /// Build a variant from parts produced outside the crate.
    ///
    /// Fails with [`Error::LengthMismatch`] if the buffer does not hold
    /// exactly `len` encoded elements of the tagged type.
    pub fn from_raw_parts(tag: TypeTag, len: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != len * tag.width() {
            return Err(Error::LengthMismatch {
                claimed: len,
                available: data.len() / tag.width(),
            });
        }
        Ok(Variant { tag, len, data })
    }

    /// The element type this variant currently holds.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the variant holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The encoded element buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Buffer size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Mutable access to the buffer. Callers must keep the length
    /// invariant; paired with `set_len` when the count changes.
    pub(crate) fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Update the element count after a buffer change.
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert_eq!(self.data.len(), len * self.tag.width());
        self.len = len;
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variant({}[{}])", self.tag, self.len)
    }
}
