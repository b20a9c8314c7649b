//! Typed, ownership-aware array handles over variants.
//!
//! An [`ArrayHandle`] is the statically-typed view of one [`Variant`]. The
//! variant's runtime tag is checked against the element type exactly once,
//! at construction; every later operation relies on that check instead of
//! re-validating per access.
//!
//! A handle either owns its variant or borrows one in place from whatever
//! component produced it (a session read, a delivered event). Only owning
//! handles may reallocate (`append`, `resize`); a borrowed handle can read
//! and overwrite elements but never changes the buffer's size or identity.
//! Handles are neither `Copy` nor `Clone`, so at most one handle refers to
//! a buffer at a time and the buffer is released at most once.

use crate::error::{Error, Result};
use crate::registry::Scalar;
use crate::types::TypeTag;
use crate::variant::Variant;
use std::fmt;
use std::marker::PhantomData;

enum Storage<'a> {
    Owned(Variant),
    Borrowed(&'a mut Variant),
}

impl Storage<'_> {
    fn variant(&self) -> &Variant {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(v) => v,
        }
    }

    fn variant_mut(&mut self) -> &mut Variant {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(v) => v,
        }
    }
}

/// Statically-typed array view over one [`Variant`].
///
/// `len` is the handle's element count. It normally equals the variant's
/// own count, but a claim constructor may be given a smaller count to
/// present a prefix view into a larger buffer.
#[must_use]
pub struct ArrayHandle<'a, T: Scalar> {
    storage: Storage<'a>,
    len: usize,
    _elem: PhantomData<fn() -> T>,
}

fn check_claim<T: Scalar>(variant: &Variant, len: usize) -> Result<()> {
    if variant.tag() != T::TAG {
        return Err(Error::TypeMismatch {
            expected: T::TAG,
            got: variant.tag(),
        });
    }
    if len > variant.len() {
        return Err(Error::LengthMismatch {
            claimed: len,
            available: variant.len(),
        });
    }
    Ok(())
}

impl<T: Scalar> ArrayHandle<'static, T> {
    /// Claim an existing variant, taking ownership of its buffer.
    ///
    /// Fails with [`Error::TypeMismatch`] if the variant's tag does not
    /// match `T`, or [`Error::LengthMismatch`] if `len` exceeds the
    /// variant's element count. The buffer is not copied.
    pub fn adopt(variant: Variant, len: usize) -> Result<Self> {
        check_claim::<T>(&variant, len)?;
        Ok(ArrayHandle {
            storage: Storage::Owned(variant),
            len,
            _elem: PhantomData,
        })
    }

    /// Allocate a fresh zero-filled array of `len` elements.
    ///
    /// The handle always owns the buffer. Fails with [`Error::Allocation`]
    /// if the buffer cannot be reserved.
    pub fn alloc(len: usize) -> Result<Self> {
        let bytes = len * T::WIDTH;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| Error::Allocation { bytes })?;
        data.resize(bytes, 0);
        let variant = Variant::from_raw_parts(T::TAG, len, data)?;
        Self::adopt(variant, len)
    }
}

impl<'a, T: Scalar> ArrayHandle<'a, T> {
    /// Claim an existing variant without taking ownership.
    ///
    /// The lender keeps responsibility for the buffer; dropping the handle
    /// releases nothing. Same validation as [`ArrayHandle::adopt`]; on
    /// failure the variant is left unmodified.
    pub fn attach(variant: &'a mut Variant, len: usize) -> Result<Self> {
        check_claim::<T>(variant, len)?;
        Ok(ArrayHandle {
            storage: Storage::Borrowed(variant),
            len,
            _elem: PhantomData,
        })
    }

    /// Number of elements visible through this handle.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the handle presents zero elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this handle owns the underlying buffer.
    pub fn is_owning(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Runtime tag of the wrapped variant. Constant for the handle's
    /// entire lifetime.
    pub fn tag(&self) -> TypeTag {
        T::TAG
    }

    /// The element at `index`.
    pub fn at(&self, index: usize) -> Result<T> {
        self.check_bounds(index)?;
        let data = self.storage.variant().data();
        Ok(T::decode(&data[index * T::WIDTH..(index + 1) * T::WIDTH]))
    }

    /// Overwrite the element at `index` in place. No reallocation, so this
    /// is permitted on borrowed handles too.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_bounds(index)?;
        let data = self.storage.variant_mut().data_mut();
        value.encode(&mut data[index * T::WIDTH..(index + 1) * T::WIDTH]);
        Ok(())
    }

    /// Grow the array by one element holding `value`.
    ///
    /// Owning handles only ([`Error::NotOwning`] otherwise). On success
    /// the count is incremented and prior elements are preserved in order;
    /// on allocation failure nothing observable changes.
    pub fn append(&mut self, value: T) -> Result<()> {
        let len = self.len;
        let variant = self.owned_mut("append")?;
        let data = variant.data_mut();

        // Reserve fallibly before touching anything, then mutate within
        // the reserved capacity so no failure point remains.
        data.try_reserve_exact(T::WIDTH)
            .map_err(|_| Error::Allocation { bytes: T::WIDTH })?;
        data.truncate(len * T::WIDTH);
        data.resize((len + 1) * T::WIDTH, 0);
        value.encode(&mut data[len * T::WIDTH..]);

        variant.set_len(len + 1);
        self.len = len + 1;
        Ok(())
    }

    /// Set the array to exactly `new_len` elements.
    ///
    /// Growth zero-fills; shrinking discards the tail. Owning handles only.
    /// Same all-or-nothing contract as [`ArrayHandle::append`].
    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        let len = self.len;
        let variant = self.owned_mut("resize")?;
        let new_bytes = new_len * T::WIDTH;
        let data = variant.data_mut();

        let additional = new_bytes.saturating_sub(data.len());
        if additional > 0 {
            data.try_reserve_exact(additional)
                .map_err(|_| Error::Allocation { bytes: additional })?;
        }
        data.truncate(len * T::WIDTH);
        data.resize(new_bytes, 0);

        variant.set_len(new_len);
        self.len = new_len;
        Ok(())
    }

    /// The wrapped variant, reflecting the handle's current state.
    ///
    /// This aliases the handle's buffer rather than copying it: the handle
    /// must outlive every use of the reference, and `append`/`resize`
    /// invalidate it (both enforced by the borrow).
    pub fn variant(&self) -> &Variant {
        self.storage.variant()
    }

    /// Consume an owning handle and hand back its variant for transfer.
    ///
    /// Fails with [`Error::NotOwning`] on a borrowed handle, whose variant
    /// stays with the lender.
    pub fn into_variant(self) -> Result<Variant> {
        match self.storage {
            Storage::Owned(v) => Ok(v),
            Storage::Borrowed(_) => Err(Error::NotOwning { op: "into_variant" }),
        }
    }

    /// Iterate the visible elements in order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let data = self.storage.variant().data();
        data.chunks_exact(T::WIDTH).take(self.len).map(T::decode)
    }

    /// Collect the visible elements into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    fn check_bounds(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    fn owned_mut(&mut self, op: &'static str) -> Result<&mut Variant> {
        match &mut self.storage {
            Storage::Owned(v) => Ok(v),
            Storage::Borrowed(_) => Err(Error::NotOwning { op }),
        }
    }
}

impl<T: Scalar> fmt::Display for ArrayHandle<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl<T: Scalar> fmt::Debug for ArrayHandle<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArrayHandle({}[{}], {})",
            T::TAG,
            self.len,
            if self.is_owning() { "owning" } else { "borrowed" }
        )
    }
}
