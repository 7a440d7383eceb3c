//! Value Size Estimation
//!
//! Default byte-size estimators for common value types.

use std::sync::Arc;

// == Byte Size ==
/// Estimates the number of bytes a value is charged against the budget.
///
/// Must be deterministic for a given value: a store subtracts the size it
/// computes at replacement time from what it charged at insertion time.
pub trait ByteSize {
    /// Returns the charged size in bytes.
    fn byte_size(&self) -> usize;
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Box<str> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Box<[u8]> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl<T: ByteSize + ?Sized> ByteSize for Arc<T> {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

macro_rules! fixed_width_byte_size {
    ($($t:ty),*) => {
        $(
            impl ByteSize for $t {
                fn byte_size(&self) -> usize {
                    std::mem::size_of::<$t>()
                }
            }
        )*
    };
}

fixed_width_byte_size!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
