//! Character domain primitives
//!
//! Interval sets, affine range maps and the compressed per-character map that
//! the partition and scanner tables are built from.

pub mod char_map;
pub mod error;
pub mod interval_set;
pub mod range_map;
pub mod subst;

use std::fmt::Debug;

pub use char_map::CompressedCharMap;
pub use error::{CharsetError, CharsetResult};
pub use interval_set::{Interval, IntervalSet};
pub use range_map::{InverseLookup, RangeLookup, RangeMap, RangeMapEntry};
pub use subst::{IdentitySubst, SubstTable, Substitution};

/// A character code in the configured domain (at most 32 bits wide)
pub type Char = u32;

/// An ordered discrete type usable as the element type of interval sets and
/// range maps.
///
/// Conversions go through `u64` so that `max + 1` arithmetic can be done
/// without wrapping at the top of the domain.
pub trait Domain: Copy + Ord + Debug {
    const MIN: Self;
    const MAX: Self;

    fn to_u64(self) -> u64;

    /// Values above `Self::MAX` are a caller error.
    fn from_u64(value: u64) -> Self;
}

macro_rules! impl_domain {
    ($($t:ty),*) => {
        $(
            impl Domain for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(value: u64) -> Self {
                    debug_assert!(value <= <$t>::MAX as u64);
                    value as $t
                }
            }
        )*
    };
}

impl_domain!(u8, u16, u32, u64);

/// Check a domain width against the configured ceiling
pub fn validate_domain_bits(bits: u32) -> CharsetResult<u32> {
    let max = crate::config::compile_time::charset::MAX_DOMAIN_BITS;
    if bits == 0 || bits > max || bits > 32 {
        return Err(CharsetError::invalid_domain_width(bits));
    }
    Ok(bits)
}

/// Largest character of a domain `bits` wide
pub fn domain_max(bits: u32) -> Char {
    if bits >= 32 {
        Char::MAX
    } else {
        (1u32 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_domain_max() {
        assert_eq!(domain_max(8), 0xff);
        assert_eq!(domain_max(21), 0x1f_ffff);
        assert_eq!(domain_max(31), 0x7fff_ffff);
        assert_eq!(domain_max(32), u32::MAX);
    }

    #[test]
    fn test_validate_domain_bits() {
        assert_eq!(validate_domain_bits(31), Ok(31));
        assert_matches!(
            validate_domain_bits(0),
            Err(CharsetError::InvalidDomainWidth { bits: 0, .. })
        );
        assert_matches!(
            validate_domain_bits(40),
            Err(CharsetError::InvalidDomainWidth { bits: 40, .. })
        );
    }

    #[test]
    fn test_domain_conversions() {
        assert_eq!(<u8 as Domain>::MAX.to_u64(), 255);
        assert_eq!(<u16 as Domain>::from_u64(513), 513u16);
        assert_eq!(<u64 as Domain>::MAX.to_u64(), u64::MAX);
    }
}
