use std::fmt::Debug;
use std::fmt::Display;
use std::hash::Hash;
use std::iter::Sum;
use std::ops::Add;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;

use num_traits::One;
use num_traits::Zero;
use serde::Serialize;
use serde::de::DeserializeOwned;
use twenty_first::prelude::*;

/// The algebraic requirements the circuit machinery places on a field.
///
/// The circuit model, compiler, and solver are generic over the field of
/// computation. Beyond ring arithmetic and equality, only two things are
/// needed: a multiplicative inverse (for the equality gate's auxiliary wire)
/// and bit access on the canonical integer representative (for the
/// bit-decomposition gate and the external byte-buffer protocol).
pub trait CircuitField:
    Copy
    + Eq
    + Hash
    + Debug
    + Display
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Sum
    + Serialize
    + DeserializeOwned
{
    /// Bit length of the field modulus.
    const BITS: usize;

    /// Width of the external transfer buffer for one field element, in
    /// bytes. The external ABI moves field elements in 32-bit words, hence
    /// the rounding.
    const BUFFER_BYTES: usize = Self::BITS.div_ceil(32) * 4;

    /// The element obtained by reducing `v` into the field.
    fn from_u64(v: u64) -> Self;

    /// Multiplicative inverse, or `None` for zero.
    fn try_inverse(&self) -> Option<Self>;

    /// The `k`-th bit, little-endian, of the canonical integer
    /// representative. Bits at or beyond [`Self::BITS`] are `false`.
    fn bit(&self, k: usize) -> bool;

    /// Write the canonical representative into `buf` as exactly
    /// [`Self::BUFFER_BYTES`] little-endian bytes.
    ///
    /// # Panics
    ///
    /// Panics if `buf.len() != Self::BUFFER_BYTES`.
    fn to_le_bytes(&self, buf: &mut [u8]);

    /// Read an element from exactly [`Self::BUFFER_BYTES`] little-endian
    /// bytes, reducing into the field. `None` if `buf` has the wrong width.
    fn from_le_bytes(buf: &[u8]) -> Option<Self>;
}

impl CircuitField for BFieldElement {
    const BITS: usize = 64;

    fn from_u64(v: u64) -> Self {
        BFieldElement::new(v)
    }

    fn try_inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(self.inverse())
    }

    fn bit(&self, k: usize) -> bool {
        if k >= Self::BITS {
            return false;
        }
        (self.value() >> k) & 1 == 1
    }

    fn to_le_bytes(&self, buf: &mut [u8]) {
        assert_eq!(Self::BUFFER_BYTES, buf.len(), "transfer buffer width");
        buf.copy_from_slice(&self.value().to_le_bytes());
    }

    fn from_le_bytes(buf: &[u8]) -> Option<Self> {
        let bytes: [u8; 8] = buf.try_into().ok()?;
        Some(BFieldElement::new(u64::from_le_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn buffer_width_is_a_whole_number_of_32_bit_words() {
        assert_eq!(8, BFieldElement::BUFFER_BYTES);
    }

    #[test]
    fn zero_has_no_inverse() {
        assert!(BFieldElement::zero().try_inverse().is_none());
    }

    #[test]
    fn bits_of_thirteen() {
        let thirteen = bfe!(13);
        let low_bits: Vec<_> = (0..4).map(|k| thirteen.bit(k)).collect();
        assert_eq!(vec![true, false, true, true], low_bits);
        assert!(!thirteen.bit(64));
        assert!(!thirteen.bit(1000));
    }

    #[proptest]
    fn nonzero_elements_invert(#[strategy(arb())] e: BFieldElement) {
        if e.is_zero() {
            return Ok(());
        }
        let inverse = e.try_inverse().unwrap();
        prop_assert_eq!(BFieldElement::one(), e * inverse);
    }

    #[proptest]
    fn byte_transfer_round_trips(#[strategy(arb())] e: BFieldElement) {
        let mut buf = vec![0; BFieldElement::BUFFER_BYTES];
        e.to_le_bytes(&mut buf);
        prop_assert_eq!(Some(e), BFieldElement::from_le_bytes(&buf));
    }

    #[test]
    fn wrong_buffer_width_is_rejected() {
        assert!(BFieldElement::from_le_bytes(&[0; 7]).is_none());
        assert!(BFieldElement::from_le_bytes(&[0; 9]).is_none());
    }
}
