//! The hash value: a fixed-length, most-significant-bit-first bit sequence.
//!
//! The one persisted form is a string of `'0'`/`'1'` characters, first bit
//! first. Serde uses that form too.

use crate::error::{CompareError, ParseHashError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A computed perceptual hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PerceptualHash {
    /// Bits packed MSB-first; unused trailing bits are always zero
    bytes: Vec<u8>,
    /// Number of meaningful bits
    len: usize,
}

impl PerceptualHash {
    /// Pack a sequence of bits, first bit becoming the most significant
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bytes = Vec::new();
        let mut current_byte: u8 = 0;
        let mut bit_position = 0;
        let mut len = 0;

        for bit in bits {
            if bit {
                current_byte |= 1 << (7 - bit_position);
            }

            bit_position += 1;
            len += 1;

            if bit_position == 8 {
                bytes.push(current_byte);
                current_byte = 0;
                bit_position = 0;
            }
        }

        if bit_position > 0 {
            bytes.push(current_byte);
        }

        Self { bytes, len }
    }

    /// A 64-bit hash whose first bit is bit 63 of `value`
    pub fn from_u64(value: u64) -> Self {
        Self {
            bytes: value.to_be_bytes().to_vec(),
            len: 64,
        }
    }

    /// The hash as a `u64` (first bit in bit 63), if it is exactly 64 bits long
    pub fn to_u64(&self) -> Option<u64> {
        let bytes: [u8; 8] = self.bytes.as_slice().try_into().ok()?;
        (self.len == 64).then(|| u64::from_be_bytes(bytes))
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length hash
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bit at `index`, first bit at index 0
    pub fn bit(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| self.bytes[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    /// Iterate bits in order
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bytes[i / 8] & (1 << (7 - i % 8)) != 0)
    }

    /// Packed bytes, MSB-first, zero-padded to a whole byte
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex of the packed bytes
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Hamming distance: the number of positions where the bits differ.
    ///
    /// Hashes of different lengths come from different configurations and are
    /// never compared.
    pub fn distance(&self, other: &Self) -> Result<u32, CompareError> {
        if self.len != other.len {
            return Err(CompareError::LengthMismatch {
                left: self.len,
                right: other.len,
            });
        }

        Ok(self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }

    /// Fraction of matching bits as a percentage (0-100)
    pub fn similarity(&self, other: &Self) -> Result<f64, CompareError> {
        let distance = self.distance(other)?;
        if self.len == 0 {
            return Ok(100.0);
        }
        Ok((1.0 - (distance as f64 / self.len as f64)) * 100.0)
    }
}

impl fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.bits().map(|bit| if bit { '1' } else { '0' }).collect();
        f.pad(&text)
    }
}

impl FromStr for PerceptualHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseHashError::Empty);
        }

        let bits = s
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseHashError::InvalidCharacter { position, found }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_bits(bits))
    }
}

impl From<PerceptualHash> for String {
    fn from(hash: PerceptualHash) -> Self {
        hash.to_string()
    }
}

impl TryFrom<String> for PerceptualHash {
    type Error = ParseHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
