//! Bech32 (BIP173) and Bech32m (BIP350) checksummed base32 strings.
//!
//! Data is handled as slices of 5-bit values, one `u8` per value. Use
//! [`to_base32`] and [`from_base32`] to convert from and to bytes.
//!
//! Unlike segwit addresses, silent payment addresses are longer than 90
//! characters, so no length limit is enforced here.

use ::bech32::{u5, ToBase32};

pub use ::bech32::Variant;

use crate::error::FormatError;

const CHECKSUM_LENGTH: usize = 6;
const SEPARATOR: char = '1';

fn is_valid_hrp(hrp: &str) -> bool {
    !hrp.is_empty() && hrp.bytes().all(|c| (33..=126).contains(&c))
}

fn to_u5(data: &[u8]) -> Result<Vec<u5>, FormatError> {
    data.iter()
        .map(|v| u5::try_from_u8(*v).map_err(|_| FormatError::InvalidData))
        .collect()
}

impl From<::bech32::Error> for FormatError {
    fn from(e: ::bech32::Error) -> Self {
        match e {
            ::bech32::Error::MixedCase => FormatError::MixedCase,
            ::bech32::Error::MissingSeparator => FormatError::NoSeparator,
            ::bech32::Error::InvalidChecksum => FormatError::BadChecksum,
            // hrp length, the data part was long enough
            ::bech32::Error::InvalidLength => FormatError::InvalidHrp,
            ::bech32::Error::InvalidChar(_)
            | ::bech32::Error::InvalidData(_)
            | ::bech32::Error::InvalidPadding => FormatError::InvalidData,
        }
    }
}

/// Encode `hrp` and 5-bit `data` as `hrp || "1" || data || checksum`.
///
/// The human-readable part is lowercased before encoding.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, FormatError> {
    let hrp = hrp.to_ascii_lowercase();
    if !is_valid_hrp(&hrp) {
        return Err(FormatError::InvalidHrp);
    }

    Ok(::bech32::encode(&hrp, to_u5(data)?, variant)?)
}

/// Decode and verify a string, returning the lowercased human-readable part
/// and the 5-bit data without the checksum.
pub fn decode(s: &str, variant: Variant) -> Result<(String, Vec<u8>), FormatError> {
    let has_lower = s.bytes().any(|c| c.is_ascii_lowercase());
    let has_upper = s.bytes().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(FormatError::MixedCase);
    }

    let pos = s.rfind(SEPARATOR).ok_or(FormatError::NoSeparator)?;
    if !is_valid_hrp(&s[..pos]) {
        return Err(FormatError::InvalidHrp);
    }
    // the data part must hold more than the checksum
    if s.len() - pos - 1 < CHECKSUM_LENGTH + 1 {
        return Err(FormatError::InvalidData);
    }

    let (hrp, data, found) = ::bech32::decode(s)?;
    if found != variant {
        return Err(FormatError::BadChecksum);
    }

    Ok((hrp, data.into_iter().map(u5::to_u8).collect()))
}

/// Regroup bytes into 5-bit values, most significant bit first, zero-padding
/// the last group.
pub fn to_base32(bytes: &[u8]) -> Vec<u8> {
    bytes.to_base32().into_iter().map(u5::to_u8).collect()
}

/// Regroup 5-bit values into bytes. Incomplete trailing bits are dropped
/// without checking that they are zero.
pub fn from_base32(data: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut bytes = ::bech32::convert_bits(data, 5, 8, true)?;
    bytes.truncate(data.len() * 5 / 8);
    Ok(bytes)
}
