//! Scalar and point arithmetic on secp256k1.
//!
//! Scalars are [`SecretKey`]s, so they are always non-zero and below the curve
//! order; any operation whose result would be zero fails with
//! [`CurveError::ScalarOutOfRange`]. Points are [`PublicKey`]s and can never be
//! the point at infinity.
//!
//! Functions that need precomputed tables take the context as a parameter.
//! [`secp`] returns the process-wide context, which is built once and only
//! read afterwards, so it can be shared between threads.

use secp256k1::{
    All, Parity, PublicKey, Scalar, Secp256k1, SecretKey, Signing, Verification, XOnlyPublicKey,
};

use crate::error::CurveError;

/// The field prime p = 2^256 - 2^32 - 977, big-endian.
pub const FIELD_PRIME: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// The global secp256k1 context.
pub fn secp() -> &'static Secp256k1<All> {
    secp256k1::SECP256K1
}

/// Parse a 32-byte big-endian scalar. Zero and values >= n are rejected.
pub fn parse_scalar(bytes: &[u8]) -> Result<SecretKey, CurveError> {
    SecretKey::from_slice(bytes).map_err(|_| CurveError::ScalarOutOfRange)
}

/// Parse a 33-byte compressed point.
pub fn parse_point(bytes: &[u8]) -> Result<PublicKey, CurveError> {
    if bytes.len() != 33 || !(bytes[0] == 0x02 || bytes[0] == 0x03) {
        return Err(CurveError::InvalidPoint);
    }
    PublicKey::from_slice(bytes).map_err(|_| CurveError::InvalidPoint)
}

/// (a + b) mod n
pub fn scalar_add(a: &SecretKey, b: &SecretKey) -> Result<SecretKey, CurveError> {
    Ok(a.add_tweak(&Scalar::from(*b))?)
}

/// (a * b) mod n
pub fn scalar_mul(a: &SecretKey, b: &SecretKey) -> Result<SecretKey, CurveError> {
    Ok(a.mul_tweak(&Scalar::from(*b))?)
}

/// n - s
pub fn negate_scalar(s: &SecretKey) -> SecretKey {
    s.negate()
}

pub fn point_add(p: &PublicKey, q: &PublicKey) -> Result<PublicKey, CurveError> {
    Ok(p.combine(q)?)
}

/// Sum of all points. Fails on an empty list or if the sum is the point at infinity.
pub fn point_sum<'a, I>(points: I) -> Result<PublicKey, CurveError>
where
    I: IntoIterator<Item = &'a PublicKey>,
{
    let mut iter = points.into_iter();
    let first = *iter.next().ok_or(CurveError::InvalidPoint)?;
    iter.try_fold(first, |acc, p| point_add(&acc, p))
}

/// s·P
pub fn point_mul<C: Verification>(
    secp: &Secp256k1<C>,
    p: &PublicKey,
    s: &SecretKey,
) -> Result<PublicKey, CurveError> {
    Ok(p.mul_tweak(secp, &Scalar::from(*s))?)
}

/// s·G
pub fn base_mul<C: Signing>(secp: &Secp256k1<C>, s: &SecretKey) -> PublicKey {
    s.public_key(secp)
}

/// P + s·G
pub fn point_add_base_mul<C: Verification>(
    secp: &Secp256k1<C>,
    p: &PublicKey,
    s: &SecretKey,
) -> Result<PublicKey, CurveError> {
    Ok(p.add_exp_tweak(secp, &Scalar::from(*s))?)
}

pub fn negate_point<C: Verification>(secp: &Secp256k1<C>, p: &PublicKey) -> PublicKey {
    p.negate(secp)
}

pub fn is_odd_y(p: &PublicKey) -> bool {
    p.x_only_public_key().1 == Parity::Odd
}

/// Lift an x coordinate to the curve point with even Y.
///
/// Fails with [`CurveError::OutOfRange`] if `x >= p` and with
/// [`CurveError::NotOnCurve`] if `x^3 + 7` has no square root mod p.
pub fn lift_x(x: &[u8; 32]) -> Result<PublicKey, CurveError> {
    // big-endian byte arrays of equal length compare like the integers they encode
    if x[..] >= FIELD_PRIME[..] {
        return Err(CurveError::OutOfRange);
    }
    let xonly = XOnlyPublicKey::from_slice(x).map_err(|_| CurveError::NotOnCurve)?;

    Ok(xonly.public_key(Parity::Even))
}
