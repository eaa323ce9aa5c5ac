use secp256k1::{PublicKey, Secp256k1, SecretKey, Verification};

use crate::curve;
use crate::hash::{tagged_hash, TAG_SHARED_SECRET};
use crate::Result;

/// t_k = hash_BIP0352/SharedSecret(ser_P(ecdh_shared_secret) || ser32(k))
pub fn calculate_t_k(ecdh_shared_secret: &PublicKey, k: u32) -> Result<SecretKey> {
    let mut data = [0u8; 33 + 4];
    data[..33].copy_from_slice(&ecdh_shared_secret.serialize());
    data[33..].copy_from_slice(&k.to_be_bytes());

    Ok(curve::parse_scalar(&tagged_hash(TAG_SHARED_SECRET, &data))?)
}

/// P_k = B_spend + t_k·G
pub fn calculate_P_k<C: Verification>(
    secp: &Secp256k1<C>,
    B_spend: &PublicKey,
    t_k: &SecretKey,
) -> Result<PublicKey> {
    Ok(curve::point_add_base_mul(secp, B_spend, t_k)?)
}

/// input_hash·A, the per-transaction value a receiver combines with its scan key.
pub fn calculate_tweak_data<C: Verification>(
    secp: &Secp256k1<C>,
    A_sum: &PublicKey,
    input_hash: &SecretKey,
) -> Result<PublicKey> {
    Ok(curve::point_mul(secp, A_sum, input_hash)?)
}

/// Sender side: (a_sum·input_hash)·B_scan
pub fn calculate_sender_shared_secret<C: Verification>(
    secp: &Secp256k1<C>,
    B_scan: &PublicKey,
    partial_secret: &SecretKey,
) -> Result<PublicKey> {
    Ok(curve::point_mul(secp, B_scan, partial_secret)?)
}

/// Receiver side: b_scan·tweak_data
pub fn calculate_receiver_shared_secret<C: Verification>(
    secp: &Secp256k1<C>,
    tweak_data: &PublicKey,
    b_scan: &SecretKey,
) -> Result<PublicKey> {
    Ok(curve::point_mul(secp, tweak_data, b_scan)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecdh_is_symmetric() {
        let secp = curve::secp();
        let a = SecretKey::from_slice(&[0x11; 32]).unwrap();
        let b_scan = SecretKey::from_slice(&[0x22; 32]).unwrap();
        let input_hash = SecretKey::from_slice(&[0x33; 32]).unwrap();

        let partial = curve::scalar_mul(&a, &input_hash).unwrap();
        let sender =
            calculate_sender_shared_secret(secp, &curve::base_mul(secp, &b_scan), &partial)
                .unwrap();

        let tweak_data =
            calculate_tweak_data(secp, &curve::base_mul(secp, &a), &input_hash).unwrap();
        let receiver = calculate_receiver_shared_secret(secp, &tweak_data, &b_scan).unwrap();

        assert_eq!(sender, receiver);
    }

    #[test]
    fn t_k_changes_with_k() {
        let secp = curve::secp();
        let secret = curve::base_mul(secp, &SecretKey::from_slice(&[0x44; 32]).unwrap());

        let t_0 = calculate_t_k(&secret, 0).unwrap();
        let t_1 = calculate_t_k(&secret, 1).unwrap();
        assert_ne!(t_0, t_1);
        assert_eq!(t_0, calculate_t_k(&secret, 0).unwrap());
    }
}
