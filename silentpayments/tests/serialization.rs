#![cfg(feature = "serde")]

use silentpayments::protocol::{create_outputs, InputKey, Outpoint, TaprootOutput};
use silentpayments::secp256k1::SecretKey;
use silentpayments::{Network, SilentPaymentAddress, SpKeyPair};

const ADDRESS: &str = "sp1qqvdcf32k0vfxgsyet5ldt246q4jaw8scx3sysx0lnstlt6w4m5rc7qjdfdkdzdssxt9fh54wh8vsp2jdghv74kq2e9prxaxy2xnj2ng8vct7nplx";

#[test]
fn address_as_string() {
    let address = SilentPaymentAddress::try_from(ADDRESS).unwrap();
    let json = serde_json::to_string(&address).unwrap();
    assert_eq!(json, format!("\"{}\"", ADDRESS));

    let parsed: SilentPaymentAddress = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, address);

    assert!(serde_json::from_str::<SilentPaymentAddress>("\"bc1qxyz\"").is_err());
}

#[test]
fn outputs_to_json() {
    let keys = SpKeyPair::new(
        SecretKey::from_slice(&[0x01; 32]).unwrap(),
        SecretKey::from_slice(&[0x02; 32]).unwrap(),
        Network::Mainnet,
    )
    .unwrap();
    let outputs = create_outputs(
        vec![Outpoint::new([0x05; 32], 2)],
        &[InputKey::new(SecretKey::from_slice(&[0x03; 32]).unwrap())],
        &[silentpayments::Destination::new(keys.get_address(), 777)],
        Network::Mainnet,
    )
    .unwrap();

    let output = &outputs[ADDRESS][0];
    let json = serde_json::to_value(output).unwrap();
    assert_eq!(json["amount"], 777);
    assert_eq!(json["address"], output.address.as_str());

    let back: TaprootOutput = serde_json::from_value(json).unwrap();
    assert_eq!(&back, output);
}
