use std::collections::HashMap;

use silentpayments::protocol::{
    create_outputs, CandidateOutput, InputKey, Outpoint, Receiver, ReceiverTweak, Session,
    TaprootOutput,
};
use silentpayments::secp256k1::{PublicKey, SecretKey};
use silentpayments::{curve, taproot, Destination, Network, SpKeyPair};

fn sk(byte: u8) -> SecretKey {
    SecretKey::from_slice(&[byte; 32]).unwrap()
}

fn outpoints() -> Vec<Outpoint> {
    vec![
        Outpoint::from_hex(
            "a1075db55d416d3ca199f55b6084e2115b9345e16c5cf302fc80e9d5fbf5d48d",
            3,
        )
        .unwrap(),
        Outpoint::from_hex(
            "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16",
            0,
        )
        .unwrap(),
        Outpoint::from_hex(
            "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16",
            1,
        )
        .unwrap(),
    ]
}

/// A plain input, a Taproot key-path input and an untweaked Taproot input.
fn inputs() -> Vec<InputKey> {
    vec![
        InputKey::new(sk(0x31)),
        InputKey::taproot(sk(0x32), true),
        InputKey::taproot(sk(0x33), false),
    ]
}

/// The input keys as they appear on chain. Taproot keys are x-only.
fn onchain_pubkeys() -> Vec<PublicKey> {
    let secp = curve::secp();
    let mut keys = vec![sk(0x31).public_key(secp)];

    let (tweaked, _) = taproot::tweak_output_key(secp, &sk(0x32).public_key(secp), None).unwrap();
    keys.push(curve::lift_x(&tweaked.serialize()).unwrap());

    let (untweaked, _) = sk(0x33).x_only_public_key(secp);
    keys.push(curve::lift_x(&untweaked.serialize()).unwrap());
    keys
}

fn candidates(outputs: &HashMap<String, Vec<TaprootOutput>>) -> Vec<CandidateOutput> {
    outputs
        .values()
        .flatten()
        .map(|o| CandidateOutput {
            output_key: o.output_key,
            amount: o.amount,
        })
        .collect()
}

#[test]
fn onchain_keys_give_the_same_session() {
    let sender = Session::from_input_keys(outpoints(), &inputs(), Network::Mainnet).unwrap();
    let receiver =
        Session::from_public_keys(outpoints(), &onchain_pubkeys(), Network::Mainnet).unwrap();

    assert_eq!(sender.get_A_sum(), receiver.get_A_sum());
    assert_eq!(sender.get_input_hash(), receiver.get_input_hash());
}

#[test]
fn several_receivers() {
    let secp = curve::secp();
    let alice_keys = SpKeyPair::new(sk(1), sk(2), Network::Mainnet).unwrap();
    let bob_keys = SpKeyPair::new(sk(3), sk(4), Network::Mainnet).unwrap();
    let alice = Receiver::new(alice_keys, &[]).unwrap();
    let bob = Receiver::new(bob_keys, &[5]).unwrap();

    let destinations = [
        Destination::new(alice.receiving_address(), 1_000),
        Destination::new(bob.receiving_address(), 2_000),
        Destination::new(alice.receiving_address(), 3_000),
        Destination::new(bob.labeled_address(5).unwrap(), 4_000),
        Destination::new(alice.change_address().unwrap(), 5_000),
    ];

    let outputs =
        create_outputs(outpoints(), &inputs(), &destinations, Network::Mainnet).unwrap();
    assert_eq!(outputs[&alice.receiving_address().to_string()].len(), 2);
    assert_eq!(outputs[&bob.receiving_address().to_string()].len(), 1);
    assert_eq!(outputs.values().flatten().count(), 5);

    let session =
        Session::from_public_keys(outpoints(), &onchain_pubkeys(), Network::Mainnet).unwrap();
    let candidates = candidates(&outputs);

    let alice_found = alice.scan(&session, &candidates).unwrap();
    let bob_found = bob.scan(&session, &candidates).unwrap();

    let mut alice_amounts: Vec<u64> = alice_found.values().map(|m| m.amount).collect();
    alice_amounts.sort();
    assert_eq!(alice_amounts, vec![1_000, 3_000, 5_000]);

    let mut bob_amounts: Vec<u64> = bob_found.values().map(|m| m.amount).collect();
    bob_amounts.sort();
    assert_eq!(bob_amounts, vec![2_000, 4_000]);

    for (receiver, found) in [(&alice, &alice_found), (&bob, &bob_found)] {
        for (key, m) in found {
            assert_eq!(key, &hex::encode(m.output_key.serialize()));
            let spend_sk = receiver.spend_key_for(m).unwrap();
            assert_eq!(spend_sk.x_only_public_key(secp).0, m.output_key);
        }
    }

    let labels: Vec<Option<u32>> = {
        let mut l: Vec<_> = bob_found.values().map(|m| m.label).collect();
        l.sort();
        l
    };
    assert_eq!(labels, vec![None, Some(5)]);
}

#[test]
fn every_created_address_is_found() {
    let keys = SpKeyPair::new(sk(7), sk(8), Network::Regtest).unwrap();
    let receiver = Receiver::new(keys, &[1, 2]).unwrap();
    let destinations: Vec<Destination> = (0..6u64)
        .map(|i| match i % 3 {
            0 => Destination::new(receiver.receiving_address(), i),
            n => Destination::new(receiver.labeled_address(n as u32).unwrap(), i),
        })
        .collect();

    let outputs =
        create_outputs(outpoints(), &inputs(), &destinations, Network::Regtest).unwrap();
    let session =
        Session::from_public_keys(outpoints(), &onchain_pubkeys(), Network::Regtest).unwrap();
    let found = receiver.scan(&session, &candidates(&outputs)).unwrap();
    assert_eq!(found.len(), destinations.len());

    for output in outputs.values().flatten() {
        assert!(output.address.starts_with("bcrt1p"));
        let m = &found[&hex::encode(output.output_key.serialize())];
        assert_eq!(m.address, output.address);
        assert_eq!(m.amount, output.amount);
    }
}

#[test]
fn spend_with_indexer_tweak() {
    let secp = curve::secp();
    let keys = SpKeyPair::new(sk(9), sk(10), Network::Testnet).unwrap();
    let destinations = [
        Destination::new(keys.get_address(), 1),
        Destination::new(keys.get_address(), 2),
        Destination::new(keys.get_address(), 3),
    ];
    let outputs =
        create_outputs(outpoints(), &inputs(), &destinations, Network::Testnet).unwrap();

    // an indexer serves only the tweak data, the receiver never sees the inputs
    let tweak_data = Session::from_public_keys(outpoints(), &onchain_pubkeys(), Network::Testnet)
        .unwrap()
        .tweak_data()
        .unwrap();
    let session = Session::from_public_keys(
        vec![Outpoint::new([0; 32], 0)],
        &[sk(1).public_key(secp)],
        Network::Testnet,
    )
    .unwrap()
    .with_receiver_tweak(ReceiverTweak::TweakData(tweak_data));

    let found = session
        .scan_outputs(
            &keys.get_scan_key(),
            &keys.get_address().get_spend_key(),
            &candidates(&outputs),
            None,
        )
        .unwrap();
    assert_eq!(found.len(), 3);

    for m in found.values() {
        let spend_sk = session
            .clone()
            .with_receiver_tweak(ReceiverTweak::OutputTweak(m.tweak))
            .spend_outputs(&keys.get_scan_key(), &keys.get_spend_key())
            .unwrap();
        assert_eq!(spend_sk.x_only_public_key(secp).0, m.output_key);
    }
}

#[test]
fn batch_scan_keeps_order() {
    let keys = SpKeyPair::new(sk(11), sk(12), Network::Mainnet).unwrap();
    let receiver = Receiver::new(keys, &[]).unwrap();
    let other = SpKeyPair::new(sk(13), sk(14), Network::Mainnet).unwrap();

    let transactions: Vec<(Session, Vec<CandidateOutput>)> = (0..8u8)
        .map(|i| {
            let outpoints = vec![Outpoint::new([i; 32], i as u32)];
            let inputs = [InputKey::new(sk(0x40 + i))];
            let to = match i % 2 {
                0 => receiver.receiving_address(),
                _ => other.get_address(),
            };
            let outputs = create_outputs(
                outpoints.clone(),
                &inputs,
                &[Destination::new(to, i as u64)],
                Network::Mainnet,
            )
            .unwrap();
            let session = Session::from_public_keys(
                outpoints,
                &[sk(0x40 + i).public_key(curve::secp())],
                Network::Mainnet,
            )
            .unwrap();
            (session, candidates(&outputs))
        })
        .collect();

    let found = receiver.scan_sessions(&transactions).unwrap();
    assert_eq!(found.len(), 8);
    for (i, result) in found.iter().enumerate() {
        match i % 2 {
            0 => assert_eq!(result.values().next().map(|m| m.amount), Some(i as u64)),
            _ => assert!(result.is_empty()),
        }
    }
}
