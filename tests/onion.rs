// Copyright 2022 Parity Technologies (UK) Ltd.
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
// OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Onion packet tests, sending packets along whole paths.

#[path = "util.rs"]
mod util;

use onion_packet::{
	core::{KX_PUBLIC_SIZE, MAC_SIZE, PADDING_TAG_SIZE},
	derive_ticket_challenge, derive_ticket_key, forward_transform, Error, ForwardedPacket, KxPair,
	KxSuite, Packet, PacketConfig, Ristretto255, Secp256k1, SharedKeys,
};
use rand::Rng;
use util::{gen_nodes, init_logging};

/// Send `message` along the path, returning what the last node received, and check each relay
/// learns what the sender intended.
fn send<S: KxSuite>(
	config: &PacketConfig,
	nodes: &[KxPair<S>],
	shared_keys: &SharedKeys<S>,
	mut packet: Packet<S>,
	relayer_data: &[&[u8]],
) -> Vec<u8> {
	for (i, node) in nodes.iter().enumerate() {
		let bytes = packet.into_bytes();
		assert_eq!(bytes.len(), config.packet_len());
		match forward_transform(config, node, &bytes).unwrap() {
			ForwardedPacket::Relayed {
				packet: next, next_hop, additional_info, derived_secret, ..
			} => {
				assert_eq!(&next_hop, nodes[i + 1].public());
				assert_eq!(&*additional_info, relayer_data[i]);
				assert_eq!(derived_secret, shared_keys.secrets[i]);
				packet = next;
			},
			ForwardedPacket::Final { plain_text, derived_secret, .. } => {
				assert_eq!(i + 1, nodes.len());
				assert_eq!(derived_secret, shared_keys.secrets[i]);
				return plain_text
			},
		}
	}
	panic!("Packet never reached its destination")
}

#[test]
fn three_hops() {
	init_logging();
	let mut rng = rand::thread_rng();
	let config = PacketConfig { max_hops: 3, payload_size: 500, ..Default::default() };
	let (nodes, path) = gen_nodes::<Secp256k1>(&mut rng, 3);

	let shared_keys = SharedKeys::<Secp256k1>::generate(&mut rng, &path).unwrap();
	let challenges: Vec<_> = shared_keys.secrets[1..]
		.iter()
		.map(|secret| derive_ticket_challenge::<Secp256k1>(secret).unwrap())
		.collect();
	let relayer_data: Vec<&[u8]> = challenges.iter().map(|c| &c[..]).collect();

	let packet =
		Packet::create(&config, &shared_keys, b"hello", &path, &relayer_data, None).unwrap();
	let per_hop_len = KX_PUBLIC_SIZE + MAC_SIZE + config.relayer_data_len;
	let last_hop_len = 1 + config.last_hop_data_len;
	let expected_len =
		KX_PUBLIC_SIZE + (2 * per_hop_len + last_hop_len) + MAC_SIZE + 500 + PADDING_TAG_SIZE;
	assert_eq!(packet.len(), expected_len);
	assert_eq!(config.packet_len(), expected_len);

	assert_eq!(send(&config, &nodes, &shared_keys, packet, &relayer_data), b"hello");

	// Each relay can check the challenge it was given against the next hop's ticket key
	for (challenge, secret) in challenges.iter().zip(&shared_keys.secrets[1..]) {
		let key = derive_ticket_key::<Secp256k1>(secret).unwrap();
		let kx_pair: KxPair = KxPair::from_secret_bytes(&key).unwrap();
		assert_eq!(kx_pair.public(), challenge);
	}
}

fn all_path_lengths_with<S: KxSuite>(config: &PacketConfig) {
	let mut rng = rand::thread_rng();
	for num_hops in 1..=config.max_hops {
		let (nodes, path) = gen_nodes::<S>(&mut rng, num_hops);
		let relayer_data: Vec<Vec<u8>> = (1..num_hops)
			.map(|_| (0..config.relayer_data_len).map(|_| rng.gen()).collect())
			.collect();
		let relayer_data: Vec<&[u8]> = relayer_data.iter().map(Vec::as_slice).collect();
		let mut message = vec![0; rng.gen_range(0..=config.max_message_len())];
		rng.fill(&mut message[..]);

		let (packet, shared_keys) =
			Packet::<S>::new(&mut rng, config, &message, &path, &relayer_data, None).unwrap();
		assert_eq!(packet.len(), config.packet_len());
		assert_eq!(send(config, &nodes, &shared_keys, packet, &relayer_data), message);
	}
}

#[test]
fn all_path_lengths() {
	init_logging();
	let config = PacketConfig { max_hops: 5, relayer_data_len: 12, ..Default::default() };
	all_path_lengths_with::<Secp256k1>(&config);
	let config = PacketConfig { max_hops: 5, ..PacketConfig::for_suite::<Ristretto255>() };
	all_path_lengths_with::<Ristretto255>(&config);
}

#[test]
fn largest_message() {
	let mut rng = rand::thread_rng();
	let config = PacketConfig::default();
	let (nodes, path) = gen_nodes::<Secp256k1>(&mut rng, 2);
	let relayer_data: &[&[u8]] = &[&[7; 33]];

	// A message of exactly the payload size fits
	let message = vec![7; config.payload_size];
	assert_eq!(config.max_message_len(), config.payload_size);
	let (packet, shared_keys) =
		Packet::<Secp256k1>::new(&mut rng, &config, &message, &path, relayer_data, None).unwrap();
	assert_eq!(send(&config, &nodes, &shared_keys, packet, relayer_data), message);

	let message = vec![0; config.payload_size + 1];
	assert_eq!(
		Packet::<Secp256k1>::new(&mut rng, &config, &message, &path, relayer_data, None).err(),
		Some(Error::MessageTooLarge(config.payload_size + 1))
	);
}

#[test]
fn tampered_routing_info_is_dropped() {
	init_logging();
	let mut rng = rand::thread_rng();
	let config = PacketConfig::default();
	let (nodes, path) = gen_nodes::<Secp256k1>(&mut rng, 3);
	let relayer_data: &[&[u8]] = &[&[1; 33], &[2; 33]];
	let (packet, _) =
		Packet::<Secp256k1>::new(&mut rng, &config, b"x", &path, relayer_data, None).unwrap();
	let bytes = packet.into_bytes();

	// Every byte of the routing information and MAC is covered
	for byte in KX_PUBLIC_SIZE..KX_PUBLIC_SIZE + config.header_len() + MAC_SIZE {
		let mut tampered = bytes.clone();
		tampered[byte] ^= 1u8 << rng.gen_range(0..8u32);
		let err = forward_transform(&config, &nodes[0], &tampered).unwrap_err();
		assert_eq!(err, Error::MacMismatch);
		assert!(err.is_silent_drop());
	}
}

#[test]
fn wrong_length() {
	let config = PacketConfig::default();
	let node: KxPair = KxPair::gen(&mut rand::thread_rng());
	assert_eq!(
		forward_transform(&config, &node, &vec![0; config.packet_len() - 1]),
		Err(Error::InvalidPacketLength(config.packet_len() - 1))
	);

	// Configured for the other suite
	let config = PacketConfig::for_suite::<Ristretto255>();
	assert_eq!(
		forward_transform(&config, &node, &vec![0; config.packet_len()]),
		Err(Error::InvalidConfig)
	);
}
