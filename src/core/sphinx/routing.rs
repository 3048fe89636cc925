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

//! Routing information: a fixed-size header holding one encrypted block per hop.
//!
//! The header is built back to front. Each hop's block is prepended to the (encrypted) header
//! for the rest of the path, the result is truncated to the fixed header size and encrypted with
//! the hop's keystream, and a MAC is computed over it. The MAC is carried in the block of the
//! previous hop, so checking the outermost MAC transitively authenticates the whole header.
//!
//! When a relay peels its block, it shifts the header left by one block and appends keystream
//! bytes in place of the block it removed. The sender predicts these bytes (the filler) so that
//! every MAC along the path still verifies.

use super::{
	crypto::{compute_mac, derive_mac_key, mac_ok, Prg, SharedSecret},
	packet::{Mac, END_MARKER, MAC_SIZE},
};
use crate::core::{
	config::{PacketConfig, END_MARKER_SIZE},
	error::Error,
};
use arrayref::array_ref;

/// Routing information for a whole path, along with the MAC for the first hop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingInfo {
	pub routing_information: Box<[u8]>,
	pub mac: Mac,
}

/// Generate the filler: the keystream bytes that will be appended to the header as it travels
/// along the path, as seen by the last hop. `(secrets.len() - 1) * per_hop_len` bytes.
fn generate_filler(config: &PacketConfig, secrets: &[SharedSecret]) -> Result<Vec<u8>, Error> {
	let per_hop_len = config.per_hop_len();
	let header_len = config.header_len();
	let relays = secrets.len().saturating_sub(1);

	let mut filler = vec![0; relays * per_hop_len];
	for (i, secret) in secrets[..relays].iter().enumerate() {
		// Hop i appends per_hop_len bytes of keystream starting at header_len; by the last hop
		// these have been shifted left by (relays - 1 - i) blocks
		let start = header_len - i * per_hop_len;
		let len = (i + 1) * per_hop_len;
		Prg::from_secret(secret)?.apply_keystream(&mut filler[..len], start);
	}
	Ok(filler)
}

impl RoutingInfo {
	/// Build the routing information for the given path.
	///
	/// `path` and `secrets` must have the same length: the number of hops, at most
	/// `config.max_hops`. Each node in `path` must be an encoded public key of
	/// `config.kx_public_size` bytes. `relayer_data` must have one entry for each hop but the
	/// last, each exactly `config.relayer_data_len` bytes long. If `last_hop_data` is `None`,
	/// zeros are used.
	pub fn new(
		config: &PacketConfig,
		path: &[impl AsRef<[u8]>],
		secrets: &[SharedSecret],
		relayer_data: &[&[u8]],
		last_hop_data: Option<&[u8]>,
	) -> Result<Self, Error> {
		config.validate()?;
		let num_hops = secrets.len();
		if num_hops == 0 || num_hops > config.max_hops || path.len() != num_hops {
			return Err(Error::InvalidPath(path.len()))
		}
		// A node starting with the end marker would make its relay block look like the last hop's
		if path.iter().any(|node| {
			let node = node.as_ref();
			node.len() != config.kx_public_size || node[0] == END_MARKER
		}) {
			return Err(Error::InvalidKey)
		}
		if relayer_data.len() != num_hops - 1 ||
			relayer_data.iter().any(|data| data.len() != config.relayer_data_len)
		{
			return Err(Error::InvalidRelayerData)
		}
		if last_hop_data.map_or(false, |data| data.len() != config.last_hop_data_len) {
			return Err(Error::InvalidLastHopData)
		}

		let per_hop_len = config.per_hop_len();
		let last_hop_len = config.last_hop_len();
		let header_len = config.header_len();
		let padding_len = (config.max_hops - num_hops) * per_hop_len;

		// One block longer than the header so that each relay block can be prepended by shifting
		let mut header = vec![0; header_len + per_hop_len];
		let mut mac = [0; MAC_SIZE];

		for (i, secret) in secrets.iter().enumerate().rev() {
			let prg = Prg::from_secret(secret)?;
			if i == num_hops - 1 {
				header[0] = END_MARKER;
				if let Some(data) = last_hop_data {
					header[END_MARKER_SIZE..last_hop_len].copy_from_slice(data);
				}
				let end = last_hop_len + padding_len;
				if padding_len != 0 {
					header[last_hop_len..end]
						.copy_from_slice(&Prg::padding_from_secret(secret)?.digest(0, padding_len));
				}
				prg.apply_keystream(&mut header[..end], 0);
				header[end..header_len].copy_from_slice(&generate_filler(config, secrets)?);
			} else {
				header.copy_within(..header_len, per_hop_len);
				let (next_node, rest) = header[..per_hop_len].split_at_mut(config.kx_public_size);
				let (next_mac, data) = rest.split_at_mut(MAC_SIZE);
				next_node.copy_from_slice(path[i + 1].as_ref());
				next_mac.copy_from_slice(&mac);
				data.copy_from_slice(relayer_data[i]);
				prg.apply_keystream(&mut header[..header_len], 0);
			}
			mac = compute_mac(&header[..header_len], &derive_mac_key(secret)?);
		}

		header.truncate(header_len);
		Ok(Self { routing_information: header.into_boxed_slice(), mac })
	}
}

/// Result of peeling one layer off the routing information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForwardedHeader {
	/// The packet should be forwarded to `next_node`.
	Relay {
		/// Routing information for the next hop.
		header: Box<[u8]>,
		/// MAC for the next hop.
		mac: Mac,
		/// Encoded public key of the next hop.
		next_node: Box<[u8]>,
		additional_info: Box<[u8]>,
	},
	/// We are the final recipient.
	Final { additional_data: Box<[u8]> },
}

/// Check the MAC of `header` and peel the layer belonging to the hop with the given secret.
pub fn forward_header(
	secret: &SharedSecret,
	header: &[u8],
	mac: &Mac,
	config: &PacketConfig,
) -> Result<ForwardedHeader, Error> {
	config.validate()?;
	let per_hop_len = config.per_hop_len();
	let header_len = config.header_len();
	if header.len() != header_len {
		return Err(Error::InvalidPacketLength(header.len()))
	}

	if !mac_ok(mac, header, &derive_mac_key(secret)?) {
		return Err(Error::MacMismatch)
	}

	// Decrypt the header and generate the bytes that replace our block in one pass
	let mut header = {
		let mut extended = Vec::with_capacity(header_len + per_hop_len);
		extended.extend_from_slice(header);
		extended.resize(header_len + per_hop_len, 0);
		extended
	};
	Prg::from_secret(secret)?.apply_keystream(&mut header, 0);

	if header[0] == END_MARKER {
		return Ok(ForwardedHeader::Final {
			additional_data: header[END_MARKER_SIZE..config.last_hop_len()].into(),
		})
	}

	let kx_public_size = config.kx_public_size;
	Ok(ForwardedHeader::Relay {
		next_node: header[..kx_public_size].into(),
		mac: *array_ref![header, kx_public_size, MAC_SIZE],
		additional_info: header[kx_public_size + MAC_SIZE..per_hop_len].into(),
		header: header[per_hop_len..].into(),
	})
}

#[cfg(test)]
mod tests {
	use super::{
		super::{
			crypto::SHARED_SECRET_SIZE,
			packet::{KxPublic, KX_PUBLIC_SIZE},
		},
		*,
	};
	use rand::{Rng, RngCore};

	fn gen_secrets(rng: &mut impl RngCore, num_hops: usize) -> Vec<SharedSecret> {
		(0..num_hops)
			.map(|_| {
				let mut secret = [0; SHARED_SECRET_SIZE];
				rng.fill_bytes(&mut secret);
				secret
			})
			.collect()
	}

	fn gen_path(rng: &mut impl RngCore, num_hops: usize) -> Vec<KxPublic> {
		(0..num_hops)
			.map(|_| {
				let mut node = [0; KX_PUBLIC_SIZE];
				rng.fill_bytes(&mut node);
				// Only the prefix matters to the codec
				node[0] = 2;
				node
			})
			.collect()
	}

	fn gen_data(rng: &mut impl RngCore, count: usize, len: usize) -> Vec<Vec<u8>> {
		(0..count)
			.map(|_| {
				let mut data = vec![0; len];
				rng.fill_bytes(&mut data);
				data
			})
			.collect()
	}

	#[test]
	fn filler() {
		let config = PacketConfig::new(3, 32, 33, 0).unwrap();
		let mut rng = rand::thread_rng();
		let secrets = gen_secrets(&mut rng, 3);
		let filler = generate_filler(&config, &secrets).unwrap();
		assert_eq!(filler.len(), 2 * config.per_hop_len());

		// Simulate the first two hops appending keystream and shifting
		let per_hop_len = config.per_hop_len();
		let header_len = config.header_len();
		let mut appended = vec![0; 2 * per_hop_len];
		for (i, secret) in secrets[..2].iter().enumerate() {
			let stream = Prg::from_secret(secret)
				.unwrap()
				.digest(header_len - i * per_hop_len, header_len + per_hop_len);
			for (a, s) in appended[..(i + 1) * per_hop_len].iter_mut().zip(&stream) {
				*a ^= *s;
			}
		}
		assert_eq!(filler, appended);

		assert!(generate_filler(&config, &secrets[..1]).unwrap().is_empty());
	}

	#[test]
	fn round_trip() {
		let mut rng = rand::thread_rng();
		for last_hop_data_len in [0, 7] {
			let config = PacketConfig::new(4, 32, 20, last_hop_data_len).unwrap();
			for num_hops in 1..=config.max_hops {
				let secrets = gen_secrets(&mut rng, num_hops);
				let path = gen_path(&mut rng, num_hops);
				let relayer_data = gen_data(&mut rng, num_hops - 1, config.relayer_data_len);
				let relayer_data: Vec<&[u8]> = relayer_data.iter().map(Vec::as_slice).collect();
				let last_hop_data = gen_data(&mut rng, 1, last_hop_data_len).remove(0);

				let info = RoutingInfo::new(
					&config,
					&path,
					&secrets,
					&relayer_data,
					Some(&last_hop_data[..]),
				)
				.unwrap();
				assert_eq!(info.routing_information.len(), config.header_len());

				let mut header = info.routing_information;
				let mut mac = info.mac;
				for (i, secret) in secrets.iter().enumerate() {
					match forward_header(secret, &header, &mac, &config).unwrap() {
						ForwardedHeader::Relay {
							header: next_header,
							mac: next_mac,
							next_node,
							additional_info,
						} => {
							assert!(i + 1 < num_hops);
							assert_eq!(&*next_node, &path[i + 1][..]);
							assert_eq!(&*additional_info, relayer_data[i]);
							assert_eq!(next_header.len(), config.header_len());
							header = next_header;
							mac = next_mac;
						},
						ForwardedHeader::Final { additional_data } => {
							assert_eq!(i + 1, num_hops);
							assert_eq!(&*additional_data, &last_hop_data[..]);
						},
					}
				}
			}
		}
	}

	#[test]
	fn missing_last_hop_data_is_zeros() {
		let config = PacketConfig::new(2, 32, 0, 5).unwrap();
		let secrets = gen_secrets(&mut rand::thread_rng(), 1);
		let path = gen_path(&mut rand::thread_rng(), 1);
		let info = RoutingInfo::new(&config, &path, &secrets, &[], None).unwrap();
		assert_eq!(
			forward_header(&secrets[0], &info.routing_information, &info.mac, &config),
			Ok(ForwardedHeader::Final { additional_data: vec![0; 5].into() })
		);
	}

	#[test]
	fn tampering_detected() {
		let config = PacketConfig::new(3, 32, 8, 0).unwrap();
		let mut rng = rand::thread_rng();
		let secrets = gen_secrets(&mut rng, 3);
		let path = gen_path(&mut rng, 3);
		let relayer_data = gen_data(&mut rng, 2, 8);
		let relayer_data: Vec<&[u8]> = relayer_data.iter().map(Vec::as_slice).collect();
		let info = RoutingInfo::new(&config, &path, &secrets, &relayer_data, None).unwrap();

		for byte in 0..config.header_len() {
			let mut header = info.routing_information.clone();
			header[byte] ^= 1u8 << rng.gen_range(0..8u32);
			assert_eq!(
				forward_header(&secrets[0], &header, &info.mac, &config),
				Err(Error::MacMismatch)
			);
		}
		for bit in 0..MAC_SIZE * 8 {
			let mut mac = info.mac;
			mac[bit / 8] ^= 1 << (bit % 8);
			assert_eq!(
				forward_header(&secrets[0], &info.routing_information, &mac, &config),
				Err(Error::MacMismatch)
			);
		}
		assert_eq!(
			forward_header(&secrets[1], &info.routing_information, &info.mac, &config),
			Err(Error::MacMismatch)
		);
	}

	#[test]
	fn invalid_inputs() {
		let config = PacketConfig::new(2, 32, 4, 2).unwrap();
		let mut rng = rand::thread_rng();
		let secrets = gen_secrets(&mut rng, 3);
		let path = gen_path(&mut rng, 3);

		assert_eq!(
			RoutingInfo::new(&config, &path, &secrets, &[&[0; 4], &[0; 4]], None),
			Err(Error::InvalidPath(3))
		);
		assert_eq!(
			RoutingInfo::new(&config, &path[..0], &[], &[], None),
			Err(Error::InvalidPath(0))
		);
		assert_eq!(
			RoutingInfo::new(&config, &path[..2], &secrets[..2], &[], None),
			Err(Error::InvalidRelayerData)
		);
		assert_eq!(
			RoutingInfo::new(&config, &path[..2], &secrets[..2], &[&[0; 3]], None),
			Err(Error::InvalidRelayerData)
		);
		assert_eq!(
			RoutingInfo::new(&config, &path[..2], &secrets[..2], &[&[0; 4]], Some(&[0; 3][..])),
			Err(Error::InvalidLastHopData)
		);
		assert_eq!(
			forward_header(&secrets[0], &[0; 3], &[0; MAC_SIZE], &config),
			Err(Error::InvalidPacketLength(3))
		);

		let mut bad_path = path[..2].to_vec();
		bad_path[1][0] = END_MARKER;
		assert_eq!(
			RoutingInfo::new(&config, &bad_path, &secrets[..2], &[&[0; 4]], None),
			Err(Error::InvalidKey)
		);
		assert_eq!(
			RoutingInfo::new(&config, &[&path[0][..32]], &secrets[..1], &[], None),
			Err(Error::InvalidKey)
		);
	}

	#[test]
	fn invalid_config() {
		let config = PacketConfig { max_hops: 0, ..Default::default() };
		assert_eq!(
			forward_header(&[0; SHARED_SECRET_SIZE], &[], &[0; MAC_SIZE], &config),
			Err(Error::InvalidConfig)
		);
		let secrets = gen_secrets(&mut rand::thread_rng(), 1);
		let path = gen_path(&mut rand::thread_rng(), 1);
		assert_eq!(
			RoutingInfo::new(&config, &path, &secrets, &[], None),
			Err(Error::InvalidConfig)
		);
	}
}
