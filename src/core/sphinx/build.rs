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

//! Sphinx packet building.

use super::{
	crypto::{gen_kx_public_and_shared_secrets, SharedSecret},
	packet::{pad_message, Packet},
	prp::Prp,
	routing::RoutingInfo,
	suite::{KxSuite, Secp256k1},
};
use crate::core::{config::PacketConfig, error::Error};
use rand::{CryptoRng, Rng};

/// Key-exchange public key for a packet (alpha) and the secret shared with each hop on its path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedKeys<S: KxSuite = Secp256k1> {
	pub alpha: S::Public,
	/// One secret per hop, in path order.
	pub secrets: Vec<SharedSecret>,
}

impl<S: KxSuite> SharedKeys<S> {
	/// Generate a fresh ephemeral key and derive the secrets shared with the nodes in `path`.
	pub fn generate(rng: &mut (impl Rng + CryptoRng), path: &[S::Public]) -> Result<Self, Error> {
		let (alpha, secrets) = gen_kx_public_and_shared_secrets::<S>(rng, path)?;
		Ok(Self { alpha, secrets })
	}
}

/// A packet with everything but the payload. The routing information only depends on the path,
/// so it can be built ahead of time, before the message is known.
pub struct PartialPacket<S: KxSuite = Secp256k1> {
	config: PacketConfig,
	alpha: S::Public,
	routing_info: RoutingInfo,
	prps: Vec<Prp>,
}

impl<S: KxSuite> PartialPacket<S> {
	/// See [`RoutingInfo::new`] for the requirements on `relayer_data` and `last_hop_data`.
	pub fn new(
		config: &PacketConfig,
		shared_keys: &SharedKeys<S>,
		path: &[S::Public],
		relayer_data: &[&[u8]],
		last_hop_data: Option<&[u8]>,
	) -> Result<Self, Error> {
		config.validate_for::<S>()?;
		let routing_info =
			RoutingInfo::new(config, path, &shared_keys.secrets, relayer_data, last_hop_data)?;
		let prps = shared_keys
			.secrets
			.iter()
			.map(|secret| Prp::from_secret(secret))
			.collect::<Result<_, _>>()?;
		Ok(Self { config: *config, alpha: shared_keys.alpha, routing_info, prps })
	}

	/// Complete the packet with the given message.
	pub fn into_packet(self, message: &[u8]) -> Result<Packet<S>, Error> {
		let mut payload = pad_message(&self.config, message)?;
		for prp in self.prps.iter().rev() {
			prp.permutate(&mut payload)?;
		}
		log::trace!(
			target: "onion",
			"Built packet for {} hops with {} byte message",
			self.prps.len(),
			message.len()
		);
		Ok(Packet::from_parts(
			&self.config,
			self.alpha.as_ref(),
			&self.routing_info.routing_information,
			&self.routing_info.mac,
			&payload,
		))
	}
}

impl<S: KxSuite> Packet<S> {
	/// Build a packet carrying `message` along `path`, using previously generated shared keys.
	/// The message length is checked before doing any cryptographic work.
	pub fn create(
		config: &PacketConfig,
		shared_keys: &SharedKeys<S>,
		message: &[u8],
		path: &[S::Public],
		relayer_data: &[&[u8]],
		last_hop_data: Option<&[u8]>,
	) -> Result<Self, Error> {
		check_message_len::<S>(config, message)?;
		PartialPacket::new(config, shared_keys, path, relayer_data, last_hop_data)?
			.into_packet(message)
	}

	/// Generate shared keys for `path` and build a packet with them. The shared keys are returned
	/// alongside the packet; the secrets are needed to derive the ticket challenges for the hops.
	pub fn new(
		rng: &mut (impl Rng + CryptoRng),
		config: &PacketConfig,
		message: &[u8],
		path: &[S::Public],
		relayer_data: &[&[u8]],
		last_hop_data: Option<&[u8]>,
	) -> Result<(Self, SharedKeys<S>), Error> {
		check_message_len::<S>(config, message)?;
		let shared_keys = SharedKeys::generate(rng, path)?;
		let packet =
			Self::create(config, &shared_keys, message, path, relayer_data, last_hop_data)?;
		Ok((packet, shared_keys))
	}
}

fn check_message_len<S: KxSuite>(config: &PacketConfig, message: &[u8]) -> Result<(), Error> {
	config.validate_for::<S>()?;
	if message.len() > config.max_message_len() {
		log::debug!(target: "onion", "Message of {} bytes does not fit in a packet", message.len());
		return Err(Error::MessageTooLarge(message.len()))
	}
	Ok(())
}
