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

//! Sphinx packet peeling.

use super::{
	crypto::{derive_packet_tag, SharedSecret},
	packet::{unpad_message, Packet, PacketTag},
	prp::Prp,
	routing::{forward_header, ForwardedHeader},
	suite::{to_kx_public, KxSuite, Secp256k1},
};
use crate::core::{config::PacketConfig, error::Error, kx_pair::KxPair};

/// Result of peeling one layer off a packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForwardedPacket<S: KxSuite = Secp256k1> {
	/// The packet should be sent on to `next_hop`.
	Relayed {
		/// Packet for the next hop.
		packet: Packet<S>,
		next_hop: S::Public,
		/// Additional data the sender included for us, typically a ticket challenge.
		additional_info: Box<[u8]>,
		/// Secret shared with the sender. Used to derive the ticket key.
		derived_secret: SharedSecret,
		packet_tag: PacketTag,
	},
	/// We are the final recipient.
	Final {
		plain_text: Vec<u8>,
		additional_data: Box<[u8]>,
		derived_secret: SharedSecret,
		packet_tag: PacketTag,
	},
}

impl<S: KxSuite> ForwardedPacket<S> {
	pub fn packet_tag(&self) -> &PacketTag {
		match self {
			ForwardedPacket::Relayed { packet_tag, .. } |
			ForwardedPacket::Final { packet_tag, .. } => packet_tag,
		}
	}

	pub fn derived_secret(&self) -> &SharedSecret {
		match self {
			ForwardedPacket::Relayed { derived_secret, .. } |
			ForwardedPacket::Final { derived_secret, .. } => derived_secret,
		}
	}
}

impl<S: KxSuite> Packet<S> {
	/// Peel one layer off the packet using our key-exchange key pair.
	///
	/// Failures with [`Error::MacMismatch`], [`Error::InvalidKey`], or [`Error::InvalidPadding`]
	/// mean the packet was not built for us or was tampered with; it should be dropped.
	pub fn forward(&self, kx_pair: &KxPair<S>) -> Result<ForwardedPacket<S>, Error> {
		let res = self.forward_inner(kx_pair);
		if let Err(err) = &res {
			log::debug!(target: "onion", "Dropping packet: {err}");
		}
		res
	}

	fn forward_inner(&self, kx_pair: &KxPair<S>) -> Result<ForwardedPacket<S>, Error> {
		let config = self.config();
		let (next_alpha, secret) = kx_pair.forward(self.alpha())?;
		let header = forward_header(&secret, self.routing_info(), self.mac(), config)?;
		let packet_tag = derive_packet_tag(&secret)?;

		let mut payload = self.ciphertext().to_vec();
		Prp::from_secret(&secret)?.inverse(&mut payload)?;

		Ok(match header {
			ForwardedHeader::Relay { header, mac, next_node, additional_info } => {
				log::trace!(target: "onion", "Relaying packet");
				let packet =
					Packet::from_parts(config, next_alpha.as_ref(), &header, &mac, &payload);
				ForwardedPacket::Relayed {
					packet,
					next_hop: to_kx_public::<S>(&next_node)?,
					additional_info,
					derived_secret: secret,
					packet_tag,
				}
			},
			ForwardedHeader::Final { additional_data } => {
				log::trace!(target: "onion", "Packet reached its destination");
				ForwardedPacket::Final {
					plain_text: unpad_message(payload)?,
					additional_data,
					derived_secret: secret,
					packet_tag,
				}
			},
		})
	}
}

/// Parse `bytes` as a packet and peel one layer off it.
pub fn forward_transform<S: KxSuite>(
	config: &PacketConfig,
	kx_pair: &KxPair<S>,
	bytes: &[u8],
) -> Result<ForwardedPacket<S>, Error> {
	Packet::from_bytes(config, bytes)?.forward(kx_pair)
}
