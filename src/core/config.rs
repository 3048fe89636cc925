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

//! Packet format configuration.

use super::{
	error::Error,
	sphinx::{KxSuite, KX_PUBLIC_SIZE, MAC_SIZE, PRP_MIN_LENGTH},
};

/// Default maximum number of hops, including the final recipient.
pub const DEFAULT_MAX_HOPS: usize = 4;

/// Default size in bytes of the largest message a packet can carry.
pub const DEFAULT_PAYLOAD_SIZE: usize = 500;

/// Size in bytes of the end-of-path marker at the start of the last hop's routing block.
pub const END_MARKER_SIZE: usize = 1;

/// Size in bytes of the padding tag separating padding from the message.
pub const PADDING_TAG_SIZE: usize = 1;

/// Configuration of the packet format. All nodes exchanging packets must agree on it; the
/// packet length is a function of this configuration only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketConfig {
	/// Maximum number of hops a packet can traverse. Sending a packet directly to the final
	/// destination counts as one hop.
	pub max_hops: usize,
	/// Size in bytes of the largest message a packet can carry. The onion-encrypted payload is
	/// [`PADDING_TAG_SIZE`] bytes longer.
	pub payload_size: usize,
	/// Size in bytes of the opaque data carried for each relay (the ticket challenge).
	pub relayer_data_len: usize,
	/// Size in bytes of the opaque data carried for the final recipient.
	pub last_hop_data_len: usize,
	/// Size in bytes of an encoded key-exchange public key. Must match the [`KxSuite`] packets
	/// are built with.
	pub kx_public_size: usize,
}

impl Default for PacketConfig {
	/// Configuration for the default suite, secp256k1.
	fn default() -> Self {
		Self {
			max_hops: DEFAULT_MAX_HOPS,
			payload_size: DEFAULT_PAYLOAD_SIZE,
			relayer_data_len: KX_PUBLIC_SIZE,
			last_hop_data_len: 0,
			kx_public_size: KX_PUBLIC_SIZE,
		}
	}
}

impl PacketConfig {
	/// Configuration for the default suite, secp256k1.
	pub fn new(
		max_hops: usize,
		payload_size: usize,
		relayer_data_len: usize,
		last_hop_data_len: usize,
	) -> Result<Self, Error> {
		let config = Self {
			max_hops,
			payload_size,
			relayer_data_len,
			last_hop_data_len,
			kx_public_size: KX_PUBLIC_SIZE,
		};
		config.validate()?;
		Ok(config)
	}

	/// Default configuration for the suite `S`. Relays carry one encoded public key each, the
	/// size of a ticket challenge.
	pub fn for_suite<S: KxSuite>() -> Self {
		Self {
			relayer_data_len: S::PUBLIC_SIZE,
			kx_public_size: S::PUBLIC_SIZE,
			..Default::default()
		}
	}

	/// Check the configuration describes a usable packet format.
	pub fn validate(&self) -> Result<(), Error> {
		if self.max_hops == 0 ||
			self.kx_public_size == 0 ||
			self.padded_payload_len() < PRP_MIN_LENGTH
		{
			return Err(Error::InvalidConfig)
		}
		Ok(())
	}

	/// Like [`validate`](Self::validate), also checking the public key size matches the suite.
	pub fn validate_for<S: KxSuite>(&self) -> Result<(), Error> {
		self.validate()?;
		if self.kx_public_size != S::PUBLIC_SIZE {
			return Err(Error::InvalidConfig)
		}
		Ok(())
	}

	/// Size in bytes of a relay's routing block.
	pub fn per_hop_len(&self) -> usize {
		self.kx_public_size + MAC_SIZE + self.relayer_data_len
	}

	/// Size in bytes of the last hop's routing block.
	pub fn last_hop_len(&self) -> usize {
		END_MARKER_SIZE + self.last_hop_data_len
	}

	/// Size in bytes of the routing information.
	pub fn header_len(&self) -> usize {
		self.last_hop_len() + (self.max_hops - 1) * self.per_hop_len()
	}

	/// Size in bytes of the onion-encrypted payload: the padding tag, then the message, with
	/// zeros in front.
	pub fn padded_payload_len(&self) -> usize {
		self.payload_size + PADDING_TAG_SIZE
	}

	/// Size in bytes of a whole packet.
	pub fn packet_len(&self) -> usize {
		self.kx_public_size + self.header_len() + MAC_SIZE + self.padded_payload_len()
	}

	/// Largest message that fits in a packet.
	pub fn max_message_len(&self) -> usize {
		self.payload_size
	}
}
