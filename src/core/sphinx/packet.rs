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

//! Sphinx packet format.
//!
//! Packets consist of the following, in order:
//!
//! - Encoded key-exchange public key (alpha in the Sphinx paper).
//! - Routing information (beta in the Sphinx paper).
//! - [`Mac`] over the routing information (gamma in the Sphinx paper).
//! - Ciphertext (delta in the Sphinx paper).
//!
//! The size of each field depends only on the [`PacketConfig`], never on the length of the path,
//! so all packets built with the same configuration are the same size.

use super::suite::{KxSuite, Secp256k1};
use crate::core::{config::PacketConfig, error::Error};
use arrayref::array_ref;
use std::marker::PhantomData;

/// Size in bytes of a [`KxPublic`].
pub const KX_PUBLIC_SIZE: usize = 33;
/// Key-exchange public key of the default suite: a compressed secp256k1 point.
pub type KxPublic = [u8; KX_PUBLIC_SIZE];

pub const MAC_SIZE: usize = 16;
pub type Mac = [u8; MAC_SIZE];

/// Size in bytes of a [`PacketTag`].
pub const PACKET_TAG_SIZE: usize = 16;
/// Identifies a packet at a single hop. A relay that sees the same tag twice is seeing a replay.
pub type PacketTag = [u8; PACKET_TAG_SIZE];

/// First byte of the last hop's routing block. Relay blocks start with an encoded group element,
/// which never has this prefix.
pub const END_MARKER: u8 = 0xff;

/// Byte payloads are padded with.
pub const PADDING: u8 = 0x00;
/// Byte separating payload padding from the message.
pub const PADDING_TAG: u8 = 0xaa;

/// A Sphinx packet, with key exchange over the suite `S`. The bytes always have the length given
/// by the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet<S: KxSuite = Secp256k1> {
	config: PacketConfig,
	bytes: Box<[u8]>,
	_suite: PhantomData<S>,
}

impl<S: KxSuite> Packet<S> {
	/// Parse a packet received from the network.
	pub fn from_bytes(config: &PacketConfig, bytes: &[u8]) -> Result<Self, Error> {
		config.validate_for::<S>()?;
		if bytes.len() != config.packet_len() {
			return Err(Error::InvalidPacketLength(bytes.len()))
		}
		Ok(Self { config: *config, bytes: bytes.into(), _suite: PhantomData })
	}

	pub(super) fn from_parts(
		config: &PacketConfig,
		alpha: &[u8],
		routing_info: &[u8],
		mac: &Mac,
		ciphertext: &[u8],
	) -> Self {
		debug_assert_eq!(alpha.len(), config.kx_public_size);
		debug_assert_eq!(routing_info.len(), config.header_len());
		debug_assert_eq!(ciphertext.len(), config.padded_payload_len());
		let mut bytes = Vec::with_capacity(config.packet_len());
		bytes.extend_from_slice(alpha);
		bytes.extend_from_slice(routing_info);
		bytes.extend_from_slice(mac);
		bytes.extend_from_slice(ciphertext);
		Self { config: *config, bytes: bytes.into_boxed_slice(), _suite: PhantomData }
	}

	pub fn config(&self) -> &PacketConfig {
		&self.config
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	pub fn into_bytes(self) -> Box<[u8]> {
		self.bytes
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	fn routing_info_end(&self) -> usize {
		self.config.kx_public_size + self.config.header_len()
	}

	/// The encoded key-exchange public key.
	pub fn alpha(&self) -> &[u8] {
		&self.bytes[..self.config.kx_public_size]
	}

	pub fn routing_info(&self) -> &[u8] {
		&self.bytes[self.config.kx_public_size..self.routing_info_end()]
	}

	pub fn mac(&self) -> &Mac {
		array_ref![self.bytes, self.routing_info_end(), MAC_SIZE]
	}

	pub fn ciphertext(&self) -> &[u8] {
		&self.bytes[self.routing_info_end() + MAC_SIZE..]
	}
}

impl<S: KxSuite> AsRef<[u8]> for Packet<S> {
	fn as_ref(&self) -> &[u8] {
		&self.bytes
	}
}

/// Pad `message` to the padded payload size: zeros, then the padding tag, then the message.
pub fn pad_message(config: &PacketConfig, message: &[u8]) -> Result<Vec<u8>, Error> {
	config.validate()?;
	if message.len() > config.max_message_len() {
		return Err(Error::MessageTooLarge(message.len()))
	}
	let mut payload = Vec::with_capacity(config.padded_payload_len());
	payload.resize(config.payload_size - message.len(), PADDING);
	payload.push(PADDING_TAG);
	payload.extend_from_slice(message);
	Ok(payload)
}

/// Strip the padding added by [`pad_message`].
pub fn unpad_message(mut payload: Vec<u8>) -> Result<Vec<u8>, Error> {
	match payload.iter().position(|b| *b != PADDING) {
		Some(tag_pos) if payload[tag_pos] == PADDING_TAG => {
			payload.drain(..=tag_pos);
			Ok(payload)
		},
		_ => Err(Error::InvalidPadding),
	}
}
