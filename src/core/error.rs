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

//! Error handling

use thiserror::Error;

/// Onion packet error.
///
/// None of these are transient: retrying the same operation on the same input always gives the
/// same result.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// A shared secret of the wrong size was given to a key derivation function.
	#[error("Invalid shared secret length: {0} bytes.")]
	InvalidSecretLength(usize),
	/// Private key is malformed or a group element does not decode to a valid curve point.
	#[error("Invalid key or group element.")]
	InvalidKey,
	/// Routing header authentication failed.
	#[error("MAC mismatch.")]
	MacMismatch,
	/// PRP input is shorter than the minimum block size.
	#[error("PRP input too short: {0} bytes.")]
	InputTooShort(usize),
	/// Message does not fit in the packet payload.
	#[error("Message too large: {0} bytes.")]
	MessageTooLarge(usize),
	/// Path is empty or longer than the configured maximum number of hops.
	#[error("Invalid path length: {0}.")]
	InvalidPath(usize),
	/// Wrong number of relayer data entries, or an entry of the wrong size.
	#[error("Invalid additional relayer data.")]
	InvalidRelayerData,
	/// Additional data for the last hop has the wrong size.
	#[error("Invalid additional last hop data.")]
	InvalidLastHopData,
	/// Packet bytes do not have the configured packet length.
	#[error("Invalid packet length: {0} bytes.")]
	InvalidPacketLength(usize),
	/// Decrypted payload carries no padding tag.
	#[error("Invalid payload padding.")]
	InvalidPadding,
	/// Packet configuration cannot describe a usable packet format.
	#[error("Invalid packet configuration.")]
	InvalidConfig,
}

impl Error {
	/// Returns `true` if a relay receiving a packet that fails with this error should drop the
	/// packet without telling anyone why. Other errors indicate a bug in the caller.
	pub fn is_silent_drop(&self) -> bool {
		matches!(self, Error::MacMismatch | Error::InvalidKey | Error::InvalidPadding)
	}
}
