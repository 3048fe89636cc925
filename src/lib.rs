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

//! Fixed-size Sphinx onion packets for a payment-incentivised mix network.
//!
//! A sender wraps a message in one layer of encryption per hop with [`Packet::create`]. Each
//! node on the path peels its layer with [`Packet::forward`], learning only the next hop, a
//! secret it shares with the sender (from which it derives its ticket key), and whatever
//! additional data the sender left for it. All packets built with the same [`PacketConfig`] have
//! the same length, whatever the length of their path.
//!
//! The key exchange runs over a [`KxSuite`]. By default this is [`Secp256k1`], with public keys
//! travelling as 33-byte compressed points; [`Ristretto255`] is also available. Packets, key
//! pairs, and shared keys are generic over the suite, defaulting to secp256k1.

pub mod core;

pub use crate::core::{
	derive_ticket_challenge, derive_ticket_key, forward_transform, Error, ForwardedPacket,
	KxPair, KxPublic, KxSuite, Packet, PacketConfig, PacketTag, PartialPacket, Ristretto255,
	Secp256k1, SharedKeys, SharedSecret,
};
