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

// Onion packet core logic. Nothing in here does any I/O.

mod config;
mod error;
mod kx_pair;
mod sphinx;

pub use self::{
	config::{
		PacketConfig, DEFAULT_MAX_HOPS, DEFAULT_PAYLOAD_SIZE, END_MARKER_SIZE, PADDING_TAG_SIZE,
	},
	error::Error,
	kx_pair::{KxPair, KX_SECRET_SIZE},
	sphinx::{
		derive_packet_tag, derive_ticket_challenge, derive_ticket_key, forward_header,
		forward_transform, pad_message, unpad_message, ForwardedHeader, ForwardedPacket, KxPublic,
		KxSuite, Mac, Packet, PacketTag, PartialPacket, Prg, Prp, Ristretto255, RoutingInfo,
		Secp256k1, SharedKeys, SharedSecret, TicketKey, HASH_LENGTH, KX_PUBLIC_SIZE, MAC_SIZE,
		PACKET_TAG_SIZE, PRG_IV_SIZE, PRG_KEY_SIZE, PRP_IV_SIZE, PRP_KEY_SIZE, PRP_MIN_LENGTH,
		RISTRETTO_PUBLIC_SIZE, SHARED_SECRET_SIZE, TICKET_KEY_SIZE,
	},
};
