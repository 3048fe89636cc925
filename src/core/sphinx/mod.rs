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

//! Sphinx packet building and peeling.
//!
//! Packets are built by the sender with [`Packet::create`] (or [`Packet::new`]) and peeled, one
//! layer per hop, with [`Packet::forward`]. Each hop learns only the next hop, the data the sender
//! left for it, and a secret shared with the sender.

mod build;
mod crypto;
mod packet;
mod peel;
mod prp;
mod routing;
mod suite;

pub use self::{
	build::{PartialPacket, SharedKeys},
	crypto::{
		derive_kx_shared_secret, derive_packet_tag, derive_ticket_challenge, derive_ticket_key,
		forward_kx, Prg, SharedSecret, TicketKey, PRG_IV_SIZE, PRG_KEY_SIZE, SHARED_SECRET_SIZE,
		TICKET_KEY_SIZE,
	},
	packet::{
		pad_message, unpad_message, KxPublic, Mac, Packet, PacketTag, KX_PUBLIC_SIZE, MAC_SIZE,
		PACKET_TAG_SIZE,
	},
	peel::{forward_transform, ForwardedPacket},
	prp::{Prp, HASH_LENGTH, PRP_IV_SIZE, PRP_KEY_SIZE, PRP_MIN_LENGTH},
	routing::{forward_header, ForwardedHeader, RoutingInfo},
	suite::{KxSuite, Ristretto255, Secp256k1, RISTRETTO_PUBLIC_SIZE, SCALAR_SIZE},
};
