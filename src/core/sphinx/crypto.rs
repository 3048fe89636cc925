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

//! Key exchange, secret derivation, MAC computation, and keystream generation.

use super::{
	packet::{Mac, PacketTag, PACKET_TAG_SIZE},
	suite::{KxSuite, SCALAR_SIZE},
};
use crate::core::error::Error;
use arrayref::array_refs;
use blake2::{
	digest::{
		consts::{U16, U32, U64},
		Mac as DigestMac,
	},
	Blake2bMac,
};
use c2_chacha::{
	stream_cipher::{NewStreamCipher, SyncStreamCipher},
	Ietf,
};
use rand::{CryptoRng, Rng};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

const KX_SHARED_SECRET_PERSONAL: &[u8; 16] = b"sphinx-kx-shared";
const KX_BLINDING_FACTOR_PERSONAL: &[u8; 16] = b"sphinx-blind-fac";
const PRG_PERSONAL: &[u8; 16] = b"sphinx-prg-k-iv-";
const PADDING_PRG_PERSONAL: &[u8; 16] = b"sphinx-pad-k-iv-";
const MAC_KEY_PERSONAL: &[u8; 16] = b"sphinx-hdr-mac-k";
const PACKET_TAG_PERSONAL: &[u8; 16] = b"sphinx-pckt-tag-";
const TICKET_KEY_PERSONAL: &[u8; 16] = b"sphinx-ticket-ky";

/// Size in bytes of a [`SharedSecret`].
pub const SHARED_SECRET_SIZE: usize = 32;
/// Produced by key exchange, one per hop.
pub type SharedSecret = [u8; SHARED_SECRET_SIZE];

////////////////////////////////////////////////////////////////////////////////
// Key exchange
////////////////////////////////////////////////////////////////////////////////

/// Derive the public key corresponding to a secret key.
pub fn derive_kx_public<S: KxSuite>(kx_secret: &S::Scalar) -> Result<S::Public, Error> {
	S::encode(&S::mul_base(kx_secret))
}

pub fn derive_kx_shared_secret<S: KxSuite>(
	kx_public: &S::Point,
	kx_secret: &S::Scalar,
) -> Result<SharedSecret, Error> {
	let shared_point = S::encode(&S::mul(kx_public, kx_secret))?;
	let h = Blake2bMac::<U32>::new_with_salt_and_personal(
		shared_point.as_ref(),
		b"",
		KX_SHARED_SECRET_PERSONAL,
	)
	.expect("Key, salt, and personalisation sizes are fixed and small enough");
	Ok(h.finalize().into_bytes().into())
}

fn derive_kx_blinding_factor<S: KxSuite>(
	kx_public: &[u8],
	kx_shared_secret: &SharedSecret,
) -> Result<S::Scalar, Error> {
	let mut h = Blake2bMac::<U32>::new_with_salt_and_personal(
		kx_shared_secret,
		b"",
		KX_BLINDING_FACTOR_PERSONAL,
	)
	.expect("Key, salt, and personalisation sizes are fixed and small enough");
	h.update(kx_public);
	let hash: [u8; SCALAR_SIZE] = h.finalize().into_bytes().into();
	S::hash_to_scalar(&hash)
}

/// Apply the blinding factor to `kx_public`.
pub fn blind_kx_public<S: KxSuite>(
	kx_public: &[u8],
	kx_shared_secret: &SharedSecret,
) -> Result<S::Public, Error> {
	let point = S::decode(kx_public)?;
	S::encode(&S::mul(&point, &derive_kx_blinding_factor::<S>(kx_public, kx_shared_secret)?))
}

/// Generate a public key to go in a packet (alpha) and the corresponding shared secrets for
/// each hop.
pub fn gen_kx_public_and_shared_secrets<S: KxSuite>(
	rng: &mut (impl Rng + CryptoRng),
	their_kx_publics: &[S::Public],
) -> Result<(S::Public, Vec<SharedSecret>), Error> {
	let mut kx_secret = Zeroizing::new(S::gen_scalar(rng));
	let first_kx_public = derive_kx_public::<S>(&kx_secret)?;
	let mut kx_public = first_kx_public;
	let mut kx_shared_secrets = Vec::with_capacity(their_kx_publics.len());

	for (i, their_kx_public) in their_kx_publics.iter().enumerate() {
		let kx_shared_secret =
			derive_kx_shared_secret::<S>(&S::decode(their_kx_public.as_ref())?, &kx_secret)?;
		if i + 1 != their_kx_publics.len() {
			// Multiplying the generator is cheaper than blinding the previous public key
			let blinding_factor =
				derive_kx_blinding_factor::<S>(kx_public.as_ref(), &kx_shared_secret)?;
			*kx_secret = S::mul_scalars(&kx_secret, &blinding_factor);
			kx_public = derive_kx_public::<S>(&kx_secret)?;
		}
		kx_shared_secrets.push(kx_shared_secret);
	}

	Ok((first_kx_public, kx_shared_secrets))
}

/// Relay side of the key exchange: derive the shared secret from the packet's public key and
/// our secret key, and blind the public key for the next hop.
pub fn forward_kx<S: KxSuite>(
	kx_public: &[u8],
	kx_secret: &S::Scalar,
) -> Result<(S::Public, SharedSecret), Error> {
	let kx_shared_secret = derive_kx_shared_secret::<S>(&S::decode(kx_public)?, kx_secret)?;
	Ok((blind_kx_public::<S>(kx_public, &kx_shared_secret)?, kx_shared_secret))
}

////////////////////////////////////////////////////////////////////////////////
// Additional secret derivation
////////////////////////////////////////////////////////////////////////////////

fn as_shared_secret(secret: &[u8]) -> Result<&SharedSecret, Error> {
	secret.try_into().map_err(|_| Error::InvalidSecretLength(secret.len()))
}

pub fn derive_secret(derived: &mut [u8], secret: &[u8], personal: &[u8; 16]) -> Result<(), Error> {
	let shared_secret = as_shared_secret(secret)?;
	for (i, chunk) in derived.chunks_mut(64).enumerate() {
		// This is the construction libsodium uses for crypto_kdf_derive_from_key; see
		// https://doc.libsodium.org/key_derivation/
		let h = Blake2bMac::<U64>::new_with_salt_and_personal(
			shared_secret,
			&i.to_le_bytes(),
			personal,
		)
		.expect("Key, salt, and personalisation sizes are fixed and small enough");
		let out = h.finalize().into_bytes();
		chunk.copy_from_slice(&out[..chunk.len()]);
	}
	Ok(())
}

const MAC_KEY_SIZE: usize = 32;
pub type MacKey = [u8; MAC_KEY_SIZE];

pub fn derive_mac_key(secret: &[u8]) -> Result<MacKey, Error> {
	let mut key = [0; MAC_KEY_SIZE];
	derive_secret(&mut key, secret, MAC_KEY_PERSONAL)?;
	Ok(key)
}

/// Derive the tag a relay uses to recognise replayed packets.
pub fn derive_packet_tag(secret: &[u8]) -> Result<PacketTag, Error> {
	let mut tag = [0; PACKET_TAG_SIZE];
	derive_secret(&mut tag, secret, PACKET_TAG_PERSONAL)?;
	Ok(tag)
}

pub const TICKET_KEY_SIZE: usize = SCALAR_SIZE;
/// Scalar, in the suite's encoding, that a relay learns from its shared secret and uses to
/// unlock its payment ticket.
pub type TicketKey = [u8; TICKET_KEY_SIZE];

pub fn derive_ticket_key<S: KxSuite>(secret: &[u8]) -> Result<TicketKey, Error> {
	let mut derived = Zeroizing::new([0; TICKET_KEY_SIZE]);
	derive_secret(&mut derived[..], secret, TICKET_KEY_PERSONAL)?;
	Ok(S::scalar_to_bytes(&S::hash_to_scalar(&derived)?))
}

/// Commitment to the ticket key of the hop holding `secret`. This is what a sender puts in the
/// additional relayer data of the previous hop.
pub fn derive_ticket_challenge<S: KxSuite>(secret: &[u8]) -> Result<S::Public, Error> {
	let key = derive_ticket_key::<S>(secret)?;
	derive_kx_public::<S>(&S::hash_to_scalar(&key)?)
}

////////////////////////////////////////////////////////////////////////////////
// MAC computation
////////////////////////////////////////////////////////////////////////////////

pub fn compute_mac(data: &[u8], key: &MacKey) -> Mac {
	let mut h = Blake2bMac::<U16>::new_from_slice(key).expect("Key size is fixed and small enough");
	h.update(data);
	h.finalize().into_bytes().into()
}

pub fn mac_ok(mac: &Mac, data: &[u8], key: &MacKey) -> bool {
	compute_mac(data, key)[..].ct_eq(&mac[..]).into()
}

////////////////////////////////////////////////////////////////////////////////
// Keystream generation
////////////////////////////////////////////////////////////////////////////////

pub fn apply_keystream(data: &mut [u8], keystream: &[u8]) {
	for (d, k) in data.iter_mut().zip(keystream) {
		*d ^= *k;
	}
}

pub const PRG_KEY_SIZE: usize = 32;
pub const PRG_IV_SIZE: usize = 12;

/// Pseudo-random generator. Produces any range of a ChaCha20 keystream determined by a key and
/// a nonce.
pub struct Prg {
	key: Zeroizing<[u8; PRG_KEY_SIZE]>,
	iv: [u8; PRG_IV_SIZE],
}

impl Prg {
	pub fn new(key: [u8; PRG_KEY_SIZE], iv: [u8; PRG_IV_SIZE]) -> Self {
		Self { key: Zeroizing::new(key), iv }
	}

	fn derive(secret: &[u8], personal: &[u8; 16]) -> Result<Self, Error> {
		let mut derived = Zeroizing::new([0; PRG_KEY_SIZE + PRG_IV_SIZE]);
		derive_secret(&mut derived[..], secret, personal)?;
		let (key, iv) = array_refs![&*derived, PRG_KEY_SIZE, PRG_IV_SIZE];
		Ok(Self::new(*key, *iv))
	}

	/// Keystream used to encrypt routing information.
	pub fn from_secret(secret: &[u8]) -> Result<Self, Error> {
		Self::derive(secret, PRG_PERSONAL)
	}

	/// Keystream used to pad the routing information of paths shorter than the maximum.
	pub fn padding_from_secret(secret: &[u8]) -> Result<Self, Error> {
		Self::derive(secret, PADDING_PRG_PERSONAL)
	}

	/// Returns bytes `from..to` of the keystream.
	pub fn digest(&self, from: usize, to: usize) -> Vec<u8> {
		debug_assert!(from <= to);
		let mut stream = vec![0; to];
		let mut c = Ietf::new((&*self.key).into(), (&self.iv).into());
		c.apply_keystream(&mut stream);
		stream.split_off(from)
	}

	/// XOR bytes `from..from + data.len()` of the keystream into `data`.
	pub fn apply_keystream(&self, data: &mut [u8], from: usize) {
		apply_keystream(data, &self.digest(from, from + data.len()));
	}
}
