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

//! Pseudo-random permutation of packet payloads.
//!
//! The permutation alternates keystream encryption of the tail of the data with keyed hashing of
//! the tail into the head. Four rounds with independent keys make a change in any byte of the
//! input affect every byte of the output.

use super::crypto::{apply_keystream, derive_secret};
use crate::core::error::Error;
use arrayref::array_ref;
use blake2::{
	digest::{consts::U32, Mac as DigestMac},
	Blake2bMac,
};
use c2_chacha::{
	stream_cipher::{NewStreamCipher, SyncStreamCipher},
	Ietf,
};
use zeroize::Zeroizing;

const PRP_PERSONAL: &[u8; 16] = b"sphinx-prp-k-iv-";
const PRP_HASH_PERSONAL: &[u8; 16] = b"sphinx-prp-hash-";

const ROUNDS: usize = 4;
/// Size in bytes of the head of the data, which the hash rounds write to.
pub const HASH_LENGTH: usize = 32;
/// Data shorter than this cannot be permuted.
pub const PRP_MIN_LENGTH: usize = HASH_LENGTH;
const ROUND_KEY_SIZE: usize = HASH_LENGTH;
const ROUND_IV_SIZE: usize = 12;
pub const PRP_KEY_SIZE: usize = ROUNDS * ROUND_KEY_SIZE;
pub const PRP_IV_SIZE: usize = ROUNDS * ROUND_IV_SIZE;

pub struct Prp {
	key: Zeroizing<[u8; PRP_KEY_SIZE]>,
	iv: [u8; PRP_IV_SIZE],
}

impl Prp {
	pub fn new(key: [u8; PRP_KEY_SIZE], iv: [u8; PRP_IV_SIZE]) -> Self {
		Self { key: Zeroizing::new(key), iv }
	}

	/// Derive the payload permutation for the hop with the given shared secret.
	pub fn from_secret(secret: &[u8]) -> Result<Self, Error> {
		let mut derived = Zeroizing::new([0; PRP_KEY_SIZE + PRP_IV_SIZE]);
		derive_secret(&mut derived[..], secret, PRP_PERSONAL)?;
		Ok(Self::new(
			*array_ref![derived, 0, PRP_KEY_SIZE],
			*array_ref![derived, PRP_KEY_SIZE, PRP_IV_SIZE],
		))
	}

	fn round_key(&self, round: usize) -> (&[u8; ROUND_KEY_SIZE], &[u8; ROUND_IV_SIZE]) {
		(
			array_ref![self.key, round * ROUND_KEY_SIZE, ROUND_KEY_SIZE],
			array_ref![self.iv, round * ROUND_IV_SIZE, ROUND_IV_SIZE],
		)
	}

	fn encrypt(&self, data: &mut [u8], round: usize) {
		let (key, iv) = self.round_key(round);
		let (head, tail) = data.split_at_mut(HASH_LENGTH);
		let mut round_key = Zeroizing::new(*key);
		apply_keystream(&mut round_key[..], head);
		let mut c = Ietf::new((&*round_key).into(), iv.into());
		c.apply_keystream(tail);
	}

	fn hash(&self, data: &mut [u8], round: usize) {
		let (key, iv) = self.round_key(round);
		let (head, tail) = data.split_at_mut(HASH_LENGTH);
		let mut h = Blake2bMac::<U32>::new_with_salt_and_personal(key, iv, PRP_HASH_PERSONAL)
			.expect("Key, salt, and personalisation sizes are fixed and small enough");
		h.update(tail);
		apply_keystream(head, &h.finalize().into_bytes());
	}

	fn check_len(data: &[u8]) -> Result<(), Error> {
		if data.len() < PRP_MIN_LENGTH {
			return Err(Error::InputTooShort(data.len()))
		}
		Ok(())
	}

	/// Permute `data` in place.
	pub fn permutate(&self, data: &mut [u8]) -> Result<(), Error> {
		Self::check_len(data)?;
		self.encrypt(data, 0);
		self.hash(data, 1);
		self.encrypt(data, 2);
		self.hash(data, 3);
		Ok(())
	}

	/// Undo [`permutate`](Self::permutate).
	pub fn inverse(&self, data: &mut [u8]) -> Result<(), Error> {
		Self::check_len(data)?;
		self.hash(data, 3);
		self.encrypt(data, 2);
		self.hash(data, 1);
		self.encrypt(data, 0);
		Ok(())
	}
}
