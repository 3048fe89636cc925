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

//! Key-exchange key pair of a node.

use super::{
	error::Error,
	sphinx::{derive_kx_shared_secret, forward_kx, KxSuite, Secp256k1, SharedSecret, SCALAR_SIZE},
};
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

/// Size in bytes of an encoded secret key.
pub const KX_SECRET_SIZE: usize = SCALAR_SIZE;

/// Key-exchange key pair of a node, in the group given by the suite `S`.
pub struct KxPair<S: KxSuite = Secp256k1> {
	/// Boxed to avoid leaving copies of the secret key around in memory if `KxPair` is moved.
	secret: Box<Zeroizing<S::Scalar>>,
	public: S::Public,
}

impl<S: KxSuite> KxPair<S> {
	pub fn gen(rng: &mut (impl Rng + CryptoRng)) -> Self {
		Self::from_scalar(S::gen_scalar(rng))
			.expect("Generated secrets are non-zero, so their public keys are never the identity")
	}

	/// Build a key pair from an encoded secret key: big-endian for secp256k1, little-endian for
	/// Ristretto255. Fails with [`Error::InvalidKey`] if the bytes are not a valid, non-zero
	/// scalar.
	pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, Error> {
		let secret: &[u8; KX_SECRET_SIZE] = secret.try_into().map_err(|_| Error::InvalidKey)?;
		Self::from_scalar(S::scalar_from_bytes(secret)?)
	}

	fn from_scalar(secret: S::Scalar) -> Result<Self, Error> {
		let public = S::encode(&S::mul_base(&secret))?;
		// Some copies of the secret will likely be left on the stack here
		Ok(Self { secret: Box::new(Zeroizing::new(secret)), public })
	}

	pub fn public(&self) -> &S::Public {
		&self.public
	}

	/// Diffie-Hellman with `their_public`, hashed to a shared secret.
	pub fn exchange(&self, their_public: &S::Public) -> Result<SharedSecret, Error> {
		derive_kx_shared_secret::<S>(&S::decode(their_public.as_ref())?, &self.secret)
	}

	/// Derive the shared secret for a packet with the given public key (alpha), along with the
	/// blinded public key to put in the packet for the next hop.
	pub fn forward(&self, kx_public: &[u8]) -> Result<(S::Public, SharedSecret), Error> {
		forward_kx::<S>(kx_public, &self.secret)
	}
}
