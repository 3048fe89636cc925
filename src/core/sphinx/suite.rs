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

//! Groups the key exchange can run over.
//!
//! The packet format only needs a handful of operations from the group: encoding and decoding
//! elements, multiplying them by scalars, and hashing bytes to a scalar. [`Secp256k1`] is the
//! default; [`Ristretto255`] is provided as an alternative.

use super::packet::{KxPublic, END_MARKER, KX_PUBLIC_SIZE};
use crate::core::error::Error;
use curve25519_dalek::{
	ristretto::{CompressedRistretto, RistrettoPoint},
	scalar::Scalar as RistrettoScalar,
	traits::IsIdentity,
};
use k256::{
	elliptic_curve::{ops::Reduce, sec1::ToEncodedPoint},
	AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey, U256,
};
use rand::{CryptoRng, Rng};
use std::fmt::Debug;
use zeroize::{Zeroize, Zeroizing};

/// Size in bytes of an encoded scalar, for all suites.
pub const SCALAR_SIZE: usize = 32;

/// A prime-order group to do the key exchange in.
///
/// Encoded group elements must never start with [`END_MARKER`]: the routing information tells
/// relay blocks (which start with the next hop's public key) from the last hop's block by their
/// first byte.
pub trait KxSuite: Copy + Debug + Eq {
	/// Encoded group element, as carried in packets and paths.
	type Public: Copy + Debug + Eq + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;
	type Scalar: Copy + Zeroize;
	type Point: Copy;

	/// Size in bytes of [`Self::Public`].
	const PUBLIC_SIZE: usize;

	/// Generate a random non-zero scalar.
	fn gen_scalar(rng: &mut (impl Rng + CryptoRng)) -> Self::Scalar;

	/// Strictly decode a secret key. Fails with [`Error::InvalidKey`] on a non-canonical or zero
	/// scalar.
	fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Self::Scalar, Error>;

	fn scalar_to_bytes(scalar: &Self::Scalar) -> [u8; SCALAR_SIZE];

	/// Reduce 32 uniformly random bytes to a non-zero scalar.
	fn hash_to_scalar(bytes: &[u8; SCALAR_SIZE]) -> Result<Self::Scalar, Error>;

	fn mul_scalars(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

	/// Decode a group element. Fails with [`Error::InvalidKey`] if the bytes do not encode a
	/// valid, non-identity element.
	fn decode(public: &[u8]) -> Result<Self::Point, Error>;

	/// Encode a group element. The identity has no encoding.
	fn encode(point: &Self::Point) -> Result<Self::Public, Error>;

	fn mul(point: &Self::Point, scalar: &Self::Scalar) -> Self::Point;

	fn mul_base(scalar: &Self::Scalar) -> Self::Point;
}

/// Convert bytes of the right length to a public key of the suite.
pub fn to_kx_public<S: KxSuite>(public: &[u8]) -> Result<S::Public, Error> {
	<S::Public as TryFrom<&[u8]>>::try_from(public).map_err(|_| Error::InvalidKey)
}

////////////////////////////////////////////////////////////////////////////////
// secp256k1
////////////////////////////////////////////////////////////////////////////////

/// secp256k1, with public keys as 33-byte compressed points. Compressed points start with `0x02`
/// or `0x03`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1;

impl KxSuite for Secp256k1 {
	type Public = KxPublic;
	type Scalar = Scalar;
	type Point = ProjectivePoint;

	const PUBLIC_SIZE: usize = KX_PUBLIC_SIZE;

	fn gen_scalar(rng: &mut (impl Rng + CryptoRng)) -> Scalar {
		*NonZeroScalar::random(rng)
	}

	fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Scalar, Error> {
		let secret =
			SecretKey::from_bytes(&FieldBytes::from(*bytes)).map_err(|_| Error::InvalidKey)?;
		Ok(*secret.to_nonzero_scalar())
	}

	fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_SIZE] {
		FieldBytes::from(*scalar).into()
	}

	fn hash_to_scalar(bytes: &[u8; SCALAR_SIZE]) -> Result<Scalar, Error> {
		let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes));
		Option::<NonZeroScalar>::from(NonZeroScalar::new(scalar))
			.map(|scalar| *scalar)
			.ok_or(Error::InvalidKey)
	}

	fn mul_scalars(a: &Scalar, b: &Scalar) -> Scalar {
		a * b
	}

	fn decode(public: &[u8]) -> Result<ProjectivePoint, Error> {
		if public.len() != KX_PUBLIC_SIZE {
			return Err(Error::InvalidKey)
		}
		PublicKey::from_sec1_bytes(public)
			.map(|public| public.to_projective())
			.map_err(|_| Error::InvalidKey)
	}

	fn encode(point: &ProjectivePoint) -> Result<KxPublic, Error> {
		let encoded = AffinePoint::from(*point).to_encoded_point(true);
		encoded.as_bytes().try_into().map_err(|_| Error::InvalidKey)
	}

	fn mul(point: &ProjectivePoint, scalar: &Scalar) -> ProjectivePoint {
		point * scalar
	}

	fn mul_base(scalar: &Scalar) -> ProjectivePoint {
		ProjectivePoint::GENERATOR * scalar
	}
}

////////////////////////////////////////////////////////////////////////////////
// Ristretto255
////////////////////////////////////////////////////////////////////////////////

/// Size in bytes of an encoded [`Ristretto255`] element.
pub const RISTRETTO_PUBLIC_SIZE: usize = 32;

/// The prime-order group built on Curve25519. Encodings are little-endian and always even in
/// their first byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ristretto255;

impl KxSuite for Ristretto255 {
	type Public = [u8; RISTRETTO_PUBLIC_SIZE];
	type Scalar = RistrettoScalar;
	type Point = RistrettoPoint;

	const PUBLIC_SIZE: usize = RISTRETTO_PUBLIC_SIZE;

	fn gen_scalar(rng: &mut (impl Rng + CryptoRng)) -> RistrettoScalar {
		let mut wide = Zeroizing::new([0; 64]);
		loop {
			rng.fill_bytes(&mut wide[..]);
			let scalar = RistrettoScalar::from_bytes_mod_order_wide(&wide);
			if scalar != RistrettoScalar::ZERO {
				return scalar
			}
		}
	}

	fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<RistrettoScalar, Error> {
		Option::<RistrettoScalar>::from(RistrettoScalar::from_canonical_bytes(*bytes))
			.filter(|scalar| *scalar != RistrettoScalar::ZERO)
			.ok_or(Error::InvalidKey)
	}

	fn scalar_to_bytes(scalar: &RistrettoScalar) -> [u8; SCALAR_SIZE] {
		scalar.to_bytes()
	}

	fn hash_to_scalar(bytes: &[u8; SCALAR_SIZE]) -> Result<RistrettoScalar, Error> {
		let scalar = RistrettoScalar::from_bytes_mod_order(*bytes);
		if scalar == RistrettoScalar::ZERO {
			return Err(Error::InvalidKey)
		}
		Ok(scalar)
	}

	fn mul_scalars(a: &RistrettoScalar, b: &RistrettoScalar) -> RistrettoScalar {
		a * b
	}

	fn decode(public: &[u8]) -> Result<RistrettoPoint, Error> {
		CompressedRistretto::from_slice(public)
			.ok()
			.and_then(|compressed| compressed.decompress())
			.filter(|point| !point.is_identity())
			.ok_or(Error::InvalidKey)
	}

	fn encode(point: &RistrettoPoint) -> Result<[u8; RISTRETTO_PUBLIC_SIZE], Error> {
		if point.is_identity() {
			return Err(Error::InvalidKey)
		}
		let encoded = point.compress().to_bytes();
		debug_assert_ne!(encoded[0], END_MARKER);
		Ok(encoded)
	}

	fn mul(point: &RistrettoPoint, scalar: &RistrettoScalar) -> RistrettoPoint {
		point * scalar
	}

	fn mul_base(scalar: &RistrettoScalar) -> RistrettoPoint {
		RistrettoPoint::mul_base(scalar)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scalar_round_trip<S: KxSuite>() {
		let mut rng = rand::thread_rng();
		let scalar = S::gen_scalar(&mut rng);
		let bytes = S::scalar_to_bytes(&scalar);
		let decoded = S::scalar_from_bytes(&bytes).unwrap();
		assert_eq!(S::encode(&S::mul_base(&decoded)), S::encode(&S::mul_base(&scalar)));
		assert_eq!(S::scalar_from_bytes(&[0; SCALAR_SIZE]).err(), Some(Error::InvalidKey));
		assert_eq!(S::hash_to_scalar(&[0; SCALAR_SIZE]).err(), Some(Error::InvalidKey));

		// Already reduced, so hashing the encoding gives the same scalar back
		let rehashed = S::hash_to_scalar(&bytes).unwrap();
		assert_eq!(S::scalar_to_bytes(&rehashed), bytes);
	}

	fn encodings<S: KxSuite>() {
		let mut rng = rand::thread_rng();
		for _ in 0..100 {
			let public = S::encode(&S::mul_base(&S::gen_scalar(&mut rng))).unwrap();
			assert_eq!(public.as_ref().len(), S::PUBLIC_SIZE);
			assert_ne!(public.as_ref()[0], END_MARKER);
			let point = S::decode(public.as_ref()).unwrap();
			assert_eq!(S::encode(&point).unwrap(), public);
			assert_eq!(to_kx_public::<S>(public.as_ref()), Ok(public));
		}
		assert_eq!(S::decode(&[0xff; 32]).err(), Some(Error::InvalidKey));
		assert_eq!(S::decode(&[]).err(), Some(Error::InvalidKey));
		assert_eq!(to_kx_public::<S>(&[2; 3]).err(), Some(Error::InvalidKey));
	}

	fn scalar_multiplication_commutes<S: KxSuite>() {
		let mut rng = rand::thread_rng();
		let a = S::gen_scalar(&mut rng);
		let b = S::gen_scalar(&mut rng);
		let ab = S::mul(&S::mul_base(&a), &b);
		let ba = S::mul(&S::mul_base(&b), &a);
		assert_eq!(S::encode(&ab).unwrap(), S::encode(&ba).unwrap());
		let product = S::mul_base(&S::mul_scalars(&a, &b));
		assert_eq!(S::encode(&product).unwrap(), S::encode(&ab).unwrap());
	}

	#[test]
	fn secp256k1() {
		scalar_round_trip::<Secp256k1>();
		encodings::<Secp256k1>();
		scalar_multiplication_commutes::<Secp256k1>();
		assert_eq!(
			Secp256k1::scalar_from_bytes(&[0xff; SCALAR_SIZE]).err(),
			Some(Error::InvalidKey)
		);
	}

	#[test]
	fn ristretto255() {
		scalar_round_trip::<Ristretto255>();
		encodings::<Ristretto255>();
		scalar_multiplication_commutes::<Ristretto255>();
		assert_eq!(
			Ristretto255::scalar_from_bytes(&[0xff; SCALAR_SIZE]).err(),
			Some(Error::InvalidKey)
		);
		// Odd first byte is never a canonical encoding
		let mut public =
			Ristretto255::encode(&Ristretto255::mul_base(&RistrettoScalar::ONE)).unwrap();
		public[0] |= 1;
		assert_eq!(Ristretto255::decode(&public).err(), Some(Error::InvalidKey));
	}
}
