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

use onion_packet::{KxPair, KxSuite};
use rand::{CryptoRng, Rng};

pub fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// A path of freshly generated nodes.
pub fn gen_nodes<S: KxSuite>(
	rng: &mut (impl Rng + CryptoRng),
	num_hops: usize,
) -> (Vec<KxPair<S>>, Vec<S::Public>) {
	let nodes: Vec<KxPair<S>> = (0..num_hops).map(|_| KxPair::gen(&mut *rng)).collect();
	let path = nodes.iter().map(|node| *node.public()).collect();
	(nodes, path)
}
