use rand::Rng;

use crate::error::{NgramError, Result};

use super::sampler::Sampler;
use super::text_stats::TextStats;

/// Produces synthetic text from merged corpus statistics.
///
/// # Responsibilities
/// - Keep a sliding context of the last K-1 generated code points
/// - Ask the `Sampler` for one code point per step
/// - Generate several independent samples from the same model
///
/// The random source is supplied by the caller: a seeded RNG gives the same
/// output for the same stats and order.
#[derive(Debug)]
pub struct Generator<'s> {
	order: usize,
	sampler: Sampler<'s>,
}

impl<'s> Generator<'s> {
	/// Creates a generator for grams up to `order` code points.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn new(stats: &'s TextStats, order: usize) -> Result<Self> {
		if order == 0 {
			return Err(NgramError::InvalidOrder(order));
		}
		Ok(Self { order, sampler: Sampler::new(stats) })
	}

	/// Returns the suffix of `s` made of its last `n` code points.
	///
	/// UTF-8 safe: `n` counts characters, not bytes. If `s` is shorter, the
	/// whole string is returned.
	fn last_n_chars(s: &str, n: usize) -> &str {
		if n == 0 {
			return &s[s.len()..];
		}
		match s.char_indices().rev().nth(n - 1) {
			Some((start, _)) => &s[start..],
			None => s,
		}
	}

	/// Generates `length` code points.
	///
	/// # Errors
	/// Returns `NoData` if the model has nothing to sample from.
	pub fn generate<R: Rng>(&self, length: usize, rng: &mut R) -> Result<String> {
		let mut text = String::with_capacity(length);
		for _ in 0..length {
			let context = Self::last_n_chars(&text, self.order - 1);
			let symbol = self.sampler.sample(context, rng)?;
			text.push(symbol);
		}
		Ok(text)
	}

	/// Generates `count` independent samples of `length` code points each.
	///
	/// # Errors
	/// Returns `NoData` if the model has nothing to sample from.
	pub fn samples<R: Rng>(&self, count: usize, length: usize, rng: &mut R) -> Result<Vec<String>> {
		(0..count).map(|_| self.generate(length, rng)).collect()
	}
}
