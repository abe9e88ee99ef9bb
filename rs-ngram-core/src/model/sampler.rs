use rand::Rng;

use crate::error::{NgramError, Result};

use super::text_stats::TextStats;

/// Outcome of one prediction step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prediction<'c> {
	/// Predicted next code point.
	pub symbol: char,
	/// Suffix of the requested context whose weights were used.
	pub context: &'c str,
}

/// Weighted next-symbol sampler with order backoff.
///
/// For a context `C`, every symbol `s` of the alphabet weighs
/// `count(C + s)`. If the weights sum to less than the alphabet size the
/// context is considered too sparse and the leftmost code point is dropped,
/// down to the empty context (the unconditional distribution).
///
/// The alphabet is walked in scalar-value order, so a given random draw always
/// maps to the same symbol.
#[derive(Debug)]
pub struct Sampler<'s> {
	stats: &'s TextStats,
	alphabet: Vec<char>,
}

impl<'s> Sampler<'s> {
	pub fn new(stats: &'s TextStats) -> Self {
		Self {
			stats,
			alphabet: stats.alphabet().iter().copied().collect(),
		}
	}

	/// Contexts tried for `context`, longest first: `C`, `C[1..]`, ..., `""`.
	///
	/// Suffixes are cut on code point boundaries.
	pub fn ladder(context: &str) -> impl Iterator<Item = &str> {
		context
			.char_indices()
			.map(|(i, _)| i)
			.chain(std::iter::once(context.len()))
			.map(move |i| &context[i..])
	}

	/// Weight of every alphabet symbol after `context`, and their sum.
	pub fn weights(&self, context: &str) -> (Vec<u64>, u64) {
		let mut key = String::with_capacity(context.len() + 4);
		key.push_str(context);
		let mut total = 0;
		let weights = self
			.alphabet
			.iter()
			.map(|symbol| {
				key.truncate(context.len());
				key.push(*symbol);
				let weight = self.stats.count(&key);
				total += weight;
				weight
			})
			.collect();
		(weights, total)
	}

	/// Predicts the next code point after `context`.
	///
	/// # Errors
	/// Returns `NoData` if the alphabet is empty or the empty context has no
	/// weight at all.
	pub fn predict<'c, R: Rng>(&self, context: &'c str, rng: &mut R) -> Result<Prediction<'c>> {
		if self.alphabet.is_empty() {
			return Err(NgramError::NoData);
		}
		let floor = self.alphabet.len() as u64;

		for suffix in Self::ladder(context) {
			let (weights, total) = self.weights(suffix);
			// The empty context cannot back off further, any data will do
			let sparse = if suffix.is_empty() { total == 0 } else { total < floor };
			if sparse {
				continue;
			}

			let mut r = rng.random_range(0..total);
			for (symbol, weight) in self.alphabet.iter().zip(weights) {
				if r < weight {
					return Ok(Prediction { symbol: *symbol, context: suffix });
				}
				r -= weight;
			}
		}

		Err(NgramError::NoData)
	}

	/// Predicts the next code point, dropping the context information.
	pub fn sample<R: Rng>(&self, context: &str, rng: &mut R) -> Result<char> {
		self.predict(context, rng).map(|prediction| prediction.symbol)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::accumulator::GramAccumulator;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn stats_for(text: &str, order: usize) -> TextStats {
		let mut acc = GramAccumulator::new(order).unwrap();
		acc.extend(text.chars());
		acc.finish()
	}

	#[test]
	fn ladder_drops_leftmost_code_point() {
		let steps: Vec<&str> = Sampler::ladder("эта").collect();
		assert_eq!(steps, vec!["эта", "та", "а", ""]);
		let steps: Vec<&str> = Sampler::ladder("").collect();
		assert_eq!(steps, vec![""]);
	}

	#[test]
	fn weights_follow_alphabet_order() {
		let stats = stats_for("abcabcabc", 2);
		let sampler = Sampler::new(&stats);
		let (weights, total) = sampler.weights("a");
		assert_eq!(weights, vec![0, 3, 0]);
		assert_eq!(total, 3);
		let (weights, total) = sampler.weights("");
		assert_eq!(weights, vec![3, 3, 3]);
		assert_eq!(total, 9);
	}

	#[test]
	fn dense_context_is_used_directly() {
		let stats = stats_for("abcabcabc", 2);
		let sampler = Sampler::new(&stats);
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..50 {
			let prediction = sampler.predict("a", &mut rng).unwrap();
			assert_eq!(prediction, Prediction { symbol: 'b', context: "a" });
		}
	}

	#[test]
	fn sparse_context_backs_off() {
		// "z" ends the text and "c" has 3 followers, both below |alphabet| = 4
		let stats = stats_for("abcabcabcz", 2);
		let sampler = Sampler::new(&stats);
		assert_eq!(sampler.weights("z").1, 0);
		assert_eq!(sampler.weights("c").1, 3);

		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..200 {
			let prediction = sampler.predict("zc", &mut rng).unwrap();
			// "zc" and "c" are below the floor, only "" is trusted
			assert_eq!(prediction.context, "");
		}
	}

	#[test]
	fn backoff_result_follows_shorter_distribution() {
		let stats = TextStats::from_counts(&[("a", 5), ("b", 5), ("ab", 1)]);
		let sampler = Sampler::new(&stats);
		let mut rng = StdRng::seed_from_u64(3);
		let mut seen_a = false;
		for _ in 0..200 {
			let prediction = sampler.predict("a", &mut rng).unwrap();
			assert_eq!(prediction.context, "");
			seen_a |= prediction.symbol == 'a';
		}
		// Sampling from "a" directly could never give 'a'
		assert!(seen_a);
	}

	#[test]
	fn unseen_context_falls_back_to_unigrams() {
		let stats = stats_for("aaaa", 3);
		let sampler = Sampler::new(&stats);
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(sampler.sample("qq", &mut rng).unwrap(), 'a');
	}

	#[test]
	fn empty_model_reports_no_data() {
		let stats = TextStats::new();
		let sampler = Sampler::new(&stats);
		let mut rng = StdRng::seed_from_u64(0);
		assert!(matches!(sampler.predict("abc", &mut rng), Err(NgramError::NoData)));
	}

	#[test]
	fn alphabet_without_counts_reports_no_data() {
		let mut stats = TextStats::new();
		stats.observe('a');
		let sampler = Sampler::new(&stats);
		let mut rng = StdRng::seed_from_u64(0);
		assert!(matches!(sampler.sample("", &mut rng), Err(NgramError::NoData)));
	}
}
