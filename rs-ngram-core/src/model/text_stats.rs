use std::collections::{BTreeSet, HashMap};

use crate::error::{NgramError, Result};

/// Gram (1..K code points) → number of observations.
pub type FrequencyTable = HashMap<String, u64>;

/// Distinct code points observed in the corpus, in scalar-value order.
pub type AlphabetSet = BTreeSet<char>;

/// Frequency statistics for one file, or for a whole merged corpus.
///
/// # Responsibilities
/// - Hold the gram counts of every order up to K
/// - Hold the alphabet used as the candidate set during sampling
/// - Merge with another `TextStats` (commutative, associative)
///
/// # Invariants
/// - Every stored count is >= 1
/// - Counts only grow, through accumulation or merge
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextStats {
	grams: FrequencyTable,
	alphabet: AlphabetSet,
}

impl TextStats {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn grams(&self) -> &FrequencyTable {
		&self.grams
	}

	pub fn alphabet(&self) -> &AlphabetSet {
		&self.alphabet
	}

	/// Returns `true` if nothing was ever recorded.
	pub fn is_empty(&self) -> bool {
		self.grams.is_empty() && self.alphabet.is_empty()
	}

	/// Count of a gram, zero if it was never observed.
	pub fn count(&self, gram: &str) -> u64 {
		self.grams.get(gram).copied().unwrap_or(0)
	}

	/// Sum of every stored count.
	pub fn total_count(&self) -> u64 {
		self.grams.values().sum()
	}

	/// Increments the count of `gram` by one.
	pub(crate) fn record(&mut self, gram: &str) {
		// Avoid allocating a key when the gram is already known
		if let Some(count) = self.grams.get_mut(gram) {
			*count += 1;
		} else {
			self.grams.insert(gram.to_owned(), 1);
		}
	}

	/// Adds a code point to the alphabet.
	pub(crate) fn observe(&mut self, symbol: char) {
		self.alphabet.insert(symbol);
	}

	/// Merges another result into this one, consuming it.
	///
	/// Counts for matching grams are summed, missing grams are moved over and
	/// the alphabets are united. Merge order never changes the result.
	pub fn merge(&mut self, other: TextStats) {
		// Fold the smaller table into the larger one
		let (mut into, from) = if other.grams.len() > self.grams.len() {
			(other.grams, std::mem::take(&mut self.grams))
		} else {
			(std::mem::take(&mut self.grams), other.grams)
		};
		for (gram, count) in from {
			*into.entry(gram).or_insert(0) += count;
		}
		self.grams = into;
		self.alphabet.extend(other.alphabet);
	}

	/// Borrowing variant of `merge`, for callers that keep `other`.
	pub fn merge_from(&mut self, other: &TextStats) {
		for (gram, count) in &other.grams {
			*self.grams.entry(gram.clone()).or_insert(0) += *count;
		}
		self.alphabet.extend(other.alphabet.iter().copied());
	}

	/// Checks that every stored count is at least 1.
	///
	/// # Errors
	/// Returns `CorruptCount` for the first offending gram found.
	pub fn verify(&self) -> Result<()> {
		match self.grams.iter().find(|(_, count)| **count == 0) {
			Some((gram, _)) => Err(NgramError::CorruptCount { gram: gram.clone() }),
			None => Ok(()),
		}
	}

	/// Most frequent gram made of exactly `order` code points.
	///
	/// Ties are broken by the smallest gram in string order, so the answer
	/// does not depend on hash map iteration order.
	///
	/// Returns `Ok(None)` if no gram of that length exists.
	///
	/// # Errors
	/// Returns `CorruptCount` if a zero count is met during the scan.
	pub fn best_gram(&self, order: usize) -> Result<Option<(&str, u64)>> {
		let mut best: Option<(&str, u64)> = None;
		for (gram, &count) in &self.grams {
			if count == 0 {
				return Err(NgramError::CorruptCount { gram: gram.clone() });
			}
			if gram.chars().count() != order {
				continue;
			}
			best = match best {
				Some((key, max)) if max > count || (max == count && key <= gram.as_str()) => Some((key, max)),
				_ => Some((gram.as_str(), count)),
			};
		}
		Ok(best)
	}
}

#[cfg(test)]
impl TextStats {
	/// Builds stats directly from `(gram, count)` pairs.
	pub(crate) fn from_counts(counts: &[(&str, u64)]) -> Self {
		let mut stats = Self::new();
		for (gram, count) in counts {
			stats.grams.insert((*gram).to_owned(), *count);
			stats.alphabet.extend(gram.chars());
		}
		stats
	}
}
