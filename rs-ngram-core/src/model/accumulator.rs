use std::io::{self, BufRead};

use crate::error::{NgramError, Result};
use crate::rune_reader::RuneReader;

use super::text_stats::TextStats;

/// Code point used to pad the window before the first K-1 symbols arrive.
pub const PADDING: char = ' ';

/// Counts every gram of length 1..=K ending at each position of a text.
///
/// The accumulator keeps the last K code points in a circular buffer
/// pre-filled with `PADDING`. Each new code point produces exactly K
/// increments, one per order, so the first grams of a stream are padded
/// (`" a"` for a text starting with `a` at K = 2).
///
/// # Invariants
/// - `order >= 1`
/// - `window.len() == order`
#[derive(Clone, Debug)]
pub struct GramAccumulator {
	order: usize,
	window: Vec<char>,
	offset: usize,
	runes_read: usize,
	key: String,
	stats: TextStats,
}

impl GramAccumulator {
	/// Creates an accumulator for grams up to `order` code points.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn new(order: usize) -> Result<Self> {
		if order == 0 {
			return Err(NgramError::InvalidOrder(order));
		}
		Ok(Self {
			order,
			window: vec![PADDING; order],
			offset: 0,
			runes_read: 0,
			key: String::with_capacity(order * 4),
			stats: TextStats::new(),
		})
	}

	/// Number of code points consumed so far.
	pub fn runes_read(&self) -> usize {
		self.runes_read
	}

	/// Consumes one code point and records its K grams.
	pub fn push(&mut self, symbol: char) {
		self.runes_read += 1;
		self.stats.observe(symbol);

		self.offset = (self.offset + 1) % self.order;
		self.window[self.offset] = symbol;

		// Grow the key leftwards: newest symbol first, then older ones
		self.key.clear();
		for age in 0..self.order {
			let c = self.window[(self.order + self.offset - age) % self.order];
			self.key.insert(0, c);
			self.stats.record(&self.key);
		}
	}

	/// Consumes every code point of `symbols`.
	pub fn extend<I: IntoIterator<Item = char>>(&mut self, symbols: I) {
		for symbol in symbols {
			self.push(symbol);
		}
	}

	/// Decodes and consumes a whole byte stream.
	///
	/// Malformed sequences are skipped by the decoder; the number of bytes
	/// dropped is returned.
	pub fn consume_reader<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
		let mut runes = RuneReader::new(reader);
		for symbol in runes.by_ref() {
			self.push(symbol?);
		}
		Ok(runes.skipped_bytes())
	}

	/// Returns the collected statistics.
	pub fn finish(self) -> TextStats {
		self.stats
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeSet;
	use std::io::Cursor;

	fn accumulate(text: &str, order: usize) -> TextStats {
		let mut acc = GramAccumulator::new(order).unwrap();
		acc.extend(text.chars());
		acc.finish()
	}

	#[test]
	fn zero_order_is_rejected() {
		assert!(matches!(GramAccumulator::new(0), Err(NgramError::InvalidOrder(0))));
	}

	#[test]
	fn abcabcabc_order_two() {
		let stats = accumulate("abcabcabc", 2);
		assert_eq!(stats.count("ab"), 3);
		assert_eq!(stats.count("bc"), 3);
		assert_eq!(stats.count("ca"), 2);
		assert_eq!(stats.count("a"), 3);
		assert_eq!(stats.count("b"), 3);
		assert_eq!(stats.count("c"), 3);
		// Padded boundary gram
		assert_eq!(stats.count(" a"), 1);
		assert_eq!(stats.total_count(), 9 * 2);
	}

	#[test]
	fn order_one_counts_symbols_only() {
		let stats = accumulate("aab", 1);
		assert_eq!(stats.count("a"), 2);
		assert_eq!(stats.count("b"), 1);
		assert_eq!(stats.grams().len(), 2);
	}

	#[test]
	fn window_wraps_around() {
		let stats = accumulate("abcd", 3);
		assert_eq!(stats.count("  a"), 1);
		assert_eq!(stats.count(" ab"), 1);
		assert_eq!(stats.count("abc"), 1);
		assert_eq!(stats.count("bcd"), 1);
		assert_eq!(stats.count("cd"), 1);
		assert_eq!(stats.count("d"), 1);
	}

	#[test]
	fn multibyte_grams_are_built_by_code_point() {
		let stats = accumulate("это это", 3);
		assert_eq!(stats.count("это"), 2);
		assert_eq!(stats.count("то "), 1);
		assert_eq!(stats.count("то"), 2);
	}

	#[test]
	fn empty_input_produces_empty_stats() {
		let acc = GramAccumulator::new(8).unwrap();
		assert_eq!(acc.runes_read(), 0);
		let stats = acc.finish();
		assert!(stats.grams().is_empty());
		assert!(stats.alphabet().is_empty());
	}

	#[test]
	fn alphabet_is_exact_set_of_code_points() {
		let text = "hello, мир\n";
		let stats = accumulate(text, 4);
		let expected: BTreeSet<char> = text.chars().collect();
		assert_eq!(stats.alphabet(), &expected);
		// The padding symbol only enters the alphabet if it is read
		assert!(!accumulate("ab", 4).alphabet().contains(&PADDING));
	}

	#[test]
	fn reader_input_skips_malformed_bytes() {
		let mut acc = GramAccumulator::new(2).unwrap();
		let skipped = acc.consume_reader(Cursor::new(b"ab\xFFab".to_vec())).unwrap();
		assert_eq!(skipped, 1);
		assert_eq!(acc.runes_read(), 4);
		let stats = acc.finish();
		// The skipped byte does not break the window
		assert_eq!(stats.count("ba"), 1);
		assert_eq!(stats.count("ab"), 2);
	}

	struct FailingReader;

	impl io::Read for FailingReader {
		fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
			Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
		}
	}

	#[test]
	fn reader_errors_are_propagated() {
		let mut acc = GramAccumulator::new(2).unwrap();
		let err = acc.consume_reader(io::BufReader::new(FailingReader)).unwrap_err();
		assert_eq!(err.to_string(), "disk gone");
		assert_eq!(acc.runes_read(), 0);
	}
}
