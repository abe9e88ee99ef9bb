use std::io::{self, BufRead};

/// Incremental UTF-8 decoder over a buffered byte stream.
///
/// Yields one `char` per well-formed sequence. Malformed input (invalid lead
/// bytes, missing continuation bytes, overlong or surrogate encodings, a
/// truncated tail) is skipped and only counted in `skipped_bytes`. A literal
/// U+FFFD in the input is skipped as well, since it is what upstream decoders
/// emit in place of bytes they could not read.
///
/// Iteration ends at end of stream; an I/O error is returned once and the
/// reader should not be used further.
pub struct RuneReader<R> {
	inner: R,
	skipped_bytes: usize,
}

impl<R: BufRead> RuneReader<R> {
	pub fn new(inner: R) -> Self {
		Self { inner, skipped_bytes: 0 }
	}

	/// Number of bytes discarded as malformed so far.
	pub fn skipped_bytes(&self) -> usize {
		self.skipped_bytes
	}

	/// Reads the next code point, `Ok(None)` at end of stream.
	pub fn read_rune(&mut self) -> io::Result<Option<char>> {
		loop {
			let lead = match self.next_byte()? {
				Some(b) => b,
				None => return Ok(None),
			};

			let (width, mut value) = match lead {
				0x00..=0x7F => return Ok(Some(lead as char)),
				0xC2..=0xDF => (2, (lead & 0x1F) as u32),
				0xE0..=0xEF => (3, (lead & 0x0F) as u32),
				0xF0..=0xF4 => (4, (lead & 0x07) as u32),
				_ => {
					self.skipped_bytes += 1;
					continue;
				}
			};

			let mut consumed = 1;
			let mut complete = true;
			while consumed < width {
				// The second byte has a narrower range for a few lead bytes
				let (low, high) = match (consumed, lead) {
					(1, 0xE0) => (0xA0, 0xBF),
					(1, 0xED) => (0x80, 0x9F),
					(1, 0xF0) => (0x90, 0xBF),
					(1, 0xF4) => (0x80, 0x8F),
					_ => (0x80, 0xBF),
				};
				match self.peek_byte()? {
					Some(b) if (low..=high).contains(&b) => {
						self.inner.consume(1);
						value = (value << 6) | (b & 0x3F) as u32;
						consumed += 1;
					}
					_ => {
						complete = false;
						break;
					}
				}
			}

			if !complete {
				self.skipped_bytes += consumed;
				continue;
			}

			match char::from_u32(value) {
				Some(char::REPLACEMENT_CHARACTER) => self.skipped_bytes += width,
				Some(c) => return Ok(Some(c)),
				None => self.skipped_bytes += width,
			}
		}
	}

	fn peek_byte(&mut self) -> io::Result<Option<u8>> {
		loop {
			match self.inner.fill_buf() {
				Ok(buf) => return Ok(buf.first().copied()),
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e),
			}
		}
	}

	fn next_byte(&mut self) -> io::Result<Option<u8>> {
		let byte = self.peek_byte()?;
		if byte.is_some() {
			self.inner.consume(1);
		}
		Ok(byte)
	}
}

impl<R: BufRead> Iterator for RuneReader<R> {
	type Item = io::Result<char>;

	fn next(&mut self) -> Option<Self::Item> {
		self.read_rune().transpose()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::{BufReader, Cursor};

	fn decode(bytes: &[u8]) -> (String, usize) {
		let mut reader = RuneReader::new(Cursor::new(bytes.to_vec()));
		let text = reader.by_ref().collect::<io::Result<String>>().unwrap();
		(text, reader.skipped_bytes())
	}

	#[test]
	fn decodes_mixed_widths() {
		let (text, skipped) = decode("aé это 𝄞".as_bytes());
		assert_eq!(text, "aé это 𝄞");
		assert_eq!(skipped, 0);
	}

	#[test]
	fn empty_input_ends_immediately() {
		let (text, skipped) = decode(b"");
		assert!(text.is_empty());
		assert_eq!(skipped, 0);
	}

	#[test]
	fn skips_invalid_lead_bytes() {
		let (text, skipped) = decode(b"a\xFFb\x80c");
		assert_eq!(text, "abc");
		assert_eq!(skipped, 2);
	}

	#[test]
	fn skips_broken_sequence_but_keeps_following_char() {
		// 0xD0 expects a continuation byte, 'x' is not one
		let (text, skipped) = decode(b"\xD0x\xD1\x8F");
		assert_eq!(text, "xя");
		assert_eq!(skipped, 1);
	}

	#[test]
	fn skips_truncated_tail() {
		let (text, skipped) = decode(b"ok\xE2\x82");
		assert_eq!(text, "ok");
		assert_eq!(skipped, 2);
	}

	#[test]
	fn rejects_surrogates_and_overlongs() {
		// ED A0 80 is a UTF-16 surrogate, C0 80 an overlong NUL
		let (text, _) = decode(b"\xED\xA0\x80a\xC0\x80b");
		assert_eq!(text, "ab");
	}

	#[test]
	fn skips_literal_replacement_character() {
		let (text, skipped) = decode("a\u{FFFD}b".as_bytes());
		assert_eq!(text, "ab");
		assert_eq!(skipped, 3);
	}

	#[test]
	fn sequences_split_across_buffer_refills() {
		let input = "ёжик".repeat(10);
		let reader = BufReader::with_capacity(1, Cursor::new(input.clone().into_bytes()));
		let text = RuneReader::new(reader).collect::<io::Result<String>>().unwrap();
		assert_eq!(text, input);
	}
}
