/*!
# Incremental UTF-8 decoding

Byte input may be split in the middle of a multi-byte sequence. The
[`Utf8Decoder`] keeps the incomplete tail of a chunk until the next chunk
arrives.
*/
use std::mem;
use std::str;

pub const REPLACEMENT_CHARACTER: char = '\u{fffd}';

/// Decode UTF-8 from arbitrarily split byte chunks.
///
/// Invalid sequences are replaced with U+FFFD.
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
	/// Incomplete sequence at the end of the last chunk, at most three bytes
	pending: Vec<u8>,
}

impl Utf8Decoder {
	pub fn new() -> Utf8Decoder {
		Utf8Decoder{
			pending: Vec::new(),
		}
	}

	/// Decode `src` and append the result to `dest`.
	pub fn decode(&mut self, src: &[u8], dest: &mut String) {
		if self.pending.len() == 0 {
			self.decode_slice(src, dest);
		} else {
			let mut joined = mem::take(&mut self.pending);
			joined.extend_from_slice(src);
			self.decode_slice(&joined, dest);
		}
	}

	fn decode_slice(&mut self, mut src: &[u8], dest: &mut String) {
		loop {
			match str::from_utf8(src) {
				Ok(s) => {
					dest.push_str(s);
					return;
				},
				Err(e) => {
					let valid_up_to = e.valid_up_to();
					// from_utf8 has validated everything up to this point
					dest.push_str(unsafe { str::from_utf8_unchecked(&src[..valid_up_to]) });
					match e.error_len() {
						Some(n) => {
							dest.push(REPLACEMENT_CHARACTER);
							src = &src[valid_up_to + n..];
						},
						None => {
							// the sequence may still be completed by the next chunk
							self.pending.extend_from_slice(&src[valid_up_to..]);
							return;
						},
					}
				},
			}
		}
	}

	/// Flush an incomplete sequence at the end of input.
	pub fn finish(&mut self) -> Option<char> {
		if self.pending.len() == 0 {
			None
		} else {
			self.pending.clear();
			Some(REPLACEMENT_CHARACTER)
		}
	}

	pub fn has_pending(&self) -> bool {
		self.pending.len() > 0
	}
}
