use std::collections::HashMap;

use crate::buffers::{BufferKind, BufferLimits};

/// Hold options to configure a [`Parser`](crate::Parser).
///
/// See also [`Parser::with_options()`](crate::Parser::with_options).
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
	/// Enforce XML well-formedness and report every violation.
	///
	/// Without it, the parser accepts tag soup and recovers silently from
	/// most problems.
	pub strict: bool,

	/// Track line, column and offset for error reporting.
	pub track_position: bool,

	/// Resolve namespace prefixes and emit namespace events.
	pub xmlns: bool,

	/// Keep tag and attribute names as written in loose mode.
	///
	/// Names are folded to lower case otherwise. Strict mode always
	/// preserves case.
	pub preserve_case: bool,

	/// Trim leading and trailing whitespace of text and comments.
	pub trim: bool,

	/// Collapse runs of whitespace in text and comments into a single
	/// space.
	pub normalize: bool,

	/// Only resolve the five XML entities in loose mode.
	pub strict_entities: bool,

	/// Additional named entities and their replacement text.
	///
	/// These take precedence over the built-in tables in both modes and are
	/// matched case-sensitively.
	pub entities: HashMap<String, String>,

	/// Elements whose content is not parsed (loose mode only).
	pub raw_text_elements: Vec<String>,

	/// If set, self-closing syntax on any element not in this list is an
	/// error in strict mode.
	pub void_elements: Option<Vec<String>>,

	/// Maximum size in bytes of each token buffer.
	///
	/// If the content of a buffer exceeds its limit, it depends on the
	/// buffer whether a partial token is emitted or parsing fails with
	/// [`ErrorKind::BufferOverflow`](crate::ErrorKind::BufferOverflow).
	/// Text, CDATA and raw text content is split and emitted in parts,
	/// all other tokens cause an error.
	pub buffer_limits: BufferLimits,
}

impl ParserOptions {
	/// Set the [`ParserOptions::strict`] value.
	///
	/// # Example
	///
	/// ```
	/// use rsax::{Parser, ParserOptions};
	/// let mut parser = Parser::with_options(ParserOptions::default().strict(true));
	/// ```
	pub fn strict(mut self, v: bool) -> ParserOptions {
		self.strict = v;
		self
	}

	pub fn track_position(mut self, v: bool) -> ParserOptions {
		self.track_position = v;
		self
	}

	pub fn xmlns(mut self, v: bool) -> ParserOptions {
		self.xmlns = v;
		self
	}

	pub fn preserve_case(mut self, v: bool) -> ParserOptions {
		self.preserve_case = v;
		self
	}

	pub fn trim(mut self, v: bool) -> ParserOptions {
		self.trim = v;
		self
	}

	pub fn normalize(mut self, v: bool) -> ParserOptions {
		self.normalize = v;
		self
	}

	pub fn strict_entities(mut self, v: bool) -> ParserOptions {
		self.strict_entities = v;
		self
	}

	/// Define an additional named entity.
	///
	/// # Example
	///
	/// ```
	/// use rsax::{Event, Parser, ParserOptions};
	/// let mut parser = Parser::with_options(ParserOptions::default().entity("me", "rsax"));
	/// parser.write("<a>&me;</a>").unwrap();
	/// assert!(parser.drain().any(|ev| ev == Event::Text("rsax".to_string())));
	/// ```
	pub fn entity<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> ParserOptions {
		self.entities.insert(name.into(), value.into());
		self
	}

	/// Replace the list of raw text elements.
	pub fn raw_text_elements<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> ParserOptions {
		self.raw_text_elements = names.into_iter().map(|s| s.into()).collect();
		self
	}

	pub fn void_elements<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> ParserOptions {
		self.void_elements = Some(names.into_iter().map(|s| s.into()).collect());
		self
	}

	/// Set the limit of all buffers.
	///
	/// # Example
	///
	/// ```
	/// use rsax::{Parser, ParserOptions};
	/// let mut parser = Parser::with_options(ParserOptions::default().max_buffer_length(1024));
	/// ```
	pub fn max_buffer_length(mut self, v: usize) -> ParserOptions {
		self.buffer_limits = BufferLimits::uniform(v);
		self
	}

	/// Set the limit of a single buffer.
	pub fn buffer_limit(mut self, kind: BufferKind, v: usize) -> ParserOptions {
		self.buffer_limits.set(kind, v);
		self
	}
}

impl Default for ParserOptions {
	/// Loose mode with position tracking, no namespace processing and
	/// 64 KiB buffers.
	fn default() -> Self {
		Self{
			strict: false,
			track_position: true,
			xmlns: false,
			preserve_case: false,
			trim: false,
			normalize: false,
			strict_entities: false,
			entities: HashMap::new(),
			raw_text_elements: vec!["script".to_string()],
			void_elements: None,
			buffer_limits: BufferLimits::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::buffers::MAX_BUFFER_LENGTH;

	#[test]
	fn options_defaults() {
		let o = ParserOptions::default();
		assert!(!o.strict);
		assert!(o.track_position);
		assert_eq!(o.raw_text_elements, vec!["script".to_string()]);
		assert_eq!(o.buffer_limits.get(BufferKind::Text), MAX_BUFFER_LENGTH);
	}

	#[test]
	fn options_builder_chains() {
		let o = ParserOptions::default()
			.strict(true)
			.xmlns(true)
			.max_buffer_length(128)
			.buffer_limit(BufferKind::Comment, 16);
		assert!(o.strict);
		assert!(o.xmlns);
		assert_eq!(o.buffer_limits.get(BufferKind::Text), 128);
		assert_eq!(o.buffer_limits.get(BufferKind::Comment), 16);
	}

	#[test]
	fn options_void_elements() {
		let o = ParserOptions::default().void_elements(vec!["br", "img"]);
		assert_eq!(o.void_elements, Some(vec!["br".to_string(), "img".to_string()]));
	}

	#[test]
	fn options_entities_accumulate() {
		let o = ParserOptions::default()
			.entity("a", "1")
			.entity("b", "2")
			.entity("a", "3");
		assert_eq!(o.entities.len(), 2);
		assert_eq!(o.entities.get("a").map(|s| s.as_str()), Some("3"));
	}
}
