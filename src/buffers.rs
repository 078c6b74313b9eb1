/*!
# Token buffers

The parser accumulates every token in one of a fixed set of named buffers
before emitting it. Each buffer has its own length limit (in bytes).

Buffers come in two flavours:

* *splittable* buffers ([`BufferKind::Text`], [`BufferKind::Cdata`],
  [`BufferKind::Script`]) hand their content back as a partial token when
  the limit would be exceeded, so that arbitrarily long runs of character
  data can be processed in bounded memory;
* all other buffers are *atomic*: exceeding the limit is an error, because
  emitting a partial tag name or attribute would silently corrupt the event
  stream.
*/
use std::fmt;
use std::mem;

use smartstring::alias::String as SmartString;

/// Default limit for all buffers.
pub const MAX_BUFFER_LENGTH: usize = 64 * 1024;

/// Identify one of the token buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
	TagName,
	AttribName,
	AttribValue,
	Text,
	Comment,
	Cdata,
	Script,
	Doctype,
	ProcInstName,
	ProcInstBody,
	Entity,
	SgmlDecl,
}

const NBUFFERS: usize = 12;

impl BufferKind {
	pub const ALL: [BufferKind; NBUFFERS] = [
		BufferKind::TagName,
		BufferKind::AttribName,
		BufferKind::AttribValue,
		BufferKind::Text,
		BufferKind::Comment,
		BufferKind::Cdata,
		BufferKind::Script,
		BufferKind::Doctype,
		BufferKind::ProcInstName,
		BufferKind::ProcInstBody,
		BufferKind::Entity,
		BufferKind::SgmlDecl,
	];

	/// Whether partial content may be emitted when the limit is reached.
	pub fn is_splittable(self) -> bool {
		match self {
			Self::Text | Self::Cdata | Self::Script => true,
			_ => false,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::TagName => "tagName",
			Self::AttribName => "attribName",
			Self::AttribValue => "attribValue",
			Self::Text => "text",
			Self::Comment => "comment",
			Self::Cdata => "cdata",
			Self::Script => "script",
			Self::Doctype => "doctype",
			Self::ProcInstName => "procInstName",
			Self::ProcInstBody => "procInstBody",
			Self::Entity => "entity",
			Self::SgmlDecl => "sgmlDecl",
		}
	}

	fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for BufferKind {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Per-buffer length limits in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits([usize; NBUFFERS]);

impl BufferLimits {
	/// Use the same limit for all buffers.
	pub fn uniform(limit: usize) -> BufferLimits {
		BufferLimits([limit; NBUFFERS])
	}

	pub fn get(&self, kind: BufferKind) -> usize {
		self.0[kind.index()]
	}

	pub fn set(&mut self, kind: BufferKind, limit: usize) {
		self.0[kind.index()] = limit;
	}
}

impl Default for BufferLimits {
	fn default() -> Self {
		Self::uniform(MAX_BUFFER_LENGTH)
	}
}

/// An atomic buffer would have exceeded its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow(pub BufferKind);

/// A single named accumulator.
#[derive(Debug, Clone, Default)]
pub struct TokenBuffer {
	data: SmartString,
	limit: usize,
}

impl TokenBuffer {
	fn new(limit: usize) -> TokenBuffer {
		TokenBuffer{
			data: SmartString::new(),
			limit: limit,
		}
	}

	fn would_overflow(&self, ch: char) -> bool {
		self.data.len() + ch.len_utf8() > self.limit
	}

	fn take(&mut self) -> String {
		mem::take(&mut self.data).into()
	}

	pub fn as_str(&self) -> &str {
		self.data.as_str()
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

/**
# The set of token buffers owned by a parser

Every buffer is a named field; the [`BufferKind`] accessors dispatch to
them.
*/
#[derive(Debug, Clone)]
pub struct Buffers {
	tag_name: TokenBuffer,
	attrib_name: TokenBuffer,
	attrib_value: TokenBuffer,
	text: TokenBuffer,
	comment: TokenBuffer,
	cdata: TokenBuffer,
	script: TokenBuffer,
	doctype: TokenBuffer,
	proc_inst_name: TokenBuffer,
	proc_inst_body: TokenBuffer,
	entity: TokenBuffer,
	sgml_decl: TokenBuffer,
}

impl Buffers {
	pub fn new(limits: &BufferLimits) -> Buffers {
		Buffers{
			tag_name: TokenBuffer::new(limits.get(BufferKind::TagName)),
			attrib_name: TokenBuffer::new(limits.get(BufferKind::AttribName)),
			attrib_value: TokenBuffer::new(limits.get(BufferKind::AttribValue)),
			text: TokenBuffer::new(limits.get(BufferKind::Text)),
			comment: TokenBuffer::new(limits.get(BufferKind::Comment)),
			cdata: TokenBuffer::new(limits.get(BufferKind::Cdata)),
			script: TokenBuffer::new(limits.get(BufferKind::Script)),
			doctype: TokenBuffer::new(limits.get(BufferKind::Doctype)),
			proc_inst_name: TokenBuffer::new(limits.get(BufferKind::ProcInstName)),
			proc_inst_body: TokenBuffer::new(limits.get(BufferKind::ProcInstBody)),
			entity: TokenBuffer::new(limits.get(BufferKind::Entity)),
			sgml_decl: TokenBuffer::new(limits.get(BufferKind::SgmlDecl)),
		}
	}

	pub fn get(&self, kind: BufferKind) -> &TokenBuffer {
		match kind {
			BufferKind::TagName => &self.tag_name,
			BufferKind::AttribName => &self.attrib_name,
			BufferKind::AttribValue => &self.attrib_value,
			BufferKind::Text => &self.text,
			BufferKind::Comment => &self.comment,
			BufferKind::Cdata => &self.cdata,
			BufferKind::Script => &self.script,
			BufferKind::Doctype => &self.doctype,
			BufferKind::ProcInstName => &self.proc_inst_name,
			BufferKind::ProcInstBody => &self.proc_inst_body,
			BufferKind::Entity => &self.entity,
			BufferKind::SgmlDecl => &self.sgml_decl,
		}
	}

	fn get_mut(&mut self, kind: BufferKind) -> &mut TokenBuffer {
		match kind {
			BufferKind::TagName => &mut self.tag_name,
			BufferKind::AttribName => &mut self.attrib_name,
			BufferKind::AttribValue => &mut self.attrib_value,
			BufferKind::Text => &mut self.text,
			BufferKind::Comment => &mut self.comment,
			BufferKind::Cdata => &mut self.cdata,
			BufferKind::Script => &mut self.script,
			BufferKind::Doctype => &mut self.doctype,
			BufferKind::ProcInstName => &mut self.proc_inst_name,
			BufferKind::ProcInstBody => &mut self.proc_inst_body,
			BufferKind::Entity => &mut self.entity,
			BufferKind::SgmlDecl => &mut self.sgml_decl,
		}
	}

	/// Append a char to a buffer.
	///
	/// If the char does not fit into a splittable buffer, the previous
	/// content is returned as partial token and the buffer continues with
	/// just `ch`. A char which does not fit into an atomic buffer is
	/// rejected with [`Overflow`]; the buffer is left unchanged.
	pub fn append(&mut self, kind: BufferKind, ch: char) -> Result<Option<String>, Overflow> {
		let buf = self.get_mut(kind);
		if !buf.would_overflow(ch) {
			buf.data.push(ch);
			return Ok(None)
		}
		if !kind.is_splittable() {
			return Err(Overflow(kind))
		}
		let partial = buf.take();
		buf.data.push(ch);
		if partial.len() > 0 {
			log::trace!(target: "rsax::buffers", "flushing {} bytes of {} early", partial.len(), kind);
			Ok(Some(partial))
		} else {
			// limit smaller than a single char, emit it on its own
			Ok(None)
		}
	}

	/// Read and clear a buffer.
	pub fn take(&mut self, kind: BufferKind) -> String {
		self.get_mut(kind).take()
	}

	pub fn clear(&mut self, kind: BufferKind) {
		self.get_mut(kind).data.clear();
	}

	pub fn clear_all(&mut self) {
		for kind in BufferKind::ALL.iter() {
			self.clear(*kind);
		}
	}

	pub fn as_str(&self, kind: BufferKind) -> &str {
		self.get(kind).as_str()
	}

	pub fn is_empty(&self, kind: BufferKind) -> bool {
		self.get(kind).is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn buffers(limit: usize) -> Buffers {
		Buffers::new(&BufferLimits::uniform(limit))
	}

	#[test]
	fn buffers_kinds_are_indexed_in_order() {
		for (i, kind) in BufferKind::ALL.iter().enumerate() {
			assert_eq!(kind.index(), i);
		}
	}

	#[test]
	fn buffers_only_character_data_is_splittable() {
		let splittable: Vec<_> = BufferKind::ALL.iter().filter(|k| k.is_splittable()).collect();
		assert_eq!(splittable, vec![&BufferKind::Text, &BufferKind::Cdata, &BufferKind::Script]);
	}

	#[test]
	fn buffers_append_and_take() {
		let mut b = buffers(16);
		for ch in "foo".chars() {
			assert_eq!(b.append(BufferKind::TagName, ch), Ok(None));
		}
		assert_eq!(b.as_str(BufferKind::TagName), "foo");
		assert_eq!(b.take(BufferKind::TagName), "foo");
		assert!(b.is_empty(BufferKind::TagName));
	}

	#[test]
	fn buffers_are_independent() {
		let mut b = buffers(16);
		b.append(BufferKind::AttribName, 'a').unwrap();
		b.append(BufferKind::AttribValue, 'v').unwrap();
		assert_eq!(b.take(BufferKind::AttribName), "a");
		assert_eq!(b.as_str(BufferKind::AttribValue), "v");
	}

	#[test]
	fn buffers_atomic_overflow_is_rejected() {
		let mut b = buffers(3);
		for ch in "abc".chars() {
			b.append(BufferKind::AttribName, ch).unwrap();
		}
		assert_eq!(b.append(BufferKind::AttribName, 'd'), Err(Overflow(BufferKind::AttribName)));
		assert_eq!(b.as_str(BufferKind::AttribName), "abc");
	}

	#[test]
	fn buffers_splittable_overflow_returns_partial() {
		let mut b = buffers(3);
		for ch in "abc".chars() {
			assert_eq!(b.append(BufferKind::Text, ch), Ok(None));
		}
		assert_eq!(b.append(BufferKind::Text, 'd'), Ok(Some("abc".to_string())));
		assert_eq!(b.take(BufferKind::Text), "d");
	}

	#[test]
	fn buffers_limit_counts_bytes() {
		let mut b = buffers(4);
		b.append(BufferKind::Cdata, 'ä').unwrap();
		b.append(BufferKind::Cdata, 'ö').unwrap();
		assert_eq!(b.append(BufferKind::Cdata, 'x'), Ok(Some("äö".to_string())));
	}

	#[test]
	fn buffers_per_kind_limits() {
		let mut limits = BufferLimits::uniform(2);
		limits.set(BufferKind::Comment, 8);
		let mut b = Buffers::new(&limits);
		for ch in "comment".chars() {
			b.append(BufferKind::Comment, ch).unwrap();
		}
		b.append(BufferKind::Doctype, 'a').unwrap();
		b.append(BufferKind::Doctype, 'b').unwrap();
		assert!(b.append(BufferKind::Doctype, 'c').is_err());
	}

	#[test]
	fn buffers_clear_all() {
		let mut b = buffers(16);
		for kind in BufferKind::ALL.iter() {
			b.append(*kind, 'x').unwrap();
		}
		b.clear_all();
		for kind in BufferKind::ALL.iter() {
			assert!(b.is_empty(*kind));
		}
	}
}
