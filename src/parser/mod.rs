/*!
# Incremental markup parser

The [`Parser`] consumes text one char at a time and queues [`Event`]s. It
keeps no reference to the input, so the document may be split into chunks at
arbitrary places without affecting the sequence of events produced.
*/
use std::fmt;
use std::collections::VecDeque;
use std::collections::vec_deque;

mod state;
mod lex;

pub use state::State;

use crate::buffers::{BufferKind, Buffers, Overflow};
use crate::context::Context;
use crate::decoder::Utf8Decoder;
use crate::dialect::{self, Dialect};
use crate::entities::EntityResolver;
use crate::error::*;
use crate::event::{Attribute, Event, Tag};
use crate::namespaces::{NamespaceTracker, QName, RcPtr, UnboundPrefix};
use crate::options::ParserOptions;
use crate::position::{Position, PositionTracker};
use crate::selectors::is_whitespace;

/**
# SAX-style markup parser

Feed text with [`Parser::write`] (or bytes with [`Parser::write_bytes`]),
signal the end of the document with [`Parser::end`] and read the resulting
events with [`Parser::read`] or [`Parser::read_all`].

The parser is poisoned by the first error: the error is queued as
[`Event::Error`] and returned from the call which detected it, and from all
further calls to `write` until [`Parser::resume`] is called. In strict mode,
every violation of XML well-formedness is reported; in loose mode, the
parser recovers silently wherever a reasonable interpretation exists.

```
use rsax::{Parser, ParserOptions, Event};
let mut parser = Parser::with_options(ParserOptions::default().strict(true));
parser.write("<greeting who='world'>hel").unwrap();
parser.write("lo</greeting>").unwrap();
parser.end().unwrap();
let names: Vec<_> = parser.drain().map(|ev| ev.name()).collect();
assert_eq!(names, vec!["ready", "opentagstart", "attribute", "opentag", "text", "closetag", "end"]);
```
*/
pub struct Parser {
	state: State,
	opts: ParserOptions,
	dialect: &'static dyn Dialect,
	resolver: EntityResolver,
	fold_case: bool,
	buffers: Buffers,
	pos: PositionTracker,
	decoder: Utf8Decoder,
	/// Only present with namespace processing enabled
	namespaces: Option<NamespaceTracker>,
	/// Names of the open elements
	stack: Vec<String>,
	/// Start tag under construction
	tag: Option<Tag>,
	/// Name of the raw text element we are in, if any
	raw_text: Option<String>,
	saw_root: bool,
	saw_doctype: bool,
	/// Suppress repeated reports for the same run of stray text
	outside_reported: bool,
	/// Internal queue for events which have not been read yet.
	eventq: VecDeque<Event>,
	err: Option<Error>,
	/// Set by fatal errors to discard the rest of the current chunk
	halted: bool,
}

impl Parser {
	/// Create a loose mode parser with default options.
	pub fn new() -> Parser {
		Self::with_options(ParserOptions::default())
	}

	pub fn with_options(opts: ParserOptions) -> Parser {
		Self::with_context(opts, RcPtr::new(Context::new()))
	}

	/// Create a parser which shares namespace URIs through `ctx`.
	pub fn with_context(opts: ParserOptions, ctx: RcPtr<Context>) -> Parser {
		let dialect = dialect::select(opts.strict);
		let mut parser = Parser{
			state: State::Begin,
			dialect: dialect,
			resolver: EntityResolver::new(dialect.is_strict(), opts.strict_entities)
				.with_entities(opts.entities.clone()),
			fold_case: !dialect.preserves_case() && !opts.preserve_case,
			buffers: Buffers::new(&opts.buffer_limits),
			pos: PositionTracker::new(),
			decoder: Utf8Decoder::new(),
			namespaces: if opts.xmlns {
				Some(NamespaceTracker::with_context(ctx))
			} else {
				None
			},
			stack: Vec::new(),
			tag: None,
			raw_text: None,
			saw_root: false,
			saw_doctype: false,
			outside_reported: false,
			eventq: VecDeque::new(),
			err: None,
			halted: false,
			opts: opts,
		};
		parser.emit(Event::Ready);
		parser
	}

	/// Feed a chunk of text.
	///
	/// Writing an empty chunk is a no-op. Returns the first error raised
	/// while processing the chunk, or the pending error if the parser is
	/// poisoned (in which case the chunk is ignored).
	pub fn write(&mut self, chunk: &str) -> Result<()> {
		self.check_writable()?;
		for ch in chunk.chars() {
			self.feed(ch);
			if self.halted {
				break;
			}
		}
		self.check_poison()
	}

	/// Feed a chunk of UTF-8 encoded bytes.
	///
	/// Sequences split across chunks are reassembled. Invalid sequences
	/// are replaced with U+FFFD.
	pub fn write_bytes(&mut self, chunk: &[u8]) -> Result<()> {
		self.check_writable()?;
		let mut text = String::with_capacity(chunk.len());
		self.decoder.decode(chunk, &mut text);
		self.write(&text)
	}

	/// Signal the end of the document.
	///
	/// Flushes pending text, reports unterminated tokens and, in strict
	/// mode, a missing or unclosed root element. Emits [`Event::End`]
	/// afterwards, even if errors were found; the parser does not accept
	/// further input.
	pub fn end(&mut self) -> Result<()> {
		self.check_writable()?;
		if let Some(ch) = self.decoder.finish() {
			self.feed(ch);
		}
		self.halted = false;
		if let Some(tok) = self.state.open_token() {
			match self.state {
				State::TextEntity => {
					let text = self.buffers.take(BufferKind::Entity);
					self.push(BufferKind::Text, '&');
					self.push_str(BufferKind::Text, &text);
				},
				State::Script | State::ScriptEnding | State::ScriptCloseTag => self.flush_script(),
				State::CdataEnding => {
					self.push(BufferKind::Cdata, ']');
					self.flush_cdata();
				},
				State::CdataEnding2 => {
					self.push_str(BufferKind::Cdata, "]]");
					self.flush_cdata();
				},
				State::Cdata => self.flush_cdata(),
				_ => (),
			}
			self.raise(ErrorKind::UnterminatedToken(tok));
		}
		if !self.saw_root {
			self.violation(ErrorKind::MissingRootElement);
		} else if self.stack.len() > 0 {
			self.violation(ErrorKind::RootElementClosedPrematurely);
		}
		self.flush_text();
		self.emit(Event::End);
		self.state = State::Closed;
		log::debug!(target: "rsax::parser", "document ended at {}", self.pos.position());
		self.check_poison()
	}

	/// Alias of [`Parser::end`].
	pub fn close(&mut self) -> Result<()> {
		self.end()
	}

	/// Clear the pending error to continue parsing.
	///
	/// Parsing continues in the state the parser was in when the error
	/// occured. If the error was a buffer overflow, the overflowing token
	/// has been discarded and the rest of the chunk which contained it was
	/// not processed.
	pub fn resume(&mut self) {
		if let Some(e) = self.err.take() {
			log::debug!(target: "rsax::parser", "resuming after error: {}", e);
		}
		self.halted = false;
	}

	/// Emit pending text, CDATA and raw text content now.
	pub fn flush(&mut self) {
		self.flush_text();
		self.flush_cdata();
		self.flush_script();
	}

	/// Pop the next event off the queue.
	pub fn read(&mut self) -> Option<Event> {
		self.eventq.pop_front()
	}

	/// Pass all queued events to `cb`.
	pub fn read_all<F>(&mut self, mut cb: F)
		where F: FnMut(Event) -> ()
	{
		while let Some(ev) = self.eventq.pop_front() {
			cb(ev);
		}
	}

	/// Iterate over and remove all queued events.
	pub fn drain(&mut self) -> vec_deque::Drain<'_, Event> {
		self.eventq.drain(..)
	}

	/// Number of queued events.
	pub fn pending(&self) -> usize {
		self.eventq.len()
	}

	/// Position after the last consumed char.
	pub fn position(&self) -> Position {
		self.pos.position()
	}

	/// Current state; [`State::Errored`] while an error is pending.
	pub fn state(&self) -> State {
		if self.err.is_some() && self.state != State::Closed {
			State::Errored
		} else {
			self.state
		}
	}

	/// The pending error, if any.
	pub fn error(&self) -> Option<&Error> {
		self.err.as_ref()
	}

	/// Number of open elements.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	pub fn is_closed(&self) -> bool {
		self.state == State::Closed
	}

	pub fn options(&self) -> &ParserOptions {
		&self.opts
	}

	/// Check if the parser is poisoned and return the corresponding error.
	fn check_poison(&self) -> Result<()> {
		match self.err.as_ref() {
			Some(e) => Err(e.clone()),
			None => Ok(()),
		}
	}

	fn check_writable(&mut self) -> Result<()> {
		// nothing may follow Event::End in the queue
		if self.state == State::Closed {
			return Err(Error::new(ErrorKind::WriteAfterClose, self.pos.position()))
		}
		self.halted = false;
		self.check_poison()
	}

	fn feed(&mut self, ch: char) {
		if self.opts.track_position {
			self.pos.advance(ch);
		}
		loop {
			let st = self.lex(self.state, ch);
			if !st.splice(&mut self.state) || self.halted {
				break;
			}
		}
	}

	/// Emit an event into the event queue.
	fn emit(&mut self, ev: Event) {
		log::trace!(target: "rsax::parser", "emit {:?}", ev);
		self.eventq.push_back(ev);
	}

	/// Emit an event after any pending text.
	fn emit_node(&mut self, ev: Event) {
		self.flush_text();
		self.emit(ev);
	}

	/// Report an error unconditionally and poison the parser.
	fn raise(&mut self, kind: ErrorKind) -> Error {
		let fatal = kind.is_fatal();
		let err = Error::new(kind, self.pos.position());
		log::debug!(target: "rsax::parser", "{}", err);
		self.emit(Event::Error(err.clone()));
		if self.err.is_none() {
			self.err = Some(err.clone());
		}
		if fatal {
			self.halted = true;
		}
		err
	}

	/// Report an error if the dialect considers it one.
	fn violation(&mut self, kind: ErrorKind) {
		if let Some(kind) = self.dialect.violation(kind) {
			self.raise(kind);
		}
	}

	fn push(&mut self, kind: BufferKind, ch: char) {
		match self.buffers.append(kind, ch) {
			Ok(None) => (),
			Ok(Some(partial)) => self.emit_partial(kind, partial),
			Err(Overflow(kind)) => {
				self.buffers.clear(kind);
				self.raise(ErrorKind::BufferOverflow(kind));
			},
		}
	}

	fn push_str(&mut self, kind: BufferKind, s: &str) {
		for ch in s.chars() {
			if self.halted {
				return;
			}
			self.push(kind, ch);
		}
	}

	fn emit_partial(&mut self, kind: BufferKind, data: String) {
		match kind {
			BufferKind::Text => self.emit_text(data),
			BufferKind::Cdata => self.emit(Event::Cdata(data)),
			BufferKind::Script => self.emit(Event::Script(data)),
			// atomic buffers never hand out partial content
			_ => (),
		}
	}

	fn apply_text_options(&self, data: String) -> String {
		let data = if self.opts.trim {
			data.trim_matches(is_whitespace).to_string()
		} else {
			data
		};
		if !self.opts.normalize {
			return data
		}
		let mut out = String::with_capacity(data.len());
		let mut in_space = false;
		for ch in data.chars() {
			if is_whitespace(ch) {
				if !in_space {
					out.push(' ');
				}
				in_space = true;
			} else {
				out.push(ch);
				in_space = false;
			}
		}
		out
	}

	fn emit_text(&mut self, data: String) {
		let data = self.apply_text_options(data);
		if data.len() > 0 {
			self.emit(Event::Text(data));
		}
	}

	fn flush_text(&mut self) {
		if !self.buffers.is_empty(BufferKind::Text) {
			let data = self.buffers.take(BufferKind::Text);
			self.emit_text(data);
		}
	}

	fn flush_cdata(&mut self) {
		if !self.buffers.is_empty(BufferKind::Cdata) {
			let data = self.buffers.take(BufferKind::Cdata);
			self.emit(Event::Cdata(data));
		}
	}

	fn flush_script(&mut self) {
		if !self.buffers.is_empty(BufferKind::Script) {
			let data = self.buffers.take(BufferKind::Script);
			self.emit(Event::Script(data));
		}
	}

	fn emit_comment(&mut self) {
		let data = self.buffers.take(BufferKind::Comment);
		let data = self.apply_text_options(data);
		if data.len() > 0 {
			self.emit_node(Event::Comment(data));
		}
	}

	fn fold(&self, name: String) -> String {
		if self.fold_case {
			name.to_lowercase()
		} else {
			name
		}
	}

	/// The element name is complete.
	fn new_tag(&mut self) {
		let name = self.buffers.take(BufferKind::TagName);
		let name = self.fold(name);
		if self.saw_root && self.stack.len() == 0 {
			self.violation(ErrorKind::ContentOutsideRoot);
		}
		self.tag = Some(Tag::new(name.clone()));
		self.emit_node(Event::OpenTagStart(name));
	}

	/// The attribute name and value are complete.
	fn commit_attribute(&mut self) {
		let name = self.buffers.take(BufferKind::AttribName);
		let name = self.fold(name);
		let value = self.buffers.take(BufferKind::AttribValue);
		let duplicate = match self.tag.as_ref() {
			Some(tag) => tag.has_attribute(&name),
			None => return,
		};
		if duplicate {
			self.violation(ErrorKind::DuplicateAttribute(name));
			return;
		}
		let attr = Attribute{
			name: name,
			value: value,
			ns: None,
		};
		// with namespace processing, attributes are emitted once all
		// declarations on the element are known
		if self.namespaces.is_none() {
			self.emit(Event::Attribute(attr.clone()));
		}
		if let Some(tag) = self.tag.as_mut() {
			tag.attributes.push(attr);
		}
	}

	fn accept_qname(&mut self, resolved: std::result::Result<QName, UnboundPrefix>) -> QName {
		match resolved {
			Ok(qname) => qname,
			Err(UnboundPrefix(qname)) => {
				self.violation(ErrorKind::InvalidNamespacePrefix(qname.prefix.clone()));
				qname
			},
		}
	}

	/// Open a namespace scope for `tag` and resolve all names in it.
	fn resolve_namespaces(&mut self, tag: &mut Tag) {
		let (change, element, attributes, scope) = match self.namespaces.as_mut() {
			Some(ns) => {
				let change = ns.push_scope(tag.attributes.iter().map(|a| (a.name.as_str(), a.value.as_str())));
				let element = ns.resolve_element(&tag.name);
				let attributes: Vec<_> = tag.attributes.iter().map(|a| ns.resolve_attribute(&a.name)).collect();
				(change, element, attributes, ns.current().clone())
			},
			None => return,
		};
		for (prefix, uri) in change.rejected {
			self.violation(ErrorKind::ReservedNamespaceBinding{ prefix: prefix, uri: uri });
		}
		for (prefix, uri) in change.declared {
			self.emit(Event::OpenNamespace{ prefix: prefix, uri: uri });
		}
		tag.ns = Some(self.accept_qname(element));
		for (attr, resolved) in tag.attributes.iter_mut().zip(attributes) {
			attr.ns = Some(self.accept_qname(resolved));
			self.emit(Event::Attribute(attr.clone()));
		}
		tag.scope = Some(scope);
	}

	fn is_raw_text_element(&self, name: &str) -> bool {
		self.dialect.raw_text_elements()
			&& self.opts.raw_text_elements.iter().any(|r| r.eq_ignore_ascii_case(name))
	}

	/// The start tag is complete; returns the state to continue in.
	fn open_tag(&mut self, self_closing: bool) -> State {
		let mut tag = match self.tag.take() {
			Some(tag) => tag,
			None => return State::Text,
		};
		tag.self_closing = self_closing;
		if self_closing {
			let is_void = match self.opts.void_elements.as_ref() {
				Some(voids) => voids.iter().any(|v| v.eq_ignore_ascii_case(&tag.name)),
				None => true,
			};
			if !is_void {
				self.violation(ErrorKind::SelfClosingNonVoid(tag.name.clone()));
			}
		}
		self.resolve_namespaces(&mut tag);
		self.saw_root = true;
		let name = tag.name.clone();
		self.emit(Event::OpenTag(tag));
		if self_closing {
			self.close_element(name);
			return State::Text
		}
		let raw_text = self.is_raw_text_element(&name);
		self.stack.push(name.clone());
		if raw_text {
			self.raw_text = Some(name);
			State::Script
		} else {
			State::Text
		}
	}

	/// Emit the end of an element which has been removed from the stack.
	fn close_element(&mut self, name: String) {
		self.emit_node(Event::CloseTag(name));
		let closed = match self.namespaces.as_mut().and_then(|ns| ns.pop_scope()) {
			Some(closed) => closed,
			None => return,
		};
		for (prefix, uri) in closed {
			self.emit(Event::CloseNamespace{ prefix: prefix, uri: uri });
		}
	}

	/// The closing tag is complete; returns the state to continue in.
	fn close_tag(&mut self) -> State {
		let raw = self.buffers.take(BufferKind::TagName);
		if raw.len() == 0 {
			self.violation(ErrorKind::UnexpectedCharacter(State::CloseTag, '>'));
			self.push_str(BufferKind::Text, "</>");
			return State::Text
		}
		let name = match self.raw_text.take() {
			// matched case-insensitively already
			Some(name) => {
				self.flush_script();
				name
			},
			None => self.fold(raw.clone()),
		};
		match self.stack.iter().rposition(|open| *open == name) {
			None => {
				let expected = self.stack.last().cloned();
				self.violation(ErrorKind::MismatchedCloseTag{ expected: expected, found: raw.clone() });
				self.push_str(BufferKind::Text, "</");
				self.push_str(BufferKind::Text, &raw);
				self.push(BufferKind::Text, '>');
			},
			Some(idx) => {
				if idx + 1 != self.stack.len() {
					let expected = self.stack.last().cloned();
					self.violation(ErrorKind::MismatchedCloseTag{ expected: expected, found: name });
				}
				while self.stack.len() > idx {
					match self.stack.pop() {
						Some(open) => self.close_element(open),
						None => break,
					}
				}
			},
		}
		State::Text
	}
}

impl Default for Parser {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Parser {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Parser")
			.field("state", &self.state)
			.field("dialect", &self.dialect)
			.field("depth", &self.stack.len())
			.field("pending", &self.eventq.len())
			.field("err", &self.err)
			.field("position", &self.pos.position())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(opts: ParserOptions, doc: &str) -> (Vec<Event>, Result<()>) {
		let mut p = Parser::with_options(opts);
		let r1 = p.write(doc);
		let r2 = p.end();
		let evs = p.drain().filter(|ev| match ev {
			Event::Ready | Event::End => false,
			_ => true,
		}).collect();
		(evs, r1.and(r2))
	}

	fn loose(doc: &str) -> (Vec<Event>, Result<()>) {
		parse(ParserOptions::default(), doc)
	}

	fn strict(doc: &str) -> (Vec<Event>, Result<()>) {
		parse(ParserOptions::default().strict(true), doc)
	}

	fn attr(name: &str, value: &str) -> Attribute {
		Attribute{
			name: name.to_string(),
			value: value.to_string(),
			ns: None,
		}
	}

	fn errors(evs: &[Event]) -> Vec<ErrorKind> {
		evs.iter().filter_map(|ev| match ev {
			Event::Error(e) => Some(e.kind().clone()),
			_ => None,
		}).collect()
	}

	#[test]
	fn parser_queues_ready_on_construction() {
		let mut p = Parser::new();
		assert_eq!(p.read(), Some(Event::Ready));
		assert_eq!(p.read(), None);
	}

	#[test]
	fn parser_loose_element_with_attributes() {
		let (evs, r) = loose("<div class=foo id=\"x\">hi</div>");
		r.unwrap();
		assert_eq!(evs.len(), 6);
		assert_eq!(evs[0], Event::OpenTagStart("div".to_string()));
		assert_eq!(evs[1], Event::Attribute(attr("class", "foo")));
		assert_eq!(evs[2], Event::Attribute(attr("id", "x")));
		match &evs[3] {
			Event::OpenTag(tag) => {
				assert_eq!(tag.name, "div");
				assert_eq!(tag.attribute("class"), Some("foo"));
				assert_eq!(tag.attribute("id"), Some("x"));
				assert!(!tag.self_closing);
			},
			other => panic!("unexpected event: {:?}", other),
		}
		assert_eq!(evs[4], Event::Text("hi".to_string()));
		assert_eq!(evs[5], Event::CloseTag("div".to_string()));
	}

	#[test]
	fn parser_loose_folds_case() {
		let (evs, r) = loose("<DIV ID=x></div>");
		r.unwrap();
		assert_eq!(evs[0], Event::OpenTagStart("div".to_string()));
		assert_eq!(evs[1], Event::Attribute(attr("id", "x")));
		assert_eq!(evs[3], Event::CloseTag("div".to_string()));
	}

	#[test]
	fn parser_loose_preserve_case_keeps_names() {
		let (evs, r) = parse(ParserOptions::default().preserve_case(true), "<DIV></div>");
		r.unwrap();
		assert_eq!(evs[0], Event::OpenTagStart("DIV".to_string()));
		assert_eq!(evs[2], Event::Text("</div>".to_string()));
		assert_eq!(evs.len(), 3);
	}

	#[test]
	fn parser_strict_preserves_case() {
		let (evs, r) = strict("<Root></Root>");
		r.unwrap();
		assert_eq!(evs[0], Event::OpenTagStart("Root".to_string()));
		assert_eq!(evs[2], Event::CloseTag("Root".to_string()));
	}

	#[test]
	fn parser_attribute_without_value() {
		let (evs, r) = loose("<input disabled>");
		r.unwrap();
		assert_eq!(evs[1], Event::Attribute(attr("disabled", "")));

		let (evs, r) = strict("<input disabled/>");
		assert_eq!(errors(&evs), vec![ErrorKind::UnexpectedCharacter(State::AttribName, '/')]);
		assert!(r.is_err());
	}

	#[test]
	fn parser_duplicate_attribute_keeps_first() {
		let (evs, r) = strict("<a b=\"1\" b=\"2\"/>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::DuplicateAttribute("b".to_string()));
		match evs.iter().find(|ev| ev.name() == "opentag") {
			Some(Event::OpenTag(tag)) => {
				assert_eq!(tag.attributes, vec![attr("b", "1")]);
			},
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[test]
	fn parser_self_closing_emits_close() {
		let (evs, r) = strict("<a/>");
		r.unwrap();
		match &evs[1] {
			Event::OpenTag(tag) => assert!(tag.self_closing),
			other => panic!("unexpected event: {:?}", other),
		}
		assert_eq!(evs[2], Event::CloseTag("a".to_string()));
	}

	#[test]
	fn parser_strict_void_elements() {
		let opts = ParserOptions::default().strict(true).void_elements(vec!["br"]);
		let (_, r) = parse(opts.clone(), "<p><br/></p>");
		r.unwrap();
		let (_, r) = parse(opts, "<p><span/></p>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::SelfClosingNonVoid("span".to_string()));
	}

	#[test]
	fn parser_loose_mismatched_close_pops_to_match() {
		let (evs, r) = loose("<a><b></a>");
		r.unwrap();
		assert_eq!(&evs[4..], &[
			Event::CloseTag("b".to_string()),
			Event::CloseTag("a".to_string()),
		]);
	}

	#[test]
	fn parser_strict_mismatched_close_reports() {
		let (evs, _) = strict("<a><b></a>");
		assert_eq!(errors(&evs), vec![ErrorKind::MismatchedCloseTag{
			expected: Some("b".to_string()),
			found: "a".to_string(),
		}]);
	}

	#[test]
	fn parser_unmatched_close_becomes_text() {
		let (evs, r) = loose("<a></b></a>");
		r.unwrap();
		assert_eq!(&evs[2..], &[
			Event::Text("</b>".to_string()),
			Event::CloseTag("a".to_string()),
		]);
	}

	#[test]
	fn parser_empty_close_tag_becomes_text() {
		let (evs, r) = loose("<a></></a>");
		r.unwrap();
		assert_eq!(evs[2], Event::Text("</>".to_string()));
	}

	#[test]
	fn parser_comment() {
		let (evs, r) = strict("<a><!-- hi --></a>");
		r.unwrap();
		assert_eq!(evs[2], Event::Comment(" hi ".to_string()));
	}

	#[test]
	fn parser_empty_comment_is_dropped() {
		let (evs, r) = strict("<a><!----></a>");
		r.unwrap();
		assert_eq!(evs.len(), 3);
	}

	#[test]
	fn parser_strict_malformed_comment() {
		let (evs, r) = strict("<a><!-- a -- b --></a>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::MalformedComment);
		assert!(evs.contains(&Event::Comment(" a -- b ".to_string())));
		assert_eq!(evs.last(), Some(&Event::CloseTag("a".to_string())));
	}

	#[test]
	fn parser_cdata() {
		let (evs, r) = strict("<a><![CDATA[x<y]]]></a>");
		r.unwrap();
		assert_eq!(&evs[2..5], &[
			Event::OpenCdata,
			Event::Cdata("x<y]".to_string()),
			Event::CloseCdata,
		]);
	}

	#[test]
	fn parser_cdata_marker_case() {
		let (evs, r) = loose("<a><![cdata[x]]></a>");
		r.unwrap();
		assert_eq!(evs[3], Event::Cdata("x".to_string()));

		let (evs, r) = strict("<a><![cdata[x]]></a>");
		assert!(r.is_err());
		assert!(evs.iter().any(|ev| ev.name() == "sgmldeclaration"));
	}

	#[test]
	fn parser_processing_instruction() {
		let (evs, r) = strict("<?xml version=\"1.0\"?><a/>");
		r.unwrap();
		assert_eq!(evs[0], Event::ProcessingInstruction{
			name: "xml".to_string(),
			body: "version=\"1.0\"".to_string(),
		});
	}

	#[test]
	fn parser_doctype_with_internal_subset() {
		let (evs, r) = strict("<!DOCTYPE html [<!ENTITY x \"y>\">]><html/>");
		r.unwrap();
		assert_eq!(evs[0], Event::Doctype(" html [<!ENTITY x \"y>\">]".to_string()));
		assert_eq!(evs[1], Event::OpenTagStart("html".to_string()));
	}

	#[test]
	fn parser_strict_misplaced_doctype() {
		let (_, r) = strict("<a/><!DOCTYPE a>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::MisplacedDoctype);
	}

	#[test]
	fn parser_sgml_declaration() {
		let (evs, r) = loose("<!ELEMENT a 'b>'><a/>");
		r.unwrap();
		assert_eq!(evs[0], Event::SgmlDeclaration("ELEMENT a 'b>'".to_string()));

		let (_, r) = strict("<!ELEMENT a><a/>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::InvalidDeclaration("ELEMENT a".to_string()));
	}

	#[test]
	fn parser_loose_entities() {
		let (evs, r) = loose("<a t=\"&amp;&foo;&#x41;\">&lt;&bogus &copy;</a>");
		r.unwrap();
		assert_eq!(evs[1], Event::Attribute(attr("t", "&&foo;A")));
		assert_eq!(evs[3], Event::Text("<&bogus \u{a9}".to_string()));
	}

	#[test]
	fn parser_strict_unknown_entity() {
		let (evs, r) = strict("<a>&foo;</a>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::InvalidEntity("foo".to_string()));
		assert!(evs.contains(&Event::Text("&foo;".to_string())));
	}

	#[test]
	fn parser_loose_invalid_codepoint_is_reported() {
		let (evs, r) = loose("<a>&#xD800;</a>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::InvalidEntity("#xD800".to_string()));
		assert!(evs.contains(&Event::Text("&#xD800;".to_string())));
	}

	#[test]
	fn parser_unquoted_attribute_entity() {
		let (evs, r) = loose("<a href=x&amp;y>");
		r.unwrap();
		assert_eq!(evs[1], Event::Attribute(attr("href", "x&y")));
	}

	#[test]
	fn parser_unencoded_lt_is_text() {
		let (evs, r) = loose("<a>1 < 2</a>");
		r.unwrap();
		assert_eq!(evs[2], Event::Text("1 < 2".to_string()));

		let (evs, _) = strict("<a>1 < 2</a>");
		assert_eq!(errors(&evs), vec![ErrorKind::UnexpectedCharacter(State::OpenWaka, ' ')]);
	}

	#[test]
	fn parser_strict_text_outside_root() {
		let (evs, r) = strict("x<a/>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::ContentOutsideRoot);
		assert_eq!(evs[1], Event::Text("x".to_string()));
	}

	#[test]
	fn parser_strict_second_root() {
		let (_, r) = strict("<a/><b/>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::ContentOutsideRoot);
		let (evs, r) = loose("<a/><b/>");
		r.unwrap();
		assert_eq!(evs.len(), 6);
	}

	#[test]
	fn parser_strict_whitespace_outside_root_is_fine() {
		let (evs, r) = strict("\n <a/>\n");
		r.unwrap();
		assert_eq!(evs.last(), Some(&Event::Text("\n".to_string())));
	}

	#[test]
	fn parser_strict_missing_root() {
		let (_, r) = strict("   ");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::MissingRootElement);
		let (_, r) = loose("   ");
		r.unwrap();
	}

	#[test]
	fn parser_strict_unclosed_root() {
		let (_, r) = strict("<a><b></b>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::RootElementClosedPrematurely);
		let (_, r) = loose("<a><b></b>");
		r.unwrap();
	}

	#[test]
	fn parser_unterminated_token_at_end() {
		let (_, r) = loose("<a><!-- x");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::UnterminatedToken(TokenKind::Comment));
		let (_, r) = loose("<a href='x");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::UnterminatedToken(TokenKind::Element));
	}

	#[test]
	fn parser_unterminated_cdata_is_flushed() {
		let (evs, r) = loose("<a><![CDATA[payload");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::UnterminatedToken(TokenKind::Cdata));
		assert_eq!(&evs[2..], &[
			Event::OpenCdata,
			Event::Cdata("payload".to_string()),
			Event::Error(Error::new(ErrorKind::UnterminatedToken(TokenKind::Cdata), Position{ line: 0, column: 19, offset: 19 })),
		]);
	}

	#[test]
	fn parser_unterminated_cdata_keeps_pending_brackets() {
		let (evs, _) = strict("<a><![CDATA[x]");
		assert!(evs.contains(&Event::Cdata("x]".to_string())));
		let (evs, _) = strict("<a><![CDATA[x]]");
		assert!(evs.contains(&Event::Cdata("x]]".to_string())));
		let (evs, _) = strict("<a><![CDATA[x]]]");
		assert!(evs.contains(&Event::Cdata("x]]]".to_string())));
	}

	#[test]
	fn parser_unterminated_reference_keeps_text() {
		let (evs, r) = loose("<a>x &amp");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::UnterminatedToken(TokenKind::Reference));
		assert!(evs.contains(&Event::Text("x &amp".to_string())));
	}

	#[test]
	fn parser_byte_order_mark_is_skipped() {
		let (evs, r) = strict("\u{feff}<a/>");
		r.unwrap();
		assert_eq!(evs[0], Event::OpenTagStart("a".to_string()));
	}

	#[test]
	fn parser_script_is_raw_text() {
		let (evs, r) = loose("<script>if (a</b) x=\"</scr\";</SCRIPT >");
		r.unwrap();
		assert_eq!(&evs[2..], &[
			Event::Script("if (a</b) x=\"</scr\";".to_string()),
			Event::CloseTag("script".to_string()),
		]);
	}

	#[test]
	fn parser_strict_has_no_raw_text() {
		let (evs, r) = strict("<script><b/></script>");
		r.unwrap();
		assert_eq!(evs[2], Event::OpenTagStart("b".to_string()));
	}

	#[test]
	fn parser_trim_and_normalize() {
		let opts = ParserOptions::default().trim(true).normalize(true);
		let (evs, r) = parse(opts, "<a>  x \n\t y  <!--  c  d --></a>");
		r.unwrap();
		assert_eq!(evs[2], Event::Text("x y".to_string()));
		assert_eq!(evs[3], Event::Comment("c d".to_string()));
	}

	#[test]
	fn parser_trim_drops_whitespace_only_text() {
		let (evs, r) = parse(ParserOptions::default().trim(true), "<a>\n  <b/>\n</a>");
		r.unwrap();
		assert!(!evs.iter().any(|ev| ev.name() == "text"));
	}

	#[test]
	fn parser_xmlns_events() {
		let opts = ParserOptions::default().strict(true).xmlns(true);
		let (evs, r) = parse(opts, "<r xmlns=\"urn:a\" xmlns:p=\"urn:p\"><p:c p:x=\"1\" y=\"2\"/></r>");
		r.unwrap();
		let names: Vec<_> = evs.iter().map(|ev| ev.name()).collect();
		assert_eq!(names, vec![
			"opentagstart", "opennamespace", "opennamespace", "attribute", "attribute", "opentag",
			"opentagstart", "attribute", "attribute", "opentag", "closetag",
			"closetag", "closenamespace", "closenamespace",
		]);
		match &evs[5] {
			Event::OpenTag(tag) => {
				let ns = tag.ns.as_ref().unwrap();
				assert_eq!(ns.local, "r");
				assert_eq!(ns.uri.as_ref().unwrap().as_str(), "urn:a");
				assert_eq!(tag.scope.as_ref().unwrap().lookup("p").unwrap().as_str(), "urn:p");
			},
			other => panic!("unexpected event: {:?}", other),
		}
		match (&evs[7], &evs[8]) {
			(Event::Attribute(px), Event::Attribute(y)) => {
				assert_eq!(px.ns.as_ref().unwrap().uri.as_ref().unwrap().as_str(), "urn:p");
				assert_eq!(y.ns.as_ref().unwrap().uri, None);
			},
			other => panic!("unexpected events: {:?}", other),
		}
	}

	#[test]
	fn parser_xmlns_unbound_prefix() {
		let opts = ParserOptions::default().strict(true).xmlns(true);
		let (_, r) = parse(opts, "<x:a/>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::InvalidNamespacePrefix("x".to_string()));
	}

	#[test]
	fn parser_xmlns_reserved_binding() {
		let opts = ParserOptions::default().strict(true).xmlns(true);
		let (_, r) = parse(opts, "<a xmlns:xml=\"urn:nope\"/>");
		assert_eq!(r.unwrap_err().kind(), &ErrorKind::ReservedNamespaceBinding{
			prefix: "xml".to_string(),
			uri: "urn:nope".to_string(),
		});
	}

	#[test]
	fn parser_error_position() {
		let (_, r) = strict("<a>\n &foo;</a>");
		let e = r.unwrap_err();
		assert_eq!(e.position(), Position{ line: 1, column: 6, offset: 10 });
	}

	#[test]
	fn parser_poisoned_until_resume() {
		let mut p = Parser::with_options(ParserOptions::default().strict(true));
		let e = p.write("<a>&foo;").unwrap_err();
		assert_eq!(p.state(), State::Errored);
		assert_eq!(p.error(), Some(&e));
		assert_eq!(p.write("</a>").unwrap_err(), e);
		assert_eq!(p.end().unwrap_err(), e);
		p.resume();
		assert_eq!(p.state(), State::Text);
		p.write("</a>").unwrap();
		p.end().unwrap();
		assert!(p.is_closed());
		let evs: Vec<_> = p.drain().collect();
		assert_eq!(&evs[evs.len()-3..], &[
			Event::Text("&foo;".to_string()),
			Event::CloseTag("a".to_string()),
			Event::End,
		]);
	}

	#[test]
	fn parser_flush_emits_pending_text() {
		let mut p = Parser::new();
		p.write("<a>partial").unwrap();
		p.drain();
		p.flush();
		assert_eq!(p.read(), Some(Event::Text("partial".to_string())));
		p.write(" more</a>").unwrap();
		assert_eq!(p.read(), Some(Event::Text(" more".to_string())));
	}

	#[test]
	fn parser_write_after_end_queues_nothing() {
		let mut p = Parser::new();
		p.write("<a/>").unwrap();
		p.end().unwrap();
		assert_eq!(p.drain().last(), Some(Event::End));
		assert_eq!(p.write("<b/>").unwrap_err().into_kind(), ErrorKind::WriteAfterClose);
		assert_eq!(p.write_bytes(b"<b/>").unwrap_err().into_kind(), ErrorKind::WriteAfterClose);
		assert_eq!(p.end().unwrap_err().into_kind(), ErrorKind::WriteAfterClose);
		assert_eq!(p.pending(), 0);
		assert_eq!(p.error(), None);
		assert_eq!(p.state(), State::Closed);
	}

	#[cfg(feature = "mt")]
	#[test]
	fn parser_is_send() {
		fn assert_send<T: Send>() {}
		assert_send::<Parser>();
		assert_send::<RcPtr<Context>>();

		let mut p = Parser::with_options(ParserOptions::default().strict(true));
		p.write("<a>").unwrap();
		let handle = std::thread::spawn(move || {
			p.write("</a>").unwrap();
			p.end().unwrap();
			p.drain().count()
		});
		assert_eq!(handle.join().unwrap(), 5);
	}

	#[test]
	fn parser_depth_follows_elements() {
		let mut p = Parser::new();
		p.write("<a><b>").unwrap();
		assert_eq!(p.depth(), 2);
		p.write("</b>").unwrap();
		assert_eq!(p.depth(), 1);
	}
}
