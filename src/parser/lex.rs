/*!
# Per-state transitions

Every state has a function which consumes a single char and returns the next
state. A transition may ask for the char to be processed again in the next
state instead of consuming it; this keeps the recovery paths from having to
duplicate the handling of the target state.
*/
use crate::buffers::BufferKind;
use crate::entities::EntityError;
use crate::error::ErrorKind;
use crate::event::Event;
use crate::selectors::*;

use super::{Parser, State};

/// Next state and whether the current char has to be processed again.
pub(super) struct ST(State, bool);

impl ST {
	fn to(state: State) -> ST {
		ST(state, false)
	}

	fn redo(state: State) -> ST {
		ST(state, true)
	}

	/// Move the next state into `state` and return whether the char has to
	/// be processed again.
	pub(super) fn splice(self, state: &mut State) -> bool {
		*state = self.0;
		self.1
	}
}

impl Parser {
	pub(super) fn lex(&mut self, state: State, ch: char) -> ST {
		match state {
			State::Begin => self.lex_begin(ch),
			State::BeginWhitespace => self.lex_begin_whitespace(ch),
			State::Text => self.lex_text(ch),
			State::TextEntity => self.lex_reference(state, ch, State::Text, BufferKind::Text),
			State::OpenWaka => self.lex_open_waka(ch),
			State::SgmlDecl => self.lex_sgml_decl(ch),
			State::SgmlDeclQuoted(q) => self.lex_quoted(state, ch, q, BufferKind::SgmlDecl, State::SgmlDecl),
			State::Doctype => self.lex_doctype(ch),
			State::DoctypeQuoted(q) => self.lex_quoted(state, ch, q, BufferKind::Doctype, State::Doctype),
			State::DoctypeDtd => self.lex_doctype_dtd(ch),
			State::DoctypeDtdQuoted(q) => self.lex_quoted(state, ch, q, BufferKind::Doctype, State::DoctypeDtd),
			State::Comment | State::CommentEnding | State::CommentEnded => self.lex_comment(state, ch),
			State::Cdata | State::CdataEnding | State::CdataEnding2 => self.lex_cdata(state, ch),
			State::ProcInst | State::ProcInstBody | State::ProcInstEnding => self.lex_proc_inst(state, ch),
			State::OpenTag => self.lex_open_tag(ch),
			State::OpenTagSlash => self.lex_open_tag_slash(ch),
			State::Attrib => self.lex_attrib(ch),
			State::AttribName => self.lex_attrib_name(ch),
			State::AttribNameSawWhite => self.lex_attrib_name_saw_white(ch),
			State::AttribValue => self.lex_attrib_value(ch),
			State::AttribValueQuoted(q) => self.lex_attrib_value_quoted(state, ch, q),
			State::AttribValueClosed => self.lex_attrib_value_closed(ch),
			State::AttribValueUnquoted => self.lex_attrib_value_unquoted(ch),
			State::AttribValueEntityQuoted(q) => self.lex_reference(state, ch, State::AttribValueQuoted(q), BufferKind::AttribValue),
			State::AttribValueEntityUnquoted => self.lex_reference(state, ch, State::AttribValueUnquoted, BufferKind::AttribValue),
			State::CloseTag => self.lex_close_tag(ch),
			State::CloseTagSawWhite => self.lex_close_tag_saw_white(ch),
			State::Script | State::ScriptEnding | State::ScriptCloseTag => self.lex_script(state, ch),
			// write() refuses input in these
			State::Errored | State::Closed => ST::to(state),
		}
	}

	fn unexpected(&mut self, state: State, ch: char) {
		self.violation(ErrorKind::UnexpectedCharacter(state, ch));
	}

	fn lex_begin(&mut self, ch: char) -> ST {
		if ch == '\u{feff}' {
			ST::to(State::BeginWhitespace)
		} else {
			ST::redo(State::BeginWhitespace)
		}
	}

	fn lex_begin_whitespace(&mut self, ch: char) -> ST {
		match ch {
			'<' => ST::to(State::OpenWaka),
			c if is_whitespace(c) => ST::to(State::BeginWhitespace),
			_ => ST::redo(State::Text),
		}
	}

	fn lex_text(&mut self, ch: char) -> ST {
		if ch == '<' {
			self.outside_reported = false;
			return ST::to(State::OpenWaka)
		}
		if self.stack.len() == 0 && !is_whitespace(ch) && !self.outside_reported {
			self.outside_reported = true;
			self.violation(ErrorKind::ContentOutsideRoot);
		}
		if ch == '&' {
			self.buffers.clear(BufferKind::Entity);
			ST::to(State::TextEntity)
		} else {
			self.push(BufferKind::Text, ch);
			ST::to(State::Text)
		}
	}

	/// Reference in text or in an attribute value; the result goes into
	/// `target` and parsing continues in `ret`.
	fn lex_reference(&mut self, state: State, ch: char, ret: State, target: BufferKind) -> ST {
		if ch == ';' {
			let text = self.buffers.take(BufferKind::Entity);
			if let Some(value) = self.resolver.custom(&text).map(|v| v.to_string()) {
				self.push_str(target, &value);
				return ST::to(ret)
			}
			match self.resolver.resolve(&text) {
				Ok(resolved) => self.push(target, resolved),
				Err(EntityError::Unresolved(text)) => {
					self.violation(ErrorKind::InvalidEntity(text.clone()));
					self.push_reference_literal(target, &text, true);
				},
				Err(EntityError::InvalidCodepoint(text)) => {
					self.raise(ErrorKind::InvalidEntity(text.clone()));
					self.push_reference_literal(target, &text, true);
				},
			}
			return ST::to(ret)
		}
		let accepted = if self.buffers.is_empty(BufferKind::Entity) {
			is_entity_start(ch)
		} else {
			is_entity_char(ch)
		};
		if accepted {
			self.push(BufferKind::Entity, ch);
			return ST::to(state)
		}
		let text = self.buffers.take(BufferKind::Entity);
		self.violation(ErrorKind::InvalidEntity(text.clone()));
		self.push_reference_literal(target, &text, false);
		ST::redo(ret)
	}

	fn push_reference_literal(&mut self, target: BufferKind, text: &str, terminated: bool) {
		self.push(target, '&');
		self.push_str(target, text);
		if terminated {
			self.push(target, ';');
		}
	}

	fn lex_open_waka(&mut self, ch: char) -> ST {
		match ch {
			'!' => ST::to(State::SgmlDecl),
			'/' => ST::to(State::CloseTag),
			'?' => ST::to(State::ProcInst),
			c if is_name_start(c) => {
				self.push(BufferKind::TagName, c);
				ST::to(State::OpenTag)
			},
			c => {
				// not markup after all
				self.unexpected(State::OpenWaka, c);
				self.push(BufferKind::Text, '<');
				ST::redo(State::Text)
			},
		}
	}

	fn lex_sgml_decl(&mut self, ch: char) -> ST {
		if ch == '>' {
			let decl = self.buffers.take(BufferKind::SgmlDecl);
			self.violation(ErrorKind::InvalidDeclaration(decl.clone()));
			self.emit_node(Event::SgmlDeclaration(decl));
			return ST::to(State::Text)
		}
		self.push(BufferKind::SgmlDecl, ch);
		if self.halted {
			return ST::to(State::SgmlDecl)
		}
		let decl = self.buffers.as_str(BufferKind::SgmlDecl);
		if self.dialect.is_cdata_marker(decl) {
			self.buffers.clear(BufferKind::SgmlDecl);
			self.emit_node(Event::OpenCdata);
			ST::to(State::Cdata)
		} else if decl == "--" {
			self.buffers.clear(BufferKind::SgmlDecl);
			ST::to(State::Comment)
		} else if decl.eq_ignore_ascii_case("DOCTYPE") {
			self.buffers.clear(BufferKind::SgmlDecl);
			if self.saw_doctype || self.saw_root {
				self.violation(ErrorKind::MisplacedDoctype);
			}
			self.saw_doctype = true;
			ST::to(State::Doctype)
		} else if is_quote(ch) {
			ST::to(State::SgmlDeclQuoted(ch))
		} else {
			ST::to(State::SgmlDecl)
		}
	}

	/// Quoted part of a declaration, which may contain `>`.
	fn lex_quoted(&mut self, state: State, ch: char, quote: char, kind: BufferKind, ret: State) -> ST {
		self.push(kind, ch);
		if ch == quote {
			ST::to(ret)
		} else {
			ST::to(state)
		}
	}

	fn lex_doctype(&mut self, ch: char) -> ST {
		match ch {
			'>' => {
				let doctype = self.buffers.take(BufferKind::Doctype);
				self.emit_node(Event::Doctype(doctype));
				ST::to(State::Text)
			},
			c => {
				self.push(BufferKind::Doctype, c);
				if c == '[' {
					ST::to(State::DoctypeDtd)
				} else if is_quote(c) {
					ST::to(State::DoctypeQuoted(c))
				} else {
					ST::to(State::Doctype)
				}
			},
		}
	}

	fn lex_doctype_dtd(&mut self, ch: char) -> ST {
		self.push(BufferKind::Doctype, ch);
		match ch {
			']' => ST::to(State::Doctype),
			c if is_quote(c) => ST::to(State::DoctypeDtdQuoted(c)),
			_ => ST::to(State::DoctypeDtd),
		}
	}

	fn lex_comment(&mut self, state: State, ch: char) -> ST {
		match (state, ch) {
			(State::Comment, '-') => ST::to(State::CommentEnding),
			(State::Comment, c) => {
				self.push(BufferKind::Comment, c);
				ST::to(State::Comment)
			},
			(State::CommentEnding, '-') => ST::to(State::CommentEnded),
			(State::CommentEnding, _) => {
				self.push(BufferKind::Comment, '-');
				ST::redo(State::Comment)
			},
			(State::CommentEnded, '>') => {
				self.emit_comment();
				ST::to(State::Text)
			},
			(State::CommentEnded, '-') => {
				// `--->`: the first dash belongs to the content
				self.violation(ErrorKind::MalformedComment);
				self.push(BufferKind::Comment, '-');
				ST::to(State::CommentEnded)
			},
			(_, _) => {
				self.violation(ErrorKind::MalformedComment);
				self.push_str(BufferKind::Comment, "--");
				ST::redo(State::Comment)
			},
		}
	}

	fn lex_cdata(&mut self, state: State, ch: char) -> ST {
		match (state, ch) {
			(State::Cdata, ']') => ST::to(State::CdataEnding),
			(State::Cdata, c) => {
				self.push(BufferKind::Cdata, c);
				ST::to(State::Cdata)
			},
			(State::CdataEnding, ']') => ST::to(State::CdataEnding2),
			(State::CdataEnding, _) => {
				self.push(BufferKind::Cdata, ']');
				ST::redo(State::Cdata)
			},
			(State::CdataEnding2, '>') => {
				self.flush_cdata();
				self.emit(Event::CloseCdata);
				ST::to(State::Text)
			},
			(State::CdataEnding2, ']') => {
				self.push(BufferKind::Cdata, ']');
				ST::to(State::CdataEnding2)
			},
			(_, _) => {
				self.push_str(BufferKind::Cdata, "]]");
				ST::redo(State::Cdata)
			},
		}
	}

	fn lex_proc_inst(&mut self, state: State, ch: char) -> ST {
		match (state, ch) {
			(State::ProcInst, '?') | (State::ProcInstBody, '?') => ST::to(State::ProcInstEnding),
			(State::ProcInst, c) if is_whitespace(c) => ST::to(State::ProcInstBody),
			(State::ProcInst, c) => {
				self.push(BufferKind::ProcInstName, c);
				ST::to(State::ProcInst)
			},
			(State::ProcInstBody, c) => {
				// leading whitespace separates the target from the body
				if !(is_whitespace(c) && self.buffers.is_empty(BufferKind::ProcInstBody)) {
					self.push(BufferKind::ProcInstBody, c);
				}
				ST::to(State::ProcInstBody)
			},
			(_, '>') => {
				let name = self.buffers.take(BufferKind::ProcInstName);
				let body = self.buffers.take(BufferKind::ProcInstBody);
				self.emit_node(Event::ProcessingInstruction{ name: name, body: body });
				ST::to(State::Text)
			},
			(_, '?') => {
				self.push(BufferKind::ProcInstBody, '?');
				ST::to(State::ProcInstEnding)
			},
			(_, _) => {
				self.push(BufferKind::ProcInstBody, '?');
				ST::redo(State::ProcInstBody)
			},
		}
	}

	fn lex_open_tag(&mut self, ch: char) -> ST {
		if is_name_char(ch) {
			self.push(BufferKind::TagName, ch);
			return ST::to(State::OpenTag)
		}
		self.new_tag();
		match ch {
			'>' => ST::to(self.open_tag(false)),
			'/' => ST::to(State::OpenTagSlash),
			c if is_whitespace(c) => ST::to(State::Attrib),
			c => {
				self.unexpected(State::OpenTag, c);
				ST::to(State::Attrib)
			},
		}
	}

	fn lex_open_tag_slash(&mut self, ch: char) -> ST {
		if ch == '>' {
			ST::to(self.open_tag(true))
		} else {
			// a stray slash, the tag goes on
			self.unexpected(State::OpenTagSlash, ch);
			ST::redo(State::Attrib)
		}
	}

	fn lex_attrib(&mut self, ch: char) -> ST {
		match ch {
			'>' => ST::to(self.open_tag(false)),
			'/' => ST::to(State::OpenTagSlash),
			c if is_whitespace(c) => ST::to(State::Attrib),
			c if is_name_start(c) => {
				self.push(BufferKind::AttribName, c);
				ST::to(State::AttribName)
			},
			c => {
				self.unexpected(State::Attrib, c);
				ST::to(State::Attrib)
			},
		}
	}

	fn lex_attrib_name(&mut self, ch: char) -> ST {
		match ch {
			'=' => ST::to(State::AttribValue),
			c if is_name_char(c) => {
				self.push(BufferKind::AttribName, c);
				ST::to(State::AttribName)
			},
			c if is_whitespace(c) => ST::to(State::AttribNameSawWhite),
			c => {
				// attribute without value
				self.unexpected(State::AttribName, c);
				self.commit_attribute();
				ST::redo(State::Attrib)
			},
		}
	}

	fn lex_attrib_name_saw_white(&mut self, ch: char) -> ST {
		match ch {
			'=' => ST::to(State::AttribValue),
			c if is_whitespace(c) => ST::to(State::AttribNameSawWhite),
			c => {
				self.unexpected(State::AttribNameSawWhite, c);
				self.commit_attribute();
				ST::redo(State::Attrib)
			},
		}
	}

	fn lex_attrib_value(&mut self, ch: char) -> ST {
		match ch {
			c if is_whitespace(c) => ST::to(State::AttribValue),
			c if is_quote(c) => ST::to(State::AttribValueQuoted(c)),
			c => {
				self.unexpected(State::AttribValue, c);
				ST::redo(State::AttribValueUnquoted)
			},
		}
	}

	fn lex_attrib_value_quoted(&mut self, state: State, ch: char, quote: char) -> ST {
		match ch {
			c if c == quote => {
				self.commit_attribute();
				ST::to(State::AttribValueClosed)
			},
			'&' => {
				self.buffers.clear(BufferKind::Entity);
				ST::to(State::AttribValueEntityQuoted(quote))
			},
			c => {
				if c == '<' {
					self.unexpected(state, c);
				}
				self.push(BufferKind::AttribValue, c);
				ST::to(state)
			},
		}
	}

	fn lex_attrib_value_closed(&mut self, ch: char) -> ST {
		match ch {
			'>' => ST::to(self.open_tag(false)),
			'/' => ST::to(State::OpenTagSlash),
			c if is_whitespace(c) => ST::to(State::Attrib),
			c if is_name_start(c) => {
				// missing whitespace between attributes
				self.unexpected(State::AttribValueClosed, c);
				self.push(BufferKind::AttribName, c);
				ST::to(State::AttribName)
			},
			c => {
				self.unexpected(State::AttribValueClosed, c);
				ST::to(State::AttribValueClosed)
			},
		}
	}

	fn lex_attrib_value_unquoted(&mut self, ch: char) -> ST {
		match ch {
			'>' => {
				self.commit_attribute();
				ST::to(self.open_tag(false))
			},
			'&' => {
				self.buffers.clear(BufferKind::Entity);
				ST::to(State::AttribValueEntityUnquoted)
			},
			c if is_whitespace(c) => {
				self.commit_attribute();
				ST::to(State::Attrib)
			},
			c => {
				self.push(BufferKind::AttribValue, c);
				ST::to(State::AttribValueUnquoted)
			},
		}
	}

	fn lex_close_tag(&mut self, ch: char) -> ST {
		if self.buffers.is_empty(BufferKind::TagName) {
			return match ch {
				'>' => ST::to(self.close_tag()),
				c if is_whitespace(c) => ST::to(State::CloseTag),
				c if is_name_start(c) => {
					self.push(BufferKind::TagName, c);
					ST::to(State::CloseTag)
				},
				c => {
					self.unexpected(State::CloseTag, c);
					self.push_str(BufferKind::Text, "</");
					ST::redo(State::Text)
				},
			}
		}
		match ch {
			'>' => ST::to(self.close_tag()),
			c if is_name_char(c) => {
				self.push(BufferKind::TagName, c);
				ST::to(State::CloseTag)
			},
			c if is_whitespace(c) => ST::to(State::CloseTagSawWhite),
			c => {
				self.unexpected(State::CloseTag, c);
				ST::to(State::CloseTagSawWhite)
			},
		}
	}

	fn lex_close_tag_saw_white(&mut self, ch: char) -> ST {
		match ch {
			'>' => ST::to(self.close_tag()),
			c if is_whitespace(c) => ST::to(State::CloseTagSawWhite),
			c => {
				self.unexpected(State::CloseTagSawWhite, c);
				ST::to(State::CloseTagSawWhite)
			},
		}
	}

	/// Content of a raw text element; only its own closing tag ends it.
	fn lex_script(&mut self, state: State, ch: char) -> ST {
		match (state, ch) {
			(State::Script, '<') => ST::to(State::ScriptEnding),
			(State::Script, c) => {
				self.push(BufferKind::Script, c);
				ST::to(State::Script)
			},
			(State::ScriptEnding, '/') => {
				self.buffers.clear(BufferKind::TagName);
				ST::to(State::ScriptCloseTag)
			},
			(State::ScriptEnding, _) => {
				self.push(BufferKind::Script, '<');
				ST::redo(State::Script)
			},
			(_, c) => self.lex_script_close_tag(c),
		}
	}

	fn lex_script_close_tag(&mut self, ch: char) -> ST {
		let name_matches = |candidate: &str, element: &str, complete: bool| {
			if complete {
				candidate.eq_ignore_ascii_case(element)
			} else {
				element.get(..candidate.len()).map_or(false, |prefix| prefix.eq_ignore_ascii_case(candidate))
			}
		};
		let element = match self.raw_text.as_ref() {
			Some(name) => name.clone(),
			None => return ST::redo(State::Text),
		};
		if is_name_char(ch) {
			self.push(BufferKind::TagName, ch);
			if name_matches(self.buffers.as_str(BufferKind::TagName), &element, false) {
				return ST::to(State::ScriptCloseTag)
			}
			self.script_close_mismatch();
			return ST::to(State::Script)
		}
		if name_matches(self.buffers.as_str(BufferKind::TagName), &element, true) {
			if ch == '>' {
				return ST::to(self.close_tag())
			} else if is_whitespace(ch) {
				return ST::to(State::CloseTagSawWhite)
			}
		}
		self.script_close_mismatch();
		ST::redo(State::Script)
	}

	/// The `</name` seen in raw text was not the end of the element.
	fn script_close_mismatch(&mut self) {
		let name = self.buffers.take(BufferKind::TagName);
		self.push_str(BufferKind::Script, "</");
		self.push_str(BufferKind::Script, &name);
	}
}
