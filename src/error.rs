/*!
# Error types

Every problem the parser detects is described by an [`ErrorKind`] and reported
as an [`Error`], which additionally carries the [`Position`] at which it was
detected.

Errors are never raised by panicking. They are queued as
[`Event::Error`](crate::Event::Error) and returned from
[`Parser::write`](crate::Parser::write) and friends.
*/
use std::fmt;
use std::error;
use std::result::Result as StdResult;

use crate::buffers::BufferKind;
use crate::parser::State;
use crate::position::Position;

pub const ERRCTX_UNKNOWN: &'static str = "in unknown context";
pub const ERRCTX_DOCBEGIN: &'static str = "at beginning of document";
pub const ERRCTX_TEXT: &'static str = "in text node";
pub const ERRCTX_MARKUP: &'static str = "after '<'";
pub const ERRCTX_NAME: &'static str = "in tag name";
pub const ERRCTX_ELEMENT: &'static str = "in element";
pub const ERRCTX_ATTNAME: &'static str = "in attribute name";
pub const ERRCTX_ATTVAL: &'static str = "in attribute value";
pub const ERRCTX_ELEMENT_FOOT: &'static str = "in closing tag";
pub const ERRCTX_COMMENT: &'static str = "in comment";
pub const ERRCTX_CDATA_SECTION: &'static str = "in CDATA section";
pub const ERRCTX_DOCTYPE: &'static str = "in doctype declaration";
pub const ERRCTX_DECL: &'static str = "in markup declaration";
pub const ERRCTX_PI: &'static str = "in processing instruction";
pub const ERRCTX_RAW_TEXT: &'static str = "in raw text element";
pub const ERRCTX_REF: &'static str = "in entity or character reference";
pub const ERRCTX_DOCEND: &'static str = "at end of document";

/// Kind of token which was left open when the document ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// `<name ...`
	Element,
	/// `</name ...`
	CloseTag,
	/// `<!-- ...`
	Comment,
	/// `<![CDATA[ ...`
	Cdata,
	/// `<!DOCTYPE ...`
	Doctype,
	/// `<? ...`
	ProcessingInstruction,
	/// `<! ...` which is neither of the above
	SgmlDeclaration,
	/// `& ...`
	Reference,
	/// Content of a raw text element such as `<script>`
	Script,
}

impl fmt::Display for TokenKind {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Self::Element => "element",
			Self::CloseTag => "closing tag",
			Self::Comment => "comment",
			Self::Cdata => "CDATA section",
			Self::Doctype => "doctype declaration",
			Self::ProcessingInstruction => "processing instruction",
			Self::SgmlDeclaration => "markup declaration",
			Self::Reference => "entity reference",
			Self::Script => "raw text element",
		})
	}
}

/// Describe what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
	/// The document ended inside a token.
	UnterminatedToken(TokenKind),
	/// A character which is not allowed in the given state.
	UnexpectedCharacter(State, char),
	/// A closing tag did not match the innermost open element.
	///
	/// `expected` is `None` if no element was open at all.
	MismatchedCloseTag{
		expected: Option<String>,
		found: String,
	},
	/// An entity or character reference could not be resolved.
	///
	/// Carries the reference text as written, without `&` and `;`.
	InvalidEntity(String),
	/// An atomic token exceeded the configured buffer limit.
	BufferOverflow(BufferKind),
	/// A namespace prefix is used without being declared.
	InvalidNamespacePrefix(String),
	/// The document ended while the root element was still open.
	RootElementClosedPrematurely,
	/// The document ended without any element.
	MissingRootElement,
	/// Non-whitespace text or a second element outside of the root element.
	ContentOutsideRoot,
	/// `<!...>` construct which is neither comment, CDATA nor doctype.
	InvalidDeclaration(String),
	/// Doctype after the root element or a second doctype.
	MisplacedDoctype,
	/// `--` inside a comment not followed by `>`.
	MalformedComment,
	/// Attribute given more than once on the same element.
	DuplicateAttribute(String),
	/// Attempt to bind `xml` or `xmlns` to a different namespace.
	ReservedNamespaceBinding{
		prefix: String,
		uri: String,
	},
	/// Self-closing syntax on an element not listed as void element.
	SelfClosingNonVoid(String),
	/// Data was written after [`Parser::end`](crate::Parser::end).
	WriteAfterClose,
}

impl ErrorKind {
	/// True for errors after which the rest of the current input chunk
	/// is discarded.
	pub fn is_fatal(&self) -> bool {
		match self {
			Self::BufferOverflow(_) | Self::WriteAfterClose => true,
			_ => false,
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnterminatedToken(tok) => write!(f, "unterminated {} {}", tok, ERRCTX_DOCEND),
			Self::UnexpectedCharacter(state, ch) => write!(f, "U+{:04x} not allowed {}", *ch as u32, state.context()),
			Self::MismatchedCloseTag{ expected: Some(expected), found } => write!(f, "closing tag </{}> does not match open element <{}>", found, expected),
			Self::MismatchedCloseTag{ expected: None, found } => write!(f, "closing tag </{}> without open element", found),
			Self::InvalidEntity(text) => write!(f, "invalid reference &{}; {}", text, ERRCTX_REF),
			Self::BufferOverflow(kind) => write!(f, "maximum length of {} buffer exceeded", kind),
			Self::InvalidNamespacePrefix(prefix) => write!(f, "use of undeclared namespace prefix {:?}", prefix),
			Self::RootElementClosedPrematurely => write!(f, "root element not closed {}", ERRCTX_DOCEND),
			Self::MissingRootElement => write!(f, "no root element {}", ERRCTX_DOCEND),
			Self::ContentOutsideRoot => f.write_str("content outside of root element"),
			Self::InvalidDeclaration(decl) => write!(f, "unknown declaration <!{}> {}", decl, ERRCTX_DECL),
			Self::MisplacedDoctype => write!(f, "doctype not allowed here {}", ERRCTX_DOCTYPE),
			Self::MalformedComment => write!(f, "'--' not followed by '>' {}", ERRCTX_COMMENT),
			Self::DuplicateAttribute(name) => write!(f, "duplicate attribute {:?}", name),
			Self::ReservedNamespaceBinding{ prefix, uri } => write!(f, "reserved prefix {:?} cannot be bound to {:?}", prefix, uri),
			Self::SelfClosingNonVoid(name) => write!(f, "element <{}> is not a void element and cannot be self-closing", name),
			Self::WriteAfterClose => f.write_str("cannot write after close"),
		}
	}
}

/// An [`ErrorKind`] together with the place it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
	kind: ErrorKind,
	position: Position,
}

pub type Result<T> = StdResult<T, Error>;

impl Error {
	pub fn new(kind: ErrorKind, position: Position) -> Error {
		Error{
			kind: kind,
			position: position,
		}
	}

	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Position of the character which caused the error.
	///
	/// All zero if position tracking is disabled.
	pub fn position(&self) -> Position {
		self.position
	}

	pub fn into_kind(self) -> ErrorKind {
		self.kind
	}
}

impl From<Error> for ErrorKind {
	fn from(other: Error) -> Self {
		other.kind
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} (at {})", self.kind, self.position)
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_display_includes_position() {
		let e = Error::new(ErrorKind::MissingRootElement, Position{ line: 2, column: 5, offset: 17 });
		assert_eq!(format!("{}", e), "no root element at end of document (at line 2, column 5)");
	}

	#[test]
	fn error_display_mismatched_close_tag() {
		let k = ErrorKind::MismatchedCloseTag{ expected: Some("b".to_string()), found: "a".to_string() };
		assert_eq!(format!("{}", k), "closing tag </a> does not match open element <b>");
	}

	#[test]
	fn unexpected_character_names_the_state() {
		let k = ErrorKind::UnexpectedCharacter(State::AttribValue, 'x');
		assert_eq!(format!("{}", k), "U+0078 not allowed in attribute value");
	}

	#[test]
	fn only_overflow_and_closed_writes_are_fatal() {
		assert!(ErrorKind::BufferOverflow(BufferKind::TagName).is_fatal());
		assert!(ErrorKind::WriteAfterClose.is_fatal());
		assert!(!ErrorKind::MalformedComment.is_fatal());
		assert!(!ErrorKind::InvalidEntity("foo".to_string()).is_fatal());
	}
}
