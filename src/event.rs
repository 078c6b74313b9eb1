use crate::error::Error;
use crate::namespaces::{NamespaceName, NamespaceScope, QName, RcPtr};

/// A single attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// Name as written (case-folded in loose mode)
	pub name: String,
	/// Value with references resolved
	pub value: String,
	/// Resolved name, only with namespace processing enabled
	pub ns: Option<QName>,
}

/**
# An element start tag

Attributes are kept in document order. Duplicate attributes are dropped, the
first occurrence wins.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
	pub name: String,
	pub attributes: Vec<Attribute>,
	pub self_closing: bool,
	/// Resolved name, only with namespace processing enabled
	pub ns: Option<QName>,
	/// Namespace bindings in effect for the element, only with namespace
	/// processing enabled
	pub scope: Option<RcPtr<NamespaceScope>>,
}

impl Tag {
	pub(crate) fn new(name: String) -> Tag {
		Tag{
			name: name,
			attributes: Vec::new(),
			self_closing: false,
			ns: None,
			scope: None,
		}
	}

	/// Look up an attribute value by name.
	pub fn attribute<'a>(&'a self, name: &str) -> Option<&'a str> {
		self.attributes.iter().find(|a| a.name == name).map(|a| a.value.as_str())
	}

	pub fn has_attribute(&self, name: &str) -> bool {
		self.attributes.iter().any(|a| a.name == name)
	}
}

/**
# Parts of a markup document

Events are queued by the parser in document order and read with
[`Parser::read`](crate::Parser::read) or
[`Parser::read_all`](crate::Parser::read_all).

Character data (`Text`, `Cdata`, `Script`) may arrive in several
consecutive events if it is longer than the configured buffer limit.
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	/// The parser is ready to accept input.
	Ready,
	Text(String),
	/// The name of an element start tag is complete. Its attributes follow.
	OpenTagStart(String),
	Attribute(Attribute),
	/// An element start tag is complete.
	OpenTag(Tag),
	CloseTag(String),
	Comment(String),
	OpenCdata,
	Cdata(String),
	CloseCdata,
	ProcessingInstruction{
		name: String,
		body: String,
	},
	/// Everything between `<!DOCTYPE` and the closing `>`.
	Doctype(String),
	/// Any other `<!...>` declaration.
	SgmlDeclaration(String),
	/// Content of a raw text element.
	Script(String),
	OpenNamespace{
		prefix: String,
		uri: NamespaceName,
	},
	CloseNamespace{
		prefix: String,
		uri: NamespaceName,
	},
	Error(Error),
	/// The document was ended with [`Parser::end`](crate::Parser::end).
	End,
}

impl Event {
	/// Short name of the event kind, for logging.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Ready => "ready",
			Self::Text(..) => "text",
			Self::OpenTagStart(..) => "opentagstart",
			Self::Attribute(..) => "attribute",
			Self::OpenTag(..) => "opentag",
			Self::CloseTag(..) => "closetag",
			Self::Comment(..) => "comment",
			Self::OpenCdata => "opencdata",
			Self::Cdata(..) => "cdata",
			Self::CloseCdata => "closecdata",
			Self::ProcessingInstruction{..} => "processinginstruction",
			Self::Doctype(..) => "doctype",
			Self::SgmlDeclaration(..) => "sgmldeclaration",
			Self::Script(..) => "script",
			Self::OpenNamespace{..} => "opennamespace",
			Self::CloseNamespace{..} => "closenamespace",
			Self::Error(..) => "error",
			Self::End => "end",
		}
	}

	pub fn is_error(&self) -> bool {
		matches!(self, Self::Error(..))
	}
}
