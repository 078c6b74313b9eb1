/*!
# Namespace scopes

Tracks the prefix to URI bindings in effect for the currently open elements
and resolves qualified names against them.
*/
#[cfg(feature = "mt")]
use std::sync::Arc;
#[cfg(not(feature = "mt"))]
use std::rc::Rc;

use crate::context::Context;

/// XML core namespace URI (for the `xml:` prefix)
pub const XML_NAMESPACE: &'static str = "http://www.w3.org/XML/1998/namespace";
/// XML namespace declaration namespace URI (for the `xmlns:` prefix)
pub const XMLNS_NAMESPACE: &'static str = "http://www.w3.org/2000/xmlns/";

pub const PREFIX_XML: &'static str = "xml";
pub const PREFIX_XMLNS: &'static str = "xmlns";

/// Reference counted pointer, atomic with the `mt` feature.
#[cfg(feature = "mt")]
pub type RcPtr<T> = Arc<T>;
#[cfg(not(feature = "mt"))]
pub type RcPtr<T> = Rc<T>;

/// Shared namespace URI.
pub type NamespaceName = RcPtr<String>;

/// A name split into prefix and local part and resolved to a namespace.
///
/// The prefix is empty for unprefixed names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
	pub prefix: String,
	pub local: String,
	pub uri: Option<NamespaceName>,
}

/// Split `name` at the first colon.
///
/// The attribute name `xmlns` splits into prefix `xmlns` and an empty
/// local part.
pub fn split_name(name: &str, is_attribute: bool) -> (&str, &str) {
	if is_attribute && name == PREFIX_XMLNS {
		return (PREFIX_XMLNS, "")
	}
	match name.find(':') {
		Some(idx) => (&name[..idx], &name[idx+1..]),
		None => ("", name),
	}
}

/// A level of namespace bindings.
///
/// Only the bindings declared on the owning element are stored here;
/// inherited bindings are found through the parent chain.
#[derive(Debug, PartialEq)]
pub struct NamespaceScope {
	bindings: Vec<(String, NamespaceName)>,
	parent: Option<RcPtr<NamespaceScope>>,
}

impl NamespaceScope {
	/// Find the URI bound to `prefix` (`""` for the default namespace).
	pub fn lookup(&self, prefix: &str) -> Option<&NamespaceName> {
		let mut scope = self;
		loop {
			if let Some((_, uri)) = scope.bindings.iter().find(|(p, _)| p == prefix) {
				return Some(uri)
			}
			match scope.parent.as_ref() {
				Some(parent) => scope = parent,
				None => return None,
			}
		}
	}

	/// Bindings declared at this level, in declaration order.
	pub fn bindings(&self) -> &[(String, NamespaceName)] {
		&self.bindings
	}

	pub fn parent(&self) -> Option<&RcPtr<NamespaceScope>> {
		self.parent.as_ref()
	}
}

impl Drop for NamespaceScope {
	fn drop(&mut self) {
		// unlink iteratively, deeply nested documents would otherwise
		// recurse once per level
		let mut next = self.parent.take();
		while let Some(scope) = next {
			next = match RcPtr::try_unwrap(scope) {
				Ok(mut scope) => scope.parent.take(),
				Err(_) => None,
			};
		}
	}
}

/// Result of resolving a name whose prefix is not bound.
///
/// The contained name uses the prefix itself as namespace URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundPrefix(pub QName);

/// Outcome of opening a scope.
#[derive(Debug, Default)]
pub struct ScopeChange {
	/// New bindings, in declaration order
	pub declared: Vec<(String, NamespaceName)>,
	/// Attempts to rebind `xml` or `xmlns`, as `(prefix, uri)`; these are
	/// ignored
	pub rejected: Vec<(String, String)>,
}

struct Level {
	scope: RcPtr<NamespaceScope>,
	owned: bool,
}

/**
# Stack of namespace scopes

One level is pushed per open element and popped when it closes. The bottom
scope binds `xml` and `xmlns` to their fixed URIs.
*/
pub struct NamespaceTracker {
	ctx: RcPtr<Context>,
	root: RcPtr<NamespaceScope>,
	stack: Vec<Level>,
}

impl NamespaceTracker {
	pub fn new() -> NamespaceTracker {
		Self::with_context(RcPtr::new(Context::new()))
	}

	pub fn with_context(ctx: RcPtr<Context>) -> NamespaceTracker {
		let root = RcPtr::new(NamespaceScope{
			bindings: vec![
				(PREFIX_XML.to_string(), ctx.intern(XML_NAMESPACE)),
				(PREFIX_XMLNS.to_string(), ctx.intern(XMLNS_NAMESPACE)),
			],
			parent: None,
		});
		NamespaceTracker{
			ctx: ctx,
			root: root,
			stack: Vec::new(),
		}
	}

	/// The scope in effect for the innermost element.
	pub fn current(&self) -> &RcPtr<NamespaceScope> {
		match self.stack.last() {
			Some(level) => &level.scope,
			None => &self.root,
		}
	}

	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// Open a scope for an element with the given attributes.
	///
	/// A new scope is only allocated if the attributes declare namespaces;
	/// otherwise the current scope is shared.
	pub fn push_scope<'a, I: IntoIterator<Item = (&'a str, &'a str)>>(&mut self, attributes: I) -> ScopeChange {
		let mut change = ScopeChange::default();
		for (name, value) in attributes {
			let prefix = match split_name(name, true) {
				(PREFIX_XMLNS, "") => "",
				(PREFIX_XMLNS, local) => local,
				_ => continue,
			};
			let reserved = match prefix {
				PREFIX_XML => Some(XML_NAMESPACE),
				PREFIX_XMLNS => Some(XMLNS_NAMESPACE),
				_ => None,
			};
			match reserved {
				Some(fixed) if fixed != value => {
					change.rejected.push((prefix.to_string(), value.to_string()));
					continue;
				},
				_ => (),
			}
			if change.declared.iter().any(|(p, _)| p == prefix) {
				continue;
			}
			change.declared.push((prefix.to_string(), self.ctx.intern(value)));
		}
		if change.declared.len() == 0 {
			let scope = self.current().clone();
			self.stack.push(Level{ scope: scope, owned: false });
		} else {
			let scope = RcPtr::new(NamespaceScope{
				bindings: change.declared.clone(),
				parent: Some(self.current().clone()),
			});
			self.stack.push(Level{ scope: scope, owned: true });
		}
		change
	}

	/// Close the innermost scope.
	///
	/// Returns the bindings which go out of scope, or `None` if no scope is
	/// open.
	pub fn pop_scope(&mut self) -> Option<Vec<(String, NamespaceName)>> {
		let level = self.stack.pop()?;
		if level.owned {
			Some(level.scope.bindings.clone())
		} else {
			Some(Vec::new())
		}
	}

	fn resolve(&self, name: &str, is_attribute: bool) -> Result<QName, UnboundPrefix> {
		let (prefix, local) = split_name(name, is_attribute);
		let mut qname = QName{
			prefix: prefix.to_string(),
			local: local.to_string(),
			uri: None,
		};
		// unprefixed attributes are in no namespace
		if is_attribute && prefix.len() == 0 {
			return Ok(qname)
		}
		match self.current().lookup(prefix) {
			Some(uri) => {
				qname.uri = Some(uri.clone());
				Ok(qname)
			},
			None if prefix.len() == 0 => Ok(qname),
			None => {
				qname.uri = Some(self.ctx.intern(prefix));
				Err(UnboundPrefix(qname))
			},
		}
	}

	/// Resolve an element name against the current scope.
	pub fn resolve_element(&self, name: &str) -> Result<QName, UnboundPrefix> {
		self.resolve(name, false)
	}

	/// Resolve an attribute name against the current scope.
	pub fn resolve_attribute(&self, name: &str) -> Result<QName, UnboundPrefix> {
		self.resolve(name, true)
	}
}

impl Drop for NamespaceTracker {
	fn drop(&mut self) {
		// innermost first, so each drop only releases one level
		while self.stack.pop().is_some() {}
	}
}
