use std::fmt;

#[cfg(all(feature = "shared_ns", feature = "mt"))]
use std::sync::{Weak, Mutex, MutexGuard};
#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
use std::rc::Weak;
#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
use std::cell::{RefCell, RefMut};

use crate::namespaces::{NamespaceName, RcPtr};

#[cfg(feature = "shared_ns")]
use weak_table;

#[cfg(feature = "shared_ns")]
type UriWeakSet = weak_table::WeakHashSet<Weak<String>>;

/**
# Shared context for multiple parsers

Parsers created with the same context share the namespace URIs they
encounter, so that documents which declare the same namespaces over and over
again do not allocate a new string for each declaration.

Interning only happens if the crate is built with the `shared_ns` feature;
without it, [`Context::intern`] allocates a fresh pointer each time.

The context is internally mutable and meant to be shared by reference. With
the `mt` feature, it is `Send` and `Sync`.
*/
pub struct Context {
	#[cfg(all(feature = "shared_ns", feature = "mt"))]
	nss: Mutex<UriWeakSet>,
	#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
	nss: RefCell<UriWeakSet>,
}

impl Context {
	#[cfg(all(feature = "shared_ns", feature = "mt"))]
	fn wrap_nss(nss: UriWeakSet) -> Mutex<UriWeakSet> {
		Mutex::new(nss)
	}

	#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
	fn wrap_nss(nss: UriWeakSet) -> RefCell<UriWeakSet> {
		RefCell::new(nss)
	}

	/// Create a new, empty context
	pub fn new() -> Context {
		Context{
			#[cfg(feature = "shared_ns")]
			nss: Self::wrap_nss(weak_table::WeakHashSet::new()),
		}
	}

	#[cfg(all(feature = "shared_ns", feature = "mt"))]
	fn lock_nss<'a>(&'a self) -> MutexGuard<'a, UriWeakSet> {
		// the set stays consistent even if a holder panicked
		self.nss.lock().unwrap_or_else(|e| e.into_inner())
	}

	#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
	fn lock_nss<'a>(&'a self) -> RefMut<'a, UriWeakSet> {
		self.nss.borrow_mut()
	}

	/// Intern a namespace URI.
	///
	/// When the last reference to the returned pointer is dropped, the
	/// string is lazily removed from the context.
	pub fn intern(&self, uri: &str) -> NamespaceName {
		#[cfg(feature = "shared_ns")]
		{
			let mut nss = self.lock_nss();
			return match nss.get(uri) {
				Some(ptr) => ptr,
				None => {
					let ptr = RcPtr::new(uri.to_string());
					nss.insert(ptr.clone());
					ptr
				},
			}
		}
		#[cfg(not(feature = "shared_ns"))]
		RcPtr::new(uri.to_string())
	}

	/// Remove all unreferenced URIs from storage and shrink it.
	pub fn release_temporaries(&self) {
		#[cfg(feature = "shared_ns")]
		{
			let mut nss = self.lock_nss();
			nss.remove_expired();
			nss.shrink_to_fit();
		}
	}

	/// Number of interned URIs, including expired ones not yet removed.
	///
	/// Always zero without `shared_ns`.
	pub fn namespaces(&self) -> usize {
		#[cfg(feature = "shared_ns")]
		{
			let nss = self.lock_nss();
			nss.len()
		}
		#[cfg(not(feature = "shared_ns"))]
		0
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Context {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		let mut f = f.debug_struct("Context");
		f.field("instance", &(self as *const Context));
		#[cfg(feature = "shared_ns")]
		{
			let nss = self.lock_nss();
			f.field("nss.capacity()", &nss.capacity()).field("nss.len()", &nss.len());
		}
		f.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn context_intern_returns_equal_uris() {
		let ctx = Context::new();
		let a = ctx.intern("urn:foo");
		let b = ctx.intern("urn:foo");
		assert_eq!(a, b);
		assert_eq!(a.as_str(), "urn:foo");
	}

	#[cfg(feature = "shared_ns")]
	#[test]
	fn context_intern_shares_pointers() {
		let ctx = Context::new();
		let a = ctx.intern("urn:foo");
		let b = ctx.intern("urn:foo");
		assert!(RcPtr::ptr_eq(&a, &b));
		assert_eq!(ctx.namespaces(), 1);
	}

	#[cfg(feature = "shared_ns")]
	#[test]
	fn context_release_temporaries_drops_unused_uris() {
		let ctx = Context::new();
		{
			let _a = ctx.intern("urn:foo");
		}
		let _b = ctx.intern("urn:bar");
		ctx.release_temporaries();
		assert_eq!(ctx.namespaces(), 1);
	}
}
