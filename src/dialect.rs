/*!
# Strict and loose rule sets

The state machine is shared between both modes. Everything which differs is
asked from the [`Dialect`] selected when the parser is constructed.
*/
use std::fmt;

use crate::error::ErrorKind;

pub(crate) trait Dialect: fmt::Debug + Sync {
	/// Decide whether a recoverable violation is reported.
	///
	/// The state machine applies the same recovery in both modes; only the
	/// reporting differs.
	fn violation(&self, kind: ErrorKind) -> Option<ErrorKind>;

	/// Whether raw text elements such as `<script>` are recognized.
	fn raw_text_elements(&self) -> bool;

	/// Whether `candidate` (the text after `<!`) opens a CDATA section.
	fn is_cdata_marker(&self, candidate: &str) -> bool;

	/// Whether case must be preserved regardless of configuration.
	fn preserves_case(&self) -> bool;

	fn is_strict(&self) -> bool;
}

const CDATA_MARKER: &'static str = "[CDATA[";

/// XML well-formedness rules.
#[derive(Debug)]
pub(crate) struct Strict;

/// HTML-like tag soup rules.
#[derive(Debug)]
pub(crate) struct Loose;

impl Dialect for Strict {
	fn violation(&self, kind: ErrorKind) -> Option<ErrorKind> {
		Some(kind)
	}

	fn raw_text_elements(&self) -> bool {
		false
	}

	fn is_cdata_marker(&self, candidate: &str) -> bool {
		candidate == CDATA_MARKER
	}

	fn preserves_case(&self) -> bool {
		true
	}

	fn is_strict(&self) -> bool {
		true
	}
}

impl Dialect for Loose {
	fn violation(&self, _kind: ErrorKind) -> Option<ErrorKind> {
		None
	}

	fn raw_text_elements(&self) -> bool {
		true
	}

	fn is_cdata_marker(&self, candidate: &str) -> bool {
		candidate.eq_ignore_ascii_case(CDATA_MARKER)
	}

	fn preserves_case(&self) -> bool {
		false
	}

	fn is_strict(&self) -> bool {
		false
	}
}

static STRICT: Strict = Strict;
static LOOSE: Loose = Loose;

pub(crate) fn select(strict: bool) -> &'static dyn Dialect {
	if strict {
		&STRICT
	} else {
		&LOOSE
	}
}
