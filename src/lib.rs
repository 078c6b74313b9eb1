/*!
# Streaming SAX-style markup parsing

This crate provides an incremental, event-based parser for XML and
HTML-like markup. Input is pushed in chunks of any size; the parser keeps
just enough state to continue at the next chunk and produces the same
events no matter where the input was split.

## Features

* Strict mode enforcing XML well-formedness
* Loose mode accepting tag soup, with case folding, HTML entities and raw
  text elements such as `<script>`
* Optional namespace processing with scope tracking
* Line, column and offset tracking for error reporting
* Bounded memory use: every token buffer has a configurable limit; long
  text is emitted in parts
* UTF-8 byte input with sequences split across chunks

## Example

```
use rsax::{Event, Parser, ParserOptions};
let mut parser = Parser::with_options(ParserOptions::default().strict(true));
parser.write("<hello>Wor").unwrap();
parser.write("ld!</hello>").unwrap();
parser.end().unwrap();
parser.read_all(|ev| {
	println!("got event: {:?}", ev);
});
```

## Error handling

Errors are queued as [`Event::Error`] and returned from the call which
detected them. The parser stays poisoned until [`Parser::resume`] is
called; see [`Parser`] for details.
*/
pub mod error;
pub mod position;
pub mod selectors;
pub mod buffers;
pub mod entities;
pub mod context;
pub mod namespaces;
mod dialect;
pub mod event;
pub mod options;
pub mod decoder;
pub mod parser;


#[doc(inline)]
pub use error::{Error, ErrorKind, Result, TokenKind};
#[doc(inline)]
pub use position::Position;
#[doc(inline)]
pub use buffers::{BufferKind, BufferLimits, MAX_BUFFER_LENGTH};
#[doc(inline)]
pub use entities::{EntityError, EntityResolver};
#[doc(inline)]
pub use context::Context;
#[doc(inline)]
pub use namespaces::{NamespaceName, NamespaceScope, QName, RcPtr, XML_NAMESPACE, XMLNS_NAMESPACE};
#[doc(inline)]
pub use event::{Attribute, Event, Tag};
#[doc(inline)]
pub use options::ParserOptions;
#[doc(inline)]
pub use parser::{Parser, State};
