use crate::error::*;

/**
# Tokenizer states

Exactly one state is active at any time. States which remember a quote
character carry it as payload.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
	/// Nothing consumed yet, a byte order mark is skipped here
	Begin,
	/// Skipping whitespace before the first `<`
	BeginWhitespace,
	Text,
	/// `&` in text
	TextEntity,
	/// Encountered `<`
	OpenWaka,
	/// `<!` which may turn into a comment, CDATA or doctype
	SgmlDecl,
	SgmlDeclQuoted(char),
	Doctype,
	DoctypeQuoted(char),
	/// Internal subset `[...]`
	DoctypeDtd,
	DoctypeDtdQuoted(char),
	Comment,
	/// Encountered `-` in a comment
	CommentEnding,
	/// Encountered `--` in a comment
	CommentEnded,
	Cdata,
	/// Encountered `]`
	CdataEnding,
	/// Encountered `]]`
	CdataEnding2,
	/// `<?` and the target name
	ProcInst,
	ProcInstBody,
	/// Encountered `?` in a processing instruction
	ProcInstEnding,
	/// In the element name of a start tag
	OpenTag,
	/// Encountered `/` in a start tag
	OpenTagSlash,
	/// Between attributes
	Attrib,
	AttribName,
	AttribNameSawWhite,
	/// After `=`
	AttribValue,
	AttribValueQuoted(char),
	/// After the closing quote
	AttribValueClosed,
	AttribValueUnquoted,
	AttribValueEntityQuoted(char),
	AttribValueEntityUnquoted,
	/// `</`
	CloseTag,
	CloseTagSawWhite,
	/// Content of a raw text element
	Script,
	/// Encountered `<` in raw text
	ScriptEnding,
	/// Encountered `</` in raw text
	ScriptCloseTag,
	/// An error has to be acknowledged with `resume()`
	Errored,
	/// The document has been ended
	Closed,
}

impl State {
	/// Describe the state for error messages.
	pub fn context(&self) -> &'static str {
		match self {
			Self::Begin | Self::BeginWhitespace => ERRCTX_DOCBEGIN,
			Self::Text => ERRCTX_TEXT,
			Self::TextEntity | Self::AttribValueEntityQuoted(_) | Self::AttribValueEntityUnquoted => ERRCTX_REF,
			Self::OpenWaka => ERRCTX_MARKUP,
			Self::SgmlDecl | Self::SgmlDeclQuoted(_) => ERRCTX_DECL,
			Self::Doctype | Self::DoctypeQuoted(_) | Self::DoctypeDtd | Self::DoctypeDtdQuoted(_) => ERRCTX_DOCTYPE,
			Self::Comment | Self::CommentEnding | Self::CommentEnded => ERRCTX_COMMENT,
			Self::Cdata | Self::CdataEnding | Self::CdataEnding2 => ERRCTX_CDATA_SECTION,
			Self::ProcInst | Self::ProcInstBody | Self::ProcInstEnding => ERRCTX_PI,
			Self::OpenTag => ERRCTX_NAME,
			Self::OpenTagSlash | Self::Attrib | Self::AttribValueClosed => ERRCTX_ELEMENT,
			Self::AttribName | Self::AttribNameSawWhite => ERRCTX_ATTNAME,
			Self::AttribValue | Self::AttribValueQuoted(_) | Self::AttribValueUnquoted => ERRCTX_ATTVAL,
			Self::CloseTag | Self::CloseTagSawWhite => ERRCTX_ELEMENT_FOOT,
			Self::Script | Self::ScriptEnding | Self::ScriptCloseTag => ERRCTX_RAW_TEXT,
			Self::Errored | Self::Closed => ERRCTX_UNKNOWN,
		}
	}

	/// The token which is left unterminated if the document ends in this
	/// state.
	pub fn open_token(&self) -> Option<TokenKind> {
		match self {
			Self::Begin | Self::BeginWhitespace | Self::Text | Self::Errored | Self::Closed => None,
			Self::TextEntity | Self::AttribValueEntityQuoted(_) | Self::AttribValueEntityUnquoted => Some(TokenKind::Reference),
			Self::SgmlDecl | Self::SgmlDeclQuoted(_) => Some(TokenKind::SgmlDeclaration),
			Self::Doctype | Self::DoctypeQuoted(_) | Self::DoctypeDtd | Self::DoctypeDtdQuoted(_) => Some(TokenKind::Doctype),
			Self::Comment | Self::CommentEnding | Self::CommentEnded => Some(TokenKind::Comment),
			Self::Cdata | Self::CdataEnding | Self::CdataEnding2 => Some(TokenKind::Cdata),
			Self::ProcInst | Self::ProcInstBody | Self::ProcInstEnding => Some(TokenKind::ProcessingInstruction),
			Self::OpenWaka | Self::OpenTag | Self::OpenTagSlash | Self::Attrib | Self::AttribName |
				Self::AttribNameSawWhite | Self::AttribValue | Self::AttribValueQuoted(_) |
				Self::AttribValueClosed | Self::AttribValueUnquoted => Some(TokenKind::Element),
			Self::CloseTag | Self::CloseTagSawWhite => Some(TokenKind::CloseTag),
			Self::Script | Self::ScriptEnding | Self::ScriptCloseTag => Some(TokenKind::Script),
		}
	}
}
