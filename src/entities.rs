/*!
# Entity and character reference resolution

References are resolved without recursion: a reference expands to exactly
one character which is never re-scanned.
*/
use std::collections::HashMap;
use std::fmt;

use crate::selectors::{CharSelector, CLASS_XML_CHAR};

/// Static table of named entities.
pub struct EntityTable {
	name: &'static str,
	entries: &'static [(&'static str, u32)],
}

impl EntityTable {
	/// Exact-case lookup.
	pub fn get(&self, name: &str) -> Option<char> {
		self.entries.iter()
			.find(|(n, _)| *n == name)
			.and_then(|(_, cp)| std::char::from_u32(*cp))
	}

	/// ASCII case-insensitive lookup. Returns the first match in table
	/// order.
	pub fn get_ignore_case(&self, name: &str) -> Option<char> {
		self.entries.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.and_then(|(_, cp)| std::char::from_u32(*cp))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}

impl fmt::Debug for EntityTable {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "EntityTable({}, <{} entries>)", self.name, self.entries.len())
	}
}

/// The five entities predefined by XML 1.0.
pub static XML_ENTITIES: EntityTable = EntityTable{
	name: "xml",
	entries: &[
		("amp", 38),
		("lt", 60),
		("gt", 62),
		("quot", 34),
		("apos", 39),
	],
};

/// The HTML 4 character entity set plus `apos`.
pub static HTML_ENTITIES: EntityTable = EntityTable{
	name: "html",
	entries: &[
		("amp", 38), ("lt", 60), ("gt", 62), ("quot", 34), ("apos", 39),
		("nbsp", 160), ("iexcl", 161), ("cent", 162), ("pound", 163),
		("curren", 164), ("yen", 165), ("brvbar", 166), ("sect", 167),
		("uml", 168), ("copy", 169), ("ordf", 170), ("laquo", 171),
		("not", 172), ("shy", 173), ("reg", 174), ("macr", 175),
		("deg", 176), ("plusmn", 177), ("sup2", 178), ("sup3", 179),
		("acute", 180), ("micro", 181), ("para", 182), ("middot", 183),
		("cedil", 184), ("sup1", 185), ("ordm", 186), ("raquo", 187),
		("frac14", 188), ("frac12", 189), ("frac34", 190), ("iquest", 191),
		("Agrave", 192), ("Aacute", 193), ("Acirc", 194), ("Atilde", 195),
		("Auml", 196), ("Aring", 197), ("AElig", 198), ("Ccedil", 199),
		("Egrave", 200), ("Eacute", 201), ("Ecirc", 202), ("Euml", 203),
		("Igrave", 204), ("Iacute", 205), ("Icirc", 206), ("Iuml", 207),
		("ETH", 208), ("Ntilde", 209), ("Ograve", 210), ("Oacute", 211),
		("Ocirc", 212), ("Otilde", 213), ("Ouml", 214), ("times", 215),
		("Oslash", 216), ("Ugrave", 217), ("Uacute", 218), ("Ucirc", 219),
		("Uuml", 220), ("Yacute", 221), ("THORN", 222), ("szlig", 223),
		("agrave", 224), ("aacute", 225), ("acirc", 226), ("atilde", 227),
		("auml", 228), ("aring", 229), ("aelig", 230), ("ccedil", 231),
		("egrave", 232), ("eacute", 233), ("ecirc", 234), ("euml", 235),
		("igrave", 236), ("iacute", 237), ("icirc", 238), ("iuml", 239),
		("eth", 240), ("ntilde", 241), ("ograve", 242), ("oacute", 243),
		("ocirc", 244), ("otilde", 245), ("ouml", 246), ("divide", 247),
		("oslash", 248), ("ugrave", 249), ("uacute", 250), ("ucirc", 251),
		("uuml", 252), ("yacute", 253), ("thorn", 254), ("yuml", 255),
		("OElig", 338), ("oelig", 339), ("Scaron", 352), ("scaron", 353),
		("Yuml", 376), ("fnof", 402), ("circ", 710), ("tilde", 732),
		("Alpha", 913), ("Beta", 914), ("Gamma", 915), ("Delta", 916),
		("Epsilon", 917), ("Zeta", 918), ("Eta", 919), ("Theta", 920),
		("Iota", 921), ("Kappa", 922), ("Lambda", 923), ("Mu", 924),
		("Nu", 925), ("Xi", 926), ("Omicron", 927), ("Pi", 928),
		("Rho", 929), ("Sigma", 931), ("Tau", 932), ("Upsilon", 933),
		("Phi", 934), ("Chi", 935), ("Psi", 936), ("Omega", 937),
		("alpha", 945), ("beta", 946), ("gamma", 947), ("delta", 948),
		("epsilon", 949), ("zeta", 950), ("eta", 951), ("theta", 952),
		("iota", 953), ("kappa", 954), ("lambda", 955), ("mu", 956),
		("nu", 957), ("xi", 958), ("omicron", 959), ("pi", 960),
		("rho", 961), ("sigmaf", 962), ("sigma", 963), ("tau", 964),
		("upsilon", 965), ("phi", 966), ("chi", 967), ("psi", 968),
		("omega", 969), ("thetasym", 977), ("upsih", 978), ("piv", 982),
		("ensp", 8194), ("emsp", 8195), ("thinsp", 8201), ("zwnj", 8204),
		("zwj", 8205), ("lrm", 8206), ("rlm", 8207), ("ndash", 8211),
		("mdash", 8212), ("lsquo", 8216), ("rsquo", 8217), ("sbquo", 8218),
		("ldquo", 8220), ("rdquo", 8221), ("bdquo", 8222), ("dagger", 8224),
		("Dagger", 8225), ("bull", 8226), ("hellip", 8230), ("permil", 8240),
		("prime", 8242), ("Prime", 8243), ("lsaquo", 8249), ("rsaquo", 8250),
		("oline", 8254), ("frasl", 8260), ("euro", 8364), ("image", 8465),
		("weierp", 8472), ("real", 8476), ("trade", 8482), ("alefsym", 8501),
		("larr", 8592), ("uarr", 8593), ("rarr", 8594), ("darr", 8595),
		("harr", 8596), ("crarr", 8629), ("lArr", 8656), ("uArr", 8657),
		("rArr", 8658), ("dArr", 8659), ("hArr", 8660), ("forall", 8704),
		("part", 8706), ("exist", 8707), ("empty", 8709), ("nabla", 8711),
		("isin", 8712), ("notin", 8713), ("ni", 8715), ("prod", 8719),
		("sum", 8721), ("minus", 8722), ("lowast", 8727), ("radic", 8730),
		("prop", 8733), ("infin", 8734), ("ang", 8736), ("and", 8743),
		("or", 8744), ("cap", 8745), ("cup", 8746), ("int", 8747),
		("there4", 8756), ("sim", 8764), ("cong", 8773), ("asymp", 8776),
		("ne", 8800), ("equiv", 8801), ("le", 8804), ("ge", 8805),
		("sub", 8834), ("sup", 8835), ("nsub", 8836), ("sube", 8838),
		("supe", 8839), ("oplus", 8853), ("otimes", 8855), ("perp", 8869),
		("sdot", 8901), ("lceil", 8968), ("rceil", 8969), ("lfloor", 8970),
		("rfloor", 8971), ("lang", 9001), ("rang", 9002), ("loz", 9674),
		("spades", 9824), ("clubs", 9827), ("hearts", 9829), ("diams", 9830),
	],
};

/// Why a reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
	/// Unknown name or malformed numeric reference.
	Unresolved(String),
	/// Well-formed numeric reference to a codepoint which is not allowed.
	InvalidCodepoint(String),
}

impl EntityError {
	/// The reference text without `&` and `;`.
	pub fn text(&self) -> &str {
		match self {
			Self::Unresolved(s) | Self::InvalidCodepoint(s) => s.as_str(),
		}
	}
}

impl fmt::Display for EntityError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Unresolved(s) => write!(f, "undeclared entity &{};", s),
			Self::InvalidCodepoint(s) => write!(f, "character reference &{}; expands to invalid codepoint", s),
		}
	}
}

/// Parse the digits of a numeric reference.
///
/// Returns `Ok(None)` if the digits are syntactically invalid. Values above
/// U+10FFFF are reported as `Err(())` without accumulating further.
fn parse_codepoint(digits: &str, radix: u32) -> Result<Option<u32>, ()> {
	if digits.len() == 0 {
		return Ok(None)
	}
	let mut acc = 0u32;
	for ch in digits.chars() {
		let v = match ch.to_digit(radix) {
			Some(v) => v,
			None => return Ok(None),
		};
		acc = acc * radix + v;
		if acc > 0x10ffff {
			return Err(())
		}
	}
	Ok(Some(acc))
}

/**
# Entity resolver

Resolves the text between `&` and `;`. In strict mode, only the XML table is
consulted, names are case-sensitive, hexadecimal references must use a lower
case `x`, and character references must expand to XML characters. In loose
mode, the HTML table is used (unless restricted to XML), names fall back to a
case-insensitive match and any Unicode scalar value is accepted.

User-defined entities (see [`EntityResolver::with_entities`]) expand to
arbitrary text and are looked up with [`EntityResolver::custom`] before
the built-in tables.
*/
#[derive(Debug, Clone)]
pub struct EntityResolver {
	table: &'static EntityTable,
	strict: bool,
	custom: HashMap<String, String>,
}

impl EntityResolver {
	pub fn new(strict: bool, strict_entities: bool) -> EntityResolver {
		EntityResolver{
			table: if strict || strict_entities {
				&XML_ENTITIES
			} else {
				&HTML_ENTITIES
			},
			strict: strict,
			custom: HashMap::new(),
		}
	}

	/// Add user-defined entities, replacing earlier definitions of the same
	/// name.
	pub fn with_entities<I: IntoIterator<Item = (String, String)>>(mut self, entities: I) -> EntityResolver {
		self.custom.extend(entities);
		self
	}

	/// Replacement text of a user-defined entity.
	pub fn custom(&self, name: &str) -> Option<&str> {
		self.custom.get(name).map(|s| s.as_str())
	}

	pub fn strict() -> EntityResolver {
		Self::new(true, true)
	}

	pub fn loose() -> EntityResolver {
		Self::new(false, false)
	}

	fn resolve_numeric(&self, text: &str, digits: &str) -> Result<char, EntityError> {
		let (digits, radix) = match digits.as_bytes().first() {
			Some(b'x') => (&digits[1..], 16),
			Some(b'X') if !self.strict => (&digits[1..], 16),
			_ => (digits, 10),
		};
		let cp = match parse_codepoint(digits, radix) {
			Ok(Some(cp)) => cp,
			Ok(None) => return Err(EntityError::Unresolved(text.to_string())),
			Err(()) => return Err(EntityError::InvalidCodepoint(text.to_string())),
		};
		let ch = match std::char::from_u32(cp) {
			// surrogates
			None => return Err(EntityError::InvalidCodepoint(text.to_string())),
			Some(ch) => ch,
		};
		if self.strict && !CLASS_XML_CHAR.select(ch) {
			return Err(EntityError::InvalidCodepoint(text.to_string()))
		}
		Ok(ch)
	}

	/// Resolve a reference, given without the leading `&` and trailing `;`.
	pub fn resolve(&self, text: &str) -> Result<char, EntityError> {
		if let Some(ch) = self.table.get(text) {
			return Ok(ch)
		}
		if !self.strict {
			if let Some(ch) = self.table.get_ignore_case(text) {
				return Ok(ch)
			}
		}
		if text.starts_with('#') {
			return self.resolve_numeric(text, &text[1..])
		}
		Err(EntityError::Unresolved(text.to_string()))
	}
}
