use std::fmt;

/// Location in the character stream.
///
/// All fields count from zero. `offset` counts characters (Unicode scalar
/// values), not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
	pub line: u32,
	pub column: u32,
	pub offset: u64,
}

impl fmt::Display for Position {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}

/// Incrementally track the [`Position`] of consumed characters.
///
/// `\n`, `\r\n` and a lone `\r` each count as a single line break.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
	pos: Position,
	after_cr: bool,
}

impl PositionTracker {
	pub fn new() -> PositionTracker {
		PositionTracker::default()
	}

	/// Account for `ch` and return the position after it.
	pub fn advance(&mut self, ch: char) -> Position {
		self.pos.offset = self.pos.offset.saturating_add(1);
		match ch {
			// second half of a CRLF, the break was counted at the CR
			'\n' if self.after_cr => {
				self.after_cr = false;
			},
			'\n' | '\r' => {
				self.pos.line = self.pos.line.saturating_add(1);
				self.pos.column = 0;
				self.after_cr = ch == '\r';
			},
			_ => {
				self.pos.column = self.pos.column.saturating_add(1);
				self.after_cr = false;
			},
		}
		self.pos
	}

	pub fn position(&self) -> Position {
		self.pos
	}
}
