#[macro_use]
extern crate afl;
extern crate rsax;

use rsax::{Parser, ParserOptions};

fn run(opts: ParserOptions, data: &[u8]) {
	let mut p = Parser::with_options(opts);
	// the first byte picks the chunk size to exercise split tokens
	let chunk_size = data.first().map(|b| (*b as usize % 16) + 1).unwrap_or(1);
	for chunk in data.chunks(chunk_size) {
		if p.write_bytes(chunk).is_err() {
			p.resume();
		}
		p.drain().for_each(drop);
	}
	let _ = p.end();
	p.drain().for_each(drop);
}

fn main() {
	fuzz!(|data: &[u8]| {
		run(ParserOptions::default(), data);
		run(ParserOptions::default().strict(true).xmlns(true).max_buffer_length(64), data);
	});
}
