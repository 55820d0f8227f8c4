//! Compact text notation for note patterns, e.g. `[12]3[24]1x4`.

mod parse;
pub use parse::*;

mod structures;
pub use structures::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Missing closing bracket")]
	UnclosedBracket,
	#[error("Missing closing paranthesis")]
	UnclosedParanthesis,
}
