use std::ops::Range;

use logos::Logos;

/// Flat token kinds for shortcode scanning. Every byte of the input belongs
/// to exactly one token, so the lexer never fails.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
	#[token("[")]
	OpenBracket,
	#[token("]")]
	CloseBracket,
	#[token("/")]
	Slash,
	/// A maximal run of tag-name characters.
	#[regex(r"[A-Za-z0-9_-]+")]
	Name,
	/// Anything else, up to the next delimiter or name character.
	#[regex(r"[^\[\]/A-Za-z0-9_-]+")]
	Text,
}

/// A token together with its byte span in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
	pub kind: RawToken,
	pub span: Range<usize>,
}

impl Lexeme {
	pub fn is(&self, kind: RawToken) -> bool {
		self.kind == kind
	}
}

/// Tokenize `source` into lexemes. Bytes logos cannot classify are kept as
/// [`RawToken::Text`] so spans stay contiguous.
pub(crate) fn tokenize(source: &str) -> Vec<Lexeme> {
	RawToken::lexer(source)
		.spanned()
		.map(|(result, span)| {
			Lexeme {
				kind: result.unwrap_or(RawToken::Text),
				span,
			}
		})
		.collect()
}
