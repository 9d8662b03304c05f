use std::collections::HashMap;
use std::collections::VecDeque;
use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

use crate::Position;
use crate::lexer::Lexeme;
use crate::lexer::RawToken;
use crate::lexer::tokenize;
use crate::position::LineTable;

/// How a paired opening tag finds its closing `[/name]` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Nesting {
	/// Same-name openings and closings pair up like brackets, so an
	/// enclosing tag keeps nested copies of itself inside its content.
	#[default]
	Balanced,
	/// The first `[/name]` after the opening tag closes it, whatever is
	/// nested in between.
	FirstMatch,
}

/// Options controlling a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanOptions {
	/// Closing-tag resolution for paired tags.
	pub nesting: Nesting,
	/// Report occurrences whose tag name is empty (e.g. `[ ]` or a stray
	/// `[/name]`). Their spans are consumed either way.
	pub include_unnamed: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			nesting: Nesting::default(),
			include_unnamed: true,
		}
	}
}

/// One shortcode found in a text blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
	/// The name following the opening bracket. Empty for malformed tags.
	pub tag_name: String,
	/// Everything between the tag name and the closing delimiter, unparsed.
	pub raw_attributes: String,
	/// `true` for the `[name /]` form.
	pub is_self_closing: bool,
	/// Text between the opening tag and its `[/name]` closing tag. `None` for
	/// self-closing tags and for paired tags that are never closed.
	pub inner_content: Option<String>,
	/// `true` when the occurrence opened with a doubled `[[`.
	pub is_escaped: bool,
	/// `true` when an extra `]` followed the closing delimiter.
	pub trailing_bracket: bool,
	/// Byte range of the whole consumed occurrence.
	pub span: Range<usize>,
	/// Line and column of the start and end of `span`.
	pub position: Position,
}

impl Occurrence {
	/// Both doubled delimiters are present: `[[name]]`, the literal form.
	pub fn is_fully_escaped(&self) -> bool {
		self.is_escaped && self.trailing_bracket
	}
}

/// Scan `text` with default options and collect every occurrence.
pub fn scan(text: &str) -> Vec<Occurrence> {
	scan_with_options(text, &ScanOptions::default())
}

/// Scan `text` with explicit options and collect every occurrence.
pub fn scan_with_options(text: &str, options: &ScanOptions) -> Vec<Occurrence> {
	let scanner = Scanner::new(text, options.clone());
	let occurrences: Vec<_> = scanner.occurrences().collect();
	tracing::debug!(
		bytes = text.len(),
		occurrences = occurrences.len(),
		"scanned text for shortcodes"
	);

	occurrences
}

/// Lexemes of one closing tag `[/name]`, as indices into the lexeme list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClosingTag {
	/// Index of the `[` lexeme.
	start: usize,
	/// Index of the `]` lexeme.
	end: usize,
}

/// A tokenized text blob, ready to produce occurrences.
///
/// Everything that needs a full pass over the input (the line table, the
/// closing-tag index and the balanced pairing) is computed here once, so
/// iterating occurrences stays linear in the input length.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
	source: &'a str,
	lexemes: Vec<Lexeme>,
	/// For each lexeme index, the first `]` lexeme at or after it.
	next_close: Vec<Option<usize>>,
	/// Every closing tag, grouped by name in source order.
	closings: HashMap<&'a str, Vec<ClosingTag>>,
	/// Balanced partner of each paired opening, keyed by the opening's name
	/// lexeme. Only populated for [`Nesting::Balanced`].
	partners: HashMap<usize, ClosingTag>,
	lines: LineTable,
	options: ScanOptions,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str, options: ScanOptions) -> Self {
		let lexemes = tokenize(source);
		let next_close = next_close_brackets(&lexemes);
		tracing::trace!(lexemes = lexemes.len(), "tokenized shortcode source");

		let mut scanner = Self {
			source,
			lexemes,
			next_close,
			closings: HashMap::new(),
			partners: HashMap::new(),
			lines: LineTable::new(source),
			options,
		};
		scanner.index_closing_tags();

		scanner
	}

	pub fn options(&self) -> &ScanOptions {
		&self.options
	}

	/// A fresh iterator over the occurrences. Each call starts again from
	/// the beginning of the text.
	pub fn occurrences(&self) -> Occurrences<'_, 'a> {
		Occurrences {
			scanner: self,
			cursor: 0,
			first_match: HashMap::new(),
		}
	}

	fn slice(&self, index: usize) -> &'a str {
		let source = self.source;
		&source[self.lexemes[index].span.clone()]
	}

	fn is(&self, index: usize, kind: RawToken) -> bool {
		self.lexemes.get(index).is_some_and(|lexeme| lexeme.is(kind))
	}

	/// Recognize `[/name]` (or `[/]`) starting at lexeme `index`.
	fn closing_tag_at(&self, index: usize) -> Option<(&'a str, ClosingTag)> {
		if !self.is(index, RawToken::OpenBracket) || !self.is(index + 1, RawToken::Slash) {
			return None;
		}

		if self.is(index + 2, RawToken::Name) && self.is(index + 3, RawToken::CloseBracket) {
			return Some((
				self.slice(index + 2),
				ClosingTag {
					start: index,
					end: index + 3,
				},
			));
		}

		if self.is(index + 2, RawToken::CloseBracket) {
			return Some((
				"",
				ClosingTag {
					start: index,
					end: index + 2,
				},
			));
		}

		None
	}

	/// One pass over the lexemes that records every closing tag and, for
	/// balanced nesting, pairs openings with closings using a stack per name.
	///
	/// An opening only becomes eligible for pairing once its own `]` has been
	/// passed, so a closing tag inside the opening's attributes never closes
	/// it. Openings wait in `pending` ordered by that `]`, which never
	/// decreases as the pass moves forward. A `[` before the `]` of an earlier
	/// opening is attribute text of that opening and never becomes an opening
	/// itself.
	fn index_closing_tags(&mut self) {
		let balanced = self.options.nesting == Nesting::Balanced;
		let mut closings: HashMap<&'a str, Vec<ClosingTag>> = HashMap::new();
		let mut partners = HashMap::new();
		let mut stacks: HashMap<&'a str, Vec<usize>> = HashMap::new();
		let mut pending: VecDeque<(usize, usize)> = VecDeque::new();
		// `]` of the latest opening; openings before it are attribute text.
		let mut attributes_until = 0;

		for index in 0..self.lexemes.len() {
			while let Some(&(close, name_index)) = pending.front() {
				if close >= index {
					break;
				}
				pending.pop_front();
				stacks
					.entry(self.slice(name_index))
					.or_default()
					.push(name_index);
			}

			if !self.is(index, RawToken::OpenBracket) {
				continue;
			}

			if let Some((name, closing)) = self.closing_tag_at(index) {
				closings.entry(name).or_default().push(closing);
				if balanced {
					if let Some(opening) = stacks.get_mut(name).and_then(Vec::pop) {
						partners.insert(opening, closing);
					}
				}
				continue;
			}

			if !balanced || index < attributes_until {
				continue;
			}

			let mut after = index + 1;
			if self.is(after, RawToken::OpenBracket) {
				after += 1;
			}
			let name_index = self.is(after, RawToken::Name).then_some(after);
			if name_index.is_some() {
				after += 1;
			}

			let Some(close) = self.next_close.get(after).copied().flatten() else {
				continue;
			};
			attributes_until = close;

			let Some(name_index) = name_index else {
				continue;
			};

			if close > after && self.is(close - 1, RawToken::Slash) {
				// Self-closing tags never take part in pairing.
				continue;
			}

			pending.push_back((close, name_index));
		}

		self.closings = closings;
		self.partners = partners;
	}
}

/// For each lexeme, the index of the first `]` at or after it.
fn next_close_brackets(lexemes: &[Lexeme]) -> Vec<Option<usize>> {
	let mut next = vec![None; lexemes.len()];
	let mut current = None;
	for (index, lexeme) in lexemes.iter().enumerate().rev() {
		if lexeme.is(RawToken::CloseBracket) {
			current = Some(index);
		}
		next[index] = current;
	}

	next
}

/// Lazy iterator over the occurrences of a [`Scanner`]. Clone it to replay
/// the remaining sequence.
#[derive(Debug, Clone)]
pub struct Occurrences<'s, 'a> {
	scanner: &'s Scanner<'a>,
	/// Next lexeme to consider. Everything before it has been consumed.
	cursor: usize,
	/// Per-name position in the closing-tag list for first-match lookups.
	/// Openings are visited left to right, so these only move forward.
	first_match: HashMap<&'a str, usize>,
}

impl Occurrences<'_, '_> {
	/// Find the closing tag for an opening whose `]` is lexeme `close`.
	fn closing_for(&mut self, name: &str, name_index: Option<usize>, close: usize) -> Option<ClosingTag> {
		let scanner = self.scanner;

		if scanner.options.nesting == Nesting::Balanced {
			if let Some(name_index) = name_index {
				return scanner
					.partners
					.get(&name_index)
					.copied()
					.filter(|closing| closing.start > close);
			}
		}

		let (&key, list) = scanner.closings.get_key_value(name)?;
		let position = self.first_match.entry(key).or_insert(0);
		while list.get(*position).is_some_and(|closing| closing.start <= close) {
			*position += 1;
		}

		list.get(*position).copied()
	}
}

impl Iterator for Occurrences<'_, '_> {
	type Item = Occurrence;

	fn next(&mut self) -> Option<Self::Item> {
		let scanner = self.scanner;
		let lexemes = &scanner.lexemes;

		loop {
			let start = (self.cursor..lexemes.len()).find(|&i| scanner.is(i, RawToken::OpenBracket))?;

			let mut index = start + 1;
			let is_escaped = scanner.is(index, RawToken::OpenBracket);
			if is_escaped {
				index += 1;
			}

			let (tag_name, name_index) = if scanner.is(index, RawToken::Name) {
				index += 1;
				(scanner.slice(index - 1), Some(index - 1))
			} else {
				("", None)
			};

			let attributes_start = lexemes[index - 1].span.end;

			// Without a `]` ahead no later `[` can match either.
			let Some(close) = scanner.next_close.get(index).copied().flatten() else {
				self.cursor = lexemes.len();
				return None;
			};

			let is_self_closing = close > index && scanner.is(close - 1, RawToken::Slash);
			let attributes_end = if is_self_closing {
				lexemes[close - 1].span.start
			} else {
				lexemes[close].span.start
			};

			let mut end = close;
			let mut inner_content = None;
			if !is_self_closing {
				if let Some(closing) = self.closing_for(tag_name, name_index, close) {
					let content = lexemes[close].span.end..lexemes[closing.start].span.start;
					inner_content = Some(scanner.source[content].to_string());
					end = closing.end;
				}
			}

			let trailing_bracket = scanner.is(end + 1, RawToken::CloseBracket);
			if trailing_bracket {
				end += 1;
			}

			self.cursor = end + 1;

			if tag_name.is_empty() && !scanner.options.include_unnamed {
				continue;
			}

			let span = lexemes[start].span.start..lexemes[end].span.end;
			return Some(Occurrence {
				tag_name: tag_name.to_string(),
				raw_attributes: scanner.source[attributes_start..attributes_end].to_string(),
				is_self_closing,
				inner_content,
				is_escaped,
				trailing_bracket,
				position: scanner.lines.position(&span),
				span,
			});
		}
	}
}
