use std::cell::Cell;

use crate::ClassifiedOccurrence;
use crate::Occurrence;
use crate::Position;
use crate::Registry;
use crate::ShortcodeError;
use crate::ShortcodeResult;
use crate::TagRegistry;

pub fn wordpress_registry() -> Registry {
	[
		("gallery", "gallery_shortcode"),
		("caption", "img_caption_shortcode"),
		("embed", "WP_Embed::shortcode"),
	]
	.into_iter()
	.collect()
}

pub const MIXED_CONTENT: &str = "Intro [gallery ids=\"1,2,3\"] text [[escaped]] more\n[caption \
                                 align=\"left\"]<img src=\"a.png\" /> A cat[/caption]\n[embed \
                                 url=\"https://example.com/v\" /] [unknown-tag] [/stray] [ ] [a \
                                 [b] [c][c]x[/c][/c] tail [";

/// Counts how often the registry is consulted.
pub struct CountingRegistry {
	pub lookups: Cell<usize>,
	pub inner: Registry,
}

impl CountingRegistry {
	pub fn new(inner: Registry) -> Self {
		Self {
			lookups: Cell::new(0),
			inner,
		}
	}
}

impl TagRegistry for CountingRegistry {
	fn is_registered(&self, tag: &str) -> ShortcodeResult<bool> {
		self.lookups.set(self.lookups.get() + 1);
		self.inner.is_registered(tag)
	}
}

/// A registry whose backing store is unavailable.
pub struct FailingRegistry;

impl TagRegistry for FailingRegistry {
	fn is_registered(&self, tag: &str) -> ShortcodeResult<bool> {
		Err(ShortcodeError::Registry {
			tag: tag.to_string(),
			reason: "registry offline".to_string(),
		})
	}
}

pub fn classified(tag_name: &str, recognized: bool) -> ClassifiedOccurrence {
	ClassifiedOccurrence {
		occurrence: Occurrence {
			tag_name: tag_name.to_string(),
			raw_attributes: String::new(),
			is_self_closing: false,
			inner_content: None,
			is_escaped: false,
			trailing_bracket: false,
			span: 0..tag_name.len() + 2,
			position: Position::new(1, 1, 0, 1, tag_name.len() + 3, tag_name.len() + 2),
		},
		recognized,
	}
}

/// Spans are sorted by start and never overlap.
pub fn assert_ordered_and_disjoint(occurrences: &[Occurrence]) {
	for pair in occurrences.windows(2) {
		assert!(
			pair[0].span.end <= pair[1].span.start,
			"overlapping or unordered spans: {:?} then {:?}",
			pair[0].span,
			pair[1].span
		);
	}
}
