use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::BuildHasher;

use serde::Deserialize;
use serde::Serialize;

use crate::Occurrence;
use crate::ShortcodeError;
use crate::ShortcodeResult;

/// Answers "is this tag name registered?" for the classification pass.
///
/// Implementations backed by I/O can fail; the error propagates out of
/// [`classify`] unchanged.
pub trait TagRegistry {
	fn is_registered(&self, tag: &str) -> ShortcodeResult<bool>;
}

/// The host's registered shortcodes: tag name mapped to the name of the
/// callable that handles it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Registry {
	tags: BTreeMap<String, String>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `tag`, replacing any previous callable.
	pub fn register(&mut self, tag: impl Into<String>, callable: impl Into<String>) {
		self.tags.insert(tag.into(), callable.into());
	}

	pub fn contains(&self, tag: &str) -> bool {
		self.tags.contains_key(tag)
	}

	/// The callable name registered for `tag`.
	pub fn callable(&self, tag: &str) -> Option<&str> {
		self.tags.get(tag).map(String::as_str)
	}

	/// Every registered tag and its callable, ordered by tag name.
	pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
		self.tags
			.iter()
			.map(|(tag, callable)| (tag.as_str(), callable.as_str()))
	}

	pub fn len(&self) -> usize {
		self.tags.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tags.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Registry {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			tags: iter
				.into_iter()
				.map(|(tag, callable)| (tag.into(), callable.into()))
				.collect(),
		}
	}
}

impl TagRegistry for Registry {
	fn is_registered(&self, tag: &str) -> ShortcodeResult<bool> {
		Ok(self.contains(tag))
	}
}

impl<S: BuildHasher> TagRegistry for HashSet<String, S> {
	fn is_registered(&self, tag: &str) -> ShortcodeResult<bool> {
		Ok(self.contains(tag))
	}
}

impl TagRegistry for BTreeSet<String> {
	fn is_registered(&self, tag: &str) -> ShortcodeResult<bool> {
		Ok(self.contains(tag))
	}
}

/// Adapts a plain predicate into a [`TagRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct FnRegistry<F>(pub F);

impl<F: Fn(&str) -> bool> TagRegistry for FnRegistry<F> {
	fn is_registered(&self, tag: &str) -> ShortcodeResult<bool> {
		Ok((self.0)(tag))
	}
}

/// What to do when classification runs without a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingRegistry {
	/// A missing registry is an error.
	#[default]
	Reject,
	/// Every occurrence is unrecognized.
	#[serde(alias = "treat-as-unknown")]
	Unknown,
}

/// An occurrence together with its registry verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedOccurrence {
	#[serde(flatten)]
	pub occurrence: Occurrence,
	pub recognized: bool,
}

impl ClassifiedOccurrence {
	pub fn tag_name(&self) -> &str {
		&self.occurrence.tag_name
	}
}

/// Mark each occurrence as recognized or not. The registry is consulted at
/// most once per distinct tag name.
pub fn classify(
	occurrences: Vec<Occurrence>,
	registry: &dyn TagRegistry,
) -> ShortcodeResult<Vec<ClassifiedOccurrence>> {
	let mut verdicts: HashMap<String, bool> = HashMap::new();
	let mut classified = Vec::with_capacity(occurrences.len());

	for occurrence in occurrences {
		let recognized = if let Some(&known) = verdicts.get(&occurrence.tag_name) {
			known
		} else {
			let known = registry.is_registered(&occurrence.tag_name)?;
			verdicts.insert(occurrence.tag_name.clone(), known);
			known
		};

		classified.push(ClassifiedOccurrence {
			occurrence,
			recognized,
		});
	}

	tracing::debug!(
		occurrences = classified.len(),
		distinct = verdicts.len(),
		"classified shortcodes"
	);

	Ok(classified)
}

/// Like [`classify`], but the registry may be absent. `policy` decides
/// whether that is an error or makes every occurrence unknown.
pub fn classify_optional(
	occurrences: Vec<Occurrence>,
	registry: Option<&dyn TagRegistry>,
	policy: MissingRegistry,
) -> ShortcodeResult<Vec<ClassifiedOccurrence>> {
	match (registry, policy) {
		(Some(registry), _) => classify(occurrences, registry),
		(None, MissingRegistry::Unknown) => {
			Ok(occurrences
				.into_iter()
				.map(|occurrence| {
					ClassifiedOccurrence {
						occurrence,
						recognized: false,
					}
				})
				.collect())
		}
		(None, MissingRegistry::Reject) => Err(ShortcodeError::MissingRegistry),
	}
}
