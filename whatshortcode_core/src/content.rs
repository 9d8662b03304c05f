use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use derive_more::DerefMut;
use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Serialize;

use crate::ClassifiedOccurrence;
use crate::MissingRegistry;
use crate::ShortcodeConfig;
use crate::ShortcodeError;
use crate::ShortcodeResult;
use crate::classify_optional;
use crate::scan_with_options;

/// One scanned content file.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
	/// Path relative to the scanned root.
	pub path: PathBuf,
	pub occurrences: Vec<ClassifiedOccurrence>,
}

impl ContentItem {
	/// Occurrences that no registered shortcode handles.
	pub fn unknown(&self) -> impl Iterator<Item = &ClassifiedOccurrence> {
		self.occurrences.iter().filter(|entry| !entry.recognized)
	}

	pub fn has_unknown(&self) -> bool {
		self.unknown().next().is_some()
	}
}

/// Why a content file was not scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SkipReason {
	/// The file exceeds `max_file_size`.
	TooLarge { size: u64, limit: u64 },
	/// The file is not valid UTF-8.
	InvalidUtf8,
}

/// A content file that matched the content patterns but was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
	pub path: PathBuf,
	#[serde(flatten)]
	pub reason: SkipReason,
}

/// Result of scanning every content file under a root. Dereferences to the
/// scanned items, sorted by path.
#[derive(Debug, Clone, Default, Serialize, Deref, DerefMut)]
pub struct ContentReport {
	#[deref]
	#[deref_mut]
	pub items: Vec<ContentItem>,
	pub skipped: Vec<SkippedFile>,
}

impl ContentReport {
	/// Total number of unrecognized occurrences across all items.
	pub fn unknown_count(&self) -> usize {
		self.items.iter().map(|item| item.unknown().count()).sum()
	}

	/// True when no content item uses an unknown shortcode.
	pub fn is_ok(&self) -> bool {
		self.unknown_count() == 0
	}
}

/// Scan and classify a single text blob using the configured scan options
/// and registry.
pub fn classify_text(text: &str, config: &ShortcodeConfig) -> ShortcodeResult<Vec<ClassifiedOccurrence>> {
	let occurrences = scan_with_options(text, &config.scan);
	classify_optional(occurrences, config.registry(), config.missing_registry)
}

/// Walk `root`, scanning and classifying every content file.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn scan_content(root: &Path, config: &ShortcodeConfig) -> ShortcodeResult<ContentReport> {
	if config.shortcodes.is_none() && config.missing_registry == MissingRegistry::Reject {
		return Err(ShortcodeError::MissingRegistry);
	}

	let files = collect_content_files(root, config)?;
	let mut report = ContentReport::default();

	for path in files {
		let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
		let size = std::fs::metadata(&path)?.len();

		if size > config.max_file_size {
			tracing::warn!(
				path = %relative.display(),
				size,
				limit = config.max_file_size,
				"skipping oversized content file"
			);
			report.skipped.push(SkippedFile {
				path: relative,
				reason: SkipReason::TooLarge {
					size,
					limit: config.max_file_size,
				},
			});
			continue;
		}

		let Ok(text) = String::from_utf8(std::fs::read(&path)?) else {
			tracing::warn!(path = %relative.display(), "skipping content file that is not valid utf-8");
			report.skipped.push(SkippedFile {
				path: relative,
				reason: SkipReason::InvalidUtf8,
			});
			continue;
		};

		let occurrences = classify_text(&text, config)?;
		tracing::debug!(
			path = %relative.display(),
			occurrences = occurrences.len(),
			"scanned content file"
		);
		report.items.push(ContentItem {
			path: relative,
			occurrences,
		});
	}

	Ok(report)
}

/// Build the matcher selecting content files from `[content]` patterns.
fn build_content_matcher(patterns: &[String]) -> ShortcodeResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			ShortcodeError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		ShortcodeError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from `[exclude]` patterns. These follow
/// `.gitignore` syntax and are applied on top of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> ShortcodeResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			ShortcodeError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		ShortcodeError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Collect content files under `root`, sorted for deterministic output.
///
/// Hidden entries are always skipped. `.gitignore` rules apply unless
/// `disable_gitignore` is set, even outside a git repository.
fn collect_content_files(root: &Path, config: &ShortcodeConfig) -> ShortcodeResult<Vec<PathBuf>> {
	let include = build_content_matcher(&config.content.patterns)?;
	let exclude = build_exclude_matcher(root, &config.exclude.patterns)?;

	let mut builder = WalkBuilder::new(root);
	builder
		.standard_filters(!config.disable_gitignore)
		.hidden(true)
		.require_git(false)
		.filter_entry(move |entry| {
			let is_dir = entry.file_type().is_some_and(|kind| kind.is_dir());
			!exclude.matched(entry.path(), is_dir).is_ignore()
		});

	let mut files = Vec::new();
	for entry in builder.build() {
		let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
		if !entry.file_type().is_some_and(|kind| kind.is_file()) {
			continue;
		}

		let path = entry.into_path();
		let relative = path.strip_prefix(root).unwrap_or(&path);
		if include.is_match(relative) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}
