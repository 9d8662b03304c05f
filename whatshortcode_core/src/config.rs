use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MissingRegistry;
use crate::Registry;
use crate::RenderOptions;
use crate::ScanOptions;
use crate::ShortcodeError;
use crate::ShortcodeResult;
use crate::TagRegistry;

/// Default maximum content file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"whatshortcode.toml",
	".whatshortcode.toml",
	".config/whatshortcode.toml",
];

/// Glob patterns selecting content files when `[content]` is not configured.
pub const DEFAULT_CONTENT_PATTERNS: [&str; 4] = ["**/*.html", "**/*.htm", "**/*.md", "**/*.txt"];

/// The config written by `whatshortcode init`.
pub const SAMPLE_CONFIG: &str = r#"# whatshortcode configuration

# Registered shortcodes: tag name = name of the callable that handles it.
# Anything used in content but missing here is reported as unknown.
[shortcodes]
gallery = "gallery_shortcode"
caption = "img_caption_shortcode"
embed = "WP_Embed::shortcode"

# What to do when no [shortcodes] table exists: "reject" or "unknown".
# missing_registry = "reject"

[scan]
# "balanced" pairs nested same-name tags, "first-match" closes at the first
# closing tag.
nesting = "balanced"
include_unnamed = true

[content]
patterns = ["**/*.html", "**/*.htm", "**/*.md", "**/*.txt"]

# [exclude]
# patterns = ["drafts/"]

# [render]
# unknown_class = "notice notice-error"
# unknown_title = "Shortcode doesn't exist"
"#;

/// Configuration loaded from a `whatshortcode.toml` file.
///
/// ```toml
/// missing_registry = "reject"
/// max_file_size = 10485760
/// disable_gitignore = false
///
/// [shortcodes]
/// gallery = "gallery_shortcode"
///
/// [scan]
/// nesting = "balanced"
/// include_unnamed = true
///
/// [content]
/// patterns = ["**/*.html", "**/*.md"]
///
/// [exclude]
/// patterns = ["drafts/"]
///
/// [render]
/// unknown_class = "notice notice-error"
/// unknown_title = "Shortcode doesn't exist"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ShortcodeConfig {
	/// The registry of known tags. `None` when the table is absent, which
	/// `missing_registry` then decides about.
	#[serde(default)]
	pub shortcodes: Option<Registry>,
	/// Policy for classifying without a registry.
	#[serde(default)]
	pub missing_registry: MissingRegistry,
	/// Content files larger than this many bytes are skipped.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
	#[serde(default)]
	pub scan: ScanOptions,
	#[serde(default)]
	pub content: ContentConfig,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	#[serde(default)]
	pub render: RenderOptions,
}

/// Which files count as content.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContentConfig {
	/// Glob patterns relative to the root.
	#[serde(default = "default_content_patterns")]
	pub patterns: Vec<String>,
}

impl Default for ContentConfig {
	fn default() -> Self {
		Self {
			patterns: default_content_patterns(),
		}
	}
}

/// Configuration for excluding files and directories from scanning.
///
/// Patterns follow gitignore syntax and are applied on top of any
/// `.gitignore` rules (unless `disable_gitignore` is set).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

fn default_content_patterns() -> Vec<String> {
	DEFAULT_CONTENT_PATTERNS
		.iter()
		.map(ToString::to_string)
		.collect()
}

impl Default for ShortcodeConfig {
	fn default() -> Self {
		Self {
			shortcodes: None,
			missing_registry: MissingRegistry::default(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
			scan: ScanOptions::default(),
			content: ContentConfig::default(),
			exclude: ExcludeConfig::default(),
			render: RenderOptions::default(),
		}
	}
}

impl ShortcodeConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ShortcodeResult<Option<ShortcodeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;

		Self::from_toml_str(&content).map(Some)
	}

	/// Like [`ShortcodeConfig::load`], falling back to the defaults.
	pub fn load_or_default(root: &Path) -> ShortcodeResult<ShortcodeConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn from_toml_str(content: &str) -> ShortcodeResult<ShortcodeConfig> {
		toml::from_str(content).map_err(|e| ShortcodeError::ConfigParse(e.to_string()))
	}

	/// The configured registry as a lookup collaborator.
	pub fn registry(&self) -> Option<&dyn TagRegistry> {
		self.shortcodes
			.as_ref()
			.map(|registry| registry as &dyn TagRegistry)
	}
}
