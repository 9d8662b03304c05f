use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ShortcodeError {
	#[error(transparent)]
	#[diagnostic(code(whatshortcode::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(whatshortcode::config_parse),
		help(
			"check that whatshortcode.toml is valid TOML with [shortcodes], [scan], [content], \
			 [exclude] and/or [render] sections"
		)
	)]
	ConfigParse(String),

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(whatshortcode::invalid_pattern),
		help("content patterns use glob syntax, exclude patterns use gitignore syntax")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("no shortcode registry was supplied")]
	#[diagnostic(
		code(whatshortcode::missing_registry),
		help(
			"declare registered tags under [shortcodes] or set `missing_registry = \"unknown\"` \
			 to treat every shortcode as unknown"
		)
	)]
	MissingRegistry,

	#[error("registry lookup failed for shortcode `{tag}`: {reason}")]
	#[diagnostic(code(whatshortcode::registry))]
	Registry { tag: String, reason: String },

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(whatshortcode::template_render))]
	TemplateRender(String),
}

impl From<minijinja::Error> for ShortcodeError {
	fn from(error: minijinja::Error) -> Self {
		Self::TemplateRender(error.to_string())
	}
}

pub type ShortcodeResult<T> = Result<T, ShortcodeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
