//! `whatshortcode_core` finds the bracketed shortcode tags (`[gallery]`,
//! `[caption]…[/caption]`, `[embed url="…" /]`) used in free-form content and
//! reports the ones no registered shortcode handles.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Content text
//!   → Lexer (splits text into `[`, `]`, `/`, name runs and plain text)
//!   → Scanner (walks the tokens, emits one Occurrence per tag in source order)
//!   → Classifier (asks a TagRegistry whether each tag name is registered)
//!   → Renderer (HTML chips, plain-text summary, registry table)
//! ```
//!
//! The scanner is linear in the input length. Closing tags are indexed once
//! per scan and openings are matched against that index instead of
//! re-searching the text, so long unclosed or deeply nested inputs cannot
//! trigger backtracking.
//!
//! ## Modules
//!
//! - [`config`]: `whatshortcode.toml` loading, including the registry, scan
//!   options and content patterns.
//! - [`content`]: walks a content directory and scans every content file.
//!
//! ## Key Types
//!
//! - [`Occurrence`]: one shortcode found in a text blob.
//! - [`Scanner`]: a tokenized text blob that produces occurrences lazily.
//! - [`TagRegistry`]: the "is this tag registered?" collaborator.
//! - [`ClassifiedOccurrence`]: an occurrence with its registry verdict.
//! - [`ShortcodeConfig`]: configuration loaded from `whatshortcode.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use whatshortcode_core::FnRegistry;
//! use whatshortcode_core::RenderOptions;
//! use whatshortcode_core::classify;
//! use whatshortcode_core::render_summary_html;
//! use whatshortcode_core::scan;
//!
//! let occurrences = scan("[gallery ids=\"1,2\"] and [bogus /]");
//! let registry = FnRegistry(|tag: &str| tag == "gallery");
//! let classified = classify(occurrences, &registry).unwrap();
//!
//! assert!(classified[0].recognized);
//! assert!(!classified[1].recognized);
//!
//! let html = render_summary_html(&classified, &RenderOptions::default()).unwrap();
//! assert!(html.contains("notice notice-error"));
//! ```

pub use config::*;
pub use content::*;
pub use error::*;
pub use position::*;
pub use registry::*;
pub use render::*;
pub use scanner::*;

pub mod config;
pub mod content;
#[allow(unused_assignments)]
mod error;
pub(crate) mod lexer;
mod position;
mod registry;
mod render;
mod scanner;

#[cfg(test)]
mod __fixtures;
