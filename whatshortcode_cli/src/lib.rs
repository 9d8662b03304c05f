use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Find the shortcodes your content uses, and the ones nothing handles.",
	long_about = "whatshortcode scans content files for bracketed shortcode tags such as \
	              [gallery] or [caption]...[/caption] and checks each one against the \
	              shortcodes registered in whatshortcode.toml.\n\nQuick start:\n  whatshortcode \
	              init      Create a sample whatshortcode.toml\n  whatshortcode scan      List \
	              the shortcodes used by each content file\n  whatshortcode check     Fail when \
	              content uses an unregistered shortcode\n  whatshortcode registry  List the \
	              registered shortcodes"
)]
pub struct WhatShortcodeCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the content root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `whatshortcode.toml` in the content root.
	///
	/// The sample registers a few common shortcodes and documents every
	/// option. An existing config file is left untouched.
	Init,
	/// List the shortcodes used by every content file.
	///
	/// Walks the content root, scans each file matching the `[content]`
	/// patterns and prints its shortcodes in source order. Unknown shortcodes
	/// are marked.
	Scan {
		/// Output format. `html` prints one line of chips per file, the same
		/// markup a listing column would show.
		#[arg(long, value_enum, default_value_t = ScanOutputFormat::Text)]
		format: ScanOutputFormat,
	},
	/// Check that content only uses registered shortcodes.
	///
	/// Exits with status 1 when any content file uses a shortcode that is not
	/// registered. Ideal for CI pipelines.
	Check {
		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the registered shortcodes and the callables that handle them.
	Registry {
		/// Output format. `html` prints the "Available shortcodes" table.
		#[arg(long, value_enum, default_value_t = ScanOutputFormat::Text)]
		format: ScanOutputFormat,
	},
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	#[default]
	Text,
	Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ScanOutputFormat {
	#[default]
	Text,
	Json,
	Html,
}
