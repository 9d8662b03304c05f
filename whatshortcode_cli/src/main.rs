use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use whatshortcode_cli::Commands;
use whatshortcode_cli::OutputFormat;
use whatshortcode_cli::ScanOutputFormat;
use whatshortcode_cli::WhatShortcodeCli;
use whatshortcode_core::ContentReport;
use whatshortcode_core::SAMPLE_CONFIG;
use whatshortcode_core::ShortcodeConfig;
use whatshortcode_core::ShortcodeError;
use whatshortcode_core::SkipReason;
use whatshortcode_core::render_registry_table;
use whatshortcode_core::render_summary_html;
use whatshortcode_core::render_summary_text_with;
use whatshortcode_core::scan_content;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = WhatShortcodeCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Scan { format }) => run_scan(&args, format),
		Some(Commands::Check { format }) => run_check(&args, format),
		Some(Commands::Registry { format }) => run_registry(&args, format),
		None => {
			eprintln!("No subcommand specified. Run `whatshortcode --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<ShortcodeError>() {
			Ok(shortcode_err) => {
				let report: miette::Report = (*shortcode_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over the `--verbose` default.
fn init_tracing(verbose: bool) {
	let default_filter = if verbose {
		"whatshortcode_core=debug,whatshortcode=debug"
	} else {
		"whatshortcode_core=warn"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(color_enabled())
		.without_time()
		.init();
}

fn resolve_root(args: &WhatShortcodeCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &WhatShortcodeCli) -> Result<ShortcodeConfig, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = ShortcodeConfig::load_or_default(&root)?;
	tracing::debug!(
		root = %root.display(),
		shortcodes = config.shortcodes.as_ref().map_or(0, |registry| registry.len()),
		"loaded configuration"
	);

	Ok(config)
}

fn scan_root(
	args: &WhatShortcodeCli,
) -> Result<(ShortcodeConfig, ContentReport), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args)?;
	let report = scan_content(&root, &config)?;

	if args.verbose {
		eprintln!(
			"Scanned {} content file(s), skipped {}",
			report.len(),
			report.skipped.len()
		);
		for skipped in &report.skipped {
			let reason = match skipped.reason {
				SkipReason::TooLarge { size, limit } => {
					format!("{size} bytes exceeds the {limit} byte limit")
				}
				SkipReason::InvalidUtf8 => "not valid UTF-8".to_string(),
				_ => "skipped".to_string(),
			};
			eprintln!("  {} ({reason})", skipped.path.display());
		}
	}

	Ok((config, report))
}

fn run_init(args: &WhatShortcodeCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = ShortcodeConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	std::fs::write(root.join("whatshortcode.toml"), SAMPLE_CONFIG)?;
	println!("Created whatshortcode.toml");
	println!();
	println!("Next steps:");
	println!("  1. List your registered shortcodes under [shortcodes]");
	println!("  2. Run `whatshortcode scan` to see the shortcodes your content uses");
	println!("  3. Run `whatshortcode check` in CI to catch unknown shortcodes");

	Ok(())
}

fn run_scan(
	args: &WhatShortcodeCli,
	format: ScanOutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let (config, report) = scan_root(args)?;

	match format {
		ScanOutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		ScanOutputFormat::Html => {
			for item in report.iter() {
				if item.occurrences.is_empty() {
					continue;
				}

				let options = config
					.render
					.clone()
					.with_item_id(item.path.display().to_string());
				println!("{}", render_summary_html(&item.occurrences, &options)?);
			}
		}
		ScanOutputFormat::Text => {
			for item in report.iter() {
				if item.occurrences.is_empty() {
					continue;
				}

				let summary = render_summary_text_with(&item.occurrences, |label| {
					colored!(format!("{label} (unknown)"), red)
				});
				println!("{}: {summary}", colored!(item.path.display(), bold));
			}

			let used: usize = report.iter().map(|item| item.occurrences.len()).sum();
			println!(
				"{used} shortcode(s) in {} file(s), {} unknown",
				report.len(),
				report.unknown_count()
			);
		}
	}

	Ok(())
}

fn run_check(
	args: &WhatShortcodeCli,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let (_, report) = scan_root(args)?;

	if report.is_ok() {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"unknown\":[]}}");
			}
			OutputFormat::Text => {
				println!(
					"{} no unknown shortcodes in {} file(s).",
					colored!("Check passed:", green),
					report.len()
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let unknown: Vec<serde_json::Value> = report
				.iter()
				.flat_map(|item| {
					item.unknown().map(move |entry| {
						serde_json::json!({
							"path": item.path.display().to_string(),
							"tag_name": entry.tag_name(),
							"line": entry.occurrence.position.start.line,
							"column": entry.occurrence.position.start.column,
						})
					})
				})
				.collect();
			let output = serde_json::json!({ "ok": false, "unknown": unknown });
			println!("{}", serde_json::to_string(&output)?);
		}
		OutputFormat::Text => {
			for item in report.iter() {
				for entry in item.unknown() {
					let start = entry.occurrence.position.start;
					println!(
						"{}:{}:{}: {} `{}`",
						item.path.display(),
						start.line,
						start.column,
						colored!("unknown shortcode", red),
						entry.tag_name()
					);
				}
			}

			let files = report.iter().filter(|item| item.has_unknown()).count();
			eprintln!(
				"{} {} unknown shortcode(s) in {files} file(s).",
				colored!("Check failed:", red),
				report.unknown_count()
			);
		}
	}

	process::exit(1);
}

fn run_registry(
	args: &WhatShortcodeCli,
	format: ScanOutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let Some(registry) = config.shortcodes else {
		return Err(ShortcodeError::MissingRegistry.into());
	};

	match format {
		ScanOutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&registry)?);
		}
		ScanOutputFormat::Html => {
			println!("{}", render_registry_table(&registry)?);
		}
		ScanOutputFormat::Text => {
			if registry.is_empty() {
				println!("No shortcodes registered.");
				return Ok(());
			}

			println!("{}", colored!("Available shortcodes", bold));
			for (tag, callable) in registry.entries() {
				println!("  {tag:<24} {callable}");
			}
		}
	}

	Ok(())
}
