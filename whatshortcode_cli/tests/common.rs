use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn whatshortcode_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("whatshortcode"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

#[allow(dead_code)]
pub const SITE_CONFIG: &str = "[shortcodes]\ngallery = \"gallery_shortcode\"\ncaption = \
                               \"img_caption_shortcode\"\n";

/// A content root with one clean file and one using an unknown shortcode.
#[allow(dead_code)]
pub fn write_site(root: &Path) -> std::io::Result<()> {
	std::fs::write(root.join("whatshortcode.toml"), SITE_CONFIG)?;
	std::fs::write(root.join("notes.md"), "[caption]A cat[/caption]\n")?;
	std::fs::write(root.join("post.html"), "[gallery] and [bogus /]\n")?;
	Ok(())
}
