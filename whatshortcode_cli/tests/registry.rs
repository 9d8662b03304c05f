mod common;

use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use whatshortcode_core::AnyEmptyResult;

#[test]
fn registry_lists_tags_and_callables() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("whatshortcode.toml"), common::SITE_CONFIG)?;

	common::whatshortcode_cmd()
		.arg("registry")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Available shortcodes"))
		.stdout(predicates::str::is_match(r"caption\s+img_caption_shortcode")?)
		.stdout(predicates::str::is_match(r"gallery\s+gallery_shortcode")?);

	Ok(())
}

#[test]
fn registry_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("whatshortcode.toml"), common::SITE_CONFIG)?;

	let output = common::whatshortcode_cmd()
		.arg("registry")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["gallery"], "gallery_shortcode");
	assert_eq!(json["caption"], "img_caption_shortcode");

	Ok(())
}

#[test]
fn registry_html_table() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("whatshortcode.toml"), common::SITE_CONFIG)?;

	common::whatshortcode_cmd()
		.arg("registry")
		.arg("--format")
		.arg("html")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("<h2>Available shortcodes</h2>"))
		.stdout(predicates::str::contains(
			"<tr><td>gallery</td><td><pre>gallery_shortcode</pre></td></tr>",
		));

	Ok(())
}

#[test]
fn registry_requires_shortcodes_table() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::whatshortcode_cmd()
		.arg("registry")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stdout(predicates::str::contains("Available shortcodes").not())
		.stderr(predicates::str::contains("whatshortcode::missing_registry"));

	Ok(())
}
