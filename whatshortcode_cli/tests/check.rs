mod common;

use serde_json::Value;
use whatshortcode_core::AnyEmptyResult;

#[test]
fn check_passes_when_every_shortcode_is_registered() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;
	std::fs::write(tmp.path().join("post.html"), "[gallery ids=\"1,2\"]\n")?;

	common::whatshortcode_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: no unknown shortcodes in 2 file(s).",
		));

	Ok(())
}

#[test]
fn check_fails_on_unknown_shortcodes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;

	common::whatshortcode_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"post.html:1:15: unknown shortcode `bogus`",
		))
		.stderr(predicates::str::contains(
			"Check failed: 1 unknown shortcode(s) in 1 file(s).",
		));

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;

	let output = common::whatshortcode_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert_eq!(output.status.code(), Some(1));

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], false);
	assert_eq!(json["unknown"][0]["path"], "post.html");
	assert_eq!(json["unknown"][0]["tag_name"], "bogus");
	assert_eq!(json["unknown"][0]["line"], 1);
	assert_eq!(json["unknown"][0]["column"], 15);

	Ok(())
}

#[test]
fn check_json_output_when_clean() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("whatshortcode.toml"), common::SITE_CONFIG)?;
	std::fs::write(tmp.path().join("post.html"), "no shortcodes")?;

	common::whatshortcode_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("{\"ok\":true,\"unknown\":[]}\n");

	Ok(())
}

#[test]
fn check_reports_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("whatshortcode.toml"), "[scan\nnesting = 1")?;

	common::whatshortcode_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn check_honours_exclude_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("whatshortcode.toml"),
		format!("{}\n[exclude]\npatterns = [\"drafts/\"]\n", common::SITE_CONFIG),
	)?;
	std::fs::create_dir_all(tmp.path().join("drafts"))?;
	std::fs::write(tmp.path().join("drafts/wip.html"), "[bogus]")?;
	std::fs::write(tmp.path().join("post.html"), "[gallery]")?;

	common::whatshortcode_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	Ok(())
}
