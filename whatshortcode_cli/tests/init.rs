mod common;

use whatshortcode_core::AnyEmptyResult;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::whatshortcode_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created whatshortcode.toml"));

	let config_path = tmp.path().join("whatshortcode.toml");
	let content = std::fs::read_to_string(&config_path)?;
	assert!(content.contains("[shortcodes]"));
	assert!(content.contains("[scan]"));

	std::fs::write(tmp.path().join("post.html"), "[gallery] [caption]x[/caption]")?;
	common::whatshortcode_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let existing = tmp.path().join(".whatshortcode.toml");
	std::fs::write(&existing, "[shortcodes]\n")?;

	common::whatshortcode_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Config file already exists"));

	assert_eq!(std::fs::read_to_string(&existing)?, "[shortcodes]\n");
	assert!(!tmp.path().join("whatshortcode.toml").exists());

	Ok(())
}

#[test]
fn no_subcommand_prints_usage_hint() {
	common::whatshortcode_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("whatshortcode --help"));
}
