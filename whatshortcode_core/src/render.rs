use minijinja::Environment;
use minijinja::context;
use serde::Deserialize;
use serde::Serialize;

use crate::ClassifiedOccurrence;
use crate::Registry;
use crate::ShortcodeResult;

/// Default class of a chip whose shortcode nothing handles.
pub const DEFAULT_UNKNOWN_CLASS: &str = "notice notice-error";
/// Default title of a chip whose shortcode nothing handles.
pub const DEFAULT_UNKNOWN_TITLE: &str = "Shortcode doesn't exist";

// The `.html` suffix turns on minijinja's HTML auto-escaping.
const SUMMARY_TEMPLATE_NAME: &str = "summary.html";
const SUMMARY_TEMPLATE: &str = "{% for chip in chips %}{% if not loop.first %}, {% endif %}<span{% \
                                if item_id is not none %} id=\"{{ item_id }}\"{% endif %} \
                                class=\"{{ chip.class }}\" title=\"{{ chip.title }}\"> {{ \
                                chip.name }} </span>{% endfor %}";

const REGISTRY_TEMPLATE_NAME: &str = "registry.html";
const REGISTRY_TEMPLATE: &str = "<h1>What shortcode?</h1><h2>Available \
                                 shortcodes</h2><table><tr><th>Tag</th><th>Callable \
                                 name</th></tr>{% for tag, callable in entries \
                                 %}<tr><td>{{ tag }}</td><td><pre>{{ callable \
                                 }}</pre></td></tr>{% endfor %}</table>";

/// Presentation settings for the HTML summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Identifier of the content item, emitted as the `id` of every chip.
	#[serde(skip)]
	pub item_id: Option<String>,
	/// `class` of chips for unrecognized shortcodes.
	pub unknown_class: String,
	/// `title` of chips for unrecognized shortcodes.
	pub unknown_title: String,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			item_id: None,
			unknown_class: DEFAULT_UNKNOWN_CLASS.to_string(),
			unknown_title: DEFAULT_UNKNOWN_TITLE.to_string(),
		}
	}
}

impl RenderOptions {
	pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
		self.item_id = Some(item_id.into());
		self
	}
}

#[derive(Serialize)]
struct Chip<'a> {
	name: &'a str,
	class: &'a str,
	title: &'a str,
}

fn environment() -> ShortcodeResult<Environment<'static>> {
	let mut env = Environment::new();
	env.add_template(SUMMARY_TEMPLATE_NAME, SUMMARY_TEMPLATE)?;
	env.add_template(REGISTRY_TEMPLATE_NAME, REGISTRY_TEMPLATE)?;

	Ok(env)
}

/// Render one HTML chip per occurrence, comma-separated in scan order.
/// Recognized chips carry an empty class and title. Every interpolated value
/// is HTML-escaped.
pub fn render_summary_html(
	occurrences: &[ClassifiedOccurrence],
	options: &RenderOptions,
) -> ShortcodeResult<String> {
	let chips: Vec<Chip<'_>> = occurrences
		.iter()
		.map(|classified| {
			if classified.recognized {
				Chip {
					name: classified.tag_name(),
					class: "",
					title: "",
				}
			} else {
				Chip {
					name: classified.tag_name(),
					class: &options.unknown_class,
					title: &options.unknown_title,
				}
			}
		})
		.collect();

	let env = environment()?;
	let template = env.get_template(SUMMARY_TEMPLATE_NAME)?;
	let rendered = template.render(context! {
		chips => chips,
		item_id => options.item_id.as_deref(),
	})?;

	Ok(rendered)
}

/// Render a plain-text summary: tag names joined by `, `, unrecognized ones
/// marked `(unknown)`. Empty names show as `""`.
pub fn render_summary_text(occurrences: &[ClassifiedOccurrence]) -> String {
	render_summary_text_with(occurrences, |label| format!("{label} (unknown)"))
}

/// Like [`render_summary_text`], with `unknown` formatting the label of each
/// unrecognized occurrence.
pub fn render_summary_text_with<F>(occurrences: &[ClassifiedOccurrence], unknown: F) -> String
where
	F: Fn(&str) -> String,
{
	occurrences
		.iter()
		.map(|classified| {
			let label = match classified.tag_name() {
				"" => "\"\"",
				name => name,
			};

			if classified.recognized {
				label.to_string()
			} else {
				unknown(label)
			}
		})
		.collect::<Vec<_>>()
		.join(", ")
}

/// Render the registry as an HTML table of tag names and callables.
pub fn render_registry_table(registry: &Registry) -> ShortcodeResult<String> {
	let entries: Vec<(&str, &str)> = registry.entries().collect();
	let env = environment()?;
	let template = env.get_template(REGISTRY_TEMPLATE_NAME)?;

	Ok(template.render(context! { entries => entries })?)
}
