//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut headers = Vec::new();
        let mut missing = Vec::new();
        let mut entries = Vec::new();
        let mut stats = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Header => headers.push(item),
                Kind::NotFound => missing.push(item),
                Kind::Entry => entries.push(item),
                Kind::Stats => stats.push(item),
            }
        }

        if !entries.is_empty() {
            output.push_str("## Search List\n\n");
            for (position, item) in entries.iter().enumerate() {
                let name = item.name.as_deref().unwrap_or_default();
                output.push_str(&format!("{}. `{}`", position + 1, name));
                if let Some(characteristic) = item.characteristic {
                    output.push_str(&format!(" ({})", characteristic));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !headers.is_empty() {
            output.push_str("## Headers\n\n");
            for item in headers {
                self.render_header_md(&mut output, item);
            }
            output.push('\n');
        }

        if !missing.is_empty() {
            output.push_str("## Not Found\n\n");
            for item in missing {
                output.push_str(&format!("- {}", spelled(item)));
                if let Some(line) = item.line {
                    output.push_str(&format!(" (line {})", line));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !stats.is_empty() {
            output.push_str("## Statistics\n\n");
            for item in stats {
                if let Some(serde_json::Value::Object(map)) = &item.data {
                    for (key, value) in map {
                        output.push_str(&format!("- {}: {}\n", key, value));
                    }
                }
            }
            output.push('\n');
        }

        output
    }

    fn render_header_md(&self, output: &mut String, item: &ResultItem) {
        output.push_str(&format!("- {}", spelled(item)));
        if let Some(path) = &item.path {
            output.push_str(&format!(" → `{}`", path));
        }
        if let Some(characteristic) = item.characteristic {
            output.push_str(&format!(" [{}]", characteristic));
        }
        if item.system_framework {
            output.push_str(" [system framework]");
        }
        if let Some(line) = item.line {
            output.push_str(&format!(" (line {})", line));
        }
        output.push('\n');
    }

    /// Render as raw output: one resolved path per line
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.path.clone().or_else(|| item.name.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn spelled(item: &ResultItem) -> String {
    let name = item.name.as_deref().unwrap_or_default();
    match item.include_kind {
        Some(kind) => format!("`{}`", kind.spell(name)),
        None => format!("`{}`", name),
    }
}
