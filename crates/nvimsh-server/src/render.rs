//! Response bodies for every output format.
//!
//! Everything here is a pure function of its input, so the same results
//! always render to the same bytes.

use std::{collections::HashSet, fmt, str::FromStr};

use nu_ansi_term::{Color, Style as AnsiStyle};
use nvimsh_core::Ranked;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Segment, Padding, Style},
};

pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

const TITLE: &str = "nvim.sh - neovim plugin search from the terminal";
const POWERED_BY: &str = "https://neovimcraft.com";
const ROUTES: &[(&str, &str)] = &[
    ("https://nvim.sh", "help"),
    ("https://nvim.sh/s", "return all plugins in directory"),
    ("https://nvim.sh/s/:search", "search for plugin within directory"),
    ("https://nvim.sh/t", "list all tags within directory"),
    (
        "https://nvim.sh/t/:search",
        "search for plugins that exactly match tag within directory",
    ),
    ("https://nvim.sh/health", "service status as json"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned table with ANSI colors
    #[default]
    Table,
    /// Aligned table without escapes
    Plain,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format `{other}`")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

impl Rendered {
    fn text(body: String) -> Self {
        Self {
            content_type: TEXT_CONTENT_TYPE,
            body,
        }
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        Ok(Self {
            content_type: JSON_CONTENT_TYPE,
            body: serde_json::to_string(value)?,
        })
    }
}

/// Renders query results.
///
/// Text tables list `Name`, `Stars`, `OpenIssues`, `Updated` and
/// `Description`; with `debug` they show `Score`, `Name` and `Stars` instead.
pub fn render_results(
    results: &[Ranked],
    format: OutputFormat,
    debug: bool,
) -> serde_json::Result<Rendered> {
    if format == OutputFormat::Json {
        return Rendered::json(results);
    }

    let rows = results.iter().map(|result| {
        let plugin = &result.plugin;
        if debug {
            vec![
                result.rank.to_string(),
                plugin.id.clone(),
                plugin.stars.to_string(),
            ]
        } else {
            vec![
                plugin.id.clone(),
                plugin.stars.to_string(),
                plugin.open_issues.to_string(),
                plugin.updated_at.clone(),
                plugin.description.clone(),
            ]
        }
    });

    let header: &[&str] = if debug {
        &["Score", "Name", "Stars"]
    } else {
        &["Name", "Stars", "OpenIssues", "Updated", "Description"]
    };

    Ok(Rendered::text(table(header, rows, format == OutputFormat::Table)))
}

/// Renders the tag list, sorted alphabetically.
pub fn render_tags(tags: &HashSet<String>, format: OutputFormat) -> serde_json::Result<Rendered> {
    let mut tags: Vec<&str> = tags.iter().map(String::as_str).collect();
    tags.sort_unstable();

    if format == OutputFormat::Json {
        return Rendered::json(&tags);
    }

    let mut body = String::new();
    for tag in tags {
        body.push_str(tag);
        body.push('\n');
    }
    Ok(Rendered::text(body))
}

#[derive(Serialize)]
struct HelpRoute {
    api: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct Help {
    title: &'static str,
    routes: Vec<HelpRoute>,
    powered_by: &'static str,
}

pub fn render_help(format: OutputFormat) -> serde_json::Result<Rendered> {
    if format == OutputFormat::Json {
        let help = Help {
            title: TITLE,
            routes: ROUTES
                .iter()
                .map(|&(api, description)| HelpRoute {
                    api,
                    description,
                })
                .collect(),
            powered_by: POWERED_BY,
        };
        return Rendered::json(&help);
    }

    let rows = ROUTES
        .iter()
        .map(|(api, description)| vec![api.to_string(), description.to_string()]);
    let routes = table(&["api", "description"], rows, format == OutputFormat::Table);

    Ok(Rendered::text(format!(
        "{TITLE}\n\n{routes}\npowered by: {POWERED_BY}\n"
    )))
}

/// Lays out a borderless table with two spaces between columns.
///
/// With `color` the header is green and underlined and the first column
/// yellow. Every line ends in a newline and carries no trailing blanks.
fn table<I>(header: &[&str], rows: I, color: bool) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let header_style = Color::Green.underline();
    let column_style = AnsiStyle::new().fg(Color::Yellow);
    let paint = |style: AnsiStyle, text: String| {
        if color {
            style.paint(text).to_string()
        } else {
            text
        }
    };

    let mut builder = Builder::new();
    builder.push_record(header.iter().map(|h| paint(header_style, h.to_string())));

    for row in rows {
        builder.push_record(row.into_iter().enumerate().map(|(idx, cell)| {
            if idx == 0 {
                paint(column_style, cell)
            } else {
                cell
            }
        }));
    }

    let mut table = builder.build();
    table
        .with(Style::empty())
        .modify(Segment::all(), Padding::new(0, 2, 0, 0));

    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
