//! Conversion between text markups.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use super::TextFormat;
use super::html::{escape_html, extract_images, html_to_markdown, html_to_plain, local_image};
use crate::TRACING_TARGET_TEXT;
use crate::error::{Error, Result};
use crate::resource::ResourceRef;

const MARKDOWN_OPTIONS: Options = Options::ENABLE_TABLES.union(Options::ENABLE_STRIKETHROUGH);

/// Converts text between markups.
///
/// Implementations may call out to external document converters; failures are
/// reported as [`ErrorKind::Conversion`](crate::ErrorKind::Conversion) errors.
pub trait TextRenderer: Send + Sync {
    /// Converts `text` written in `from` into `to`.
    fn convert(&self, text: &str, from: TextFormat, to: TextFormat) -> Result<String>;
}

/// Converts CommonMark to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, MARKDOWN_OPTIONS);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Finds the local images of a CommonMark text, in document order.
///
/// Both Markdown images and `<img>` tags in embedded HTML are listed.
pub fn markdown_images(markdown: &str) -> Vec<ResourceRef> {
    let mut images = Vec::new();
    let mut raw_html = String::new();
    // Source and alt text of the image being read.
    let mut open: Option<(String, String)> = None;

    for event in Parser::new_ext(markdown, MARKDOWN_OPTIONS) {
        if let Event::Html(raw) | Event::InlineHtml(raw) = &event {
            raw_html.push_str(raw);
            continue;
        }
        if !raw_html.is_empty() {
            images.extend(extract_images(&raw_html));
            raw_html.clear();
        }

        match event {
            Event::Start(Tag::Image { dest_url, .. }) => {
                open = Some((dest_url.into_string(), String::new()));
            }
            Event::End(TagEnd::Image) => {
                if let Some((src, alt)) = open.take()
                    && let Some(image) = local_image(src, Some(alt))
                {
                    images.push(image);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, alt)) = open.as_mut() {
                    alt.push_str(&text);
                }
            }
            _ => {}
        }
    }

    images.extend(extract_images(&raw_html));
    images
}

/// Escapes the characters Markdown would interpret.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// In-process renderer covering every pair of markups.
///
/// Markdown is rendered with `pulldown-cmark`; HTML is reduced to Markdown or
/// plain text by rewriting its common tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinRenderer;

impl TextRenderer for BuiltinRenderer {
    fn convert(&self, text: &str, from: TextFormat, to: TextFormat) -> Result<String> {
        let converted = match (from, to) {
            (from, to) if from == to => text.to_owned(),
            (TextFormat::Plain, TextFormat::Html) => escape_html(text),
            (TextFormat::Plain, TextFormat::Markdown) => escape_markdown(text),
            (TextFormat::Markdown, TextFormat::Html) => markdown_to_html(text),
            (TextFormat::Markdown, TextFormat::Plain) => html_to_plain(&markdown_to_html(text)),
            (TextFormat::Html, TextFormat::Plain) => html_to_plain(text),
            (TextFormat::Html, TextFormat::Markdown) => html_to_markdown(text),
            (from, to) => {
                return Err(Error::conversion()
                    .with_message(format!("no conversion from {from} to {to}")));
            }
        };

        Ok(converted)
    }
}

/// Renderer delegating to an external `pandoc` executable.
///
/// Plain input never reaches pandoc; it is handled by [`BuiltinRenderer`].
#[derive(Debug, Clone)]
pub struct PandocRenderer {
    program: PathBuf,
}

impl Default for PandocRenderer {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl PandocRenderer {
    /// Creates a renderer running the given pandoc executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn pandoc_format(format: TextFormat) -> &'static str {
        match format {
            TextFormat::Plain => "plain",
            TextFormat::Markdown => "markdown",
            TextFormat::Html => "html",
        }
    }
}

impl TextRenderer for PandocRenderer {
    fn convert(&self, text: &str, from: TextFormat, to: TextFormat) -> Result<String> {
        if from == to || from == TextFormat::Plain {
            return BuiltinRenderer.convert(text, from, to);
        }

        tracing::trace!(
            target: TRACING_TARGET_TEXT,
            program = %self.program.display(),
            from = %from,
            to = %to,
            "Converting text with pandoc"
        );

        let mut child = Command::new(&self.program)
            .args(["--from", Self::pandoc_format(from)])
            .args(["--to", Self::pandoc_format(to)])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                Error::conversion()
                    .with_message(format!("failed to start {}", self.program.display()))
                    .with_source(err)
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(|err| {
                Error::conversion()
                    .with_message("failed to pass text to pandoc")
                    .with_source(err)
            })?;
        }

        let output = child.wait_with_output().map_err(|err| {
            Error::conversion()
                .with_message("pandoc did not finish")
                .with_source(err)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::conversion().with_message(format!(
                "pandoc exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map(|converted| converted.trim_end().to_owned())
            .map_err(|err| {
                Error::conversion()
                    .with_message("pandoc produced invalid UTF-8")
                    .with_source(err)
            })
    }
}
