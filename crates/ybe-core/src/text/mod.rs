//! Rich text content.
//!
//! Question texts, answers, hints and feedback hold a [`TextContent`]: a string
//! tagged with the markup it is written in. Every variant converts to HTML
//! without failing; conversions into Markdown or plain text go through a
//! [`TextRenderer`] and may fail.

mod html;
mod render;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

pub use self::html::{decode_entities, escape_html, extract_images};
pub use self::render::{
    BuiltinRenderer, PandocRenderer, TextRenderer, markdown_images, markdown_to_html,
};
use crate::error::Result;
use crate::resource::ResourceRef;

/// Markup of a text block, keyed by the field name used in exam files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// Text without any markup.
    #[strum(serialize = "text")]
    Plain,
    /// CommonMark.
    #[strum(serialize = "text_markdown")]
    Markdown,
    /// An HTML fragment.
    #[strum(serialize = "text_html")]
    Html,
}

impl TextFormat {
    /// Field name of this text block, e.g. `text_html`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Plain => "text",
            Self::Markdown => "text_markdown",
            Self::Html => "text_html",
        }
    }

    /// All text block keys, in canonical order.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        Self::iter().map(|format| format.key())
    }
}

/// A block of text in one of the supported markups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(tag = "format", content = "text", rename_all = "lowercase")]
pub enum TextContent {
    Plain(String),
    Markdown(String),
    Html(String),
}

impl Default for TextContent {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl TextContent {
    /// Creates plain text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Creates Markdown text.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Markdown(text.into())
    }

    /// Creates HTML text.
    pub fn html(text: impl Into<String>) -> Self {
        Self::Html(text.into())
    }

    /// Creates text of the given format.
    pub fn with_format(format: TextFormat, text: impl Into<String>) -> Self {
        match format {
            TextFormat::Plain => Self::Plain(text.into()),
            TextFormat::Markdown => Self::Markdown(text.into()),
            TextFormat::Html => Self::Html(text.into()),
        }
    }

    /// Returns the markup of this text.
    pub fn format(&self) -> TextFormat {
        match self {
            Self::Plain(_) => TextFormat::Plain,
            Self::Markdown(_) => TextFormat::Markdown,
            Self::Html(_) => TextFormat::Html,
        }
    }

    /// Returns the raw text as written.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Markdown(text) | Self::Html(text) => text,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }

    /// Returns true if the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    /// Converts this text to HTML.
    pub fn to_html(&self) -> String {
        match self {
            Self::Plain(text) => escape_html(text),
            Self::Markdown(text) => markdown_to_html(text),
            Self::Html(text) => text.clone(),
        }
    }

    /// Converts this text to Markdown using the builtin renderer.
    pub fn to_canonical_markup(&self) -> Result<String> {
        self.to_canonical_markup_with(&BuiltinRenderer)
    }

    /// Converts this text to Markdown using `renderer`.
    pub fn to_canonical_markup_with(&self, renderer: &dyn TextRenderer) -> Result<String> {
        renderer.convert(self.as_str(), self.format(), TextFormat::Markdown)
    }

    /// Converts this text to plain text using the builtin renderer.
    pub fn to_plain_text(&self) -> Result<String> {
        self.to_plain_text_with(&BuiltinRenderer)
    }

    /// Converts this text to plain text using `renderer`.
    pub fn to_plain_text_with(&self, renderer: &dyn TextRenderer) -> Result<String> {
        renderer.convert(self.as_str(), self.format(), TextFormat::Plain)
    }

    /// Lists the local files referenced by images in this text.
    ///
    /// Remote (`http://`, `https://`) and inline (`data:`) images are skipped.
    pub fn list_resources(&self) -> Vec<ResourceRef> {
        match self {
            Self::Plain(_) => Vec::new(),
            Self::Html(text) => extract_images(text),
            Self::Markdown(text) => markdown_images(text),
        }
    }
}

impl From<&str> for TextContent {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for TextContent {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}
