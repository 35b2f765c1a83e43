use std::borrow::Cow;

use ammonia::clean_text;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z]+)\s*\}\}").expect("placeholder pattern is valid"));

const VIEW_TEMPLATE: &str = include_str!("../../../templates/view.html");

/// HTML that has already been assembled from escaped parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new() -> Self {
        Markup(String::new())
    }

    /// Wraps a fragment the caller built from escaped values.
    pub fn trusted(html: impl Into<String>) -> Self {
        Markup(html.into())
    }

    pub fn push(&mut self, html: &str) {
        self.0.push_str(html);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Values injected into the viewer page.
///
/// `file_content` and `og_tags` are markup; the remaining fields are plain text
/// and get escaped on the way in.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub file_content: Markup,
    pub og_tags: Markup,
    pub filename: String,
    /// `{date}/{file}` with the file name percent-encoded.
    pub joined_path: String,
    pub site_name: String,
}

impl ViewModel {
    fn value(&self, placeholder: &str) -> Option<Cow<'_, str>> {
        let value = match placeholder {
            "fileContent" => Cow::Borrowed(self.file_content.as_str()),
            "ogTags" => Cow::Borrowed(self.og_tags.as_str()),
            "filename" => Cow::Owned(clean_text(&self.filename)),
            "joinedPath" => Cow::Owned(clean_text(&self.joined_path)),
            "siteName" => Cow::Owned(clean_text(&self.site_name)),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone)]
pub struct PageTemplate {
    source: Cow<'static, str>,
}

impl Default for PageTemplate {
    fn default() -> Self {
        PageTemplate { source: Cow::Borrowed(VIEW_TEMPLATE) }
    }
}

impl PageTemplate {
    pub fn from_source(source: impl Into<String>) -> Self {
        PageTemplate { source: Cow::Owned(source.into()) }
    }

    /// Single pass over the template; substituted values are never rescanned.
    pub fn render(&self, view: &ViewModel) -> String {
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures| match view.value(&caps[1]) {
                Some(value) => value.into_owned(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
