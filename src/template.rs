//! PR title/body templating
//!
//! Templates use mustache-style `{{variable}}` placeholders (Handlebars
//! dialect). Output is plain text, so HTML escaping is disabled.

use crate::error::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Default PR title template
pub const DEFAULT_TITLE_TEMPLATE: &str = "Merge {{original_source}} into {{target}}";

/// Default PR body template
pub const DEFAULT_BODY_TEMPLATE: &str = "\
This pull request was opened automatically to keep `{{target}}` in sync with `{{original_source}}` \
(source pattern `{{source_pattern}}`).
{{#if use_intermediate_branch}}
Changes are staged on `{{source}}`, which is kept up to date with both `{{original_source}}` \
and `{{target}}`. Resolve any conflicts on `{{source}}`.
{{/if}}";

const TITLE: &str = "title";
const BODY: &str = "body";

/// Values available to the PR templates
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext<'a> {
    /// Configured source pattern
    pub source_pattern: &'a str,
    /// Branch that was pushed
    pub original_source: &'a str,
    /// PR head branch (intermediate branch when enabled)
    pub source: &'a str,
    /// PR base branch
    pub target: &'a str,
    /// Whether an intermediate branch is in use
    pub use_intermediate_branch: bool,
}

/// Rendered PR text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPr {
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
}

/// Compiled title and body templates
#[derive(Debug, Clone)]
pub struct PrTemplates {
    registry: Handlebars<'static>,
}

impl PrTemplates {
    /// Compile both templates, failing on syntax errors
    pub fn new(title: &str, body: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TITLE, title)
            .map_err(|e| Error::Template(format!("pr_title: {e}")))?;
        registry
            .register_template_string(BODY, body)
            .map_err(|e| Error::Template(format!("pr_body: {e}")))?;
        Ok(Self { registry })
    }

    /// Render title and body for one PR
    pub fn render(&self, ctx: &TemplateContext<'_>) -> Result<RenderedPr> {
        let title = self
            .registry
            .render(TITLE, ctx)
            .map_err(|e| Error::Template(format!("pr_title: {e}")))?;
        let body = self
            .registry
            .render(BODY, ctx)
            .map_err(|e| Error::Template(format!("pr_body: {e}")))?;
        Ok(RenderedPr {
            title: title.trim().to_string(),
            body,
        })
    }
}
