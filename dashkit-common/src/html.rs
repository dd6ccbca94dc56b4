//! Server-rendered HTML helpers
//!
//! Pages are assembled with `format!` in each service; this module holds the
//! parts every page shares: escaping, flash notices, the header with build
//! identification, and the shared stylesheet.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::BuildInfo;

// Embed shared stylesheet at compile time
const DASHKIT_UI_CSS: &str = include_str!("../static/dashkit-ui.css");

/// GET /static/dashkit-ui.css
///
/// Serves the shared dashkit stylesheet
pub async fn serve_ui_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        DASHKIT_UI_CSS,
    )
        .into_response()
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Severity of a one-shot notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl FlashLevel {
    fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "notice-success",
            FlashLevel::Info => "notice-info",
            FlashLevel::Warning => "notice-warning",
            FlashLevel::Error => "notice-error",
        }
    }
}

/// Message stored in the session and shown once on the next render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message)
    }
}

/// Render a notice box
pub fn render_notice(level: FlashLevel, message: &str) -> String {
    format!(
        r#"<div class="notice {}">{}</div>"#,
        level.css_class(),
        escape(message)
    )
}

/// Render an optional flash, or nothing
pub fn render_flash(flash: Option<&Flash>) -> String {
    flash
        .map(|f| render_notice(f.level, &f.message))
        .unwrap_or_default()
}

/// Page content handed to [`render_page`]
pub struct Page<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub build: &'a BuildInfo,
    /// Pre-rendered sidebar markup; `None` renders a single-column page
    pub sidebar: Option<String>,
    /// Pre-rendered main content markup
    pub body: String,
}

/// Wrap page content in the shared document shell
pub fn render_page(page: &Page<'_>) -> String {
    let sidebar = page
        .sidebar
        .as_ref()
        .map(|s| format!(r#"<aside class="sidebar">{}</aside>"#, s))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/dashkit-ui.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>{title}</h1>
                <p class="subtitle">{subtitle}</p>
            </div>
            <div class="header-right">
                <div class="build-info-line">{module} v{version}</div>
                <div class="build-info-line">{hash} ({profile})</div>
                <div class="build-info-line">{timestamp}</div>
            </div>
        </div>
    </header>
    <div class="layout">
        {sidebar}
        <main class="content">
{body}
        </main>
    </div>
</body>
</html>
"#,
        title = escape(page.title),
        subtitle = escape(page.subtitle),
        module = page.build.module,
        version = page.build.version,
        hash = page.build.short_hash(),
        profile = page.build.build_profile,
        timestamp = page.build.build_timestamp,
        sidebar = sidebar,
        body = page.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD: BuildInfo = BuildInfo {
        module: "dashkit-test",
        version: "0.1.0",
        git_hash: "unknown",
        build_timestamp: "now",
        build_profile: "debug",
    };

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_render_flash_escapes_message() {
        let html = render_flash(Some(&Flash::error("<b>bad</b>")));
        assert!(html.contains("notice-error"));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert_eq!(render_flash(None), "");
    }

    #[test]
    fn test_render_page_includes_sidebar_and_build_info() {
        let html = render_page(&Page {
            title: "Test Page",
            subtitle: "sub",
            build: &BUILD,
            sidebar: Some("<p>side</p>".to_string()),
            body: "<p>main</p>".to_string(),
        });

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<aside class="sidebar"><p>side</p></aside>"#));
        assert!(html.contains("dashkit-test v0.1.0"));
        assert!(html.contains("<p>main</p>"));
    }
}
