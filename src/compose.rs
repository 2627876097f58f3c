//! Markup compositor: highlighted code + theme → self-contained HTML document
//!
//! Documents are built from a fixed stylesheet template with theme colors
//! substituted at `{{color:<field>}}` points; the header and code markup are
//! then spliced into the body. The result references no external resources.

use crate::highlight::{self, escape_html, Highlight};
use crate::language::map_language;
use crate::theme::Theme;

/// Selector of the element that is measured and captured.
pub const CONTENT_SELECTOR: &str = ".code-container";

/// Title shown in the window header when no filename is known.
pub const UNTITLED: &str = "untitled";

/// Which header the card is drawn with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardStyle {
    /// Traffic-light dots and the language badge
    Plain,
    /// Window controls, a centered filename title and the language badge
    #[default]
    TitleBar,
}

/// A fully composed document, consumed once by the render driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    html: String,
}

impl RenderedDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

const HEAD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
html, body {
    margin: 0;
    padding: 0;
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', 'Monaco', monospace;
    background: {{color:background}};
    color: {{color:text}};
    min-height: 100vh;
    width: 100%;
}
body {
    padding: 30px;
    box-sizing: border-box;
    display: flex;
    align-items: flex-start;
    justify-content: center;
    overflow: visible;
}
.code-container {
    background: {{color:container}};
    border-radius: 16px;
    box-shadow: 0 20px 40px rgba(0, 0, 0, 0.4), 0 8px 16px rgba(0, 0, 0, 0.2), inset 0 1px 0 rgba(255, 255, 255, 0.1);
    border: 1px solid {{color:border}};
    width: 800px;
    max-width: 100%;
    position: relative;
    overflow: visible;
    margin-bottom: 30px;
}
.language-badge {
    background: {{color:badge}};
    color: #ffffff;
    padding: 6px 12px;
    border-radius: 20px;
    font-size: 11px;
    font-weight: 600;
    text-transform: uppercase;
    letter-spacing: 0.5px;
    box-shadow: 0 2px 8px rgba(0, 0, 0, 0.3);
}
.code-content {
    padding: 24px;
}
.code-block {
    background: {{color:codeBlock}};
    border-radius: 12px;
    padding: 20px;
    overflow: hidden;
    font-size: 16px;
    line-height: 1.7;
    white-space: pre-wrap;
    word-break: break-word;
    color: {{color:text}};
    border: 1px solid {{color:border}};
    box-shadow: inset 0 2px 4px rgba(0, 0, 0, 0.2);
}
{{header_style}}
.tok-keyword, .tok-storage, .tok-entity.tok-name.tok-tag, .tok-entity.tok-name.tok-selector { color: {{color:keyword}}; font-weight: 500; }
.tok-string, .tok-string.tok-regexp { color: {{color:string}}; }
.tok-comment { color: {{color:comment}}; font-style: italic; }
.tok-constant.tok-numeric, .tok-constant.tok-language { color: {{color:number}}; }
.tok-entity.tok-name.tok-function, .tok-variable.tok-function, .tok-support.tok-function, .tok-entity.tok-other.tok-attribute-name { color: {{color:function}}; }
.tok-entity.tok-name.tok-class, .tok-entity.tok-name.tok-type, .tok-support.tok-class, .tok-support.tok-type { color: {{color:class}}; }
.tok-keyword.tok-operator { color: {{color:operator}}; font-weight: normal; }
.tok-punctuation { color: {{color:punctuation}}; }
.tok-variable { color: {{color:variable}}; }
.tok-variable.tok-other.tok-property, .tok-support.tok-type.tok-property-name, .tok-meta.tok-property-name { color: {{color:property}}; }
</style>
</head>
"#;

const PLAIN_HEADER_STYLE: &str = r#".header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px 24px 0 24px;
}
.dots { display: flex; gap: 8px; }
.dot { width: 14px; height: 14px; border-radius: 50%; box-shadow: 0 2px 4px rgba(0, 0, 0, 0.2); }
.dot.red { background: #ff5f56; }
.dot.yellow { background: #ffbd2e; }
.dot.green { background: #27ca3f; }"#;

const TITLE_BAR_STYLE: &str = r#".window-header {
    padding: 12px 20px;
    border-bottom: 1px solid {{color:border}};
    border-radius: 16px 16px 0 0;
    display: flex;
    align-items: center;
    gap: 8px;
    min-height: 40px;
    box-sizing: border-box;
}
.window-controls { display: flex; gap: 6px; }
.window-control { width: 12px; height: 12px; border-radius: 50%; }
.window-control.close { background: #ff5f56; }
.window-control.minimize { background: #ffbd2e; }
.window-control.maximize { background: #27ca3f; }
.window-title {
    color: {{color:text}};
    font-size: 14px;
    font-weight: 500;
    flex: 1;
    text-align: center;
    text-shadow: 0 1px 2px rgba(0, 0, 0, 0.5);
}"#;

/// Compose a document, highlighting `code` with the grammar for `language_id`.
pub fn compose(code: &str, language_id: &str, theme: &Theme, filename: Option<&str>, style: CardStyle) -> RenderedDocument {
    let highlighted = highlight::highlight(code, map_language(language_id));
    compose_highlighted(&highlighted, language_id, theme, filename, style)
}

/// Compose a document from already highlighted code.
///
/// `language_label` is shown verbatim (escaped) in the badge. `filename` only
/// appears in the [`CardStyle::TitleBar`] variant.
pub fn compose_highlighted(
    code: &Highlight,
    language_label: &str,
    theme: &Theme,
    filename: Option<&str>,
    style: CardStyle,
) -> RenderedDocument {
    let badge = escape_html(language_label);
    let (header_style, header) = match style {
        CardStyle::Plain => (
            PLAIN_HEADER_STYLE,
            format!(
                "<div class=\"header\">\n\
                 <div class=\"dots\"><div class=\"dot red\"></div><div class=\"dot yellow\"></div><div class=\"dot green\"></div></div>\n\
                 <div class=\"language-badge\">{}</div>\n\
                 </div>",
                badge
            ),
        ),
        CardStyle::TitleBar => {
            let title = filename.map(str::trim).filter(|f| !f.is_empty()).unwrap_or(UNTITLED);
            (
                TITLE_BAR_STYLE,
                format!(
                    "<div class=\"window-header\">\n\
                     <div class=\"window-controls\"><div class=\"window-control close\"></div><div class=\"window-control minimize\"></div><div class=\"window-control maximize\"></div></div>\n\
                     <div class=\"window-title\">{}</div>\n\
                     <div class=\"language-badge\">{}</div>\n\
                     </div>",
                    escape_html(title),
                    badge
                ),
            )
        }
    };

    let mut head = HEAD_TEMPLATE.replace("{{header_style}}", header_style);
    for (field, value) in theme.color_values() {
        head = head.replace(&format!("{{{{color:{}}}}}", field), value.trim());
    }

    // User text is spliced in once and never rescanned for placeholders.
    let html = format!(
        "{}<body>\n<div class=\"code-container\">\n{}\n<div class=\"code-content\"><div class=\"code-block\">{}</div></div>\n</div>\n</body>\n</html>\n",
        head,
        header,
        code.markup()
    );

    RenderedDocument { html }
}
