//! Syntax highlighting via syntect.
//!
//! Produces classed HTML (`tok-` prefixed scope classes) that the compositor
//! colors from the active theme. Any failure degrades to entity-escaped plain
//! text, which cannot itself fail.

use std::sync::OnceLock;

use log::{debug, warn};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::{Error, Result};

/// Prefix applied to every scope class in highlighted output.
pub const CLASS_PREFIX: &str = "tok-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: CLASS_PREFIX };

/// Outcome of highlighting a code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    /// Classed token markup from the grammar engine
    Highlighted(String),
    /// The raw text with `& < > " '` escaped
    PlainEscaped(String),
}

impl Highlight {
    pub fn markup(&self) -> &str {
        match self {
            Highlight::Highlighted(html) | Highlight::PlainEscaped(html) => html,
        }
    }

    pub fn into_markup(self) -> String {
        match self {
            Highlight::Highlighted(html) | Highlight::PlainEscaped(html) => html,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, Highlight::Highlighted(_))
    }
}

/// The syntect default syntax set, loaded once.
pub fn default_syntaxes() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Highlight `code` with the grammar named by `grammar` (see [`crate::language`]).
pub fn highlight(code: &str, grammar: &str) -> Highlight {
    highlight_with(default_syntaxes(), code, grammar)
}

/// Highlight against an explicit syntax set.
pub fn highlight_with(syntaxes: &SyntaxSet, code: &str, grammar: &str) -> Highlight {
    let code = code.replace("\r\n", "\n");
    let Some(syntax) = syntaxes.find_syntax_by_token(syntax_token(grammar)) else {
        debug!("No grammar for '{}'; rendering plain text", grammar);
        return Highlight::PlainEscaped(escape_html(&code));
    };

    match try_highlight(syntaxes, syntax, &code) {
        Ok(html) => Highlight::Highlighted(html),
        Err(e) => {
            warn!("{}; rendering plain text", e);
            Highlight::PlainEscaped(escape_html(&code))
        }
    }
}

fn try_highlight(syntaxes: &SyntaxSet, syntax: &SyntaxReference, code: &str) -> Result<String> {
    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, syntaxes, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|e| Error::HighlightFailure(e.to_string()))?;
    }
    Ok(generator.finalize())
}

// Grammar keys follow the editor-facing names; syntect looks syntaxes up by
// extension or display name.
fn syntax_token(grammar: &str) -> &str {
    match grammar {
        "markup" => "html",
        "csharp" => "cs",
        "bash" => "sh",
        "typescript" => "ts",
        "powershell" => "ps1",
        "kotlin" => "kt",
        other => other,
    }
}

/// Escape the five HTML-reserved characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
