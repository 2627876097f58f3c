//! Composed documents parse and carry the code text intact

use cirneco::compose::{compose, compose_highlighted};
use cirneco::highlight::{highlight_with, Highlight};
use cirneco::{CardStyle, Theme, ThemeCatalog, ThemeSource};
use scraper::{Html, Selector};
use syntect::parsing::SyntaxSetBuilder;

fn text_of(html: &str, selector: &str) -> String {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel).next().expect("element present").text().collect()
}

#[test]
fn highlighted_code_keeps_source_text() {
    let code = "function add(a, b) {\n  // sum\n  return a + b > 0 ? \"pos\" : 'neg';\n}\n";
    let doc = compose(code, "javascript", Theme::embedded_default(), Some("add.js"), CardStyle::TitleBar);
    assert_eq!(text_of(doc.as_str(), ".code-block"), code);
    assert!(doc.as_str().contains("tok-comment"));
}

#[test]
fn plain_fallback_document_is_well_formed() {
    let code = r#"<script>alert("x & 'y'")</script>"#;
    let empty = SyntaxSetBuilder::new().build();
    let highlighted = highlight_with(&empty, code, "javascript");
    assert!(matches!(highlighted, Highlight::PlainEscaped(_)));

    let doc = compose_highlighted(&highlighted, "javascript", Theme::embedded_default(), None, CardStyle::TitleBar);
    assert!(doc.as_str().contains("&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"));
    assert_eq!(text_of(doc.as_str(), ".code-block"), code);

    let parsed = Html::parse_document(doc.as_str());
    let scripts = Selector::parse("script").unwrap();
    assert_eq!(parsed.select(&scripts).count(), 0);
}

#[test]
fn title_bar_shows_filename_or_untitled() {
    let theme = Theme::embedded_default();
    let named = compose("x", "rust", theme, Some("lib.rs"), CardStyle::TitleBar);
    assert_eq!(text_of(named.as_str(), ".window-title"), "lib.rs");

    let unnamed = compose("x", "rust", theme, None, CardStyle::TitleBar);
    assert_eq!(text_of(unnamed.as_str(), ".window-title"), "untitled");
}

#[test]
fn badge_and_title_are_escaped() {
    let doc = compose("x", "c<sharp>", Theme::embedded_default(), Some("a&b.cs"), CardStyle::TitleBar);
    assert_eq!(text_of(doc.as_str(), ".language-badge"), "c<sharp>");
    assert_eq!(text_of(doc.as_str(), ".window-title"), "a&b.cs");
}

#[test]
fn both_variants_share_the_content_element() {
    let theme = Theme::embedded_default();
    for style in [CardStyle::Plain, CardStyle::TitleBar] {
        let doc = compose("let a = 1;", "javascript", theme, None, style);
        let parsed = Html::parse_document(doc.as_str());
        let container = Selector::parse(".code-container .code-block").unwrap();
        assert_eq!(parsed.select(&container).count(), 1, "{:?}", style);
    }
}

#[test]
fn every_bundled_theme_fills_the_stylesheet() {
    let catalog = ThemeCatalog::resolve(&ThemeSource::Bundled, &Default::default());
    for (key, theme) in catalog.iter() {
        let doc = compose("x", "json", theme, None, CardStyle::Plain);
        assert!(!doc.as_str().contains("{{"), "{} left a placeholder", key);
        assert!(doc.as_str().contains(&format!("background: {};", theme.colors.background)));
        assert!(doc.as_str().contains(&format!(".tok-comment {{ color: {};", theme.syntax.comment)));
    }
}
