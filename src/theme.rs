//! Theme store: built-in manifest loading, custom theme merging and lookup
//!
//! Built-in themes are described by a manifest (`themes.json`) mapping a theme
//! key to the file holding its definition. The bundled set is compiled into the
//! binary; a directory with the same layout can replace it. Every definition
//! must carry a complete `colors` and `syntax` record, otherwise the entry is
//! dropped from the catalog.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Key of the theme synthesized when nothing else resolves.
pub const EMBEDDED_DEFAULT_KEY: &str = "dark-mode";

/// Key used as the default when the configuration names none.
pub const FALLBACK_DEFAULT_KEY: &str = "dracula";

const MANIFEST: &str = "themes.json";

const BUNDLED_FILES: &[(&str, &str)] = &[
    (MANIFEST, include_str!("../themes/themes.json")),
    ("dark-mode.json", include_str!("../themes/dark-mode.json")),
    ("dracula.json", include_str!("../themes/dracula.json")),
    ("github-light.json", include_str!("../themes/github-light.json")),
    ("monokai.json", include_str!("../themes/monokai.json")),
    ("nord.json", include_str!("../themes/nord.json")),
    ("one-dark.json", include_str!("../themes/one-dark.json")),
    ("solarized-dark.json", include_str!("../themes/solarized-dark.json")),
];

/// Window and chrome colors of a snippet card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub background: String,
    pub container: String,
    pub code_block: String,
    pub text: String,
    pub border: String,
    pub badge: String,
}

/// Per-token-class colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxColors {
    pub keyword: String,
    pub string: String,
    pub comment: String,
    pub number: String,
    pub function: String,
    pub class: String,
    pub operator: String,
    pub punctuation: String,
    pub variable: String,
    pub property: String,
}

/// A named bundle of UI and syntax colors
///
/// Every field of `colors` and `syntax` is required when deserializing, so a
/// parsed `Theme` is always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub colors: ThemeColors,
    pub syntax: SyntaxColors,
}

impl Theme {
    /// The theme used when no catalog entry resolves.
    pub fn embedded_default() -> &'static Theme {
        static EMBEDDED: OnceLock<Theme> = OnceLock::new();
        EMBEDDED.get_or_init(|| Theme {
            name: "Dark Mode".to_string(),
            description: "Built-in fallback theme".to_string(),
            colors: ThemeColors {
                background: "#1e1e1e".to_string(),
                container: "#252526".to_string(),
                code_block: "#1e1e1e".to_string(),
                text: "#d4d4d4".to_string(),
                border: "#3e3e42".to_string(),
                badge: "#007acc".to_string(),
            },
            syntax: SyntaxColors {
                keyword: "#569cd6".to_string(),
                string: "#ce9178".to_string(),
                comment: "#6a9955".to_string(),
                number: "#b5cea8".to_string(),
                function: "#dcdcaa".to_string(),
                class: "#4ec9b0".to_string(),
                operator: "#d4d4d4".to_string(),
                punctuation: "#d4d4d4".to_string(),
                variable: "#9cdcfe".to_string(),
                property: "#9cdcfe".to_string(),
            },
        })
    }

    /// All color values, labelled, in injection order.
    pub fn color_values(&self) -> [(&'static str, &str); 16] {
        let c = &self.colors;
        let s = &self.syntax;
        [
            ("background", &c.background),
            ("container", &c.container),
            ("codeBlock", &c.code_block),
            ("text", &c.text),
            ("border", &c.border),
            ("badge", &c.badge),
            ("keyword", &s.keyword),
            ("string", &s.string),
            ("comment", &s.comment),
            ("number", &s.number),
            ("function", &s.function),
            ("class", &s.class),
            ("operator", &s.operator),
            ("punctuation", &s.punctuation),
            ("variable", &s.variable),
            ("property", &s.property),
        ]
    }

    /// Reject colors that are empty, escape their style rule or load anything.
    ///
    /// A value is a hex code, a named color or one of the `rgb`/`hsl` color
    /// functions; `url(...)`, at-rules and CSS escapes never pass.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (field, value) in self.color_values() {
            let value = value.trim();
            if value.is_empty() {
                return Err(format!("color '{}' is empty", field));
            }
            if let Some(bad) = value.chars().find(|c| !is_color_char(*c)) {
                return Err(format!("color '{}' contains '{}'", field, bad));
            }
            if let Some(func) = disallowed_function(value) {
                return Err(format!("color '{}' calls '{}()'", field, func));
            }
        }
        Ok(())
    }
}

const COLOR_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla"];

fn is_color_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | '-' | '/' | ' ')
}

// Name of the first function call in `value` that is not a color function.
fn disallowed_function(value: &str) -> Option<String> {
    value.match_indices('(').find_map(|(open, _)| {
        let head = &value[..open];
        let start = head
            .rfind(|c: char| !c.is_ascii_alphanumeric() && c != '-')
            .map_or(0, |i| i + 1);
        let name = head[start..].to_ascii_lowercase();
        (!COLOR_FUNCTIONS.contains(&name.as_str())).then_some(name)
    })
}

/// Parse one theme definition from JSON text.
pub fn parse_theme(key: &str, text: &str) -> Result<Theme> {
    let theme: Theme = serde_json::from_str(text).map_err(|e| Error::ThemeLoadFailure {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    checked(key, theme)
}

/// Build a theme from an already-parsed JSON value (custom themes from config).
pub fn theme_from_value(key: &str, value: serde_json::Value) -> Result<Theme> {
    let theme: Theme = serde_json::from_value(value).map_err(|e| Error::ThemeLoadFailure {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    checked(key, theme)
}

fn checked(key: &str, theme: Theme) -> Result<Theme> {
    theme.validate().map_err(|reason| Error::ThemeLoadFailure { key: key.to_string(), reason })?;
    Ok(theme)
}

/// Where built-in theme definitions are read from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ThemeSource {
    /// Definitions compiled into the binary
    #[default]
    Bundled,
    /// A directory holding `themes.json` and the files it references
    Directory(PathBuf),
}

impl ThemeSource {
    pub fn directory(path: impl AsRef<Path>) -> Self {
        ThemeSource::Directory(path.as_ref().to_path_buf())
    }

    fn read(&self, locator: &str) -> std::io::Result<String> {
        match self {
            ThemeSource::Bundled => BUNDLED_FILES
                .iter()
                .find(|(name, _)| *name == locator)
                .map(|(_, text)| text.to_string())
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, format!("no bundled file '{}'", locator))),
            ThemeSource::Directory(dir) => std::fs::read_to_string(dir.join(locator)),
        }
    }

    /// Load every manifest entry that parses; broken entries are skipped.
    pub fn load_themes(&self) -> BTreeMap<String, Theme> {
        let mut themes = BTreeMap::new();

        let manifest: BTreeMap<String, String> = match self
            .read(MANIFEST)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(m) => m,
            Err(reason) => {
                warn!("Theme manifest unavailable ({}); using embedded default", reason);
                return themes;
            }
        };

        for (key, locator) in manifest {
            let loaded = self
                .read(&locator)
                .map_err(|e| Error::ThemeLoadFailure { key: key.clone(), reason: e.to_string() })
                .and_then(|text| parse_theme(&key, &text));
            match loaded {
                Ok(theme) => {
                    themes.insert(key, theme);
                }
                Err(e) => warn!("{}", e),
            }
        }

        debug!("Loaded {} built-in themes", themes.len());
        themes
    }
}

/// The resolved set of themes for one invocation
///
/// Built once from the built-in definitions plus any custom themes, then passed
/// by reference to everything that needs theme data.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeCatalog {
    themes: BTreeMap<String, Theme>,
    default_key: Option<String>,
}

impl ThemeCatalog {
    /// Build a catalog from `source`, overlaying `custom` entries by key.
    ///
    /// Custom entries are validated one by one; an invalid entry is skipped
    /// and the built-in with the same key (if any) is kept.
    pub fn resolve(source: &ThemeSource, custom: &BTreeMap<String, serde_json::Value>) -> Self {
        let mut themes = source.load_themes();
        if themes.is_empty() {
            themes.insert(EMBEDDED_DEFAULT_KEY.to_string(), Theme::embedded_default().clone());
        }

        for (key, value) in custom {
            match theme_from_value(key, value.clone()) {
                Ok(theme) => {
                    if themes.insert(key.clone(), theme).is_some() {
                        debug!("Custom theme '{}' overrides built-in", key);
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }

        Self { themes, default_key: None }
    }

    /// Catalog over an explicit set of themes.
    pub fn from_themes(themes: BTreeMap<String, Theme>) -> Self {
        Self { themes, default_key: None }
    }

    /// Set the configured default key (`None` keeps the built-in fallback).
    pub fn with_default_key(mut self, key: Option<String>) -> Self {
        self.default_key = key;
        self
    }

    /// Look up `key`, falling back to the designated default.
    pub fn resolve_theme(&self, key: Option<&str>) -> &Theme {
        if let Some(key) = key {
            match self.themes.get(key) {
                Some(theme) => return theme,
                None => warn!("Theme '{}' not found; using default", key),
            }
        }
        self.default_theme()
    }

    /// Configured default, then `dracula`, then the `dark-mode` entry, then
    /// the embedded theme.
    pub fn default_theme(&self) -> &Theme {
        self.themes
            .get(self.effective_key(None))
            .unwrap_or_else(|| Theme::embedded_default())
    }

    /// The catalog key the default resolves to, if any entry matches.
    pub fn default_theme_key(&self) -> Option<&str> {
        self.default_key
            .as_deref()
            .filter(|key| self.themes.contains_key(*key))
            .or_else(|| self.themes.contains_key(FALLBACK_DEFAULT_KEY).then_some(FALLBACK_DEFAULT_KEY))
    }

    /// Key that `resolve_theme(key)` would actually use.
    pub fn effective_key<'a>(&'a self, key: Option<&'a str>) -> &'a str {
        key.filter(|k| self.themes.contains_key(*k))
            .or_else(|| self.default_theme_key())
            .unwrap_or(EMBEDDED_DEFAULT_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&Theme> {
        self.themes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.themes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Theme)> {
        self.themes.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_dracula() -> serde_json::Value {
        serde_json::json!({
            "name": "My Dracula",
            "colors": {
                "background": "#000000", "container": "#111111", "codeBlock": "#222222",
                "text": "#eeeeee", "border": "#333333", "badge": "#ff0000"
            },
            "syntax": {
                "keyword": "#010101", "string": "#020202", "comment": "#030303", "number": "#040404",
                "function": "#050505", "class": "#060606", "operator": "#070707",
                "punctuation": "#080808", "variable": "#090909", "property": "#0a0a0a"
            }
        })
    }

    #[test]
    fn bundled_manifest_loads_every_theme() {
        let themes = ThemeSource::Bundled.load_themes();
        assert_eq!(themes.len(), 7);
        assert!(themes.contains_key("dracula"));
        assert!(themes.contains_key(EMBEDDED_DEFAULT_KEY));
        for theme in themes.values() {
            assert!(theme.validate().is_ok(), "{} is incomplete", theme.name);
        }
    }

    #[test]
    fn default_falls_back_to_dracula() {
        let catalog = ThemeCatalog::resolve(&ThemeSource::Bundled, &BTreeMap::new());
        assert_eq!(catalog.resolve_theme(None).name, "Dracula");
        assert_eq!(catalog.resolve_theme(Some("no-such-theme")).name, "Dracula");
        assert_eq!(catalog.effective_key(Some("no-such-theme")), "dracula");
    }

    #[test]
    fn configured_default_wins_when_present() {
        let catalog = ThemeCatalog::resolve(&ThemeSource::Bundled, &BTreeMap::new())
            .with_default_key(Some("nord".into()));
        assert_eq!(catalog.resolve_theme(None).name, "Nord");

        let missing = catalog.with_default_key(Some("absent".into()));
        assert_eq!(missing.resolve_theme(None).name, "Dracula");
    }

    #[test]
    fn custom_theme_overrides_builtin() {
        let mut custom = BTreeMap::new();
        custom.insert("dracula".to_string(), custom_dracula());
        let catalog = ThemeCatalog::resolve(&ThemeSource::Bundled, &custom);
        let theme = catalog.resolve_theme(Some("dracula"));
        assert_eq!(theme.name, "My Dracula");
        assert_eq!(theme.description, "");
        assert_eq!(catalog.resolve_theme(None).name, "My Dracula");
    }

    #[test]
    fn partial_custom_theme_is_rejected() {
        let mut value = custom_dracula();
        value["syntax"].as_object_mut().unwrap().remove("property");
        let mut custom = BTreeMap::new();
        custom.insert("dracula".to_string(), value);
        let catalog = ThemeCatalog::resolve(&ThemeSource::Bundled, &custom);
        assert_eq!(catalog.resolve_theme(Some("dracula")).name, "Dracula");
    }

    #[test]
    fn style_delimiters_are_rejected() {
        let mut theme = Theme::embedded_default().clone();
        theme.colors.badge = "red;}</style>".into();
        assert!(theme.validate().is_err());
        theme.colors.badge = "   ".into();
        assert!(theme.validate().is_err());
    }

    #[test]
    fn external_references_are_rejected() {
        let mut theme = Theme::embedded_default().clone();
        for bad in [
            "url(https://example.com/x.png)",
            "URL(x.png)",
            "red url(x.png)",
            "@import",
            "\\75 rl(x)",
            "image-set(x.png 1x)",
            "#fff !important",
        ] {
            theme.syntax.string = bad.into();
            assert!(theme.validate().is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn color_functions_and_names_are_accepted() {
        let mut theme = Theme::embedded_default().clone();
        for good in ["#a1b2c3", "rebeccapurple", "rgb(255, 0, 0)", "rgba(0 0 0 / 50%)", "HSL(120, 50%, 40%)"] {
            theme.syntax.string = good.into();
            assert!(theme.validate().is_ok(), "{} rejected", good);
        }
    }

    #[test]
    fn catalog_dark_mode_entry_is_the_last_default() {
        let mut value = custom_dracula();
        value["name"] = "My Dark".into();
        let mut custom = BTreeMap::new();
        custom.insert(EMBEDDED_DEFAULT_KEY.to_string(), value);
        let catalog = ThemeCatalog::resolve(&ThemeSource::directory("/nonexistent/cirneco-themes"), &custom);

        assert_eq!(catalog.effective_key(None), EMBEDDED_DEFAULT_KEY);
        assert_eq!(catalog.resolve_theme(None).name, "My Dark");
        assert_eq!(catalog.default_theme(), catalog.get(EMBEDDED_DEFAULT_KEY).unwrap());
    }

    #[test]
    fn empty_catalog_resolves_to_embedded_default() {
        let catalog = ThemeCatalog::from_themes(BTreeMap::new());
        assert_eq!(catalog.resolve_theme(Some("dracula")), Theme::embedded_default());
        assert_eq!(catalog.effective_key(None), EMBEDDED_DEFAULT_KEY);
    }
}
