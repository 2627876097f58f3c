//! End-to-end snippet generation: request → theme → document → PNG on disk

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use log::info;

use crate::compose::{compose, CardStyle};
use crate::config::{ProjectConfig, PROJECT_DIR};
use crate::render;
use crate::theme::{ThemeCatalog, ThemeSource};
use crate::{Error, RenderConfig, RenderSession, Result};

/// Input for one rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Selected code text
    pub code: String,
    /// Editor language identifier (e.g. `javascript`, `shellscript`)
    pub language_id: String,
    /// Explicitly requested theme key; `None` uses the catalog default
    pub theme: Option<String>,
    /// File name shown in the title bar
    pub filename: Option<String>,
    pub style: CardStyle,
}

impl RenderRequest {
    pub fn new(code: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language_id: language_id.into(),
            theme: None,
            filename: None,
            style: CardStyle::default(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_style(mut self, style: CardStyle) -> Self {
        self.style = style;
        self
    }
}

/// A project root that receives configuration and output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Use `root` as the workspace; it must be an existing directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::NoWorkspace(root.to_path_buf()));
        }
        Ok(Self { root: root.to_path_buf() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config(&self) -> ProjectConfig {
        ProjectConfig::load(&self.root)
    }

    /// Build the theme catalog for this workspace.
    pub fn catalog(&self, source: &ThemeSource) -> ThemeCatalog {
        let config = self.config();
        ThemeCatalog::resolve(source, &config.custom_themes).with_default_key(config.default_theme)
    }
}

/// Pipeline settings that do not come from the project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetOptions {
    pub theme_source: ThemeSource,
    pub render: RenderConfig,
}

/// The image written by one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub file_name: String,
    /// Catalog key of the theme the card was drawn with
    pub theme_key: String,
}

/// Output file name: `snippet-[<theme>-]<timestamp>.png`.
///
/// The timestamp is UTC with millisecond precision, `:` and `.` replaced so
/// the name is valid on every filesystem.
pub fn output_file_name(theme_key: Option<&str>, now: DateTime<Utc>) -> String {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true).replace([':', '.'], "-");
    match theme_key {
        Some(key) => format!("snippet-{}-{}.png", sanitize_key(key), timestamp),
        None => format!("snippet-{}.png", timestamp),
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Run the whole pipeline with session type `S`.
pub fn generate_snippet<S: RenderSession>(
    workspace: &Workspace,
    request: &RenderRequest,
    options: &SnippetOptions,
) -> Result<OutputArtifact> {
    if request.code.trim().is_empty() {
        return Err(Error::EmptySelection);
    }

    let catalog = workspace.catalog(&options.theme_source);
    let requested = request.theme.as_deref();
    let theme_key = catalog.effective_key(requested).to_string();
    let theme = catalog.resolve_theme(requested);

    let document = compose(
        &request.code,
        &request.language_id,
        theme,
        request.filename.as_deref(),
        request.style,
    );

    let output_dir = workspace.output_dir();
    std::fs::create_dir_all(&output_dir)?;
    let file_name = output_file_name(requested.map(|_| theme_key.as_str()), Utc::now());
    let path = output_dir.join(&file_name);

    let report = render::render::<S>(&document, &path, &options.render)?;
    info!(
        "Snippet generated: {} ({} bytes, theme {}, viewport {}x{})",
        path.display(),
        report.bytes,
        theme_key,
        report.viewport.width,
        report.viewport.height
    );

    Ok(OutputArtifact { path, file_name, theme_key })
}
