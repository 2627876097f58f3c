//! Cirneco
//!
//! Turns a block of source code into a "snippet card": a rounded window
//! mockup with traffic-light dots, a language badge, an optional filename
//! title and syntax-highlighted code, rendered in headless Chrome and saved
//! as a PNG.
//!
//! # Pipeline
//!
//! - **Theme store** ([`theme`]): built-in manifest + project custom themes,
//!   merged into a [`ThemeCatalog`] once per invocation
//! - **Language mapper** ([`language`]): editor language id → grammar key
//! - **Compositor** ([`compose`]): highlighted code + theme → one
//!   self-contained HTML document
//! - **Render driver** ([`render`]): probe pass, viewport resize, commit pass,
//!   element capture, over any [`RenderSession`] backend
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cdp")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cirneco::{RenderRequest, SnippetOptions, Workspace};
//!
//! let workspace = Workspace::open(".")?;
//! let request = RenderRequest::new("let x = 1;", "javascript");
//! let artifact = cirneco::generate_snippet(&workspace, &request, &SnippetOptions::default())?;
//! println!("Wrote {}", artifact.path.display());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "cdp"))]
//! # fn main() {}
//! ```

use std::path::PathBuf;
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod compose;
pub mod config;
pub mod highlight;
pub mod language;
pub mod render;
pub mod snippet;
pub mod theme;

// Async facade: one render per call on a dedicated worker thread
pub mod async_api;

#[cfg(feature = "cdp")]
pub mod cdp;

pub use compose::{CardStyle, RenderedDocument};
pub use config::ProjectConfig;
pub use highlight::Highlight;
pub use snippet::{OutputArtifact, RenderRequest, SnippetOptions, Workspace};
pub use theme::{Theme, ThemeCatalog, ThemeSource};

/// Settings for the render driver
///
/// The defaults reproduce the card layout the document templates are designed
/// for: an 800px card centered in a 920px wide viewport at 2x device scale.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Viewport width in CSS pixels (both passes)
    pub viewport_width: u32,
    /// Viewport height used for the probe pass
    pub probe_height: u32,
    /// Device pixel ratio (both passes)
    pub device_scale_factor: f64,
    /// Added to the measured content height for the commit pass
    pub padding: u32,
    /// Wait after loading the probe document before measuring
    pub settle_delay_ms: u64,
    /// How long the commit pass waits for the content element
    pub element_timeout_ms: u64,
    /// Selector of the element that is measured and captured
    pub selector: String,
    /// Browser executable; `None` lets the backend discover one
    pub browser_path: Option<PathBuf>,
    /// Whether the browser runs with its sandbox enabled
    pub sandbox: bool,
}

impl RenderConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    /// Viewport of the probe pass.
    pub fn probe_viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.probe_height,
            device_scale_factor: self.device_scale_factor,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport_width: 920,
            probe_height: 600,
            device_scale_factor: 2.0,
            padding: 120,
            settle_delay_ms: 1000,
            element_timeout_ms: 10_000,
            selector: compose::CONTENT_SELECTOR.to_string(),
            browser_path: None,
            sandbox: true,
        }
    }
}

/// Viewport dimensions and device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

/// Rendered size of an element in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub width: f64,
    pub height: f64,
}

/// A live headless rendering session
///
/// The render driver owns one session per invocation and always ends it with
/// [`RenderSession::close`], whatever happened in between.
pub trait RenderSession {
    /// Start an isolated session
    fn open(config: &RenderConfig) -> Result<Self>
    where
        Self: Sized;

    /// Apply viewport size and device pixel ratio
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Load a composed document, replacing whatever was shown before
    fn load_document(&mut self, document: &RenderedDocument) -> Result<()>;

    /// Measure the element matching `selector`.
    ///
    /// Fails with [`Error::ElementNotFound`] when nothing matches and
    /// [`Error::MeasurementFailed`] when the box cannot be read.
    fn measure_element(&mut self, selector: &str) -> Result<ElementBox>;

    /// Block until the element matching `selector` is present and visible
    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Capture exactly the element matching `selector` as PNG bytes
    fn capture_element(&mut self, selector: &str) -> Result<Vec<u8>>;

    /// End the session and release the browser process
    fn close(self) -> Result<()>;
}

/// Generate a snippet with the headless Chrome backend.
#[cfg(feature = "cdp")]
pub fn generate_snippet(workspace: &Workspace, request: &RenderRequest, options: &SnippetOptions) -> Result<OutputArtifact> {
    snippet::generate_snippet::<cdp::CdpSession>(workspace, request, options)
}
