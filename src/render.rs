//! Render driver: the two-pass probe/commit sizing protocol
//!
//! The content height depends on code length and wrapping, so it is only known
//! after layout. The probe pass lays the document out in a fixed viewport and
//! measures the card; the commit pass reloads it in a viewport of
//! `ceil(height) + padding` and captures the card element. The screenshot step
//! never reports clipping, so the padding errs on the large side.

use std::path::Path;

use log::{debug, warn};

use crate::compose::RenderedDocument;
use crate::{ElementBox, Error, RenderConfig, RenderSession, Result, Viewport};

/// What a completed render did
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    /// Card size measured in the probe pass
    pub probe: ElementBox,
    /// Viewport used for the commit pass
    pub viewport: Viewport,
    /// Size of the written PNG
    pub bytes: usize,
}

/// Commit-pass viewport height for a measured content height.
pub fn second_pass_height(measured_height: f64, padding: u32) -> u32 {
    let height = measured_height.max(0.0).ceil();
    (height as u32).saturating_add(padding)
}

/// Open a session of type `S` and run the protocol, writing the PNG to `output`.
pub fn render<S: RenderSession>(document: &RenderedDocument, output: &Path, config: &RenderConfig) -> Result<RenderReport> {
    debug!("Opening render session");
    let session = S::open(config)?;
    render_in(session, document, output, config)
}

/// Run the protocol in an already opened session.
///
/// The session is closed exactly once on every path. A close failure after a
/// successful capture is logged; the PNG is already on disk.
pub fn render_in<S: RenderSession>(
    mut session: S,
    document: &RenderedDocument,
    output: &Path,
    config: &RenderConfig,
) -> Result<RenderReport> {
    let outcome = run_passes(&mut session, document, output, config);

    match session.close() {
        Ok(()) => debug!("Render session closed"),
        Err(e) => warn!("Failed to close render session: {}", e),
    }

    outcome
}

fn run_passes<S: RenderSession>(
    session: &mut S,
    document: &RenderedDocument,
    output: &Path,
    config: &RenderConfig,
) -> Result<RenderReport> {
    // Probe
    let probe_viewport = config.probe_viewport();
    session.set_viewport(probe_viewport)?;
    session.load_document(document)?;
    std::thread::sleep(config.settle_delay());

    let probe = session.measure_element(&config.selector)?;
    if !probe.height.is_finite() || probe.height <= 0.0 {
        return Err(Error::MeasurementFailed(format!(
            "element '{}' reported height {}",
            config.selector, probe.height
        )));
    }

    // Commit
    let viewport = Viewport {
        height: second_pass_height(probe.height, config.padding),
        ..probe_viewport
    };
    debug!(
        "Probe measured {:.1}x{:.1}; commit viewport {}x{} @{}x",
        probe.width, probe.height, viewport.width, viewport.height, viewport.device_scale_factor
    );
    session.set_viewport(viewport)?;
    session.load_document(document)?;
    session.wait_for_element(&config.selector, config.element_timeout())?;

    let png = session.capture_element(&config.selector)?;
    std::fs::write(output, &png)?;

    Ok(RenderReport { probe, viewport, bytes: png.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_ceiled_then_padded() {
        assert_eq!(second_pass_height(412.0, 120), 532);
        assert_eq!(second_pass_height(412.01, 120), 533);
        assert_eq!(second_pass_height(0.4, 0), 1);
    }

    #[test]
    fn negative_height_is_treated_as_zero() {
        assert_eq!(second_pass_height(-5.0, 120), 120);
    }
}
