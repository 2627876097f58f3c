//! Chrome DevTools Protocol session (uses the `headless_chrome` crate)

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::{Browser, LaunchOptions};
use log::debug;

use crate::compose::RenderedDocument;
use crate::{ElementBox, Error, RenderConfig, RenderSession, Result, Viewport};

/// Headless Chrome session: one browser process, one tab
///
/// Documents are written straight into a blank frame with
/// `Page.setDocumentContent`, so nothing is served or written to disk before
/// the capture.
pub struct CdpSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl RenderSession for CdpSession {
    fn open(config: &RenderConfig) -> Result<Self>
    where
        Self: Sized,
    {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(config.sandbox)
            .path(config.browser_path.clone())
            .window_size(Some((config.viewport_width, config.probe_height)))
            .build()
            .map_err(|e| Error::RenderSessionFailure(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::RenderSessionFailure(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::RenderSessionFailure(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        // Built from JSON so optional protocol fields stay at their defaults.
        let metrics: Emulation::SetDeviceMetricsOverride = serde_json::from_value(serde_json::json!({
            "width": viewport.width,
            "height": viewport.height,
            "deviceScaleFactor": viewport.device_scale_factor,
            "mobile": false,
        }))
        .map_err(|e| Error::RenderSessionFailure(format!("Invalid device metrics: {}", e)))?;

        self.tab
            .call_method(metrics)
            .map_err(|e| Error::RenderSessionFailure(format!("Failed to set viewport: {}", e)))?;
        Ok(())
    }

    fn load_document(&mut self, document: &RenderedDocument) -> Result<()> {
        // Content is written into a blank frame; its size is not bounded by URL limits.
        self.tab
            .navigate_to("about:blank")
            .map_err(|e| Error::RenderSessionFailure(format!("Navigation failed: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::RenderSessionFailure(format!("Wait for navigation failed: {}", e)))?;

        let frame_id = self
            .tab
            .call_method(Page::GetFrameTree(None))
            .map_err(|e| Error::RenderSessionFailure(format!("Failed to read frame tree: {}", e)))?
            .frame_tree
            .frame
            .id;

        self.tab
            .call_method(Page::SetDocumentContent {
                frame_id,
                html: document.as_str().to_string(),
            })
            .map_err(|e| Error::RenderSessionFailure(format!("Failed to set document content: {}", e)))?;
        Ok(())
    }

    fn measure_element(&mut self, selector: &str) -> Result<ElementBox> {
        let element = self.tab.find_element(selector).map_err(|e| {
            debug!("find_element({}) failed: {}", selector, e);
            Error::ElementNotFound(selector.to_string())
        })?;

        let model = element
            .get_box_model()
            .map_err(|e| Error::MeasurementFailed(e.to_string()))?;

        Ok(ElementBox { width: model.width, height: model.height })
    }

    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| {
                debug!("wait_for_element({}) failed: {}", selector, e);
                Error::ElementNotFound(selector.to_string())
            })
    }

    fn capture_element(&mut self, selector: &str) -> Result<Vec<u8>> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| Error::ElementNotFound(selector.to_string()))?;

        // Border box, so the card's outline and rounded corners are kept.
        let clip = element
            .get_box_model()
            .map_err(|e| Error::MeasurementFailed(e.to_string()))?
            .border_viewport();

        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| Error::RenderSessionFailure(format!("Screenshot failed: {}", e)))
    }

    fn close(self) -> Result<()> {
        // Dropping the browser terminates the child process.
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdp_session_creation() {
        // This test requires Chrome to be installed, so we skip it in CI
        if std::env::var("CI").is_ok() {
            return;
        }
        let result = CdpSession::open(&RenderConfig::default());
        match result {
            Ok(session) => assert!(session.close().is_ok()),
            Err(e) => eprintln!("Skipping CDP session test because Chrome is not available or failed to launch: {}", e),
        }
    }
}
