//! Scripted render session used in place of a browser.

#![allow(dead_code)]

use std::cell::RefCell;
use std::time::Duration;

use cirneco::{ElementBox, Error, RenderConfig, RenderSession, RenderedDocument, Result, Viewport};

pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// What the fake browser does at each step
#[derive(Debug, Clone)]
pub struct Script {
    pub fail_open: bool,
    pub element_present: bool,
    pub measured_height: Option<f64>,
    pub fail_capture: bool,
    pub fail_close: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            fail_open: false,
            element_present: true,
            measured_height: Some(412.3),
            fail_capture: false,
            fail_close: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open,
    SetViewport(Viewport),
    Load(usize),
    Measure(String),
    Wait(String),
    Capture(String),
    Close,
}

thread_local! {
    static NEXT_SCRIPT: RefCell<Script> = RefCell::new(Script::default());
    static CALLS: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
}

/// Script the next session opened on this thread.
pub fn script_next(script: Script) {
    NEXT_SCRIPT.with(|s| *s.borrow_mut() = script);
}

/// Calls recorded on this thread, oldest first.
pub fn calls() -> Vec<Call> {
    CALLS.with(|c| c.borrow().clone())
}

pub fn close_count() -> usize {
    calls().iter().filter(|c| **c == Call::Close).count()
}

pub fn viewports() -> Vec<Viewport> {
    calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::SetViewport(v) => Some(v),
            _ => None,
        })
        .collect()
}

fn record(call: Call) {
    CALLS.with(|c| c.borrow_mut().push(call));
}

pub struct FakeSession {
    script: Script,
    loaded: bool,
}

impl FakeSession {
    pub fn new(script: Script) -> Self {
        Self { script, loaded: false }
    }
}

impl RenderSession for FakeSession {
    fn open(_config: &RenderConfig) -> Result<Self> {
        let script = NEXT_SCRIPT.with(|s| s.borrow().clone());
        if script.fail_open {
            return Err(Error::RenderSessionFailure("browser binary not found".into()));
        }
        record(Call::Open);
        Ok(Self::new(script))
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        record(Call::SetViewport(viewport));
        Ok(())
    }

    fn load_document(&mut self, document: &RenderedDocument) -> Result<()> {
        record(Call::Load(document.len()));
        self.loaded = true;
        Ok(())
    }

    fn measure_element(&mut self, selector: &str) -> Result<ElementBox> {
        record(Call::Measure(selector.to_string()));
        if !self.loaded || !self.script.element_present {
            return Err(Error::ElementNotFound(selector.to_string()));
        }
        match self.script.measured_height {
            Some(height) => Ok(ElementBox { width: 800.0, height }),
            None => Err(Error::MeasurementFailed("no box model".into())),
        }
    }

    fn wait_for_element(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
        record(Call::Wait(selector.to_string()));
        if self.script.element_present {
            Ok(())
        } else {
            Err(Error::ElementNotFound(selector.to_string()))
        }
    }

    fn capture_element(&mut self, selector: &str) -> Result<Vec<u8>> {
        record(Call::Capture(selector.to_string()));
        if self.script.fail_capture {
            return Err(Error::RenderSessionFailure("Screenshot failed".into()));
        }
        let mut png = PNG_MAGIC.to_vec();
        png.extend_from_slice(b"fake");
        Ok(png)
    }

    fn close(self) -> Result<()> {
        record(Call::Close);
        if self.script.fail_close {
            return Err(Error::RenderSessionFailure("browser already gone".into()));
        }
        Ok(())
    }
}

/// Render settings with no settle delay.
pub fn fast_config() -> RenderConfig {
    RenderConfig {
        settle_delay_ms: 0,
        ..Default::default()
    }
}
