use std::thread;

use tokio::sync::oneshot;

use crate::snippet::{self, OutputArtifact, RenderRequest, SnippetOptions, Workspace};
use crate::{Error, RenderSession, Result};

/// Run one snippet generation on a dedicated worker thread and await it.
///
/// Rendering blocks on the browser (and on a fixed settle delay), so it is
/// kept off the async executor. Each call gets its own thread and session;
/// nothing is queued or shared between calls, and a started render cannot be
/// cancelled.
pub async fn generate_snippet_with<S: RenderSession + 'static>(
    workspace: Workspace,
    request: RenderRequest,
    options: SnippetOptions,
) -> Result<OutputArtifact> {
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name("cirneco-render".to_string())
        .spawn(move || {
            let res = snippet::generate_snippet::<S>(&workspace, &request, &options);
            let _ = tx.send(res);
        })
        .map_err(|e| Error::RenderSessionFailure(format!("Failed to spawn render worker: {}", e)))?;

    rx.await
        .map_err(|e| Error::Other(format!("Render worker canceled: {}", e)))?
}

/// [`generate_snippet_with`] using headless Chrome.
#[cfg(feature = "cdp")]
pub async fn generate_snippet(workspace: Workspace, request: RenderRequest, options: SnippetOptions) -> Result<OutputArtifact> {
    generate_snippet_with::<crate::cdp::CdpSession>(workspace, request, options).await
}
