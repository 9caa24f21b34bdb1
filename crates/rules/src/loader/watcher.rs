//! Filesystem watcher that signals changes in the custom config directory.

use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::error::Result;

/// Watch `dir` and send `()` whenever its contents change.
///
/// The returned watcher must be kept alive for notifications to flow.
/// Hidden entries are not filtered: ConfigMap updates land as a swap of the
/// hidden `..data` symlink.
pub fn watch_dir(dir: &Path, changes: UnboundedSender<()>) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
        match res {
            Ok(event) if is_relevant(&event) => {
                debug!(kind = ?event.kind, paths = ?event.paths, "custom config directory changed");
                let _ = changes.send(());
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "filesystem watcher error"),
        }
    })?;

    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    info!(path = %dir.display(), "watching custom config directory for changes");
    Ok(watcher)
}

/// Only content-affecting events trigger rediscovery.
pub(crate) fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
