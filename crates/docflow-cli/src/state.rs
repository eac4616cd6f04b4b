//! Workspace snapshot files.

use std::fs;
use std::path::Path;

use anyhow::Context;
use docflow_core::{Workspace, WorkspaceSnapshot};

use crate::TRACING_TARGET_STATE;
use crate::seed::demo_snapshot;

/// Loads the workspace from `path`, or the demo workspace when no path is given.
pub fn load_workspace(path: Option<&Path>) -> anyhow::Result<Workspace> {
    let snapshot = match path {
        Some(path) => load_snapshot(path)?,
        None => {
            tracing::debug!(target: TRACING_TARGET_STATE, "Using demo workspace");
            demo_snapshot().context("failed to build demo workspace")?
        }
    };

    Ok(Workspace::new(snapshot))
}

/// Reads a snapshot file.
pub fn load_snapshot(path: &Path) -> anyhow::Result<WorkspaceSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot: WorkspaceSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    tracing::debug!(
        target: TRACING_TARGET_STATE,
        path = %path.display(),
        documents = snapshot.documents.len(),
        workflows = snapshot.workflows.len(),
        runs = snapshot.runs.len(),
        "Loaded workspace snapshot"
    );

    Ok(snapshot)
}

/// Writes a snapshot file, replacing it atomically.
pub fn save_snapshot(path: &Path, snapshot: &WorkspaceSnapshot) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(snapshot).context("failed to serialize workspace")?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;

    tracing::info!(
        target: TRACING_TARGET_STATE,
        path = %path.display(),
        documents = snapshot.documents.len(),
        workflows = snapshot.workflows.len(),
        "Saved workspace snapshot"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        let snapshot = demo_snapshot().unwrap();

        save_snapshot(&path, &snapshot).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), snapshot);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_without_path_uses_demo() {
        let workspace = load_workspace(None).unwrap();
        assert_eq!(workspace.documents().len(), 2);
        assert_eq!(workspace.workflows().len(), 2);
    }

    #[test]
    fn test_load_rejects_unknown_enum_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        let raw = r#"{
            "workflows": [{
                "id": "00000000-0000-0000-0000-000000000001",
                "name": "Bad",
                "active": true,
                "trigger": "on_email"
            }]
        }"#;
        fs::write(&path, raw).unwrap();

        assert!(load_snapshot(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_workspace(Some(&dir.path().join("missing.json"))).is_err());
    }
}
