// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Snapshot publication: serialize to JSON and atomically replace the target
//! file so readers never observe a half-written snapshot.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use gridion_types::GridSnapshot;

pub fn publish_snapshot(snapshot: &GridSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot).context("Failed to serialize snapshot")?;

    // The temp file must live on the same filesystem as the target for the
    // rename to stay atomic.
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
        .context("Failed to create temporary snapshot file")?;
    tmp.write_all(&json)
        .context("Failed to write snapshot")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move snapshot into place at {}", path.display()))?;

    debug!("published snapshot to {}", path.display());
    Ok(())
}
