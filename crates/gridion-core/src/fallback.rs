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

//! The fallback-aware fetch wrapper.
//!
//! Upstream datasets fail independently (rate limits, transient 5xx, schema
//! drift); one bad dataset must neither blank out an otherwise healthy
//! snapshot nor crash the periodic pass. The error enum is matched
//! exhaustively: there is no catch-all recovery path to hide behind.

use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::{error, warn};

use gridion_sources::{SourceError, SourceResult};

use crate::error::RefreshError;
use crate::scheduler::{Category, CategoryScheduler};

/// Distinguishes a fresh fetch from a carried-over value so the caller knows
/// whether to advance the scheduler timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fresh(T),
    Carried(Option<T>),
}

impl<T> FetchOutcome<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            FetchOutcome::Fresh(value) => Some(value),
            FetchOutcome::Carried(value) => value,
        }
    }
}

/// Run one source fetch, degrading to the previous value on any recoverable
/// failure. Only `InvalidAuth` escapes: that is a configuration problem the
/// operator has to fix, and serving stale data would mask it.
pub async fn fetch_with_fallback<T, F>(
    label: &str,
    previous: Option<T>,
    fetch: F,
) -> Result<FetchOutcome<T>, RefreshError>
where
    F: Future<Output = SourceResult<T>>,
{
    match fetch.await {
        Ok(value) => Ok(FetchOutcome::Fresh(value)),
        Err(SourceError::InvalidAuth) => {
            error!("{label}: credential rejected, aborting refresh pass");
            Err(RefreshError::InvalidAuth)
        }
        Err(e @ SourceError::UnexpectedData(_)) => {
            warn!("{label}: {e}; keeping previous value");
            Ok(FetchOutcome::Carried(previous))
        }
        Err(e @ SourceError::UnexpectedStatusCode { .. }) => {
            warn!("{label}: {e}; keeping previous value");
            Ok(FetchOutcome::Carried(previous))
        }
        Err(e @ SourceError::Http(_)) => {
            warn!("{label}: {e}; keeping previous value");
            Ok(FetchOutcome::Carried(previous))
        }
    }
}

/// Due-check plus fetch-with-fallback plus scheduler bookkeeping for one
/// single-value category. Not-due categories carry over untouched; only a
/// fresh result advances the timestamp.
pub async fn refresh_category<T, F>(
    scheduler: &mut CategoryScheduler,
    category: Category,
    now: DateTime<Utc>,
    previous: Option<T>,
    fetch: F,
) -> Result<Option<T>, RefreshError>
where
    F: Future<Output = SourceResult<T>>,
{
    if !scheduler.is_due(category, now) {
        return Ok(previous);
    }

    match fetch_with_fallback(category.key(), previous, fetch).await? {
        FetchOutcome::Fresh(value) => {
            scheduler.mark_updated(category, now);
            Ok(Some(value))
        }
        FetchOutcome::Carried(value) => Ok(value),
    }
}
