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

//! Error taxonomy shared by every source client.
//!
//! The enum is closed on purpose: the refresh orchestrator matches it
//! exhaustively to decide between "fall back to the cached value" and
//! "abort the pass". Only `InvalidAuth` ever crosses the category boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Credential rejected by a keyed endpoint. Never recovered via fallback;
    /// the whole refresh pass aborts so a re-authentication can be surfaced.
    #[error("API credential rejected")]
    InvalidAuth,

    /// Upstream answered with a non-success status code
    #[error("unexpected status code {status} from {source_name}")]
    UnexpectedStatusCode { source_name: String, status: u16 },

    /// Response arrived but its shape or content violates expectations
    #[error("unexpected data: {0}")]
    UnexpectedData(String),

    /// Connection-level failure, including timeouts
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

impl SourceError {
    /// Shorthand for shape violations
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedData(message.into())
    }
}
