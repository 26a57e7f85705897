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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Warning types that signal margin stress on the grid
const MARGIN_STRESS_TYPES: [&str; 2] = ["ELECTRICITY MARGIN NOTICE", "CAPACITY MARKET NOTICE"];

/// One published system warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemWarning {
    pub warning_type: String,
    pub publish_time: DateTime<Utc>,
    pub text: String,
}

impl SystemWarning {
    /// Margin-stress warnings are the ones presentation surfaces alert on
    pub fn is_margin_stress(&self) -> bool {
        let upper = self.warning_type.to_uppercase();
        MARGIN_STRESS_TYPES.iter().any(|t| upper.contains(t))
    }

    /// The feed carries no structured resolution field; cancellation is
    /// announced inside the warning text itself.
    pub fn is_resolved(&self) -> bool {
        let upper = self.text.to_uppercase();
        upper.contains("CANCELLED") || upper.contains("WITHDRAWN")
    }
}

/// All currently published warnings, newest first as upstream returns them.
///
/// `current` is the newest unresolved margin-stress warning, or None when the
/// grid is quiet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemWarnings {
    pub current: Option<SystemWarning>,
    pub warnings: Vec<SystemWarning>,
}

impl SystemWarnings {
    /// Build from the upstream list, deriving `current`
    pub fn from_warnings(warnings: Vec<SystemWarning>) -> Self {
        let current = warnings
            .iter()
            .find(|w| w.is_margin_stress() && !w.is_resolved())
            .cloned();
        Self { current, warnings }
    }
}
