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

/// One Demand Flexibility Service requirement window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfsRequirement {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub required_mw: f64,
    pub requirement_type: String,
    pub dispatch_type: String,
    pub participants_eligible: Vec<String>,
}

/// The most recent DFS requirement records (upstream-sorted, at most ten)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfsRequirements {
    pub requirements: Vec<DfsRequirement>,
}
