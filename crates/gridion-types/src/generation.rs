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

/// Instantaneous fuel-mix generation figures merged from the transmission-level
/// feed and the embedded (distribution-level) wind/solar estimates, plus the
/// derived totals and percentages computed over the merged record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeneration {
    pub gas_mwh: i64,     // ccgt + ocgt
    pub oil_mwh: i64,     // oil
    pub coal_mwh: i64,    // coal
    pub biomass_mwh: i64, // biomass
    pub nuclear_mwh: i64, // nuclear

    /// National plus embedded wind combined
    pub wind_mwh: i64,
    /// Wind plugged into the national transmission network
    pub national_wind_mwh: i64,
    /// Wind plugged into local distribution networks
    pub embedded_wind_mwh: i64,

    pub solar_mwh: i64,
    pub pumped_storage_mwh: i64, // ps - pumped storage
    pub hydro_mwh: i64,          // npshyd - non pumped storage hydro plant
    pub other_mwh: i64,          // other - undefined

    pub france_mwh: i64,      // intfr ( IFA ) + intelec ( ElecLink ) + intifa2 ( IFA2 )
    pub ireland_mwh: i64,     // intirl ( Moyle ) + intew ( East-West ) + intgrnl ( Greenlink )
    pub netherlands_mwh: i64, // intned ( BritNed )
    pub belgium_mwh: i64,     // intnem ( Nemo )
    pub norway_mwh: i64,      // intnsl ( North Sea Link )
    pub denmark_mwh: i64,     // intvkl ( Viking Link )

    /// Sum of primary generation; excludes pumped storage and interconnectors
    pub total_generation_mwh: i64,
    pub fossil_fuel_percentage: f64,
    pub renewable_percentage: f64,
    pub low_carbon_percentage: f64,
    pub low_carbon_with_biomass_percentage: f64,
    pub other_percentage: f64,

    /// Publish time of the newest source data point
    pub grid_collection_time: DateTime<Utc>,
}

impl GridGeneration {
    /// Empty record anchored at the given collection time; fuel figures are
    /// filled in by the source client, derived figures by the calculator.
    pub fn empty(grid_collection_time: DateTime<Utc>) -> Self {
        Self {
            gas_mwh: 0,
            oil_mwh: 0,
            coal_mwh: 0,
            biomass_mwh: 0,
            nuclear_mwh: 0,
            wind_mwh: 0,
            national_wind_mwh: 0,
            embedded_wind_mwh: 0,
            solar_mwh: 0,
            pumped_storage_mwh: 0,
            hydro_mwh: 0,
            other_mwh: 0,
            france_mwh: 0,
            ireland_mwh: 0,
            netherlands_mwh: 0,
            belgium_mwh: 0,
            norway_mwh: 0,
            denmark_mwh: 0,
            total_generation_mwh: 0,
            fossil_fuel_percentage: 0.0,
            renewable_percentage: 0.0,
            low_carbon_percentage: 0.0,
            low_carbon_with_biomass_percentage: 0.0,
            other_percentage: 0.0,
            grid_collection_time,
        }
    }

    /// Sum of the interconnector flows only
    pub fn interconnector_mwh(&self) -> i64 {
        self.france_mwh
            + self.ireland_mwh
            + self.netherlands_mwh
            + self.belgium_mwh
            + self.norway_mwh
            + self.denmark_mwh
    }
}
