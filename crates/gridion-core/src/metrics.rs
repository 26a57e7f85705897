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

//! Pure arithmetic over a merged generation record.
//!
//! Callers must only hand over records that passed the source client's
//! zero-fuel validity check; `total_generation` is nonzero for any such
//! record.

use gridion_types::GridGeneration;

/// `subset / total * 100`, rounded to two decimals
pub fn percentage(subset: i64, total: i64) -> f64 {
    debug_assert!(total != 0, "percentage over an unvalidated generation record");
    (subset as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

/// Fill in `total_generation_mwh` and the five percentage figures.
///
/// Pumped storage and interconnector flows are transfers, not primary
/// generation, and stay out of the total.
pub fn apply_derived(generation: &mut GridGeneration) {
    generation.total_generation_mwh = generation.gas_mwh
        + generation.oil_mwh
        + generation.coal_mwh
        + generation.biomass_mwh
        + generation.nuclear_mwh
        + generation.wind_mwh
        + generation.solar_mwh
        + generation.hydro_mwh
        + generation.other_mwh;

    let total = generation.total_generation_mwh;

    generation.fossil_fuel_percentage = percentage(
        generation.gas_mwh + generation.oil_mwh + generation.coal_mwh,
        total,
    );
    generation.renewable_percentage = percentage(
        generation.solar_mwh + generation.wind_mwh + generation.hydro_mwh,
        total,
    );
    generation.low_carbon_percentage = percentage(
        generation.solar_mwh + generation.wind_mwh + generation.hydro_mwh + generation.nuclear_mwh,
        total,
    );
    generation.low_carbon_with_biomass_percentage = percentage(
        generation.solar_mwh
            + generation.wind_mwh
            + generation.hydro_mwh
            + generation.nuclear_mwh
            + generation.biomass_mwh,
        total,
    );
    generation.other_percentage = percentage(
        generation.nuclear_mwh + generation.biomass_mwh + generation.other_mwh,
        total,
    );
}

/// Everything feeding the grid right now: primary generation plus pumped
/// storage plus every interconnector flow.
pub fn total_demand(generation: &GridGeneration) -> i64 {
    generation.total_generation_mwh + generation.pumped_storage_mwh + generation.interconnector_mwh()
}

/// Interconnector flows plus pumped storage
pub fn total_transfers(generation: &GridGeneration) -> i64 {
    generation.interconnector_mwh() + generation.pumped_storage_mwh
}
