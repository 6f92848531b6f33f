//! Figure recipes. Each turns computed or loaded data into a [`ChartSpec`]
//! that the render layer draws and exports.
//!
//! ```text
//!  fuel::FuelEstimator ──► aircraft::fuel_convergence
//!                          aircraft::payload_range
//!  paths::table ─────────► lca::paths_in_graph
//!  data::loader ─────────► trends::{learning_curves, emissions_by_distance, relative_change}
//! ```

pub mod aircraft;
pub mod lca;
pub mod trends;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;

use crate::config::FigureConfig;
use crate::data::loader::{load_dir, load_file};
use crate::fuel::{FuelEstimator, Mission};
use crate::render::ChartSpec;

pub use aircraft::{fuel_convergence, payload_range};
pub use lca::paths_in_graph;
pub use trends::{emissions_by_distance, learning_curves, relative_change};

/// Mission of the convergence figure: 177 pax, 110 kg each, over 6654 km.
pub const REFERENCE_MISSION: (f64, u32, f64, f64) = (55_912.87, 177, 110.0, 6654.0);
/// Largest sector count and path order of the path-count figure.
pub const PATHS_MAX_SECTORS: u32 = 30;
pub const PATHS_ORDER: u32 = 5;
pub const BASE_YEAR: i32 = 1950;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FigureKind {
    FuelConvergence,
    PayloadRange,
    PathsInGraph,
    LearningCurves,
    EmissionsByDistance,
    RelativeChange,
}

impl FigureKind {
    pub const ALL: [FigureKind; 6] = [
        FigureKind::FuelConvergence,
        FigureKind::PayloadRange,
        FigureKind::PathsInGraph,
        FigureKind::LearningCurves,
        FigureKind::EmissionsByDistance,
        FigureKind::RelativeChange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FigureKind::FuelConvergence => "fuel-convergence",
            FigureKind::PayloadRange => "payload-range",
            FigureKind::PathsInGraph => "paths-in-graph",
            FigureKind::LearningCurves => "learning-curves",
            FigureKind::EmissionsByDistance => "emissions-by-distance",
            FigureKind::RelativeChange => "relative-change",
        }
    }

    /// Default output directory name; the figure file is named after it.
    pub fn dir_name(self) -> &'static str {
        match self {
            FigureKind::FuelConvergence => "fuel_calc_recursive",
            FigureKind::PayloadRange => "a350_payload_range",
            FigureKind::PathsInGraph => "number_of_paths_in_graph",
            FigureKind::LearningCurves => "learning_curves",
            FigureKind::EmissionsByDistance => "co2_emissions_by_distance",
            FigureKind::RelativeChange => "relative_change",
        }
    }

    /// What `--data` has to point at, if anything.
    pub fn data_input(self) -> Option<DataInput> {
        match self {
            FigureKind::LearningCurves => Some(DataInput::Directory),
            FigureKind::EmissionsByDistance | FigureKind::RelativeChange => Some(DataInput::File),
            _ => None,
        }
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FigureKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FigureKind::ALL
            .into_iter()
            .find(|k| k.name() == s || k.dir_name() == s)
            .ok_or_else(|| format!("unknown figure '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataInput {
    /// A directory of CSV files, one series per file.
    Directory,
    /// A single CSV file.
    File,
}

/// Build the chart for `kind`, loading `data` when the recipe needs it.
pub fn build(kind: FigureKind, data: Option<&Path>, config: &FigureConfig) -> Result<ChartSpec> {
    if let (Some(_), None) = (kind.data_input(), data) {
        bail!("figure '{kind}' needs --data");
    }

    let spec = match kind {
        FigureKind::FuelConvergence => {
            let (oew, pax, kg_per_pax, distance) = REFERENCE_MISSION;
            let mission = Mission::new(oew, pax, kg_per_pax, distance)?;
            let estimate = FuelEstimator::with_settings(config.estimator_settings()).estimate(&mission)?;
            fuel_convergence(&estimate, config.fuel_density_kg_per_l)
        }
        FigureKind::PayloadRange => payload_range()?,
        FigureKind::PathsInGraph => paths_in_graph(PATHS_MAX_SECTORS, PATHS_ORDER)?,
        FigureKind::LearningCurves => {
            let dir = data.context("learning curves need a data directory")?;
            learning_curves(&load_dir(dir)?)?
        }
        FigureKind::EmissionsByDistance => {
            let file = data.context("emissions by distance need a data file")?;
            emissions_by_distance(&load_file(file)?)?
        }
        FigureKind::RelativeChange => {
            let file = data.context("relative change needs a data file")?;
            relative_change(&load_file(file)?, BASE_YEAR)?
        }
    };
    log::debug!("built '{kind}' with {} series", spec.series.len());
    Ok(spec)
}
