//! Aviation sustainability figures: an iterative aircraft fuel-mass
//! estimator, supply-chain path counts, and the table transforms and
//! chart recipes that turn them into figures.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod figures;
pub mod fuel;
pub mod paths;
pub mod render;

pub use error::{FigureError, Result};
