/// Data layer: core types, loading, filtering and reshaping.
///
/// Architecture:
/// ```text
///   data/*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  rows of CellValue, unique values per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / range predicates → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform │  units, normalisation, interpolation, fits, bins
///   └───────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod transform;
