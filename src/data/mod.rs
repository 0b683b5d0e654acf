/// Data layer: table model, loading, cleaning, charting and export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → DataTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean   │  drop duplicates, fill missing numbers with the column mean
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ DataTable │  select_indices → user-chosen subset
///   └───────────┘
///        │            │
///        ▼            ▼
///   ┌──────────┐  ┌──────────┐
///   │  export  │  │  chart   │
///   └──────────┘  └──────────┘
/// ```

pub mod chart;
pub mod clean;
pub mod export;
pub mod loader;
pub mod model;
