/// Data layer: core types, loading, filtering, and derived views.
///
/// Architecture:
/// ```text
///  .parquet / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PlayerDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ PlayerDataset  │  Vec<PlayerSeasonRecord>, league index
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  position + minutes → FilteredSet
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  league counts, scatter pairs, reference diagonal
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
