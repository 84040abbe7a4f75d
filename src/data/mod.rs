//! Data layer: fetching, parsing, splitting and caching.
//!
//! Architecture:
//! ```text
//!   remote URL
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  fetch    │  download once → <cache_dir>/housing.data
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  parser   │  whitespace / csv → RawTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  split    │  shuffle → train / val rows
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐       ┌──────────┐
//!   │  loader   │ ◀───▶ │  cache    │  <cache_dir>/<partition>.parquet
//!   └──────────┘       └──────────┘
//! ```

pub mod cache;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod parser;
pub mod split;
