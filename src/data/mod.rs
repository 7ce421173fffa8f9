/// Data layer: sheet loading, caching, column resolution and lookup.
///
/// Architecture:
/// ```text
///  locator (https://… or file path)
///        │
///        ▼
///   ┌──────────┐     ┌─────────┐
///   │  loader   │────▶│  cache  │  (locator, class) → Arc<Table>, 300 s
///   └──────────┘     └─────────┘
///        │  parse CSV, trim headers, filter on TURMA
///        ▼
///   ┌──────────┐
///   │  columns  │  headers → ColumnMap
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  lookup   │  id → StudentRecord
///   └──────────┘
/// ```

pub mod cache;
pub mod columns;
pub mod filter;
pub mod loader;
pub mod lookup;
pub mod model;
