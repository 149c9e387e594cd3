//! Fog and cloud forecast bulletin core.
//!
//! Classifies visibility (or cloud cover) readings into severity categories,
//! groups forecast regions by state for the district table, filters the table
//! by category and assembles a render-ready bulletin snapshot.

pub mod aggregator;
pub mod bulletin;
pub mod classifier;
pub mod config;
pub mod dates;
pub mod palette;
pub mod regions;
pub mod selection;

pub use aggregator::{filter, group, GroupedRow, GroupedView, StateGroup};
pub use bulletin::{map_fills, Bulletin, RegionFill};
pub use classifier::{Bucket, ClassificationRow, Classifier};
pub use config::BulletinConfig;
pub use palette::{Category, LegendEntry, Palette};
pub use regions::{normalize_key, RegionCatalog, RegionId, RegionRecord};
pub use selection::{DaySlot, Selection, SelectionMap};
