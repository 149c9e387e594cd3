use anyhow::{anyhow, Context, Result};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::palette::Palette;
use crate::regions::{RegionId, RegionRecord};

/// Forecast day column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaySlot {
    Day1,
    Day2,
}

impl DaySlot {
    pub fn name(&self) -> &'static str {
        match self {
            DaySlot::Day1 => "day1",
            DaySlot::Day2 => "day2",
        }
    }
}

impl FromStr for DaySlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "day1" => Ok(DaySlot::Day1),
            "day2" => Ok(DaySlot::Day2),
            _ => Err(anyhow!("Invalid day slot: {} (use day1 or day2)", s)),
        }
    }
}

/// Day 1 and day 2 categories chosen for one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub day1: Option<String>,
    #[serde(default)]
    pub day2: Option<String>,
}

impl Selection {
    pub fn get(&self, slot: DaySlot) -> Option<&str> {
        match slot {
            DaySlot::Day1 => self.day1.as_deref(),
            DaySlot::Day2 => self.day2.as_deref(),
        }
    }

    /// True when either day is set to `label`
    pub fn matches(&self, label: &str) -> bool {
        self.day1.as_deref() == Some(label) || self.day2.as_deref() == Some(label)
    }
}

/// Per-region forecast selections.
///
/// Only labels from the palette the map was built with are accepted.
#[derive(Debug, Clone, Default)]
pub struct SelectionMap {
    options: Vec<String>,
    entries: HashMap<RegionId, Selection>,
}

impl SelectionMap {
    /// Empty map accepting the palette's labels
    pub fn new(palette: &Palette) -> Self {
        Self {
            options: palette.options().iter().map(|s| s.to_string()).collect(),
            entries: HashMap::new(),
        }
    }

    /// Every region starts on the first palette option for both days
    pub fn initialized(regions: &[RegionRecord], palette: &Palette) -> Self {
        let mut map = Self::new(palette);
        let default = palette.first().map(|s| s.to_string());
        for region in regions {
            map.entries.insert(
                region.id(),
                Selection {
                    day1: default.clone(),
                    day2: default.clone(),
                },
            );
        }
        map
    }

    pub fn get(&self, id: &str) -> Option<&Selection> {
        self.entries.get(id)
    }

    /// Record a user choice for one region and day
    pub fn set(&mut self, id: &RegionId, slot: DaySlot, label: &str) -> Result<()> {
        if !self.options.iter().any(|o| o == label) {
            return Err(anyhow!("Unknown category '{}' for {} {}", label, id, slot.name()));
        }

        let entry = self.entries.entry(id.clone()).or_default();
        match slot {
            DaySlot::Day1 => entry.day1 = Some(label.to_string()),
            DaySlot::Day2 => entry.day2 = Some(label.to_string()),
        }

        debug!("Set {} {} to '{}'", id, slot.name(), label);
        Ok(())
    }

    /// Apply overrides from a JSON object keyed by region id, e.g.
    /// `{"Haryana:Sirsa": {"day1": "Moderate Fog"}}`.
    ///
    /// Every region id must already be in the map and every label in the
    /// palette; both are checked before anything is written. Returns the
    /// number of day values applied.
    pub fn apply_json(&mut self, json: &str) -> Result<usize> {
        let overrides: HashMap<RegionId, Selection> =
            serde_json::from_str(json).context("Failed to parse selection overrides")?;

        let mut updates = Vec::new();
        for (id, selection) in &overrides {
            if !self.entries.contains_key(id) {
                return Err(anyhow!("Unknown region '{}' in selection overrides", id));
            }
            for slot in [DaySlot::Day1, DaySlot::Day2] {
                if let Some(label) = selection.get(slot) {
                    if !self.options.iter().any(|o| o == label) {
                        return Err(anyhow!("Unknown category '{}' for {} {}", label, id, slot.name()));
                    }
                    updates.push((id.clone(), slot, label.to_string()));
                }
            }
        }

        for (id, slot, label) in &updates {
            self.set(id, *slot, label)?;
        }

        info!("Applied {} selection overrides", updates.len());
        Ok(updates.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
