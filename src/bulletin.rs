use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use log::*;
use serde::Serialize;
use std::fs;

use crate::aggregator::{filter, group, GroupedRow, GroupedView};
use crate::classifier::ClassificationRow;
use crate::config::BulletinConfig;
use crate::dates::format_ist_date;
use crate::palette::{LegendEntry, Palette};
use crate::regions::RegionId;
use crate::selection::{DaySlot, SelectionMap};

/// Row background for labels without a palette color
pub const NEUTRAL_ROW_COLOR: &str = "#fff";
/// Map fill for regions without a palette color
pub const NEUTRAL_FILL_COLOR: &str = "#eee";

/// Choropleth fill for one region on one forecast day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionFill {
    pub id: RegionId,
    pub key: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Per-region fills for one forecast day, in display order
pub fn map_fills(
    view: &GroupedView,
    selections: &SelectionMap,
    slot: DaySlot,
    palette: &Palette,
) -> Vec<RegionFill> {
    view.records()
        .map(|region| {
            let id = region.id();
            let label = selections.get(id.as_str()).and_then(|s| s.get(slot));
            RegionFill {
                key: region.key(),
                color: label.and_then(|l| palette.color(l)).map(|c| c.to_string()),
                icon: label.and_then(|l| palette.icon(l)).map(|i| i.to_string()),
                id,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MapLayers {
    pub day1: Vec<RegionFill>,
    pub day2: Vec<RegionFill>,
}

/// Render-ready snapshot of a bulletin page
#[derive(Debug, Clone, Serialize)]
pub struct Bulletin {
    pub title: String,
    pub issued: String,
    pub classification: Vec<ClassificationRow>,
    pub forecast: Vec<GroupedRow>,
    pub filter: Option<String>,
    pub legend: Vec<LegendEntry>,
    pub maps: MapLayers,
    pub notes: String,
}

impl Bulletin {
    /// Assemble the bulletin from configuration and current selections.
    ///
    /// With a filter target the forecast table only lists matching regions,
    /// renumbered from 1. Map layers always cover every region.
    pub fn build<Tz: TimeZone>(
        config: &BulletinConfig,
        selections: &SelectionMap,
        notes: &str,
        issued_at: &DateTime<Tz>,
        target: Option<&str>,
    ) -> Self {
        let palette = config.palette();
        let view = group(&config.regions);

        let visible = filter(&view, selections, target);
        let table_view = if visible.len() == view.len() {
            view.clone()
        } else {
            view.retain(&visible)
        };

        let classification = config
            .classifier()
            .classification_table()
            .into_iter()
            .map(|mut row| {
                row.color.get_or_insert_with(|| NEUTRAL_ROW_COLOR.to_string());
                row
            })
            .collect();

        let fills = |slot: DaySlot| -> Vec<RegionFill> {
            map_fills(&view, selections, slot, &palette)
                .into_iter()
                .map(|mut fill| {
                    fill.color.get_or_insert_with(|| NEUTRAL_FILL_COLOR.to_string());
                    fill
                })
                .collect()
        };

        let bulletin = Self {
            title: config.title.clone(),
            issued: format_ist_date(issued_at),
            classification,
            forecast: table_view.rows(selections),
            filter: target.filter(|t| !t.is_empty()).map(|t| t.to_string()),
            legend: palette.legend(),
            maps: MapLayers {
                day1: fills(DaySlot::Day1),
                day2: fills(DaySlot::Day2),
            },
            notes: notes.to_string(),
        };

        info!(
            "Built '{}' for {} with {} of {} regions",
            bulletin.title,
            bulletin.issued,
            bulletin.forecast.len(),
            view.len()
        );
        bulletin
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the snapshot as JSON and return the path written
    pub fn save(&self, path: &str) -> Result<String> {
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write bulletin to {}", path))?;
        info!("Saved bulletin to {}", path);
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Category;
    use crate::regions::RegionRecord;
    use chrono::Utc;

    fn sample_config() -> BulletinConfig {
        let mut config = BulletinConfig::fog();
        config.regions = vec![
            RegionRecord::new("Haryana", "Sirsa"),
            RegionRecord::new("Haryana", "Hisar"),
            RegionRecord::new("Punjab", "Mohali"),
        ];
        config
    }

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 3, 0, 0).unwrap()
    }

    #[test]
    fn test_build_default_selections() {
        let config = sample_config();
        let selections = SelectionMap::initialized(&config.regions, &config.palette());
        let bulletin = Bulletin::build(&config, &selections, "", &issued(), None);

        assert_eq!(bulletin.title, "Fog Forecast Bulletin");
        assert_eq!(bulletin.issued, "16 October 2026");
        assert_eq!(bulletin.classification.len(), 5);
        assert_eq!(bulletin.forecast.len(), 3);
        assert_eq!(bulletin.filter, None);
        assert_eq!(bulletin.legend.len(), 5);
        assert!(bulletin
            .maps
            .day1
            .iter()
            .all(|f| f.color.as_deref() == Some("#66CCFF")));
    }

    #[test]
    fn test_build_filtered_table() {
        let config = sample_config();
        let mut selections = SelectionMap::initialized(&config.regions, &config.palette());
        selections
            .set(&RegionId::from("Punjab:Mohali"), DaySlot::Day2, "Moderate Fog")
            .unwrap();

        let bulletin =
            Bulletin::build(&config, &selections, "Dense fog likely", &issued(), Some("Moderate Fog"));

        assert_eq!(bulletin.filter.as_deref(), Some("Moderate Fog"));
        assert_eq!(bulletin.forecast.len(), 1);
        assert_eq!(bulletin.forecast[0].name, "Mohali");
        assert_eq!(bulletin.forecast[0].display_index, 1);
        assert_eq!(bulletin.forecast[0].state_rowspan, Some(1));
        assert_eq!(bulletin.maps.day2.len(), 3);
        assert_eq!(bulletin.maps.day2[2].color.as_deref(), Some("#FFF500"));
        assert_eq!(bulletin.notes, "Dense fog likely");
    }

    #[test]
    fn test_neutral_defaults() {
        let mut config = sample_config();
        config.categories = vec![Category::new("Almost Clear Sky", "#66CCFF", None)];

        let selections = SelectionMap::new(&config.palette());
        let bulletin = Bulletin::build(&config, &selections, "", &issued(), None);

        assert_eq!(bulletin.classification[0].color.as_deref(), Some("#66CCFF"));
        assert_eq!(bulletin.classification[1].color.as_deref(), Some(NEUTRAL_ROW_COLOR));
        assert!(bulletin
            .maps
            .day1
            .iter()
            .all(|f| f.color.as_deref() == Some(NEUTRAL_FILL_COLOR) && f.icon.is_none()));
    }

    #[test]
    fn test_map_fills_keys_and_icons() {
        let config = sample_config();
        let palette = config.palette();
        let mut selections = SelectionMap::new(&palette);
        selections
            .set(&RegionId::from("Haryana:Sirsa"), DaySlot::Day1, "Dense/Thick Fog")
            .unwrap();

        let view = group(&config.regions);
        let fills = map_fills(&view, &selections, DaySlot::Day1, &palette);
        assert_eq!(fills.len(), 3);
        assert_eq!(fills[0].key, "sirsa");
        assert_eq!(fills[0].color.as_deref(), Some("#FF8A00"));
        assert_eq!(fills[0].icon.as_deref(), Some("🌫️"));
        assert_eq!(fills[1].color, None);
    }

    #[test]
    fn test_to_json() {
        let config = sample_config();
        let selections = SelectionMap::initialized(&config.regions, &config.palette());
        let json = Bulletin::build(&config, &selections, "", &issued(), None)
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["forecast"][0]["id"], "Haryana:Sirsa");
        assert_eq!(value["forecast"][0]["state_rowspan"], 2);
        assert_eq!(value["classification"][0]["type"], "High GHI");
    }

    #[test]
    fn test_save() {
        let config = sample_config();
        let selections = SelectionMap::initialized(&config.regions, &config.palette());
        let bulletin = Bulletin::build(&config, &selections, "", &issued(), None);

        let path = std::env::temp_dir().join(format!("fog_bulletin_save_{}.json", std::process::id()));
        let path = path.to_string_lossy().to_string();
        assert_eq!(bulletin.save(&path).unwrap(), path);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Fog Forecast Bulletin"));
        fs::remove_file(&path).unwrap();
    }
}
