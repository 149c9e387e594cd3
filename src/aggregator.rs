use log::*;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::regions::{RegionId, RegionRecord};
use crate::selection::SelectionMap;

/// Regions of one state, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateGroup {
    pub state: String,
    pub regions: Vec<RegionRecord>,
}

/// One line of the forecast table.
///
/// `state_rowspan` is set on the first row of each state group only; the
/// renderer merges the state cell across that many rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedRow {
    pub display_index: usize,
    pub id: RegionId,
    pub state: String,
    pub state_rowspan: Option<usize>,
    pub name: String,
    pub day1: Option<String>,
    pub day2: Option<String>,
}

/// Regions partitioned by state, states in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedView {
    groups: Vec<StateGroup>,
}

impl GroupedView {
    pub fn groups(&self) -> &[StateGroup] {
        &self.groups
    }

    /// Number of regions across all groups
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.regions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Region records in display order
    pub fn records(&self) -> impl Iterator<Item = &RegionRecord> {
        self.groups.iter().flat_map(|g| g.regions.iter())
    }

    pub fn region_ids(&self) -> BTreeSet<RegionId> {
        self.records().map(|r| r.id()).collect()
    }

    /// Flatten into table rows numbered from 1 across the whole view
    pub fn rows(&self, selections: &SelectionMap) -> Vec<GroupedRow> {
        let mut rows = Vec::with_capacity(self.len());
        let mut index = 1;

        for group in &self.groups {
            for (j, region) in group.regions.iter().enumerate() {
                let id = region.id();
                let selection = selections.get(id.as_str());
                rows.push(GroupedRow {
                    display_index: index,
                    state: group.state.clone(),
                    state_rowspan: (j == 0).then_some(group.regions.len()),
                    name: region.name.clone(),
                    day1: selection.and_then(|s| s.day1.clone()),
                    day2: selection.and_then(|s| s.day2.clone()),
                    id,
                });
                index += 1;
            }
        }

        rows
    }

    /// A new view holding only the regions in `ids`, order preserved.
    /// States left without regions are dropped.
    pub fn retain(&self, ids: &BTreeSet<RegionId>) -> GroupedView {
        let kept: Vec<RegionRecord> = self
            .records()
            .filter(|r| ids.contains(&r.id()))
            .cloned()
            .collect();
        group(&kept)
    }
}

/// Group regions by state.
///
/// States keep the order in which they first appear and regions keep their
/// input order within a state, even when a state's regions are not contiguous.
pub fn group(regions: &[RegionRecord]) -> GroupedView {
    let mut groups: Vec<StateGroup> = Vec::new();

    for region in regions {
        match groups.iter_mut().find(|g| g.state == region.state) {
            Some(existing) => existing.regions.push(region.clone()),
            None => groups.push(StateGroup {
                state: region.state.clone(),
                regions: vec![region.clone()],
            }),
        }
    }

    debug!("Grouped {} regions into {} states", regions.len(), groups.len());
    GroupedView { groups }
}

/// Region ids to display for a filter target.
///
/// `None` or an empty target keeps every region. Otherwise a region is kept
/// when its day 1 or day 2 selection equals `target`; regions without a
/// recorded selection never match.
pub fn filter(
    view: &GroupedView,
    selections: &SelectionMap,
    target: Option<&str>,
) -> BTreeSet<RegionId> {
    let target = match target {
        Some(t) if !t.is_empty() => t,
        _ => return view.region_ids(),
    };

    let matched: BTreeSet<RegionId> = view
        .records()
        .map(|r| r.id())
        .filter(|id| {
            selections
                .get(id.as_str())
                .map_or(false, |sel| sel.matches(target))
        })
        .collect();

    debug!("Filter '{}' matched {} of {} regions", target, matched.len(), view.len());
    matched
}
