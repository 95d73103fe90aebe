//! `ComponentInfo`: a shared `FlatTree` plus copy-on-write per-component
//! position and rotation overlays, with optional time-resolved scanning.

use crate::cow::CowSlice;
use crate::errors::{InstrumentError, InstrumentResult, InvalidInstrumentKind};
use crate::flat_tree::FlatTree;
use geometry_ids::{ComponentIndex, TimeIndex};
use instrument_geometry::{AffineXform, Quat, V3};
use std::sync::Arc;

/// One scan interval: a start time in seconds since some caller-defined
/// epoch, and a duration in seconds. The non-scanning default is a single,
/// unbounded interval starting at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanTime {
    pub start: i64,
    pub duration: u32,
}

impl ScanTime {
    /// The single, unbounded interval used by non-scanning views.
    pub fn unbounded() -> Self {
        ScanTime { start: 0, duration: u32::MAX }
    }
}

impl Default for ScanTime {
    fn default() -> Self {
        ScanTime::unbounded()
    }
}

/// Copy-on-write view over per-component positions and rotations, shared
/// against one immutable `FlatTree`.
#[derive(Clone)]
pub struct ComponentInfo {
    tree: Arc<FlatTree>,
    positions: CowSlice<V3>,
    rotations: CowSlice<Quat>,
    time_index_map: Arc<Vec<Vec<TimeIndex>>>,
    scan_times: Arc<Vec<ScanTime>>,
}

impl ComponentInfo {
    /// The default, non-scanning view: every component has a single time
    /// slot mapping to itself, seeded from the tree's starting poses.
    pub fn new(tree: Arc<FlatTree>) -> Self {
        let n = tree.component_size();
        let time_index_map = (0..n).map(|i| vec![TimeIndex::new(i)]).collect();
        let positions = tree.start_positions().to_vec();
        let rotations = tree.start_rotations().to_vec();
        ComponentInfo {
            positions: CowSlice::new(positions),
            rotations: CowSlice::new(rotations),
            time_index_map: Arc::new(time_index_map),
            scan_times: Arc::new(vec![ScanTime::unbounded()]),
            tree,
        }
    }

    /// A general, time-resolved view. `time_index_map` must have one entry
    /// per component; `positions`/`rotations` must agree in length (they
    /// index the expanded scan x component space referenced by
    /// `time_index_map`).
    pub fn with_scans(
        tree: Arc<FlatTree>,
        time_index_map: Vec<Vec<TimeIndex>>,
        scan_times: Vec<ScanTime>,
        positions: Vec<V3>,
        rotations: Vec<Quat>,
    ) -> InstrumentResult<Self> {
        if positions.len() != rotations.len() {
            return Err(InstrumentError::InvalidInstrument(InvalidInstrumentKind::LengthMismatch));
        }
        if time_index_map.len() != tree.component_size() {
            return Err(InstrumentError::InvalidInstrument(InvalidInstrumentKind::LengthMismatch));
        }
        Ok(ComponentInfo {
            positions: CowSlice::new(positions),
            rotations: CowSlice::new(rotations),
            time_index_map: Arc::new(time_index_map),
            scan_times: Arc::new(scan_times),
            tree,
        })
    }

    /// The shared `FlatTree` backing this view.
    pub fn flat_tree(&self) -> &FlatTree {
        &self.tree
    }

    /// Number of components in the backing tree.
    pub fn component_size(&self) -> usize {
        self.tree.component_size()
    }

    /// Non-scanning position read: the component's own overlay slot.
    pub fn position(&self, component_index: ComponentIndex) -> V3 {
        self.positions[component_index.index()]
    }

    /// Non-scanning rotation read: the component's own overlay slot.
    pub fn rotation(&self, component_index: ComponentIndex) -> Quat {
        self.rotations[component_index.index()]
    }

    /// Scanning position read: resolves through `timeIndexMap`.
    pub fn position_at(&self, component_index: ComponentIndex, time_index: TimeIndex) -> V3 {
        let flat = self.time_index_map[component_index.index()][time_index.index()];
        self.positions[flat.index()]
    }

    /// Scanning rotation read: resolves through `timeIndexMap`.
    pub fn rotation_at(&self, component_index: ComponentIndex, time_index: TimeIndex) -> Quat {
        let flat = self.time_index_map[component_index.index()][time_index.index()];
        self.rotations[flat.index()]
    }

    /// Translates every mapped time slot of `component_index` by `offset`.
    pub fn translate(&mut self, component_index: ComponentIndex, offset: V3) {
        let slots = self.time_index_map[component_index.index()].clone();
        let positions = self.positions.make_mut();
        for slot in slots {
            positions[slot.index()] = positions[slot.index()] + offset;
        }
    }

    /// Rotates every mapped time slot of `component_index` about `center`.
    pub fn rotate_component(&mut self, component_index: ComponentIndex, axis: V3, theta: f64, center: V3) {
        let xform = AffineXform::new(&axis, theta, center);
        let slots = self.time_index_map[component_index.index()].clone();
        {
            let positions = self.positions.make_mut();
            for &slot in &slots {
                positions[slot.index()] = xform.apply_point(&positions[slot.index()]);
            }
        }
        let rotation_delta = xform.rotation();
        let rotations = self.rotations.make_mut();
        for slot in slots {
            rotations[slot.index()] = rotation_delta.mul(&rotations[slot.index()]);
        }
    }
}

impl PartialEq for ComponentInfo {
    fn eq(&self, other: &Self) -> bool {
        *self.tree == *other.tree
    }
}
