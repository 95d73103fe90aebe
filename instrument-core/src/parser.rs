//! Walks a hierarchical `Component` tree depth-first, pre-order, and emits
//! the structure-of-arrays payload a `FlatTree` is built from.

use crate::component::Component;
use crate::errors::{InstrumentError, InstrumentResult, InvalidInstrumentKind};
use crate::flat_tree::ComponentProxy;
use geometry_ids::{ComponentId, ComponentIndex, DetectorId, PathIndex};
use instrument_geometry::{Quat, V3};

/// The raw SOA vectors produced by a parse, handed off to `FlatTree` to
/// finish construction (computing derived id maps is left to the tree).
pub(crate) struct RawSoa {
    pub proxies: Vec<ComponentProxy>,
    pub positions: Vec<V3>,
    pub rotations: Vec<Quat>,
    pub component_ids: Vec<ComponentId>,
    pub entry_points: Vec<V3>,
    pub exit_points: Vec<V3>,
    pub path_lengths: Vec<f64>,
    pub path_component_indexes: Vec<ComponentIndex>,
    pub detector_component_indexes: Vec<ComponentIndex>,
    pub detector_ids: Vec<DetectorId>,
    pub source_path_index: PathIndex,
    pub sample_path_index: PathIndex,
}

/// Per-variant counts gathered during a parse, handed back alongside the
/// `FlatTree` by `from_component_root_with_summary` so callers can pre-size
/// overlay arrays without a second pass over the source tree.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub detector_count: usize,
    pub path_component_count: usize,
    pub composite_count: usize,
}

struct Builder {
    proxies: Vec<ComponentProxy>,
    positions: Vec<V3>,
    rotations: Vec<Quat>,
    component_ids: Vec<ComponentId>,
    entry_points: Vec<V3>,
    exit_points: Vec<V3>,
    path_lengths: Vec<f64>,
    path_component_indexes: Vec<ComponentIndex>,
    detector_component_indexes: Vec<ComponentIndex>,
    detector_ids: Vec<DetectorId>,
    source_path_index: Option<PathIndex>,
    sample_path_index: Option<PathIndex>,
    summary: ParseSummary,
}

impl Builder {
    fn new() -> Self {
        Builder {
            proxies: Vec::new(),
            positions: Vec::new(),
            rotations: Vec::new(),
            component_ids: Vec::new(),
            entry_points: Vec::new(),
            exit_points: Vec::new(),
            path_lengths: Vec::new(),
            path_component_indexes: Vec::new(),
            detector_component_indexes: Vec::new(),
            detector_ids: Vec::new(),
            source_path_index: None,
            sample_path_index: None,
            summary: ParseSummary::default(),
        }
    }

    fn push_node(&mut self, component: &Component, parent: Option<ComponentIndex>) -> ComponentIndex {
        let index = ComponentIndex::new(self.proxies.len());
        self.proxies.push(ComponentProxy::new(parent, component.id()));
        self.positions.push(component.position());
        self.rotations.push(component.rotation());
        self.component_ids.push(component.id());
        if let Some(parent_index) = parent {
            self.proxies[parent_index.index()].add_child(index);
        }
        index
    }

    fn visit(&mut self, component: &Component, parent: Option<ComponentIndex>) {
        let index = self.push_node(component, parent);
        match component {
            Component::Detector { detector_id, .. } => {
                self.detector_component_indexes.push(index);
                self.detector_ids.push(*detector_id);
                self.summary.detector_count += 1;
            }
            Component::PointSource { .. } | Component::PointSample { .. } | Component::ParabolicGuide { .. } => {
                let path_index = PathIndex::new(self.path_component_indexes.len());
                self.entry_points.push(component.entry_point());
                self.exit_points.push(component.exit_point());
                self.path_lengths.push(component.path_length());
                self.path_component_indexes.push(index);
                if component.is_source() && self.source_path_index.is_none() {
                    self.source_path_index = Some(path_index);
                } else if component.is_sample() && self.sample_path_index.is_none() {
                    self.sample_path_index = Some(path_index);
                }
                self.summary.path_component_count += 1;
            }
            Component::Composite { children, .. } => {
                self.summary.composite_count += 1;
                for child in children {
                    self.visit(child, Some(index));
                }
            }
            Component::Null { .. } => {}
        }
    }

    fn finish(self) -> InstrumentResult<(RawSoa, ParseSummary)> {
        let source_path_index = self
            .source_path_index
            .ok_or(InstrumentError::InvalidInstrument(InvalidInstrumentKind::NoSource))?;
        let sample_path_index = self
            .sample_path_index
            .ok_or(InstrumentError::InvalidInstrument(InvalidInstrumentKind::NoSample))?;

        Ok((
            RawSoa {
                proxies: self.proxies,
                positions: self.positions,
                rotations: self.rotations,
                component_ids: self.component_ids,
                entry_points: self.entry_points,
                exit_points: self.exit_points,
                path_lengths: self.path_lengths,
                path_component_indexes: self.path_component_indexes,
                detector_component_indexes: self.detector_component_indexes,
                detector_ids: self.detector_ids,
                source_path_index,
                sample_path_index,
            },
            self.summary,
        ))
    }
}

/// Parses `root` into the raw SOA payload plus a `ParseSummary`.
pub(crate) fn parse(root: &Component) -> InstrumentResult<(RawSoa, ParseSummary)> {
    let mut builder = Builder::new();
    builder.visit(root, None);
    builder.finish()
}
