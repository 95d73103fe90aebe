//! The immutable, flattened structure-of-arrays representation of an
//! instrument geometry tree.

use crate::component::Component;
use crate::errors::{InstrumentError, InstrumentResult, InvalidInstrumentKind, OutOfRangeKind};
use crate::parser::{self, ParseSummary};
use fxhash::FxBuildHasher;
use geometry_ids::{ComponentId, ComponentIndex, DetectorId, DetectorIndex, PathIndex};
use hashbrown::HashMap;
use instrument_geometry::{Quat, V3};
use smallvec::SmallVec;
use std::sync::Arc;

/// A record of one component's place in the tree: its parent (`None` only
/// for the root), its children in discovery order, and its immutable id.
#[derive(Clone, Debug)]
pub struct ComponentProxy {
    parent: Option<ComponentIndex>,
    children: SmallVec<[ComponentIndex; 4]>,
    component_id: ComponentId,
}

impl ComponentProxy {
    pub(crate) fn new(parent: Option<ComponentIndex>, component_id: ComponentId) -> Self {
        ComponentProxy {
            parent,
            children: SmallVec::new(),
            component_id,
        }
    }

    pub(crate) fn add_child(&mut self, child: ComponentIndex) {
        self.children.push(child);
    }

    /// The parent of this component, or `None` if this is the root.
    pub fn parent(&self) -> Option<ComponentIndex> {
        self.parent
    }

    /// This component's children, in discovery (insertion) order.
    pub fn children(&self) -> &[ComponentIndex] {
        &self.children
    }

    /// The stable id of the component this proxy describes.
    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }
}

impl PartialEq for ComponentProxy {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent && self.children == other.children && self.component_id == other.component_id
    }
}
impl Eq for ComponentProxy {}

/// Immutable, reference-shared structure-of-arrays payload for an
/// instrument geometry tree. Built once, by the parser or directly from
/// SOA arrays, and thereafter read-only.
#[derive(Clone, Debug)]
pub struct FlatTree {
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
    source_path_index: PathIndex,
    sample_path_index: PathIndex,
    /// The owned component tree this `FlatTree` was parsed from, kept
    /// around so shape-changing mutations (detector purge) have something
    /// to rebuild from. `None` for trees built directly via `from_soa`,
    /// as by a deserializer with no original tree to hand.
    root_component: Option<Arc<Component>>,
}

impl PartialEq for FlatTree {
    fn eq(&self, other: &Self) -> bool {
        // Positions and rotations are metadata; only topology and ids
        // determine equality.
        self.proxies == other.proxies
    }
}
impl Eq for FlatTree {}

impl FlatTree {
    /// Parses `root` into a `FlatTree`, discarding the `ParseSummary`.
    pub fn from_component_root(root: &Component) -> InstrumentResult<FlatTree> {
        Self::from_component_root_with_summary(root).map(|(tree, _)| tree)
    }

    /// Parses `root` into a `FlatTree`, returning the per-variant counts
    /// gathered along the way.
    pub fn from_component_root_with_summary(root: &Component) -> InstrumentResult<(FlatTree, ParseSummary)> {
        let (soa, summary) = parser::parse(root)?;
        log::debug!(
            "built FlatTree with {} components, {} detectors, {} path components",
            soa.proxies.len(),
            soa.detector_component_indexes.len(),
            soa.path_component_indexes.len()
        );
        let tree = FlatTree {
            proxies: soa.proxies,
            positions: soa.positions,
            rotations: soa.rotations,
            component_ids: soa.component_ids,
            entry_points: soa.entry_points,
            exit_points: soa.exit_points,
            path_lengths: soa.path_lengths,
            path_component_indexes: soa.path_component_indexes,
            detector_component_indexes: soa.detector_component_indexes,
            detector_ids: soa.detector_ids,
            source_path_index: soa.source_path_index,
            sample_path_index: soa.sample_path_index,
            root_component: Some(Arc::new(root.clone())),
        };
        Ok((tree, summary))
    }

    /// Builds a `FlatTree` directly from pre-assembled SOA arrays, as used
    /// by a deserializer. The only check performed is that array lengths
    /// agree; it is the caller's responsibility to pass consistent data.
    #[allow(clippy::too_many_arguments)]
    pub fn from_soa(
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
        source_path_index: PathIndex,
        sample_path_index: PathIndex,
    ) -> InstrumentResult<FlatTree> {
        let n = proxies.len();
        if positions.len() != n || rotations.len() != n || component_ids.len() != n {
            return Err(InstrumentError::InvalidInstrument(InvalidInstrumentKind::LengthMismatch));
        }
        let n_path = path_component_indexes.len();
        if entry_points.len() != n_path || exit_points.len() != n_path || path_lengths.len() != n_path {
            return Err(InstrumentError::InvalidInstrument(InvalidInstrumentKind::LengthMismatch));
        }
        if detector_component_indexes.len() != detector_ids.len() {
            return Err(InstrumentError::InvalidInstrument(InvalidInstrumentKind::LengthMismatch));
        }
        Ok(FlatTree {
            proxies,
            positions,
            rotations,
            component_ids,
            entry_points,
            exit_points,
            path_lengths,
            path_component_indexes,
            detector_component_indexes,
            detector_ids,
            source_path_index,
            sample_path_index,
            root_component: None,
        })
    }

    /// The owned component tree this `FlatTree` was parsed from, if any.
    /// `None` for trees built directly via `from_soa`.
    pub fn root_component(&self) -> Option<Arc<Component>> {
        self.root_component.clone()
    }

    /// Number of components in the tree.
    pub fn component_size(&self) -> usize {
        self.proxies.len()
    }

    /// Number of detectors in the tree.
    pub fn n_detectors(&self) -> usize {
        self.detector_component_indexes.len()
    }

    /// Number of path components (source, sample, guides) in the tree.
    pub fn n_path_components(&self) -> usize {
        self.path_component_indexes.len()
    }

    /// The proxy for component `index`.
    pub fn proxy_at(&self, index: ComponentIndex) -> &ComponentProxy {
        &self.proxies[index.index()]
    }

    /// The root proxy. Every `FlatTree` has exactly one component with no
    /// parent, at index 0.
    pub fn root_proxy(&self) -> &ComponentProxy {
        &self.proxies[0]
    }

    /// Iterates proxies in `FlatTree` (discovery) order.
    pub fn proxies(&self) -> impl Iterator<Item = &ComponentProxy> {
        self.proxies.iter()
    }

    /// Breadth-first traversal of the subtree rooted at `index`. `index`
    /// itself is the first element; siblings appear in stored order.
    pub fn sub_tree_indexes(&self, index: ComponentIndex) -> InstrumentResult<Vec<ComponentIndex>> {
        if index.index() >= self.component_size() {
            return Err(InstrumentError::OutOfRange(OutOfRangeKind::Component));
        }
        let mut subtree = vec![index];
        let mut cursor = 0;
        while cursor < subtree.len() {
            let current = subtree[cursor];
            subtree.extend_from_slice(self.proxy_at(current).children());
            cursor += 1;
        }
        Ok(subtree)
    }

    /// The immediate children of `index`, with no further recursion.
    pub fn next_level_indexes(&self, index: ComponentIndex) -> InstrumentResult<Vec<ComponentIndex>> {
        if index.index() >= self.component_size() {
            return Err(InstrumentError::OutOfRange(OutOfRangeKind::Component));
        }
        Ok(self.proxy_at(index).children().to_vec())
    }

    /// The path index of the source.
    pub fn source_path_index(&self) -> PathIndex {
        self.source_path_index
    }

    /// The path index of the sample.
    pub fn sample_path_index(&self) -> PathIndex {
        self.sample_path_index
    }

    /// The component index of the source.
    pub fn source_component_index(&self) -> ComponentIndex {
        self.path_component_indexes[self.source_path_index.index()]
    }

    /// The component index of the sample.
    pub fn sample_component_index(&self) -> ComponentIndex {
        self.path_component_indexes[self.sample_path_index.index()]
    }

    /// Starting position of the source.
    pub fn source_pos(&self) -> V3 {
        self.positions[self.source_component_index().index()]
    }

    /// Starting position of the sample.
    pub fn sample_pos(&self) -> V3 {
        self.positions[self.sample_component_index().index()]
    }

    /// Inserts `detectorId -> index` for every detector; first occurrence
    /// wins on a collision.
    pub fn fill_detector_map(&self, to_fill: &mut HashMap<DetectorId, DetectorIndex, FxBuildHasher>) {
        for (i, &id) in self.detector_ids.iter().enumerate() {
            to_fill.entry(id).or_insert_with(|| DetectorIndex::new(i));
        }
    }

    /// Inserts `componentId -> index` for every component; first
    /// occurrence wins on a collision.
    pub fn fill_component_map(&self, to_fill: &mut HashMap<ComponentId, ComponentIndex, FxBuildHasher>) {
        for (i, &id) in self.component_ids.iter().enumerate() {
            to_fill.entry(id).or_insert_with(|| ComponentIndex::new(i));
        }
    }

    pub fn start_positions(&self) -> &[V3] {
        &self.positions
    }

    pub fn start_rotations(&self) -> &[Quat] {
        &self.rotations
    }

    pub fn start_entry_points(&self) -> &[V3] {
        &self.entry_points
    }

    pub fn start_exit_points(&self) -> &[V3] {
        &self.exit_points
    }

    pub fn path_lengths(&self) -> &[f64] {
        &self.path_lengths
    }

    pub fn detector_component_indexes(&self) -> &[ComponentIndex] {
        &self.detector_component_indexes
    }

    pub fn path_component_indexes(&self) -> &[ComponentIndex] {
        &self.path_component_indexes
    }

    pub fn detector_ids(&self) -> &[DetectorId] {
        &self.detector_ids
    }

    pub fn component_ids(&self) -> &[ComponentId] {
        &self.component_ids
    }

    /// Maps a detector index back to its component index.
    pub fn det_index_to_comp_index(&self, detector_index: DetectorIndex) -> ComponentIndex {
        self.detector_component_indexes[detector_index.index()]
    }

    /// Maps a path index back to its component index.
    pub fn path_index_to_comp_index(&self, path_index: PathIndex) -> ComponentIndex {
        self.path_component_indexes[path_index.index()]
    }

    /// Component indexes of every branch (composite) node, in discovery
    /// order. Backs `AssemblyInfo`'s component list.
    pub fn branch_component_indexes(&self) -> Vec<ComponentIndex> {
        self.proxies
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.children.is_empty())
            .map(|(i, _)| ComponentIndex::new(i))
            .collect()
    }

    /// Per-variant counts, recomputed from the flattened arrays. Debug and
    /// test use only. Only `Composite` nodes ever have children, so a
    /// proxy's children list being non-empty identifies it as one.
    pub fn component_count_by_kind(&self) -> ParseSummary {
        ParseSummary {
            detector_count: self.detector_component_indexes.len(),
            path_component_count: self.path_component_indexes.len(),
            composite_count: self.proxies.iter().filter(|p| !p.children.is_empty()).count(),
        }
    }
}
