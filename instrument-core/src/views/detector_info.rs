//! `DetectorInfo`: a `ComponentInfo` restricted to detectors, owning
//! mask/monitor flags and a lazily-computed, per-detector L2 cache.

use crate::commands::Command;
use crate::cow::CowSlice;
use crate::errors::{InstrumentError, InstrumentResult, OutOfRangeKind};
use crate::flat_tree::FlatTree;
use crate::views::component_info::ComponentInfo;
use geometry_ids::{ComponentIndex, DetectorIndex};
use instrument_geometry::{distance, V3};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Copy-on-write view over mask/monitor flags and derived L1/L2 distances
/// for the detectors in an instrument tree.
#[derive(Clone)]
pub struct DetectorInfo {
    tree: Arc<FlatTree>,
    component_info: ComponentInfo,
    is_masked: CowSlice<bool>,
    is_monitor: CowSlice<bool>,
    l2_cache: Arc<Vec<OnceCell<f64>>>,
    l1: f64,
    sample_pos: V3,
}

fn fresh_l2_cache(n: usize) -> Arc<Vec<OnceCell<f64>>> {
    Arc::new((0..n).map(|_| OnceCell::new()).collect())
}

impl DetectorInfo {
    /// Builds a view over `tree`, with all detectors unmasked and not
    /// marked as monitors, and an empty L2 cache.
    pub fn new(tree: Arc<FlatTree>) -> Self {
        let n = tree.n_detectors();
        let component_info = ComponentInfo::new(tree.clone());
        let mut info = DetectorInfo {
            tree,
            component_info,
            is_masked: CowSlice::new(vec![false; n]),
            is_monitor: CowSlice::new(vec![false; n]),
            l2_cache: fresh_l2_cache(n),
            l1: 0.0,
            sample_pos: V3::zero(),
        };
        info.refresh_sample_and_l1();
        info
    }

    /// Number of detectors.
    pub fn n_detectors(&self) -> usize {
        self.tree.n_detectors()
    }

    /// Source-to-sample distance. Recomputed from the current source and
    /// sample positions whenever a `Move`/`Rotate`/`DetectorPurge` succeeds,
    /// so it never reflects a stale pose.
    pub fn l1(&self) -> f64 {
        self.l1
    }

    /// The shared `FlatTree` backing this view.
    pub fn flat_tree(&self) -> &FlatTree {
        &self.tree
    }

    fn range_check(&self, detector_index: DetectorIndex) -> InstrumentResult<()> {
        if detector_index.index() >= self.n_detectors() {
            Err(InstrumentError::OutOfRange(OutOfRangeKind::Detector))
        } else {
            Ok(())
        }
    }

    /// Marks a detector as masked.
    pub fn set_masked(&mut self, detector_index: DetectorIndex) -> InstrumentResult<()> {
        self.range_check(detector_index)?;
        self.is_masked.make_mut()[detector_index.index()] = true;
        Ok(())
    }

    /// Whether a detector is masked.
    pub fn is_masked(&self, detector_index: DetectorIndex) -> InstrumentResult<bool> {
        self.range_check(detector_index)?;
        Ok(self.is_masked[detector_index.index()])
    }

    /// Marks a detector as a monitor.
    pub fn set_monitor(&mut self, detector_index: DetectorIndex) -> InstrumentResult<()> {
        self.range_check(detector_index)?;
        self.is_monitor.make_mut()[detector_index.index()] = true;
        Ok(())
    }

    /// Whether a detector is a monitor.
    pub fn is_monitor(&self, detector_index: DetectorIndex) -> InstrumentResult<bool> {
        self.range_check(detector_index)?;
        Ok(self.is_monitor[detector_index.index()])
    }

    /// Distance from the sample to the detector. Computed on first read
    /// and cached; subsequent reads with no intervening mutation return
    /// the cached value. `OnceCell::get_or_init` gives every concurrent
    /// caller either the unresolved state or the fully-written result,
    /// never a half-written slot.
    pub fn l2(&self, detector_index: DetectorIndex) -> InstrumentResult<f64> {
        self.range_check(detector_index)?;
        let value = *self.l2_cache[detector_index.index()].get_or_init(|| {
            let comp_index = self.tree.det_index_to_comp_index(detector_index);
            let det_pos = self.component_info.position(comp_index);
            distance(&det_pos, &self.sample_pos)
        });
        Ok(value)
    }

    /// Computes and caches `l2` for every detector concurrently. Purely an
    /// optimization: every `l2(i)` call is independently safe to run in
    /// parallel, this just does it deliberately instead of incidentally.
    pub fn warm_l2_cache(&self) {
        use rayon::prelude::*;
        (0..self.n_detectors()).into_par_iter().for_each(|i| {
            let _ = self.l2(DetectorIndex::new(i));
        });
    }

    fn invalidate_l2_cache(&mut self) {
        self.l2_cache = fresh_l2_cache(self.n_detectors());
    }

    /// Re-reads `sample_pos`/`l1` from the current `component_info` overlay.
    /// A `Move`/`Rotate` can target the source or sample component, which
    /// would otherwise leave these cached fields stale after the L2 cache
    /// they feed has already been invalidated.
    fn refresh_sample_and_l1(&mut self) {
        let source_pos = self.component_info.position(self.tree.source_component_index());
        self.sample_pos = self.component_info.position(self.tree.sample_component_index());
        self.l1 = distance(&source_pos, &self.sample_pos);
    }

    /// Produces a new `DetectorInfo` sharing this one's mask/monitor flags
    /// but backed by `new_tree`. Requires the detector counts to agree.
    /// The L2 cache is reset and L1 recomputed from the new tree.
    pub fn clone_with_instrument_tree(&self, new_tree: Arc<FlatTree>) -> InstrumentResult<DetectorInfo> {
        if new_tree.n_detectors() != self.tree.n_detectors() {
            return Err(InstrumentError::InstrumentShapeMismatch);
        }
        let component_info = ComponentInfo::new(new_tree.clone());
        let mut replacement = DetectorInfo {
            l2_cache: fresh_l2_cache(new_tree.n_detectors()),
            tree: new_tree,
            component_info,
            is_masked: self.is_masked.clone(),
            is_monitor: self.is_monitor.clone(),
            l1: 0.0,
            sample_pos: V3::zero(),
        };
        replacement.refresh_sample_and_l1();
        Ok(replacement)
    }

    /// Applies `command` to `node_index` and, on success, invalidates the
    /// L2 cache. `Move`/`Rotate` delegate into the wrapped `ComponentInfo`.
    /// `DetectorPurge` is tree-shape-changing, so `node_index` must be the
    /// tree root; it rebuilds the `FlatTree` from the owned component tree
    /// and resets the mask/monitor overlays to the new detector count.
    pub fn modify(&mut self, node_index: ComponentIndex, command: &Command) -> InstrumentResult<bool> {
        let changed = match command {
            Command::Move(offset) => {
                self.component_info.translate(node_index, *offset);
                self.refresh_sample_and_l1();
                true
            }
            Command::Rotate { axis, theta, center } => {
                self.component_info.rotate_component(node_index, *axis, *theta, *center);
                self.refresh_sample_and_l1();
                true
            }
            Command::DetectorPurge(_) => {
                if node_index != ComponentIndex::new(0) {
                    return Err(InstrumentError::OutOfRange(OutOfRangeKind::Component));
                }
                let root = self
                    .tree
                    .root_component()
                    .expect("DetectorPurge requires a FlatTree built from an owned component tree");
                let mut root = (*root).clone();
                let changed = command.execute(&mut root);
                if changed {
                    let new_tree = Arc::new(FlatTree::from_component_root(&root)?);
                    let n = new_tree.n_detectors();
                    self.tree = new_tree.clone();
                    self.component_info = ComponentInfo::new(new_tree);
                    self.is_masked = CowSlice::new(vec![false; n]);
                    self.is_monitor = CowSlice::new(vec![false; n]);
                    self.refresh_sample_and_l1();
                }
                changed
            }
        };
        if changed {
            self.invalidate_l2_cache();
        }
        Ok(changed)
    }
}

impl PartialEq for DetectorInfo {
    fn eq(&self, other: &Self) -> bool {
        self.component_info == other.component_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use geometry_ids::{ComponentId, DetectorId};

    fn cid(n: u64) -> ComponentId {
        ComponentId::new(n)
    }

    fn trivial_instrument() -> Arc<FlatTree> {
        let component = Component::Composite {
            id: cid(0),
            children: vec![
                Component::PointSource { id: cid(1), position: V3::zero(), rotation: instrument_geometry::Quat::identity() },
                Component::PointSample {
                    id: cid(2),
                    position: V3::new(0.0, 0.0, 10.0),
                    rotation: instrument_geometry::Quat::identity(),
                },
                Component::Detector {
                    id: cid(3),
                    detector_id: DetectorId::new(0),
                    position: V3::new(0.0, 0.0, 40.0),
                    rotation: instrument_geometry::Quat::identity(),
                },
            ],
        };
        Arc::new(FlatTree::from_component_root(&component).unwrap())
    }

    #[test]
    fn trivial_l1_and_l2() {
        let info = DetectorInfo::new(trivial_instrument());
        assert_eq!(info.l1(), 10.0);
        assert_eq!(info.l2(DetectorIndex::new(0)).unwrap(), 30.0);
    }

    #[test]
    fn l2_is_idempotent_with_no_intervening_mutation() {
        let info = DetectorInfo::new(trivial_instrument());
        let first = info.l2(DetectorIndex::new(0)).unwrap();
        let second = info.l2(DetectorIndex::new(0)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_detector_index_is_rejected() {
        let info = DetectorInfo::new(trivial_instrument());
        let err = info.l2(DetectorIndex::new(5)).unwrap_err();
        assert!(matches!(err, InstrumentError::OutOfRange(OutOfRangeKind::Detector)));
    }

    #[test]
    fn mask_changes_do_not_invalidate_l2() {
        let mut info = DetectorInfo::new(trivial_instrument());
        let before = info.l2(DetectorIndex::new(0)).unwrap();
        info.set_masked(DetectorIndex::new(0)).unwrap();
        let after = info.l2(DetectorIndex::new(0)).unwrap();
        assert_eq!(before, after);
        assert!(info.is_masked(DetectorIndex::new(0)).unwrap());
    }

    #[test]
    fn move_via_modify_invalidates_l2() {
        let mut info = DetectorInfo::new(trivial_instrument());
        let before = info.l2(DetectorIndex::new(0)).unwrap();
        let comp_index = info.flat_tree().det_index_to_comp_index(DetectorIndex::new(0));
        info.modify(comp_index, &Command::Move(V3::new(0.0, 0.0, 10.0))).unwrap();
        let after = info.l2(DetectorIndex::new(0)).unwrap();
        assert_eq!(before, 30.0);
        assert_eq!(after, 40.0);
    }

    #[test]
    fn move_sample_via_modify_refreshes_l1_and_l2() {
        let mut info = DetectorInfo::new(trivial_instrument());
        assert_eq!(info.l1(), 10.0);
        assert_eq!(info.l2(DetectorIndex::new(0)).unwrap(), 30.0);

        // The sample sits at component index 2 (root=0, source=1, sample=2,
        // detector=3). Moving it must update both the cached L1 and the
        // position L2 is measured against.
        let sample_comp_index = info.flat_tree().sample_component_index();
        assert_eq!(sample_comp_index, ComponentIndex::new(2));
        info.modify(sample_comp_index, &Command::Move(V3::new(0.0, 0.0, 5.0))).unwrap();

        assert_eq!(info.l1(), 15.0);
        assert_eq!(info.l2(DetectorIndex::new(0)).unwrap(), 25.0);
    }

    #[test]
    fn clone_with_instrument_tree_requires_matching_detector_count() {
        let info = DetectorInfo::new(trivial_instrument());
        let mismatched = Arc::new(
            FlatTree::from_component_root(&Component::Composite {
                id: cid(0),
                children: vec![
                    Component::PointSource { id: cid(1), position: V3::zero(), rotation: instrument_geometry::Quat::identity() },
                    Component::PointSample {
                        id: cid(2),
                        position: V3::new(0.0, 0.0, 10.0),
                        rotation: instrument_geometry::Quat::identity(),
                    },
                ],
            })
            .unwrap(),
        );
        let err = info.clone_with_instrument_tree(mismatched).unwrap_err();
        assert!(matches!(err, InstrumentError::InstrumentShapeMismatch));
    }
}
