//! `PathComponentInfo`: a `ComponentInfo` restricted to the source, sample,
//! and guide components that make up the neutron flight path, with its own
//! copy-on-write entry/exit point overlays.

use crate::cow::CowSlice;
use crate::views::component_info::ComponentInfo;
use geometry_ids::{ComponentIndex, PathIndex};
use instrument_geometry::{AffineXform, Quat, V3};

/// Copy-on-write view over the entry/exit points of the flight-path
/// components, projected through the wrapped `ComponentInfo`.
#[derive(Clone)]
pub struct PathComponentInfo {
    component_info: ComponentInfo,
    entry_points: CowSlice<V3>,
    exit_points: CowSlice<V3>,
}

impl PathComponentInfo {
    /// Builds a view seeded from the backing tree's starting entry/exit
    /// points.
    pub fn new(component_info: ComponentInfo) -> Self {
        let entry_points = component_info.flat_tree().start_entry_points().to_vec();
        let exit_points = component_info.flat_tree().start_exit_points().to_vec();
        PathComponentInfo {
            entry_points: CowSlice::new(entry_points),
            exit_points: CowSlice::new(exit_points),
            component_info,
        }
    }

    fn comp_index(&self, path_index: PathIndex) -> ComponentIndex {
        self.component_info.flat_tree().path_index_to_comp_index(path_index)
    }

    /// Position of the path component, projected through the component
    /// index map.
    pub fn position(&self, path_index: PathIndex) -> V3 {
        self.component_info.position(self.comp_index(path_index))
    }

    /// Rotation of the path component, projected through the component
    /// index map.
    pub fn rotation(&self, path_index: PathIndex) -> Quat {
        self.component_info.rotation(self.comp_index(path_index))
    }

    /// Flight-path length of this component. Invariant under rigid-body
    /// transforms, so always read straight from the backing tree.
    pub fn path_length(&self, path_index: PathIndex) -> f64 {
        self.component_info.flat_tree().path_lengths()[path_index.index()]
    }

    /// Entry point of the path component.
    pub fn entry_point(&self, path_index: PathIndex) -> V3 {
        self.entry_points[path_index.index()]
    }

    /// Exit point of the path component.
    pub fn exit_point(&self, path_index: PathIndex) -> V3 {
        self.exit_points[path_index.index()]
    }

    /// Adds `offset` to the path component's position, entry, and exit.
    pub fn move_path_component(&mut self, path_index: PathIndex, offset: V3) {
        let comp_index = self.comp_index(path_index);
        self.component_info.translate(comp_index, offset);
        self.entry_points.make_mut()[path_index.index()] += offset;
        self.exit_points.make_mut()[path_index.index()] += offset;
    }

    /// Applies the same batch of moves to several path components.
    pub fn move_path_components(&mut self, path_indexes: &[PathIndex], offset: V3) {
        for &path_index in path_indexes {
            self.move_path_component(path_index, offset);
        }
    }

    /// Rotates the path component's position, entry, and exit about
    /// `center`, composing the rotation onto the stored orientation.
    pub fn rotate_path_component(&mut self, path_index: PathIndex, axis: V3, theta: f64, center: V3) {
        let comp_index = self.comp_index(path_index);
        self.component_info.rotate_component(comp_index, axis, theta, center);
        let xform = AffineXform::new(&axis, theta, center);
        let entry = self.entry_points.make_mut();
        entry[path_index.index()] = xform.apply_point(&entry[path_index.index()]);
        let exit = self.exit_points.make_mut();
        exit[path_index.index()] = xform.apply_point(&exit[path_index.index()]);
    }

    /// Applies the same batch of rotations to several path components.
    pub fn rotate_path_components(&mut self, path_indexes: &[PathIndex], axis: V3, theta: f64, center: V3) {
        for &path_index in path_indexes {
            self.rotate_path_component(path_index, axis, theta, center);
        }
    }
}

impl PartialEq for PathComponentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.component_info == other.component_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::flat_tree::FlatTree;
    use geometry_ids::{ComponentId, DetectorId};
    use std::sync::Arc;

    fn cid(n: u64) -> ComponentId {
        ComponentId::new(n)
    }

    fn sample_tree() -> PathComponentInfo {
        let component = Component::Composite {
            id: cid(0),
            children: vec![
                Component::PointSource { id: cid(1), position: V3::zero(), rotation: Quat::identity() },
                Component::ParabolicGuide {
                    id: cid(2),
                    position: V3::new(5.0, 0.0, 0.0),
                    rotation: Quat::identity(),
                    a: 1.0,
                    h: 1.0,
                },
                Component::PointSample { id: cid(3), position: V3::new(0.0, 0.0, 10.0), rotation: Quat::identity() },
                Component::Detector {
                    id: cid(4),
                    detector_id: DetectorId::new(0),
                    position: V3::new(0.0, 0.0, 40.0),
                    rotation: Quat::identity(),
                },
            ],
        };
        let tree = Arc::new(FlatTree::from_component_root(&component).unwrap());
        PathComponentInfo::new(ComponentInfo::new(tree))
    }

    #[test]
    fn path_length_is_zero_for_point_components() {
        let info = sample_tree();
        assert_eq!(info.path_length(PathIndex::new(0)), 0.0);
    }

    #[test]
    fn move_translates_position_entry_and_exit_together() {
        let mut info = sample_tree();
        let guide_path_index = PathIndex::new(1);
        let before_entry = info.entry_point(guide_path_index);
        let offset = V3::new(0.0, 1.0, 0.0);
        info.move_path_component(guide_path_index, offset);
        assert_eq!(info.entry_point(guide_path_index), before_entry + offset);
    }
}
