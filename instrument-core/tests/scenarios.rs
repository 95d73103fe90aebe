/*
* Licensed to Elasticsearch B.V. under one or more contributor
* license agreements. See the NOTICE file distributed with
* this work for additional information regarding copyright
* ownership. Elasticsearch B.V. licenses this file to you under
* the Apache License, Version 2.0 (the "License"); you may
* not use this file except in compliance with the License.
* You may obtain a copy of the License at
*
*  http://www.apache.org/licenses/LICENSE-2.0
*
* Unless required by applicable law or agreed to in writing,
* software distributed under the License is distributed on an
* "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
* KIND, either express or implied.  See the License for the
* specific language governing permissions and limitations
* under the License.
*/

use assert_approx_eq::assert_approx_eq;
use geometry_ids::{AssemblyIndex, ComponentId, ComponentIndex, DetectorId, DetectorIndex, SpectrumIndex};
use instrument_core::{
    parabolic_guide_length, AssemblyInfo, Component, ComponentInfo, DetectorInfo, FlatTree, Spectrum, SpectrumInfo,
};
use instrument_geometry::{Quat, V3};
use std::f64::consts::PI;
use std::sync::Arc;

fn cid(n: u64) -> ComponentId {
    ComponentId::new(n)
}

#[test]
fn trivial_l1_and_l2() {
    let root = Component::Composite {
        id: cid(0),
        children: vec![
            Component::PointSource { id: cid(1), position: V3::zero(), rotation: Quat::identity() },
            Component::PointSample { id: cid(2), position: V3::new(0.0, 0.0, 10.0), rotation: Quat::identity() },
            Component::Detector {
                id: cid(3),
                detector_id: DetectorId::new(0),
                position: V3::new(0.0, 0.0, 40.0),
                rotation: Quat::identity(),
            },
        ],
    };
    let tree = Arc::new(FlatTree::from_component_root(&root).unwrap());
    let detector_info = DetectorInfo::new(tree);
    assert_eq!(detector_info.l1(), 10.0);
    assert_eq!(detector_info.l2(DetectorIndex::new(0)).unwrap(), 30.0);
}

#[test]
fn composite_position_is_mean_of_children() {
    let composite = Component::Composite {
        id: cid(0),
        children: vec![
            Component::PointSource { id: cid(1), position: V3::new(1.0, 1.0, 1.0), rotation: Quat::identity() },
            Component::PointSource { id: cid(2), position: V3::new(2.0, 2.0, 2.0), rotation: Quat::identity() },
            Component::PointSource { id: cid(3), position: V3::new(3.0, 3.0, 3.0), rotation: Quat::identity() },
        ],
    };
    let pos = composite.position();
    assert_approx_eq!(pos.x, 2.0);
    assert_approx_eq!(pos.y, 2.0);
    assert_approx_eq!(pos.z, 2.0);
}

#[test]
fn parabolic_guide_length_nontrivial_and_degenerate_cases() {
    let nontrivial = parabolic_guide_length(1.0, 1.0);
    assert_approx_eq!(nontrivial, 5f64.sqrt() + 0.5 * 2f64.asinh(), 1e-12);

    let degenerate = parabolic_guide_length(2.0, 0.0);
    assert_approx_eq!(degenerate, 4.0, 1e-9);
}

#[test]
fn rotate_then_position_matches_quarter_turn_about_z() {
    let root = Component::Composite {
        id: cid(0),
        children: vec![
            Component::PointSource { id: cid(1), position: V3::zero(), rotation: Quat::identity() },
            Component::PointSample { id: cid(2), position: V3::new(0.0, 0.0, 10.0), rotation: Quat::identity() },
            Component::Detector {
                id: cid(3),
                detector_id: DetectorId::new(0),
                position: V3::new(1.0, 0.0, 0.0),
                rotation: Quat::identity(),
            },
        ],
    };
    let tree = Arc::new(FlatTree::from_component_root(&root).unwrap());
    let mut info = ComponentInfo::new(tree);
    let detector_index = ComponentIndex::new(3);
    info.rotate_component(detector_index, V3::new(0.0, 0.0, 1.0), PI / 2.0, V3::zero());

    let p = info.position(detector_index);
    assert_approx_eq!(p.x, 0.0, 1e-12);
    assert_approx_eq!(p.y, 1.0, 1e-12);

    let r = info.rotation(detector_index).rotate(&V3::new(1.0, 0.0, 0.0));
    assert_approx_eq!(r.x, 0.0, 1e-12);
    assert_approx_eq!(r.y, 1.0, 1e-12);
}

fn detector_bank_tree() -> Component {
    let mut detectors = Vec::with_capacity(100);
    let mut did = 0u64;
    for x in 0..10 {
        for y in 0..10 {
            detectors.push(Component::Detector {
                id: cid(100 + did),
                detector_id: DetectorId::new(did),
                position: V3::new(x as f64, y as f64, 50.0),
                rotation: Quat::identity(),
            });
            did += 1;
        }
    }
    Component::Composite {
        id: cid(0),
        children: vec![
            Component::PointSource { id: cid(1), position: V3::zero(), rotation: Quat::identity() },
            Component::PointSample { id: cid(2), position: V3::new(0.0, 0.0, 10.0), rotation: Quat::identity() },
            Component::Composite { id: cid(3), children: detectors },
        ],
    }
}

#[test]
fn assembly_translate_cascades_over_a_detector_bank() {
    let root = detector_bank_tree();
    let tree = Arc::new(FlatTree::from_component_root(&root).unwrap());
    let before = tree.start_positions().to_vec();
    let mut assembly = AssemblyInfo::new(ComponentInfo::new(tree.clone()));

    // Assembly index 1 is the bank composite: discovered after the root.
    let bank_index = AssemblyIndex::new(1);
    let offset = V3::new(5.0, 0.0, 0.0);
    assembly.move_assembly_component(bank_index, offset).unwrap();

    for &detector_comp_index in tree.detector_component_indexes() {
        let i = detector_comp_index.index();
        let actual = assembly.component_info().position(detector_comp_index);
        assert_eq!(actual, before[i] + offset);
    }
}

#[test]
fn move_via_component_info_moves_only_the_root_while_assembly_cascades() {
    let root = detector_bank_tree();
    let tree = Arc::new(FlatTree::from_component_root(&root).unwrap());

    let mut component_info = ComponentInfo::new(tree.clone());
    let root_index = ComponentIndex::new(0);
    let offset = V3::new(1.0, 0.0, 0.0);
    component_info.translate(root_index, offset);
    // Only the root's own slot moved; a detector's position is untouched.
    let some_detector = tree.detector_component_indexes()[0];
    assert_eq!(component_info.position(some_detector), tree.start_positions()[some_detector.index()]);

    let mut assembly = AssemblyInfo::new(ComponentInfo::new(tree.clone()));
    assembly.move_assembly_component(AssemblyIndex::new(0), offset).unwrap();
    // Cascaded via AssemblyInfo: the root's whole subtree (every component,
    // including every detector) shifts by `offset`.
    for &detector_comp_index in tree.detector_component_indexes() {
        let before = tree.start_positions()[detector_comp_index.index()];
        let actual = assembly.component_info().position(detector_comp_index);
        assert_eq!(actual, before + offset);
    }
}

#[test]
fn spectrum_aggregation_reports_exact_mean() {
    let root = Component::Composite {
        id: cid(0),
        children: vec![
            Component::PointSource { id: cid(1), position: V3::zero(), rotation: Quat::identity() },
            Component::PointSample { id: cid(2), position: V3::new(0.0, 0.0, 10.0), rotation: Quat::identity() },
            Component::Detector {
                id: cid(3),
                detector_id: DetectorId::new(0),
                position: V3::new(0.0, 0.0, 40.0),
                rotation: Quat::identity(),
            },
            Component::Detector {
                id: cid(4),
                detector_id: DetectorId::new(1),
                position: V3::new(0.0, 0.0, 30.0),
                rotation: Quat::identity(),
            },
        ],
    };
    let tree = Arc::new(FlatTree::from_component_root(&root).unwrap());
    let detector_info = DetectorInfo::new(tree);
    let spectra = vec![Spectrum::new(vec![DetectorIndex::new(0), DetectorIndex::new(1)])];
    let spectrum_info = SpectrumInfo::new(spectra, detector_info);
    assert_eq!(spectrum_info.l2(SpectrumIndex::new(0)).unwrap(), 35.0);
}

#[test]
fn missing_source_or_sample_is_rejected() {
    let no_source = Component::Composite {
        id: cid(0),
        children: vec![Component::PointSample { id: cid(1), position: V3::zero(), rotation: Quat::identity() }],
    };
    assert!(FlatTree::from_component_root(&no_source).is_err());

    let no_sample = Component::Composite {
        id: cid(0),
        children: vec![Component::PointSource { id: cid(1), position: V3::zero(), rotation: Quat::identity() }],
    };
    assert!(FlatTree::from_component_root(&no_sample).is_err());
}

#[test]
fn subtree_indexes_out_of_range_is_rejected() {
    let root = Component::Composite {
        id: cid(0),
        children: vec![
            Component::PointSource { id: cid(1), position: V3::zero(), rotation: Quat::identity() },
            Component::PointSample { id: cid(2), position: V3::new(0.0, 0.0, 10.0), rotation: Quat::identity() },
        ],
    };
    let tree = FlatTree::from_component_root(&root).unwrap();
    assert!(tree.sub_tree_indexes(ComponentIndex::new(tree.component_size())).is_err());
}
