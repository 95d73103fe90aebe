//! The closed set of mutation commands that can be applied to a component
//! tree. A sum type rather than a trait object: the set of commands is
//! small and fixed, so matching beats virtual dispatch.

use crate::component::Component;
use geometry_ids::DetectorId;
use instrument_geometry::{AffineXform, V3};

/// A mutation applied to a single component, or cascaded through a
/// subtree. `execute` returns whether it actually changed anything, which
/// callers use to decide whether downstream caches need invalidating.
#[derive(Clone, Debug)]
pub enum Command {
    /// Translates a single component's position by `offset`.
    Move(V3),
    /// Rotates a single component in place about `center`.
    Rotate { axis: V3, theta: f64, center: V3 },
    /// Removes the named detectors from the tree, cascading through
    /// composites.
    DetectorPurge(Vec<DetectorId>),
}

impl Command {
    /// Applies this command to `component`, returning whether it changed
    /// anything.
    pub fn execute(&self, component: &mut Component) -> bool {
        match self {
            Command::Move(offset) => apply_move(component, offset),
            Command::Rotate { axis, theta, center } => apply_rotate(component, axis, *theta, center),
            Command::DetectorPurge(ids) => apply_purge(component, ids),
        }
    }
}

fn apply_move(component: &mut Component, offset: &V3) -> bool {
    match component {
        Component::Detector { position, .. }
        | Component::PointSource { position, .. }
        | Component::PointSample { position, .. }
        | Component::ParabolicGuide { position, .. } => {
            *position = *position + *offset;
            true
        }
        _ => false,
    }
}

fn apply_rotate(component: &mut Component, axis: &V3, theta: f64, center: &V3) -> bool {
    let xform = AffineXform::new(axis, theta, *center);
    match component {
        Component::Detector { position, rotation, .. }
        | Component::PointSource { position, rotation, .. }
        | Component::PointSample { position, rotation, .. }
        | Component::ParabolicGuide { position, rotation, .. } => {
            *position = xform.apply_point(position);
            *rotation = xform.rotation().mul(rotation);
            true
        }
        _ => false,
    }
}

fn apply_purge(component: &mut Component, ids: &[DetectorId]) -> bool {
    match component {
        Component::Composite { children, .. } => {
            let before = children.len();
            children.retain(|c| !(c.is_detector() && c.detector_id().map_or(false, |d| ids.contains(&d))));
            let mut changed = children.len() != before;
            for child in children.iter_mut() {
                changed |= apply_purge(child, ids);
            }
            changed
        }
        _ => false,
    }
}
