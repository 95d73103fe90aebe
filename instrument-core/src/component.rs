//! The component model: the tagged-union geometry primitives an instrument
//! tree is built from before it is flattened into a `FlatTree`.

use crate::config::PARABOLIC_GUIDE_DEGENERATE_H;
use geometry_ids::ComponentId;
use instrument_geometry::{Quat, V3};

/// A node in a hierarchical instrument tree. Each variant carries a stable
/// `ComponentId` assigned by the caller.
#[derive(Clone, Debug)]
pub enum Component {
    /// A neutron detector. Not itself a path component.
    Detector {
        id: ComponentId,
        detector_id: geometry_ids::DetectorId,
        position: V3,
        rotation: Quat,
    },
    /// The neutron source. A zero-length path component.
    PointSource { id: ComponentId, position: V3, rotation: Quat },
    /// The sample. A zero-length path component.
    PointSample { id: ComponentId, position: V3, rotation: Quat },
    /// A parabolic guide segment. A path component with nonzero length.
    ParabolicGuide {
        id: ComponentId,
        position: V3,
        rotation: Quat,
        a: f64,
        h: f64,
    },
    /// An ordered group of child components, aggregated as a subtree.
    Composite { id: ComponentId, children: Vec<Component> },
    /// An inert placeholder: neither a path component nor a detector.
    Null { id: ComponentId },
}

impl Component {
    /// The stable id of this node.
    pub fn id(&self) -> ComponentId {
        match *self {
            Component::Detector { id, .. }
            | Component::PointSource { id, .. }
            | Component::PointSample { id, .. }
            | Component::ParabolicGuide { id, .. }
            | Component::Composite { id, .. }
            | Component::Null { id } => id,
        }
    }

    /// This node's position. A `Composite`'s position is the mean of its
    /// children's positions; a `Null` has no natural position and reports
    /// the origin.
    pub fn position(&self) -> V3 {
        match self {
            Component::Detector { position, .. }
            | Component::PointSource { position, .. }
            | Component::PointSample { position, .. }
            | Component::ParabolicGuide { position, .. } => *position,
            Component::Composite { children, .. } => {
                let positions: Vec<V3> = children.iter().map(|c| c.position()).collect();
                if positions.is_empty() {
                    V3::zero()
                } else {
                    V3::mean(&positions)
                }
            }
            Component::Null { .. } => V3::zero(),
        }
    }

    /// This node's orientation. A `Composite` reports its first child's
    /// orientation as a representative rotation; there is no well-defined
    /// mean of several quaternions here.
    pub fn rotation(&self) -> Quat {
        match self {
            Component::Detector { rotation, .. }
            | Component::PointSource { rotation, .. }
            | Component::PointSample { rotation, .. }
            | Component::ParabolicGuide { rotation, .. } => *rotation,
            Component::Composite { children, .. } => {
                children.first().map(|c| c.rotation()).unwrap_or_else(Quat::identity)
            }
            Component::Null { .. } => Quat::identity(),
        }
    }

    /// Whether this node contributes to the neutron flight path.
    pub fn is_path_component(&self) -> bool {
        matches!(
            self,
            Component::PointSource { .. } | Component::PointSample { .. } | Component::ParabolicGuide { .. }
        )
    }

    /// Whether this node is the (unique, first-discovered) source.
    pub fn is_source(&self) -> bool {
        matches!(self, Component::PointSource { .. })
    }

    /// Whether this node is the (unique, first-discovered) sample.
    pub fn is_sample(&self) -> bool {
        matches!(self, Component::PointSample { .. })
    }

    /// Whether this node is a detector.
    pub fn is_detector(&self) -> bool {
        matches!(self, Component::Detector { .. })
    }

    /// The detector id, if this is a `Detector`.
    pub fn detector_id(&self) -> Option<geometry_ids::DetectorId> {
        match self {
            Component::Detector { detector_id, .. } => Some(*detector_id),
            _ => None,
        }
    }

    /// Entry point of this path component. Zero-length path components
    /// (source, sample) enter and exit at their own position.
    pub fn entry_point(&self) -> V3 {
        match self {
            Component::PointSource { position, .. } | Component::PointSample { position, .. } => *position,
            Component::ParabolicGuide { position, a, .. } => V3::new(position.x - a, position.y, position.z),
            _ => self.position(),
        }
    }

    /// Exit point of this path component.
    pub fn exit_point(&self) -> V3 {
        match self {
            Component::PointSource { position, .. } | Component::PointSample { position, .. } => *position,
            Component::ParabolicGuide { position, a, .. } => V3::new(position.x + a, position.y, position.z),
            _ => self.position(),
        }
    }

    /// Flight-path length contributed by this node; zero for the
    /// zero-length point components.
    pub fn path_length(&self) -> f64 {
        match self {
            Component::PointSource { .. } | Component::PointSample { .. } => 0.0,
            Component::ParabolicGuide { a, h, .. } => parabolic_guide_length(*a, *h),
            _ => 0.0,
        }
    }

    /// The children of a `Composite`, or an empty slice for leaf variants.
    pub fn children(&self) -> &[Component] {
        match self {
            Component::Composite { children, .. } => children,
            _ => &[],
        }
    }
}

/// Arc length of the parabolic segment `y = h*(1 - x^2/a^2)` on `x in
/// [-a, a]`. As `h -> 0` the parabola degenerates to a flat segment of
/// length `2*a`, which is the limit of the closed form below (the
/// `asinh(2h/a)/h` factor stays bounded as `h -> 0`, but evaluating it near
/// `h == 0` is numerically unstable, so the degenerate case is handled
/// directly).
pub fn parabolic_guide_length(a: f64, h: f64) -> f64 {
    assert!(a >= 0.0, "parabolic guide 'a' must be >= 0");
    assert!(h >= 0.0, "parabolic guide 'h' must be >= 0");
    if h < PARABOLIC_GUIDE_DEGENERATE_H {
        return 2.0 * a;
    }
    (a * a + 4.0 * h * h).sqrt() + (a * a / (2.0 * h)) * (2.0 * h / a).asinh()
}
