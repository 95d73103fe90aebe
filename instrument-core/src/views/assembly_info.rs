//! `AssemblyInfo`: a facade over `ComponentInfo` restricted to the branch
//! (composite) nodes of the tree, cascading moves and rotations through the
//! whole subtree rooted at each one.

use crate::errors::InstrumentResult;
use crate::views::component_info::ComponentInfo;
use geometry_ids::{AssemblyIndex, ComponentIndex};
use instrument_geometry::V3;

/// View over the composite ("assembly") nodes of a tree: every move or
/// rotation addressed to one assembly component is cascaded through its
/// whole subtree.
#[derive(Clone)]
pub struct AssemblyInfo {
    component_info: ComponentInfo,
    assembly_component_indexes: Vec<ComponentIndex>,
}

impl AssemblyInfo {
    /// Builds a view over every branch node in `component_info`'s tree, in
    /// discovery order.
    pub fn new(component_info: ComponentInfo) -> Self {
        let assembly_component_indexes = component_info.flat_tree().branch_component_indexes();
        AssemblyInfo { component_info, assembly_component_indexes }
    }

    /// Number of assembly components.
    pub fn len(&self) -> usize {
        self.assembly_component_indexes.len()
    }

    /// Whether there are no assembly components.
    pub fn is_empty(&self) -> bool {
        self.assembly_component_indexes.is_empty()
    }

    /// The wrapped `ComponentInfo`, for reading positions of components
    /// other than the assembly nodes themselves.
    pub fn component_info(&self) -> &ComponentInfo {
        &self.component_info
    }

    fn comp_index(&self, assembly_index: AssemblyIndex) -> ComponentIndex {
        self.assembly_component_indexes[assembly_index.index()]
    }

    /// Position of the assembly node itself (the mean of its children, per
    /// `Component::position`, frozen into the tree at parse time).
    pub fn position(&self, assembly_index: AssemblyIndex) -> V3 {
        self.component_info.position(self.comp_index(assembly_index))
    }

    /// Rotation of the assembly node itself.
    pub fn rotation(&self, assembly_index: AssemblyIndex) -> instrument_geometry::Quat {
        self.component_info.rotation(self.comp_index(assembly_index))
    }

    /// Translates every component in the subtree rooted at `assembly_index`
    /// by `offset`.
    pub fn move_assembly_component(&mut self, assembly_index: AssemblyIndex, offset: V3) -> InstrumentResult<()> {
        let top = self.comp_index(assembly_index);
        let subtree = self.component_info.flat_tree().sub_tree_indexes(top)?;
        for comp_index in subtree {
            self.component_info.translate(comp_index, offset);
        }
        Ok(())
    }

    /// Rotates every component in the subtree rooted at `assembly_index`
    /// about `center`.
    pub fn rotate_assembly_component(
        &mut self,
        assembly_index: AssemblyIndex,
        axis: V3,
        theta: f64,
        center: V3,
    ) -> InstrumentResult<()> {
        let top = self.comp_index(assembly_index);
        let subtree = self.component_info.flat_tree().sub_tree_indexes(top)?;
        for comp_index in subtree {
            self.component_info.rotate_component(comp_index, axis, theta, center);
        }
        Ok(())
    }
}

impl PartialEq for AssemblyInfo {
    fn eq(&self, other: &Self) -> bool {
        self.component_info == other.component_info
    }
}
