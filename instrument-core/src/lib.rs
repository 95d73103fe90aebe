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

#![allow(dead_code)]

//! # Instrument Core
//! A flattened, structure-of-arrays representation of a neutron-scattering
//! instrument's geometry, and a family of copy-on-write views over it.
//!
//! A hierarchical tree of [`Component`]s is parsed once into an immutable
//! [`FlatTree`]; everything downstream of that (per-component positions and
//! rotations, flight-path entry/exit points, detector L1/L2 distances,
//! branch-level moves, spectrum aggregation) is a cheap-to-clone view that
//! shares the backing arrays until something actually mutates them.
//!
//! ## Mutation
//! Views are not mutated in place by arbitrary code; they are driven through
//! the small, closed set of [`Command`]s (`Move`, `Rotate`, `DetectorPurge`),
//! so every caller goes through the same cache-invalidation path.

pub mod commands;
pub mod component;
pub mod config;
pub mod cow;
pub mod errors;
mod flat_tree;
mod parser;
pub mod views;

pub use commands::Command;
pub use component::{parabolic_guide_length, Component};
pub use cow::CowSlice;
pub use errors::{InstrumentError, InstrumentResult, InvalidInstrumentKind, OutOfRangeKind};
pub use flat_tree::{ComponentProxy, FlatTree};
pub use parser::ParseSummary;
pub use views::{AssemblyInfo, ComponentInfo, DetectorInfo, PathComponentInfo, ScanTime, Spectrum, SpectrumInfo};
