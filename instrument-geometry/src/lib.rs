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
//! # Instrument Geometry
//! The numeric primitives instrument geometry trees are built from: 3-vectors,
//! unit quaternions, and the rigid-body affine transform used to move and
//! rotate components.

#![allow(dead_code)]
#![warn(missing_docs)]

mod vector;
pub use vector::V3;

mod quat;
pub use quat::Quat;

mod xform;
pub use xform::AffineXform;

mod distance;
pub use distance::distance;
