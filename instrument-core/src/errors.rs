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

//! The errors that can occur building or querying an instrument geometry
//! tree and its views.

use std::error::Error;
use std::fmt;

/// Helper type for a call that could go wrong.
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// What kind of index was out of range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutOfRangeKind {
    /// A `ComponentIndex` beyond `componentSize()`.
    Component,
    /// A `DetectorIndex` beyond `nDetectors()`.
    Detector,
    /// A `PathIndex` beyond `nPathComponents()`.
    PathComponent,
    /// A `SpectrumIndex` beyond the spectrum list length.
    Spectrum,
    /// An `AssemblyIndex` beyond the assembly list length.
    Assembly,
}

impl fmt::Display for OutOfRangeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OutOfRangeKind::Component => write!(f, "component index"),
            OutOfRangeKind::Detector => write!(f, "detector index"),
            OutOfRangeKind::PathComponent => write!(f, "path component index"),
            OutOfRangeKind::Spectrum => write!(f, "spectrum index"),
            OutOfRangeKind::Assembly => write!(f, "assembly index"),
        }
    }
}

/// Why tree construction rejected a component tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidInstrumentKind {
    /// No path component was marked as the source.
    NoSource,
    /// No path component was marked as the sample.
    NoSample,
    /// SOA constructor arrays disagree in length.
    LengthMismatch,
}

/// Error type for the instrument geometry core.
#[derive(Debug)]
pub enum InstrumentError {
    /// Tree construction produced an instrument that cannot answer queries
    /// requiring a source or sample, or was given inconsistent SOA arrays.
    InvalidInstrument(InvalidInstrumentKind),
    /// An indexed accessor was called with an index at or beyond the
    /// corresponding collection's size.
    OutOfRange(OutOfRangeKind),
    /// `cloneWithInstrumentTree` was called with a `FlatTree` whose detector
    /// count differs from the current one.
    InstrumentShapeMismatch,
    /// A mapper-style constructor was used before all mandatory fields were
    /// supplied.
    DeserializeIncomplete(&'static str),
}

impl fmt::Display for InstrumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InstrumentError::InvalidInstrument(InvalidInstrumentKind::NoSource) => {
                write!(f, "no source-marked path component in the instrument tree")
            }
            InstrumentError::InvalidInstrument(InvalidInstrumentKind::NoSample) => {
                write!(f, "no sample-marked path component in the instrument tree")
            }
            InstrumentError::InvalidInstrument(InvalidInstrumentKind::LengthMismatch) => {
                write!(f, "SOA arrays passed to FlatTree::from_soa disagree in length")
            }
            InstrumentError::OutOfRange(kind) => write!(f, "{} out of range", kind),
            InstrumentError::InstrumentShapeMismatch => write!(
                f,
                "the replacement instrument tree has a different detector count"
            ),
            InstrumentError::DeserializeIncomplete(field) => {
                write!(f, "missing mandatory field '{}' while deserializing", field)
            }
        }
    }
}

impl Error for InstrumentError {}
