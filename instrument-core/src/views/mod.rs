//! Copy-on-write views layered over a shared, immutable `FlatTree`. Each
//! view owns only the overlay data relevant to its facet of the instrument
//! (positions, path geometry, detector metadata, branch structure, spectra);
//! cloning a view is cheap until the clone is actually mutated.

pub mod assembly_info;
pub mod component_info;
pub mod detector_info;
pub mod path_component_info;
pub mod spectrum_info;

pub use assembly_info::AssemblyInfo;
pub use component_info::{ComponentInfo, ScanTime};
pub use detector_info::DetectorInfo;
pub use path_component_info::PathComponentInfo;
pub use spectrum_info::{Spectrum, SpectrumInfo};
