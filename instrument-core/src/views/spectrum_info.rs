//! `Spectrum`/`SpectrumInfo`: a spectrum-centric facade over `DetectorInfo`,
//! aggregating one or more detectors' L2 into a single reading per spectrum.

use crate::commands::Command;
use crate::errors::{InstrumentError, InstrumentResult, OutOfRangeKind};
use crate::views::detector_info::DetectorInfo;
use geometry_ids::{ComponentIndex, DetectorIndex, SpectrumIndex};

/// An ordered group of detector indexes read out as one spectrum. No
/// deduplication is performed: the same detector may appear in more than
/// one spectrum, or more than once in the same spectrum, if the caller asks
/// for that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spectrum {
    detector_indexes: Vec<DetectorIndex>,
}

impl Spectrum {
    /// Wraps a list of detector indexes as a spectrum.
    pub fn new(detector_indexes: Vec<DetectorIndex>) -> Self {
        Spectrum { detector_indexes }
    }

    /// A single-detector spectrum.
    pub fn single(detector_index: DetectorIndex) -> Self {
        Spectrum { detector_indexes: vec![detector_index] }
    }

    /// The detector indexes making up this spectrum.
    pub fn detector_indexes(&self) -> &[DetectorIndex] {
        &self.detector_indexes
    }

    /// Number of detectors contributing to this spectrum.
    pub fn len(&self) -> usize {
        self.detector_indexes.len()
    }

    /// Whether this spectrum has no detectors.
    pub fn is_empty(&self) -> bool {
        self.detector_indexes.is_empty()
    }
}

/// Spectrum-centric facade over `DetectorInfo`. Internally handles the
/// spectrum-to-detector mapping and reports derived quantities (currently:
/// L2) at the spectrum level.
#[derive(Clone)]
pub struct SpectrumInfo {
    detector_info: DetectorInfo,
    spectra: Vec<Spectrum>,
}

impl SpectrumInfo {
    /// 1:1 spectrum-to-detector mapping: spectrum `i` reads detector `i`.
    pub fn one_to_one(detector_info: DetectorInfo) -> Self {
        let spectra = (0..detector_info.n_detectors())
            .map(|i| Spectrum::single(DetectorIndex::new(i)))
            .collect();
        SpectrumInfo { detector_info, spectra }
    }

    /// General spectrum-to-detector mapping, given explicitly.
    pub fn new(spectra: Vec<Spectrum>, detector_info: DetectorInfo) -> Self {
        SpectrumInfo { detector_info, spectra }
    }

    /// Number of spectra.
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    /// Whether there are no spectra.
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    /// Total count of detector-spectrum memberships across all spectra
    /// (not the detector count of the backing instrument).
    pub fn n_detectors(&self) -> usize {
        self.spectra.iter().map(Spectrum::len).sum()
    }

    fn range_check(&self, spectrum_index: SpectrumIndex) -> InstrumentResult<()> {
        if spectrum_index.index() >= self.spectra.len() {
            Err(InstrumentError::OutOfRange(OutOfRangeKind::Spectrum))
        } else {
            Ok(())
        }
    }

    /// The detector membership of a spectrum.
    pub fn spectrum(&self, spectrum_index: SpectrumIndex) -> InstrumentResult<&Spectrum> {
        self.range_check(spectrum_index)?;
        Ok(&self.spectra[spectrum_index.index()])
    }

    /// Mean L2 across the spectrum's member detectors.
    pub fn l2(&self, spectrum_index: SpectrumIndex) -> InstrumentResult<f64> {
        self.range_check(spectrum_index)?;
        let spectrum = &self.spectra[spectrum_index.index()];
        let sum: f64 = spectrum
            .detector_indexes()
            .iter()
            .map(|&d| self.detector_info.l2(d))
            .collect::<InstrumentResult<Vec<f64>>>()?
            .into_iter()
            .sum();
        Ok(sum / spectrum.len() as f64)
    }

    /// Forwards a mutation to the wrapped `DetectorInfo`.
    pub fn modify(&mut self, node_index: ComponentIndex, command: &Command) -> InstrumentResult<bool> {
        self.detector_info.modify(node_index, command)
    }
}

impl PartialEq for SpectrumInfo {
    fn eq(&self, other: &Self) -> bool {
        self.spectra == other.spectra && self.detector_info == other.detector_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::flat_tree::FlatTree;
    use geometry_ids::{ComponentId, DetectorId};
    use instrument_geometry::{Quat, V3};
    use std::sync::Arc;

    fn cid(n: u64) -> ComponentId {
        ComponentId::new(n)
    }

    fn two_detector_tree() -> DetectorInfo {
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
                    position: V3::new(0.0, 0.0, 60.0),
                    rotation: Quat::identity(),
                },
            ],
        };
        let tree = Arc::new(FlatTree::from_component_root(&root).unwrap());
        DetectorInfo::new(tree)
    }

    #[test]
    fn one_to_one_mapping_reports_each_detectors_own_l2() {
        let info = SpectrumInfo::one_to_one(two_detector_tree());
        assert_eq!(info.l2(SpectrumIndex::new(0)).unwrap(), 30.0);
        assert_eq!(info.l2(SpectrumIndex::new(1)).unwrap(), 50.0);
    }

    #[test]
    fn grouped_spectrum_reports_mean_l2() {
        let spectra = vec![Spectrum::new(vec![DetectorIndex::new(0), DetectorIndex::new(1)])];
        let info = SpectrumInfo::new(spectra, two_detector_tree());
        assert_eq!(info.l2(SpectrumIndex::new(0)).unwrap(), 40.0);
    }

    #[test]
    fn out_of_range_spectrum_index_is_rejected() {
        let info = SpectrumInfo::one_to_one(two_detector_tree());
        let err = info.l2(SpectrumIndex::new(99)).unwrap_err();
        assert!(matches!(err, InstrumentError::OutOfRange(OutOfRangeKind::Spectrum)));
    }
}
