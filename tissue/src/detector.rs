//! Ring Detectors

use crate::ensemble::Ensemble;
use optics::Float;

/// An annulus around the source axis on the entry plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RingDetector {
    /// Radial distance from the source axis to the ring center.
    pub distance: Float,

    /// Half-width of the ring.
    pub half_width: Float,
}

impl RingDetector {
    /// Create a new `RingDetector`.
    ///
    /// * `distance`   - Radial distance to the ring center.
    /// * `half_width` - Half-width of the ring.
    pub fn new(distance: Float, half_width: Float) -> Self {
        Self {
            distance,
            half_width,
        }
    }

    /// Returns `true` if a packet at the given position has left the tissue
    /// through the ring.
    #[inline]
    pub fn contains(&self, x: Float, y: Float, z: Float) -> bool {
        let r = x.hypot(y);
        z < 0.0 && r > self.distance - self.half_width && r <= self.distance + self.half_width
    }

    /// Returns the amplitude and path lengths of the packets in the ring.
    ///
    /// * `ensemble` - The packets.
    pub fn collect(&self, ensemble: &Ensemble) -> Detection {
        let mut detection = Detection::default();
        for i in 0..ensemble.len() {
            if self.contains(ensemble.x[i], ensemble.y[i], ensemble.z[i]) {
                detection.amplitude += ensemble.amplitude[i];
                detection.path_lengths.push(ensemble.path[i]);
            }
        }
        detection
    }
}

/// Packets seen by a detector in one round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    /// Summed amplitude.
    pub amplitude: Float,

    /// Path length of every detected packet.
    pub path_lengths: Vec<Float>,
}

/// Running total of one detector over a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectorTally {
    /// Summed amplitude over all rounds.
    pub total: Float,

    /// Path lengths over all rounds.
    pub path_lengths: Vec<Float>,
}

impl DetectorTally {
    /// Add a round's detection to the tally.
    ///
    /// * `detection` - The detection.
    pub fn record(&mut self, detection: Detection) {
        self.total += detection.amplitude;
        self.path_lengths.extend(detection.path_lengths);
    }

    /// Returns the mean path length of the detected packets, or `None` if
    /// nothing has been detected.
    pub fn mean_path_length(&self) -> Option<Float> {
        if self.path_lengths.is_empty() {
            None
        } else {
            let sum: Float = self.path_lengths.iter().sum();
            Some(sum / self.path_lengths.len() as Float)
        }
    }
}
