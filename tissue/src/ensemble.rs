//! Photon Ensemble

use optics::Float;

/// A population of photon packets stored column-wise. All columns always have
/// the same length and index `i` refers to the same packet in every column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ensemble {
    /// x-coordinates (cm).
    pub x: Vec<Float>,

    /// y-coordinates (cm).
    pub y: Vec<Float>,

    /// z-coordinates (cm). z = 0 is the entry plane and z grows with depth.
    pub z: Vec<Float>,

    /// Cumulative path length since injection (cm).
    pub path: Vec<Float>,

    /// Surviving fraction of the injected energy.
    pub amplitude: Vec<Float>,
}

impl Ensemble {
    /// Create an empty ensemble with room for `capacity` packets.
    ///
    /// * `capacity` - Number of packets to reserve space for.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
            path: Vec::with_capacity(capacity),
            amplitude: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of packets.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if there are no packets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reserve room for `additional` more packets.
    ///
    /// * `additional` - Number of packets.
    pub fn reserve(&mut self, additional: usize) {
        self.x.reserve(additional);
        self.y.reserve(additional);
        self.z.reserve(additional);
        self.path.reserve(additional);
        self.amplitude.reserve(additional);
    }

    /// Append a packet.
    ///
    /// * `x`         - x-coordinate.
    /// * `y`         - y-coordinate.
    /// * `z`         - z-coordinate.
    /// * `path`      - Cumulative path length.
    /// * `amplitude` - Amplitude.
    pub fn push(&mut self, x: Float, y: Float, z: Float, path: Float, amplitude: Float) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
        self.path.push(path);
        self.amplitude.push(amplitude);
    }

    /// Keep only the packets for which `keep` returns `true`, preserving their
    /// relative order. Compacts the columns in place without reallocating.
    /// Returns the number of packets retained.
    ///
    /// * `keep` - Predicate over the packet index in the current ensemble.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Self, usize) -> bool,
    {
        let n = self.len();
        let mut write = 0;
        for read in 0..n {
            if keep(self, read) {
                if write != read {
                    self.x[write] = self.x[read];
                    self.y[write] = self.y[read];
                    self.z[write] = self.z[read];
                    self.path[write] = self.path[read];
                    self.amplitude[write] = self.amplitude[read];
                }
                write += 1;
            }
        }
        self.truncate(write);
        write
    }

    /// Shortens the ensemble to `len` packets.
    fn truncate(&mut self, len: usize) {
        self.x.truncate(len);
        self.y.truncate(len);
        self.z.truncate(len);
        self.path.truncate(len);
        self.amplitude.truncate(len);
    }
}
