//! Layer Model

use crate::ensemble::Ensemble;
use crate::params::ScatterParams;
use optics::Float;

/// Tissue layer containing a packet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Skin,
    Muscle,
    Bone,
    Escaped,
}

/// How the thickness parameters are turned into layer boundaries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LayerBounds {
    /// Muscle ends at `muscle` and bone ends at `bone`, measured from the
    /// entry plane, while their lower limits are cumulative. With thin muscle
    /// it leaves a band between the muscle and bone bounds that classifies as
    /// `Escaped`.
    #[default]
    Absolute,

    /// Slabs stacked by cumulative depth.
    Cumulative,
}

/// The three stacked slabs of the tissue model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerModel {
    /// Skin thickness (cm).
    pub skin: Float,

    /// Muscle thickness (cm).
    pub muscle: Float,

    /// Bone thickness (cm).
    pub bone: Float,

    /// Boundary interpretation.
    pub bounds: LayerBounds,
}

impl LayerModel {
    /// Create a new `LayerModel`.
    ///
    /// * `skin`   - Skin thickness.
    /// * `muscle` - Muscle thickness.
    /// * `bone`   - Bone thickness.
    /// * `bounds` - Boundary interpretation.
    pub fn new(skin: Float, muscle: Float, bone: Float, bounds: LayerBounds) -> Self {
        Self {
            skin,
            muscle,
            bone,
            bounds,
        }
    }

    /// Create the layer model for a parameter set.
    ///
    /// * `params` - Scatter parameters.
    /// * `bounds` - Boundary interpretation.
    pub fn from_params(params: &ScatterParams, bounds: LayerBounds) -> Self {
        Self::new(
            params.skin_thickness,
            params.muscle_thickness,
            params.bone_thickness,
            bounds,
        )
    }

    /// Returns the layer containing depth `z`.
    ///
    /// * `z` - Depth below the entry plane.
    pub fn classify(&self, z: Float) -> Layer {
        let muscle_top = self.skin;
        let bone_top = self.skin + self.muscle;
        let (muscle_bottom, bone_bottom) = match self.bounds {
            LayerBounds::Absolute => (self.muscle, self.bone),
            LayerBounds::Cumulative => (bone_top, bone_top + self.bone),
        };

        if (0.0..=self.skin).contains(&z) {
            Layer::Skin
        } else if z > muscle_top && z <= muscle_bottom {
            Layer::Muscle
        } else if z > bone_top && z <= bone_bottom {
            Layer::Bone
        } else {
            Layer::Escaped
        }
    }

    /// Classify every packet of the ensemble into `partition`.
    ///
    /// * `ensemble`  - The packets.
    /// * `partition` - Receives the packet indices per layer.
    pub fn partition(&self, ensemble: &Ensemble, partition: &mut LayerPartition) {
        partition.clear();
        for (i, &z) in ensemble.z.iter().enumerate() {
            match self.classify(z) {
                Layer::Skin => partition.skin.push(i),
                Layer::Muscle => partition.muscle.push(i),
                Layer::Bone => partition.bone.push(i),
                Layer::Escaped => (),
            }
        }
    }
}

/// Packet indices grouped by layer. The buffers are reused across rounds.
#[derive(Clone, Debug, Default)]
pub struct LayerPartition {
    /// Packets in the skin.
    pub skin: Vec<usize>,

    /// Packets in the muscle.
    pub muscle: Vec<usize>,

    /// Packets in the bone.
    pub bone: Vec<usize>,
}

impl LayerPartition {
    /// Empty all groups, keeping their allocations.
    pub fn clear(&mut self) {
        self.skin.clear();
        self.muscle.clear();
        self.bone.clear();
    }
}
