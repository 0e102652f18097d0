//! Animation tracks and keyframes

use glam::Mat4;

use crate::scene::node::NodeId;

/// A single transform keyframe at a specific time
#[derive(Clone, Debug)]
pub struct TransformKeyframe {
    pub time: f32,
    pub transform: Mat4,
}

impl TransformKeyframe {
    /// Create a new keyframe with the given transform
    pub fn new(time: f32, transform: Mat4) -> Self {
        Self { time, transform }
    }
}

/// Animation track targeting a single scene node.
///
/// Keyframes are kept sorted strictly increasing by time: insertion
/// maintains the order, and inserting at an existing time replaces
/// that key.
#[derive(Clone, Debug)]
pub struct AnimationTrack {
    pub target: NodeId,
    keyframes: Vec<TransformKeyframe>,
}

impl AnimationTrack {
    /// Create a new empty track for the given node
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            keyframes: Vec::new(),
        }
    }

    /// Add a keyframe, keeping the track sorted by time
    pub fn add_keyframe(&mut self, keyframe: TransformKeyframe) {
        match self
            .keyframes
            .binary_search_by(|k| k.time.total_cmp(&keyframe.time))
        {
            Ok(pos) => self.keyframes[pos] = keyframe,
            Err(pos) => self.keyframes.insert(pos, keyframe),
        }
    }

    /// Keyframes in time order
    pub fn keyframes(&self) -> &[TransformKeyframe] {
        &self.keyframes
    }

    /// Whether this track has no keyframes (omitted from export)
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Get the duration of this track (time of last keyframe)
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map(|k| k.time).unwrap_or(0.0)
    }
}
