use std::default::Default;

use crate::types::{AnchorId, VolumeId};

/// Which gesture runs the attach test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachMode {
    /// Releasing the grab inside the radius attaches the object
    OnDrop,
    /// A separate confirm gesture while holding attaches; a plain drop always
    /// leaves the object idle
    OnUse,
}

/// Author-time configuration of one attachable object
#[derive(Clone, Debug)]
pub struct AttachableConfig {
    /// Body anchor the object attaches to
    pub anchor: AnchorId,
    /// Maximum distance between object and anchor for the attach test
    /// (inclusive). Negative values are treated as zero.
    pub radius: f32,
    /// Only peers in immersive mode may attach
    pub vr_only: bool,
    pub attach_mode: AttachMode,
    /// Leaving this volume resets the object
    pub bounding_volume: Option<VolumeId>,
    /// Falling below this height resets the object. Ignored when a bounding
    /// volume is set.
    pub reset_height: f32,
    /// Never toggle the rigid body between kinematic and dynamic
    pub ignore_physics_toggle: bool,
    /// Emit diagnostic log lines for this object
    pub debug: bool,
    /// Idle moves at or below this distance are not published
    pub idle_sync_epsilon: f32,
}

impl AttachableConfig {
    pub fn new(anchor: AnchorId) -> Self {
        Self {
            anchor,
            ..Self::default()
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_attach_mode(mut self, attach_mode: AttachMode) -> Self {
        self.attach_mode = attach_mode;
        self
    }

    pub fn with_vr_only(mut self, vr_only: bool) -> Self {
        self.vr_only = vr_only;
        self
    }

    pub fn with_bounding_volume(mut self, volume: VolumeId) -> Self {
        self.bounding_volume = Some(volume);
        self
    }

    pub fn with_reset_height(mut self, reset_height: f32) -> Self {
        self.reset_height = reset_height;
        self
    }

    pub fn with_ignore_physics_toggle(mut self, ignore: bool) -> Self {
        self.ignore_physics_toggle = ignore;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_idle_sync_epsilon(mut self, epsilon: f32) -> Self {
        self.idle_sync_epsilon = epsilon;
        self
    }

    /// Radius used by the attach test. NaN and negative values become zero.
    pub fn effective_radius(&self) -> f32 {
        if self.radius > 0.0 {
            self.radius
        } else {
            0.0
        }
    }

    /// Clamp out-of-range values in place. Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let radius = self.effective_radius();
        let epsilon = if self.idle_sync_epsilon > 0.0 {
            self.idle_sync_epsilon
        } else {
            0.0
        };
        let changed = radius.to_bits() != self.radius.to_bits()
            || epsilon.to_bits() != self.idle_sync_epsilon.to_bits();

        self.radius = radius;
        self.idle_sync_epsilon = epsilon;
        changed
    }

    pub fn attach_on_drop(&self) -> bool {
        self.attach_mode == AttachMode::OnDrop
    }

    /// Height threshold that applies to this object, if any
    pub fn fall_threshold(&self) -> Option<f32> {
        match self.bounding_volume {
            Some(_) => None,
            None => Some(self.reset_height),
        }
    }
}

impl Default for AttachableConfig {
    fn default() -> Self {
        Self {
            anchor: AnchorId::CHEST,
            radius: 0.3,
            vr_only: false,
            attach_mode: AttachMode::OnUse,
            bounding_volume: None,
            reset_height: -50.0,
            ignore_physics_toggle: false,
            debug: false,
            idle_sync_epsilon: 1e-4,
        }
    }
}
