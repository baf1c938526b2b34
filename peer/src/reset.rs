use log::{debug, info};

use tether_shared::{ObjectId, PeerId, PeerMessage, Placement, VolumeId, World};

use crate::{attachable::Attachable, events::AttachmentEvent, peer::Context, transport::Network};

impl Attachable {
    /// Put the object back where it was at init, idle, still and in its
    /// initial physics mode
    pub(crate) fn reset_to_origin<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        ctx.world.force_drop(self.id);
        ctx.world.zero_velocity(self.id);

        let origin = self.origin();
        self.set_placement(Placement::Idle(origin));
        ctx.world.set_kinematic(self.id, !self.was_dynamic_at_init());
        ctx.world.set_pose(self.id, origin);

        self.log(format_args!("reset to origin"));
        ctx.events.push(AttachmentEvent::Reset { object: self.id });
    }

    /// Schedule the delayed reset broadcast. Returns false if the local peer
    /// does not own the object or a reset is already on its way.
    pub(crate) fn request_reset<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) -> bool {
        if self.reset_pending {
            return false;
        }
        if !self.ownership.is_local(ctx.network) {
            return false;
        }

        self.reset_pending = true;
        ctx.scheduler.schedule_reset(self.id);
        self.log(format_args!("reset scheduled"));
        true
    }

    /// Delayed half of `request_reset`
    pub(crate) fn fire_reset<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        self.reset_pending = false;
        if !self.ownership.is_local(ctx.network) {
            debug!("{:?} changed owner before its reset fired, dropped", self.id);
            return;
        }

        let message = PeerMessage::ResetPosition {
            author: ctx.network.local_peer(),
            object: self.id,
        };
        ctx.network.send(message.to_bytes());
        self.reset_to_origin(ctx);
    }

    pub(crate) fn on_volume_exit<W: World, N: Network>(
        &mut self,
        volume: VolumeId,
        ctx: &mut Context<W, N>,
    ) {
        if self.config.bounding_volume != Some(volume) {
            return;
        }
        self.request_reset(ctx);
    }

    /// Fallback trigger for objects without a bounding volume
    pub(crate) fn check_fall<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        let Some(threshold) = self.config.fall_threshold() else {
            return;
        };
        if ctx.world.pose(self.id).position.y < threshold {
            self.request_reset(ctx);
        }
    }
}

/// Batch reset trigger: one shared volume guarding many objects, checked
/// once per exit of the local player
pub struct VolumeWatch {
    pub(crate) volume: VolumeId,
    pub(crate) objects: Vec<ObjectId>,
    pub(crate) debug: bool,
}

impl VolumeWatch {
    pub fn new(volume: VolumeId, objects: Vec<ObjectId>) -> Self {
        Self {
            volume,
            objects,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn volume(&self) -> VolumeId {
        self.volume
    }

    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Whether this exit event concerns the watch at all
    pub(crate) fn triggered_by(&self, volume: VolumeId, player: PeerId, local: PeerId) -> bool {
        if volume != self.volume {
            return false;
        }
        if player != local {
            if self.debug {
                info!("[VolumeWatch] {:?} exited by remote player {:?}", volume, player);
            }
            return false;
        }
        if self.debug {
            info!(
                "[VolumeWatch] local player left {:?}, checking {} objects",
                volume,
                self.objects.len()
            );
        }
        true
    }
}

/// Forwards object exits of a shared volume to the reset controller of the
/// object that left. Disabled until `with_enabled(true)`.
pub struct ExitRelay {
    pub(crate) volume: VolumeId,
    pub(crate) objects: Vec<ObjectId>,
    pub(crate) enabled: bool,
}

impl ExitRelay {
    pub fn new(volume: VolumeId, objects: Vec<ObjectId>) -> Self {
        Self {
            volume,
            objects,
            enabled: false,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn volume(&self) -> VolumeId {
        self.volume
    }

    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn relays(&self, volume: VolumeId, object: ObjectId) -> bool {
        self.enabled && volume == self.volume && self.objects.contains(&object)
    }
}
