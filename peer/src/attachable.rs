use log::{debug, info, trace};

use tether_shared::{
    apply_offset, compute_offset, AttachableConfig, Hand, ObjectId, PeerId, PeerMessage,
    Placement, Pose, Snapshot, Version, World,
};

use crate::{
    events::{AttachmentEvent, DiscardReason},
    ownership::{OwnerStatus, OwnershipAuthority},
    peer::Context,
    replication::{idle_moved, Admission, ReplicationChannel},
    transport::Network,
};

/// Local-only prediction of what the local peer is doing with an object.
/// Never replicated; remote peers derive their view from the `Placement`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    Idle,
    /// Held in a hand by the local peer, offset tracked every frame
    Held,
    /// Locked to a body anchor by the local peer
    Attached,
}

/// One networked attachable object as seen from the local peer
pub struct Attachable {
    pub(crate) id: ObjectId,
    pub(crate) config: AttachableConfig,
    origin: Pose,
    was_dynamic: bool,
    placement: Placement,
    prediction: Prediction,
    pub(crate) ownership: OwnershipAuthority,
    pub(crate) replication: ReplicationChannel,
    pub(crate) reset_pending: bool,
    owner_kinematic: Option<bool>,
}

impl Attachable {
    /// Capture the origin pose and physics mode of an object that already
    /// exists in the local world
    pub(crate) fn new<W: World>(id: ObjectId, mut config: AttachableConfig, world: &mut W) -> Self {
        if config.sanitize() {
            debug!("clamped out-of-range configuration for {:?}", id);
        }
        if !config.attach_on_drop() {
            world.set_auto_hold(id, true);
        }

        let origin = world.pose(id);
        Self {
            id,
            origin,
            was_dynamic: !world.is_kinematic(id),
            placement: Placement::Idle(origin),
            prediction: Prediction::Idle,
            ownership: OwnershipAuthority::new(id),
            replication: ReplicationChannel::new(),
            reset_pending: false,
            owner_kinematic: None,
            config,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn config(&self) -> &AttachableConfig {
        &self.config
    }

    pub fn origin(&self) -> Pose {
        self.origin
    }

    pub fn was_dynamic_at_init(&self) -> bool {
        self.was_dynamic
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn prediction(&self) -> Prediction {
        self.prediction
    }

    /// Last owner this peer resolved. Decisions never rely on it.
    pub fn cached_owner(&self) -> Option<PeerId> {
        self.ownership.cached()
    }

    /// Kinematic flag reported by the author of the last applied snapshot
    pub fn owner_kinematic(&self) -> Option<bool> {
        self.owner_kinematic
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn last_sent(&self) -> Option<&Snapshot> {
        self.replication.last_sent()
    }

    /// Author and version of the last snapshot applied here
    pub fn last_applied(&self) -> Option<(PeerId, Version)> {
        self.replication.last_applied()
    }

    /// The single place the replicated placement changes. Clears the local
    /// prediction; callers that keep holding or attaching set it again.
    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.prediction = Prediction::Idle;
        self.placement = placement;
    }

    pub(crate) fn log(&self, message: std::fmt::Arguments) {
        if self.config.debug {
            info!("[Tether] {:?}: {}", self.id, message);
        }
    }

    // Gestures

    pub(crate) fn on_pickup<W: World, N: Network>(&mut self, hand: Hand, ctx: &mut Context<W, N>) {
        if self.ownership.request(ctx.network) {
            self.log(format_args!("took ownership"));
        }

        let local = ctx.network.local_peer();
        let anchor = hand.anchor();
        let offset = compute_offset(
            &ctx.world.pose(self.id),
            &ctx.world.anchor_pose(local, anchor),
        );
        self.set_placement(Placement::attached(anchor, offset));
        self.prediction = Prediction::Held;
        self.force_kinematic(ctx.world);

        self.log(format_args!("picked up with {:?}", hand));
        ctx.events.push(AttachmentEvent::PickedUp {
            object: self.id,
            hand,
        });
        self.publish(ctx);
    }

    pub(crate) fn on_drop<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        if !self.ownership.is_local(ctx.network) {
            self.release_local(ctx);
            return;
        }
        if self.prediction != Prediction::Held {
            return;
        }

        if self.config.attach_on_drop() {
            self.try_attach(ctx);
        }

        if self.prediction == Prediction::Held {
            let pose = ctx.world.pose(self.id);
            self.set_placement(Placement::Idle(pose));
            self.restore_physics(ctx.world);

            self.log(format_args!("dropped"));
            ctx.events.push(AttachmentEvent::Released { object: self.id });
        }
        self.publish(ctx);
    }

    pub(crate) fn on_use_confirm<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        if self.config.attach_on_drop() {
            return;
        }
        if !self.ownership.is_local(ctx.network) {
            return;
        }
        if self.prediction != Prediction::Held {
            return;
        }

        if self.try_attach(ctx) {
            self.publish(ctx);
        }
    }

    /// Distance and mode test against the configured body anchor. On success
    /// the object is locked to the anchor at its current offset.
    fn try_attach<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) -> bool {
        let local = ctx.network.local_peer();
        let anchor = self.config.anchor;
        let anchor_pose = ctx.world.anchor_pose(local, anchor);
        let pose = ctx.world.pose(self.id);

        let distance = pose.distance(&anchor_pose);
        let in_reach = distance <= self.config.effective_radius();
        let mode_allowed = !self.config.vr_only || ctx.world.is_immersive(local);

        if !(in_reach && mode_allowed) {
            self.log(format_args!(
                "attach rejected at distance {} (in reach: {}, mode allowed: {})",
                distance, in_reach, mode_allowed
            ));
            ctx.events.push(AttachmentEvent::AttachRejected {
                object: self.id,
                distance,
            });
            return false;
        }

        self.set_placement(Placement::attached(anchor, compute_offset(&pose, &anchor_pose)));
        self.prediction = Prediction::Attached;
        self.force_kinematic(ctx.world);
        if !self.config.attach_on_drop() {
            ctx.world.force_drop(self.id);
        }

        self.log(format_args!("attached to {:?}", anchor));
        ctx.events.push(AttachmentEvent::Attached {
            object: self.id,
            anchor,
        });
        true
    }

    // Ownership

    pub(crate) fn on_ownership_transferred<W: World, N: Network>(
        &mut self,
        new_owner: PeerId,
        ctx: &mut Context<W, N>,
    ) {
        self.ownership.transferred(new_owner);
        if new_owner != ctx.network.local_peer() {
            self.release_local(ctx);
            return;
        }
        if self.prediction == Prediction::Idle && self.placement.is_attached() {
            self.settle(ctx);
        }
    }

    /// Ownership arrived without a gesture while the object was attached to
    /// the previous owner. Leave it idle where it is.
    fn settle<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        let pose = ctx.world.pose(self.id);
        self.set_placement(Placement::Idle(pose));
        self.restore_physics(ctx.world);

        self.log(format_args!("inherited while attached, released in place"));
        ctx.events.push(AttachmentEvent::Released { object: self.id });
        self.publish(ctx);
    }

    /// Give up everything the local peer was doing with the object. The
    /// replicated placement is left for the new owner to overwrite.
    fn release_local<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        ctx.world.force_drop(self.id);
        if self.prediction == Prediction::Idle {
            return;
        }

        self.prediction = Prediction::Idle;
        self.log(format_args!("lost ownership"));
        ctx.events.push(AttachmentEvent::OwnershipLost {
            object: self.id,
            new_owner: self.ownership.cached(),
        });
    }

    // Frame

    /// Late pass of the frame: anchors have moved, write the object pose
    pub(crate) fn late_update<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        let local = ctx.network.local_peer();
        let owner = self.ownership.resolve(ctx.network);

        if !owner.is_local() && self.prediction != Prediction::Idle {
            self.release_local(ctx);
        }

        match (self.prediction, self.placement) {
            (Prediction::Attached, Placement::Attached { anchor, offset }) => {
                let anchor_pose = ctx.world.anchor_pose(local, anchor);
                ctx.world.set_pose(self.id, apply_offset(&anchor_pose, &offset));
            }
            (Prediction::Held, Placement::Attached { anchor, .. }) => {
                let offset = compute_offset(
                    &ctx.world.pose(self.id),
                    &ctx.world.anchor_pose(local, anchor),
                );
                self.placement = Placement::attached(anchor, offset);
                self.publish(ctx);
            }
            (_, Placement::Attached { .. }) if owner.is_local() => {
                self.settle(ctx);
            }
            (_, Placement::Attached { anchor, offset }) => {
                // another peer's attachment, tracked against that peer's rig
                if let Some(owner) = owner.peer(local) {
                    self.force_kinematic(ctx.world);
                    let anchor_pose = ctx.world.anchor_pose(owner, anchor);
                    ctx.world.set_pose(self.id, apply_offset(&anchor_pose, &offset));
                }
            }
            (_, Placement::Idle(published)) => {
                let current = ctx.world.pose(self.id);
                if idle_moved(&published, &current, self.config.idle_sync_epsilon) {
                    if owner.is_local() {
                        self.placement = Placement::Idle(current);
                        self.publish(ctx);
                    } else {
                        ctx.world.set_pose(self.id, published);
                    }
                }
                self.restore_physics(ctx.world);
            }
        }

        if owner.is_local() {
            self.check_fall(ctx);
        }
    }

    // Replication

    /// Push the current placement. Only the owner ever writes.
    pub(crate) fn publish<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) -> bool {
        if !self.ownership.is_local(ctx.network) {
            trace!("{:?}: not owner, snapshot suppressed", self.id);
            return false;
        }

        let kinematic = if ctx.replicate_physics_mode {
            Some(ctx.world.is_kinematic(self.id))
        } else {
            None
        };
        let snapshot = self.replication.next_snapshot(self.placement, kinematic);
        self.send_snapshot(snapshot, ctx);
        true
    }

    pub(crate) fn send_snapshot<W: World, N: Network>(
        &self,
        snapshot: Snapshot,
        ctx: &mut Context<W, N>,
    ) {
        let message = PeerMessage::Snapshot {
            author: ctx.network.local_peer(),
            object: self.id,
            snapshot,
        };
        trace!("sending {} v{}", message, snapshot.version.0);
        ctx.network.send(message.to_bytes());
    }

    pub(crate) fn receive_snapshot<W: World, N: Network>(
        &mut self,
        author: PeerId,
        snapshot: Snapshot,
        ctx: &mut Context<W, N>,
    ) {
        let reason = match self.ownership.resolve(ctx.network) {
            OwnerStatus::Local => Some(DiscardReason::LocalOwner),
            OwnerStatus::Remote(owner) if owner == author => None,
            OwnerStatus::Remote(owner) => Some(DiscardReason::NotOwner { owner: Some(owner) }),
            OwnerStatus::Unresolved => Some(DiscardReason::NotOwner { owner: None }),
        };
        let reason = match reason {
            Some(reason) => Some(reason),
            None => match self.replication.admit(author, snapshot.version) {
                Admission::Accept => None,
                Admission::Stale(applied) => Some(DiscardReason::Stale { applied }),
            },
        };
        if let Some(reason) = reason {
            debug!(
                "discarding snapshot v{} for {:?} from {:?}: {:?}",
                snapshot.version.0, self.id, author, reason
            );
            ctx.events.push(AttachmentEvent::SnapshotDiscarded {
                object: self.id,
                version: snapshot.version,
                reason,
            });
            return;
        }

        self.set_placement(snapshot.placement);
        self.owner_kinematic = snapshot.kinematic;
        match snapshot.placement {
            Placement::Attached { anchor, offset } => {
                self.force_kinematic(ctx.world);
                let anchor_pose = ctx.world.anchor_pose(author, anchor);
                ctx.world.set_pose(self.id, apply_offset(&anchor_pose, &offset));
            }
            Placement::Idle(pose) => {
                ctx.world.set_pose(self.id, pose);
            }
        }

        ctx.events.push(AttachmentEvent::SnapshotApplied {
            object: self.id,
            version: snapshot.version,
        });
    }

    // Physics mode

    /// Objects that were dynamic at init are made kinematic while attached
    pub(crate) fn force_kinematic<W: World>(&self, world: &mut W) {
        if self.config.ignore_physics_toggle || !self.was_dynamic {
            return;
        }
        if !world.is_kinematic(self.id) {
            world.set_kinematic(self.id, true);
            self.log(format_args!("enabled kinematic"));
        }
    }

    /// Undo `force_kinematic`. Never makes an initially kinematic object
    /// dynamic.
    pub(crate) fn restore_physics<W: World>(&self, world: &mut W) {
        if self.config.ignore_physics_toggle || !self.was_dynamic {
            return;
        }
        if world.is_kinematic(self.id) {
            world.set_kinematic(self.id, false);
            self.log(format_args!("disabled kinematic"));
        }
    }
}
