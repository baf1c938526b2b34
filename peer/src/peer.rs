use std::{collections::BTreeMap, time::Duration};

use log::{info, trace, warn};

use tether_shared::{
    AttachableConfig, Hand, ObjectId, PeerId, PeerMessage, VolumeId, WireError, World,
};

use crate::{
    attachable::Attachable,
    error::AttachError,
    events::PeerEvents,
    peer_config::PeerConfig,
    reset::{ExitRelay, VolumeWatch},
    scheduler::{Scheduled, Scheduler},
    transport::Network,
};

/// Everything an `Attachable` may touch while handling one event
pub(crate) struct Context<'a, W: World, N: Network> {
    pub(crate) world: &'a mut W,
    pub(crate) network: &'a mut N,
    pub(crate) scheduler: &'a mut Scheduler,
    pub(crate) events: &'a mut PeerEvents,
    pub(crate) replicate_physics_mode: bool,
}

/// One participant of a shared session. Owns the local view of every
/// registered attachable and routes gestures, wire messages and frame
/// callbacks to them.
pub struct Peer<W: World, N: Network> {
    config: PeerConfig,
    world: W,
    network: N,
    objects: BTreeMap<ObjectId, Attachable>,
    scheduler: Scheduler,
    events: PeerEvents,
    watches: Vec<VolumeWatch>,
    relays: Vec<ExitRelay>,
}

impl<W: World, N: Network> Peer<W, N> {
    /// Create a new Peer
    pub fn new(config: PeerConfig, world: W, network: N) -> Self {
        let scheduler = Scheduler::new(&config);

        Self {
            config,
            world,
            network,
            objects: BTreeMap::new(),
            scheduler,
            events: PeerEvents::new(),
            watches: Vec::new(),
            relays: Vec::new(),
        }
    }

    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    pub fn local_peer(&self) -> PeerId {
        self.network.local_peer()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    /// Time elapsed on this peer's clock, as advanced by `update`
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Delayed callbacks that have not fired yet
    pub fn pending_callbacks(&self) -> usize {
        self.scheduler.pending()
    }

    // Registration

    /// Start tracking an object that already exists in the local world.
    /// Its current pose becomes the reset origin.
    pub fn try_register(
        &mut self,
        object: ObjectId,
        config: AttachableConfig,
    ) -> Result<(), AttachError> {
        if self.objects.contains_key(&object) {
            return Err(AttachError::ObjectAlreadyRegistered {
                object_id: object.0,
            });
        }

        let attachable = Attachable::new(object, config, &mut self.world);
        self.objects.insert(object, attachable);
        Ok(())
    }

    /// Start tracking an object that already exists in the local world.
    ///
    /// # Panics
    ///
    /// Panics if the object is already registered
    pub fn register(&mut self, object: ObjectId, config: AttachableConfig) {
        self.try_register(object, config)
            .expect("Object is already registered with this peer");
    }

    pub fn attachable(&self, object: ObjectId) -> Option<&Attachable> {
        self.objects.get(&object)
    }

    pub fn attachables(&self) -> impl Iterator<Item = &Attachable> {
        self.objects.values()
    }

    pub fn add_volume_watch(&mut self, watch: VolumeWatch) {
        self.watches.push(watch);
    }

    pub fn add_exit_relay(&mut self, relay: ExitRelay) {
        self.relays.push(relay);
    }

    // Gestures

    pub fn on_pickup(&mut self, object: ObjectId, hand: Hand) -> Result<(), AttachError> {
        self.with_object(object, "pickup", |attachable, ctx| {
            attachable.on_pickup(hand, ctx)
        })
    }

    pub fn on_drop(&mut self, object: ObjectId) -> Result<(), AttachError> {
        self.with_object(object, "drop", |attachable, ctx| attachable.on_drop(ctx))
    }

    pub fn on_use_confirm(&mut self, object: ObjectId) -> Result<(), AttachError> {
        self.with_object(object, "use_confirm", |attachable, ctx| {
            attachable.on_use_confirm(ctx)
        })
    }

    // Session

    /// Called on every connected peer, the new owner included, once the
    /// session has reassigned an object
    pub fn on_ownership_transferred(
        &mut self,
        object: ObjectId,
        new_owner: PeerId,
    ) -> Result<(), AttachError> {
        self.with_object(object, "ownership_transferred", |attachable, ctx| {
            attachable.on_ownership_transferred(new_owner, ctx)
        })
    }

    pub fn on_peer_joined(&mut self, peer: PeerId) {
        if peer == self.network.local_peer() {
            return;
        }

        let ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        for id in ids {
            self.dispatch(id, |attachable, ctx| {
                attachable.on_peer_joined(peer, ctx);
            });
        }
    }

    // Triggers

    /// The object left a trigger volume
    pub fn on_volume_exit(&mut self, object: ObjectId, volume: VolumeId) -> Result<(), AttachError> {
        self.with_object(object, "volume_exit", |attachable, ctx| {
            attachable.on_volume_exit(volume, ctx)
        })
    }

    /// A player left a volume watched by a `VolumeWatch`
    pub fn on_player_volume_exit(&mut self, volume: VolumeId, player: PeerId) {
        let local = self.network.local_peer();
        let mut targets = Vec::new();
        for watch in &self.watches {
            if watch.triggered_by(volume, player, local) {
                targets.extend(watch.objects.iter().map(|id| (*id, watch.debug)));
            }
        }

        for (id, debug) in targets {
            if !self.objects.contains_key(&id) {
                trace!("volume watch lists unregistered {:?}, skipped", id);
                continue;
            }
            self.dispatch(id, |attachable, ctx| {
                if attachable.request_reset(ctx) && debug {
                    info!("[VolumeWatch] found {:?} in {:?}, perform reset", id, volume);
                }
            });
        }
    }

    /// An object left a volume guarded by an `ExitRelay`
    pub fn on_object_volume_exit(&mut self, volume: VolumeId, object: ObjectId) {
        if !self.relays.iter().any(|relay| relay.relays(volume, object)) {
            return;
        }
        self.dispatch(object, |attachable, ctx| {
            attachable.request_reset(ctx);
        });
    }

    // Wire

    /// Decode and apply one inbound payload
    pub fn receive(&mut self, payload: &[u8]) -> Result<(), WireError> {
        let message = PeerMessage::from_bytes(payload).map_err(|err| {
            warn!("dropping undecodable payload: {}", err);
            err
        })?;
        self.receive_message(message);
        Ok(())
    }

    pub fn receive_message(&mut self, message: PeerMessage) {
        let object = message.object();
        if !self.objects.contains_key(&object) {
            warn!("received {} for unregistered object, ignored", message);
            return;
        }

        match message {
            PeerMessage::Snapshot {
                author, snapshot, ..
            } => self.dispatch(object, |attachable, ctx| {
                attachable.receive_snapshot(author, snapshot, ctx)
            }),
            PeerMessage::ResetPosition { .. } => self.dispatch(object, |attachable, ctx| {
                attachable.reset_to_origin(ctx)
            }),
        }
    }

    // Frame

    /// First half of the frame: advance the clock and fire every delayed
    /// callback that has come due
    pub fn update(&mut self, delta: Duration) {
        self.scheduler.advance(delta);

        while let Some(item) = self.scheduler.pop_due() {
            match item {
                Scheduled::BroadcastReset(id) => {
                    self.dispatch(id, |attachable, ctx| attachable.fire_reset(ctx))
                }
                Scheduled::LateJoinResend(id) => {
                    self.dispatch(id, |attachable, ctx| attachable.resend_current(ctx))
                }
            }
        }
    }

    /// Second half of the frame, after anchors have moved
    pub fn late_update(&mut self) {
        let ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        for id in ids {
            self.dispatch(id, |attachable, ctx| attachable.late_update(ctx));
        }
    }

    /// Drain everything that happened since the last call
    pub fn take_events(&mut self) -> PeerEvents {
        self.events.take()
    }

    fn with_object<F: FnOnce(&mut Attachable, &mut Context<W, N>)>(
        &mut self,
        object: ObjectId,
        operation: &'static str,
        handler: F,
    ) -> Result<(), AttachError> {
        if !self.objects.contains_key(&object) {
            return Err(AttachError::ObjectNotRegistered {
                object_id: object.0,
                operation,
            });
        }
        self.dispatch(object, handler);
        Ok(())
    }

    fn dispatch<F: FnOnce(&mut Attachable, &mut Context<W, N>)>(
        &mut self,
        object: ObjectId,
        handler: F,
    ) {
        let Some(attachable) = self.objects.get_mut(&object) else {
            return;
        };
        let mut ctx = Context {
            world: &mut self.world,
            network: &mut self.network,
            scheduler: &mut self.scheduler,
            events: &mut self.events,
            replicate_physics_mode: self.config.replicate_physics_mode,
        };
        handler(attachable, &mut ctx);
    }
}
