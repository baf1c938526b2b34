use std::time::Duration;

use tether_shared::{ObjectId, TimeQueue};

use crate::peer_config::PeerConfig;

/// Delayed work. Once scheduled an item always fires; handlers re-validate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scheduled {
    BroadcastReset(ObjectId),
    LateJoinResend(ObjectId),
}

pub(crate) struct Scheduler {
    now: Duration,
    queue: TimeQueue<Scheduled>,
    reset_delay: Duration,
    late_join_delay: Duration,
}

impl Scheduler {
    pub(crate) fn new(config: &PeerConfig) -> Self {
        Self {
            now: Duration::ZERO,
            queue: TimeQueue::new(),
            reset_delay: config.reset_delay,
            late_join_delay: config.late_join_delay,
        }
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    pub(crate) fn schedule_reset(&mut self, object: ObjectId) {
        self.queue
            .add_item(self.now + self.reset_delay, Scheduled::BroadcastReset(object));
    }

    pub(crate) fn schedule_resend(&mut self, object: ObjectId) {
        self.queue.add_item(
            self.now + self.late_join_delay,
            Scheduled::LateJoinResend(object),
        );
    }

    pub(crate) fn pop_due(&mut self) -> Option<Scheduled> {
        self.queue.pop_item(self.now)
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }
}
