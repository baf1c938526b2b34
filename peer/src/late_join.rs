use log::debug;

use tether_shared::{PeerId, World};

use crate::{attachable::Attachable, peer::Context, transport::Network};

impl Attachable {
    /// A joining peer has not seen any snapshot yet. The owner schedules a
    /// resend once the joiner has had time to finish loading.
    pub(crate) fn on_peer_joined<W: World, N: Network>(
        &mut self,
        peer: PeerId,
        ctx: &mut Context<W, N>,
    ) -> bool {
        if !self.ownership.is_local(ctx.network) {
            return false;
        }

        self.log(format_args!("{:?} joined, resend scheduled", peer));
        ctx.scheduler.schedule_resend(self.id);
        true
    }

    /// Delayed half of `on_peer_joined`
    pub(crate) fn resend_current<W: World, N: Network>(&mut self, ctx: &mut Context<W, N>) {
        if !self.ownership.is_local(ctx.network) {
            debug!("{:?} changed owner before its resend fired, dropped", self.id);
            return;
        }

        match self.replication.last_sent() {
            Some(last) if last.placement == *self.placement() => {
                let last = *last;
                self.send_snapshot(last, ctx);
            }
            _ => {
                self.publish(ctx);
            }
        }
    }
}
