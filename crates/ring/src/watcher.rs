//! Notification hub: routes each [`Op`] to at most one subscription.
//!
//! Delivery is a rendezvous. `notify` returns only once the subscriber has
//! taken the op or the subscription has been deregistered, and the ring calls
//! it while holding its write lock. Subscribers must drain their channel
//! promptly or deregister; one that does neither stalls every ring mutation.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, bounded, select};
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::models::Op;

pub type FilterFn<T> = Arc<dyn Fn(&Op<T>) -> String + Send + Sync>;

/// Default routing: one subscription per target node.
pub fn route_by_node<T>(op: &Op<T>) -> String {
    op.node_id().to_string()
}

/// Counts deliveries currently blocked on a subscription.
#[derive(Default)]
pub(crate) struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    pub(crate) fn enter(&self) {
        *self.count.lock() += 1;
    }

    pub(crate) fn exit(&self) {
        let mut count = self.count.lock();
        debug_assert!(*count > 0, "in-flight exit without a matching enter");
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    pub(crate) fn wait_idle(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.idle.wait(&mut count);
        }
    }
}

struct Subscription<T> {
    sender: Sender<Op<T>>,
    // Dropping the sender half wakes every delivery blocked in `deliver`.
    cancel: Mutex<Option<Sender<()>>>,
    cancelled: Receiver<()>,
    in_flight: Arc<InFlight>,
}

impl<T> Subscription<T> {
    fn new() -> (Self, Receiver<Op<T>>) {
        let (sender, receiver) = bounded(0);
        let (cancel, cancelled) = bounded(0);

        let subscription = Self {
            sender,
            cancel: Mutex::new(Some(cancel)),
            cancelled,
            in_flight: Arc::new(InFlight::default()),
        };

        (subscription, receiver)
    }

    fn cancel(&self) {
        self.cancel.lock().take();
    }

    /// Hands `op` to the subscriber unless cancellation wins the race.
    fn deliver(&self, op: Op<T>) -> bool {
        select! {
            send(self.sender, op) -> res => res.is_ok(),
            recv(self.cancelled) -> _ => false,
        }
    }
}

pub struct NotificationHub<T> {
    watchers: DashMap<String, Arc<Subscription<T>>>,
    filter: FilterFn<T>,
}

impl<T> NotificationHub<T> {
    pub fn new(filter: FilterFn<T>) -> Self {
        Self {
            watchers: DashMap::new(),
            filter,
        }
    }

    #[inline]
    pub fn routing_key(&self, op: &Op<T>) -> String {
        (self.filter)(op)
    }

    /// Creates a fresh channel for the routing key of `template`. A previous
    /// subscription under the same key is orphaned, not torn down.
    pub fn register(&self, template: &Op<T>) -> Receiver<Op<T>> {
        let routing_key = self.routing_key(template);
        let (subscription, receiver) = Subscription::new();

        if self
            .watchers
            .insert(routing_key.clone(), Arc::new(subscription))
            .is_some()
        {
            debug!(%routing_key, "watcher replaced");
        } else {
            debug!(%routing_key, "watcher registered");
        }

        receiver
    }

    /// Cancels pending deliveries, waits for them to unwind and closes the
    /// channel. No-op when nothing is registered under the routing key.
    pub fn deregister(&self, template: &Op<T>) {
        let routing_key = self.routing_key(template);

        let Some((_, subscription)) = self.watchers.remove(&routing_key) else {
            return;
        };

        subscription.cancel();
        subscription.in_flight.wait_idle();

        // Every delivery dropped its handle before leaving `in_flight`, so this
        // is the last sender and the subscriber sees a closed channel.
        drop(subscription);

        debug!(%routing_key, "watcher deregistered");
    }

    /// Blocks until the matching subscriber takes `op` or is deregistered.
    /// Ops nobody subscribed to are dropped.
    pub fn notify(&self, op: Op<T>) {
        let routing_key = self.routing_key(&op);

        // The in-flight count is raised under the registry guard so a
        // concurrent deregister always waits for this delivery.
        let (subscription, in_flight) = match self.watchers.get(&routing_key) {
            Some(entry) => {
                entry.in_flight.enter();
                (entry.value().clone(), entry.in_flight.clone())
            }
            None => return,
        };

        let key = op.key.clone();
        let delivered = subscription.deliver(op);

        drop(subscription);
        in_flight.exit();

        trace!(%routing_key, %key, delivered, "notification handed off");
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    pub fn contains(&self, template: &Op<T>) -> bool {
        self.watchers.contains_key(&self.routing_key(template))
    }
}
