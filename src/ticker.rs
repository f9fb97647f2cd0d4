//! Shared per-frame ticker with explicit, cancellable subscriptions.
//!
//! A subscription is tagged with the clip and playback generation it samples
//! for. Callbacks delivered for a subscription that has since been cancelled
//! are inert: the receiver compares the token against its own and drops it.

use crate::clip::ClipId;

/// Monotonically increasing tag for one playback pass of a clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Cancellation token handed out by [`Ticker::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub clip: ClipId,
    pub generation: Generation,
}

#[derive(Debug, Default)]
pub struct Ticker {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, clip: ClipId, generation: Generation) -> Subscription {
        let subscription = Subscription {
            id: SubscriptionId(self.next_id),
            clip,
            generation,
        };
        self.next_id += 1;
        self.subscriptions.push(subscription);
        tracing::trace!(clip = %clip, generation = generation.0, "Ticker subscription added");
        subscription
    }

    /// Returns false if the subscription was already gone.
    pub fn cancel(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        let removed = self.subscriptions.len() != before;
        if removed {
            tracing::trace!(id = id.0, "Ticker subscription cancelled");
        }
        removed
    }

    pub fn is_live(&self, subscription: &Subscription) -> bool {
        self.subscriptions.iter().any(|s| s.id == subscription.id)
    }

    pub fn active_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns the subscriptions to call back for this frame. The snapshot may
    /// go stale while it is being processed; check [`Ticker::is_live`].
    pub fn tick(&self) -> Vec<Subscription> {
        self.subscriptions.clone()
    }
}
