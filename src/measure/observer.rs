use super::state::MeasurementSnapshot;

/// Callback invoked synchronously after the measurement changes.
pub type ChangeCallback = Box<dyn FnMut(&MeasurementSnapshot)>;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered change observers, called in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, ChangeCallback)>,
}

impl Observers {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback.
    pub fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    /// Remove a callback. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Call every observer with `snapshot`.
    pub fn notify(&mut self, snapshot: &MeasurementSnapshot) {
        for (_, callback) in &mut self.callbacks {
            callback(snapshot);
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}
