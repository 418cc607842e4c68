//! Aggregate root trait for the ledger's domain models.

/// A consistency boundary with an identity and a transition counter.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Number of transitions applied since the aggregate was created.
    fn version(&self) -> u64;
}

/// Command handling split into a pure decision and a state change.
///
/// `handle` inspects state and returns events; `apply` folds one event into
/// state.
///
/// Aggregates never touch IO or the clock: anything
/// time- or identity-dependent arrives inside the command.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Fold one event into state, bumping `version()` by one.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events a command produces. Never mutates `self`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Handle a command and apply its events to a copy of `self`.
    ///
    /// On error the original aggregate is untouched and nothing is returned,
    /// so callers never observe a partially applied command.
    fn execute(&self, command: &Self::Command) -> Result<Self, Self::Error>
    where
        Self: Clone + Sized,
    {
        let events = self.handle(command)?;
        let mut next = self.clone();
        for event in &events {
            next.apply(event);
        }
        Ok(next)
    }
}
