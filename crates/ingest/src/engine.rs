//! Generic bulk-upsert engine.
//!
//! Candidates are matched against the collection as it grows, so a natural
//! key repeated inside one batch resolves against its first occurrence
//! instead of creating a second entity.

/// What to do with a candidate whose natural key matched an existing entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<E> {
    /// Keep the existing entity as it is.
    Skip,
    /// Replace the existing entity with this one.
    Replace(E),
}

/// Natural-key policy for one kind of entity.
pub trait UpsertStrategy {
    type Entity: Clone;
    type Candidate;

    /// Called once with the starting collection before any candidate.
    fn prepare(&mut self, _existing: &[Self::Entity]) {}

    /// Validate and default a candidate. `None` drops it without counting it.
    fn admit(&self, candidate: Self::Candidate) -> Option<Self::Candidate>;

    /// Index of the entity sharing the candidate's natural key.
    fn find_match(&self, collection: &[Self::Entity], candidate: &Self::Candidate) -> Option<usize>;

    fn resolve(&mut self, existing: &Self::Entity, candidate: Self::Candidate) -> Resolution<Self::Entity>;

    /// Build a new entity. `None` drops the candidate without counting it.
    fn create(&mut self, candidate: Self::Candidate) -> Option<Self::Entity>;
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport<E> {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub collection: Vec<E>,
}

impl<E> IngestReport<E> {
    /// Number of candidates that reached natural-key matching.
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.skipped
    }
}

/// Upsert `candidates` into a copy of `existing`.
pub fn ingest<S, I>(existing: &[S::Entity], candidates: I, strategy: &mut S) -> IngestReport<S::Entity>
where
    S: UpsertStrategy,
    I: IntoIterator<Item = S::Candidate>,
{
    strategy.prepare(existing);

    let mut report = IngestReport {
        created: 0,
        updated: 0,
        skipped: 0,
        collection: existing.to_vec(),
    };
    let mut discarded = 0usize;

    for candidate in candidates {
        let Some(candidate) = strategy.admit(candidate) else {
            discarded += 1;
            continue;
        };

        match strategy.find_match(&report.collection, &candidate) {
            Some(idx) => match strategy.resolve(&report.collection[idx], candidate) {
                Resolution::Skip => report.skipped += 1,
                Resolution::Replace(entity) => {
                    report.collection[idx] = entity;
                    report.updated += 1;
                }
            },
            None => match strategy.create(candidate) {
                Some(entity) => {
                    report.collection.push(entity);
                    report.created += 1;
                }
                None => discarded += 1,
            },
        }
    }

    if discarded > 0 {
        tracing::debug!(discarded, "dropped malformed import rows");
    }
    tracing::info!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        "bulk ingestion finished"
    );
    report
}
