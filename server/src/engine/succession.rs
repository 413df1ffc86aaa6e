use rand::seq::SliceRandom;

/// Picks the replacement admin when the current admin leaves a channel
/// that still has other members. Injected into the engine so tests can
/// substitute a deterministic implementation.
pub trait SuccessorPicker: Send + Sync {
    /// Pick one of the candidate user IDs. Returns None iff `candidates`
    /// is empty.
    fn pick(&self, candidates: &[String]) -> Option<String>;
}

/// Production picker: uniform random over the remaining members.
pub struct RandomPicker;

impl SuccessorPicker for RandomPicker {
    fn pick(&self, candidates: &[String]) -> Option<String> {
        candidates.choose(&mut rand::thread_rng()).cloned()
    }
}
