use crate::core::query::QueryResult;
use tracing::debug;

/// Holds the result of the most recent successful query.
///
/// A single slot: every `store` replaces what was there. Reading does not
/// clear it.
#[derive(Debug, Default)]
pub struct ResultCache {
    slot: Option<QueryResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self { slot: None }
    }

    pub fn store(&mut self, result: QueryResult) {
        debug!("Cache PUT {} result", result.kind());
        self.slot = Some(result);
    }

    pub fn retrieve(&self) -> Option<&QueryResult> {
        if self.slot.is_some() {
            debug!("Cache HIT");
        } else {
            debug!("Cache MISS");
        }
        self.slot.as_ref()
    }
}
