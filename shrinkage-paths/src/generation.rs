use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{PathError, Result};

/// Counter of user triggered recomputations.
/// Clones share the same counter, so any holder can supersede running work.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    latest: Arc<AtomicU64>,
}

impl Generation {
    /// A fresh counter at generation 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every token handed out before
    pub fn advance(&self) -> GenerationToken {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("advanced to generation {}", id);
        GenerationToken {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    /// The most recent generation
    #[inline(always)]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Identifies the generation a computation belongs to
#[derive(Debug, Clone)]
pub struct GenerationToken {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl GenerationToken {
    /// The generation this token was issued for
    #[inline(always)]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether no newer generation has been started
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }

    /// Err with `Superseded` once a newer generation exists
    pub fn check(&self) -> Result<()> {
        let latest = self.latest.load(Ordering::SeqCst);
        if latest != self.id {
            return Err(PathError::Superseded {
                generation: self.id,
                latest,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_generation_supersedes() {
        let generation = Generation::new();
        assert_eq!(generation.latest(), 0);

        let first = generation.advance();
        assert_eq!(first.id(), 1);
        assert!(first.is_current());
        assert!(first.check().is_ok());

        let handle = generation.clone();
        let second = handle.advance();
        assert_eq!(second.id(), 2);
        assert!(!first.is_current());
        assert_eq!(
            first.check(),
            Err(PathError::Superseded {
                generation: 1,
                latest: 2
            })
        );
        assert!(second.check().is_ok());
        assert_eq!(generation.latest(), 2);
    }

    #[test]
    fn shared_across_threads() {
        let generation = Generation::new();
        let token = generation.advance();

        let handle = generation.clone();
        std::thread::spawn(move || {
            handle.advance();
        })
        .join()
        .unwrap();

        assert!(!token.is_current());
    }
}
