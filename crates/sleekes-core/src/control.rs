//! Job control for cancellation: shared abort tokens keyed by job id.
//!
//! Each running job owns an [`AbortToken`]. The engine checks it between
//! output lines and while idle; a caller holding the job handle (or the
//! runner's [`JobControl`] registry) flips it to stop the job.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::job::JobId;

/// Cloneable cancellation flag. All clones observe the same request.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Registry of running jobs' abort tokens.
#[derive(Debug, Default)]
pub struct JobControl {
    jobs: RwLock<HashMap<JobId, AbortToken>>,
}

impl JobControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a starting job and return the token to hand to its worker.
    pub fn register(&self, id: JobId) -> AbortToken {
        let token = AbortToken::new();
        self.jobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, token.clone());
        token
    }

    /// Forget a job once it reached a terminal state.
    pub fn unregister(&self, id: JobId) {
        self.jobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    /// Request abort for a running job. Returns false when the id is unknown.
    pub fn request_abort(&self, id: JobId) -> bool {
        match self
            .jobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
        {
            Some(token) => {
                token.request();
                true
            }
            None => false,
        }
    }

    pub fn running(&self) -> usize {
        self.jobs.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_request() {
        let token = AbortToken::new();
        let other = token.clone();
        assert!(!other.is_requested());
        token.request();
        assert!(other.is_requested());
    }

    #[test]
    fn registry_aborts_only_registered_jobs() {
        let control = JobControl::new();
        let a = JobId::next();
        let b = JobId::next();
        let token = control.register(a);
        assert_eq!(control.running(), 1);
        assert!(!control.request_abort(b));
        assert!(control.request_abort(a));
        assert!(token.is_requested());
        control.unregister(a);
        assert_eq!(control.running(), 0);
        assert!(!control.request_abort(a));
    }
}
