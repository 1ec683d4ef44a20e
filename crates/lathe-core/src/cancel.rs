use thiserror::Error;

pub use tokio_util::sync::CancellationToken;

/// Returned by any operation that observed a cancelled [`CancellationToken`].
///
/// Cancellation is not an error condition for the user; callers propagate it
/// unchanged and never log it as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

pub trait CancellationTokenExt {
    /// `Err(Cancelled)` once cancellation was requested.
    fn check_cancelled(&self) -> Result<(), Cancelled>;
}

impl CancellationTokenExt for CancellationToken {
    #[inline]
    fn check_cancelled(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_cancelled_observes_parent_token() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        assert_eq!(child.check_cancelled(), Ok(()));

        parent.cancel();
        assert_eq!(child.check_cancelled(), Err(Cancelled));
    }
}
