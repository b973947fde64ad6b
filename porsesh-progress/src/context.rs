//! Ambient progress scope shared with everything rendered inside a provider.

use std::cell::RefCell;

use crate::{ProgressError, ProgressHandle};

thread_local! {
    static PROVIDER_STACK: RefCell<Vec<ProgressHandle>> = const { RefCell::new(Vec::new()) };
}

/// Installs `handle` as the ambient progress scope for the duration of `f`.
///
/// Scopes nest; the innermost one wins. The scope is popped on every exit
/// path, including unwinding.
///
/// # Examples
///
/// ```
/// use porsesh_progress::{ProgressProvider, provide_progress, use_progress};
///
/// let provider = ProgressProvider::default();
/// provide_progress(provider.handle(), || {
///     let progress = use_progress().expect("inside a provider");
///     assert!(!progress.snapshot().is_visible);
/// });
/// assert!(use_progress().is_err());
/// ```
pub fn provide_progress<F, R>(handle: ProgressHandle, f: F) -> R
where
    F: FnOnce() -> R,
{
    PROVIDER_STACK.with(|stack| stack.borrow_mut().push(handle));
    struct ScopeGuard;
    impl Drop for ScopeGuard {
        fn drop(&mut self) {
            PROVIDER_STACK.with(|stack| {
                let popped = stack.borrow_mut().pop();
                debug_assert!(popped.is_some(), "progress scope stack underflow");
            });
        }
    }
    let guard = ScopeGuard;
    let result = f();
    drop(guard);
    result
}

/// Resolves the innermost progress scope.
///
/// Fails with [`ProgressError::OutsideProvider`] when called outside of
/// [`provide_progress`] / [`ProgressProvider::scope`](crate::ProgressProvider::scope).
pub fn use_progress() -> Result<ProgressHandle, ProgressError> {
    PROVIDER_STACK.with(|stack| {
        stack
            .borrow()
            .last()
            .cloned()
            .ok_or(ProgressError::OutsideProvider)
    })
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::{provide_progress, use_progress};
    use crate::{ProgressError, ProgressProvider};

    #[test]
    fn lookup_outside_scope_fails() {
        assert_eq!(use_progress().unwrap_err(), ProgressError::OutsideProvider);
    }

    #[test]
    fn innermost_scope_wins() {
        let outer = ProgressProvider::default();
        let inner = ProgressProvider::default();

        outer.scope(|| {
            let seen = use_progress().expect("outer scope");
            assert!(seen.same_provider(&outer.handle()));

            inner.scope(|| {
                let seen = use_progress().expect("inner scope");
                assert!(seen.same_provider(&inner.handle()));
            });

            let seen = use_progress().expect("outer scope again");
            assert!(seen.same_provider(&outer.handle()));
        });
    }

    #[test]
    fn scope_is_released_when_the_body_panics() {
        let provider = ProgressProvider::default();
        let result = catch_unwind(AssertUnwindSafe(|| {
            provide_progress(provider.handle(), || panic!("render failed"));
        }));
        assert!(result.is_err());
        assert!(use_progress().is_err());
    }
}
