//! Screen predicates used when unwinding a navigation stack.

use crate::screen::Screen;

/// Pure predicate over a screen.
///
/// Guards are evaluated lazily, at the moment a close node plans its action,
/// so they see the navigation stack as it is when the transition fires.
///
/// # Example
///
/// ```rust
/// use routewire::core::ScreenGuard;
///
/// let is_home = ScreenGuard::new(|screen| screen.restoration_id() == Some("home"));
/// # let _ = is_home;
/// ```
pub struct ScreenGuard {
    predicate: Box<dyn Fn(&dyn Screen) -> bool>,
}

impl ScreenGuard {
    /// Create a guard from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Screen) -> bool + 'static,
    {
        ScreenGuard {
            predicate: Box::new(predicate),
        }
    }

    /// Check whether the guard accepts this screen.
    pub fn check(&self, screen: &dyn Screen) -> bool {
        (self.predicate)(screen)
    }
}

impl std::fmt::Debug for ScreenGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScreenGuard")
    }
}
