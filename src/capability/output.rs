//! Side-table attaching output capabilities to screens.
//!
//! Screens don't declare a slot for their output; the store keeps it for
//! them, keyed by identity. Entries hold only a weak handle to their screen,
//! so the store never extends a screen's lifetime, and entries of destroyed
//! screens are purged on the next write or count.

use crate::screen::{screen_key, ScreenRef, WeakScreen};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Type-erased output capability.
pub type OutputValue = Rc<dyn Any>;

struct Entry {
    owner: WeakScreen,
    value: Option<OutputValue>,
}

thread_local! {
    static OUTPUTS: RefCell<HashMap<usize, Entry>> = RefCell::new(HashMap::new());
}

/// Converts what a configuration block returns into a stored output.
///
/// `()` stores "no output"; `Option<O>` stores `O` when present.
pub trait IntoOutput {
    fn into_output(self) -> Option<OutputValue>;
}

impl IntoOutput for () {
    fn into_output(self) -> Option<OutputValue> {
        None
    }
}

impl<O: Any> IntoOutput for Option<O> {
    fn into_output(self) -> Option<OutputValue> {
        self.map(|value| Rc::new(value) as OutputValue)
    }
}

/// The process-wide output side-table.
///
/// Screens live on the UI thread, so the table is scoped to that thread.
///
/// # Example
///
/// ```rust
/// use routewire::capability::OutputStore;
/// use routewire::screen::{Screen, ScreenRef};
/// use std::any::Any;
/// use std::rc::Rc;
///
/// struct Plain;
/// impl Screen for Plain {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let screen: ScreenRef = Rc::new(Plain);
/// assert!(OutputStore::get(&screen).is_none());
///
/// OutputStore::set(&screen, Some(Rc::new(42u32)));
/// assert_eq!(OutputStore::get_as::<u32>(&screen).as_deref(), Some(&42));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputStore;

impl OutputStore {
    /// Attach `value` to `screen`, replacing whatever was there.
    pub fn set(screen: &ScreenRef, value: Option<OutputValue>) {
        let key = screen_key(screen);
        // `describe` is caller code and may read the store itself.
        let described = screen.describe();
        OUTPUTS.with(|outputs| {
            let mut outputs = outputs.borrow_mut();
            outputs.retain(|_, entry| entry.owner.strong_count() > 0);
            debug!(
                screen = described.as_str(),
                present = value.is_some(),
                "Attaching output capability"
            );
            outputs.insert(
                key,
                Entry {
                    owner: Rc::downgrade(screen),
                    value,
                },
            );
        });
    }

    /// Output previously attached to `screen`, if any.
    pub fn get(screen: &ScreenRef) -> Option<OutputValue> {
        let key = screen_key(screen);
        OUTPUTS.with(|outputs| {
            let outputs = outputs.borrow();
            let entry = outputs.get(&key)?;
            // A dead owner means the address was reused by a new screen.
            if entry.owner.strong_count() == 0 {
                return None;
            }
            entry.value.clone()
        })
    }

    /// Output attached to `screen`, downcast to `O`.
    pub fn get_as<O: Any>(screen: &ScreenRef) -> Option<Rc<O>> {
        Self::get(screen).and_then(|value| value.downcast::<O>().ok())
    }

    /// Remove any output attached to `screen`.
    pub fn clear(screen: &ScreenRef) {
        let key = screen_key(screen);
        OUTPUTS.with(|outputs| {
            outputs.borrow_mut().remove(&key);
        });
    }

    /// Number of live screens with an entry, after purging dead ones.
    pub fn tracked_screens() -> usize {
        OUTPUTS.with(|outputs| {
            let mut outputs = outputs.borrow_mut();
            outputs.retain(|_, entry| entry.owner.strong_count() > 0);
            outputs.len()
        })
    }
}
