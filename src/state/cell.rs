use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Observer<T> = Rc<dyn Fn(&T)>;

/// A single-threaded value cell that notifies observers on every write.
///
/// Observers run synchronously inside `set`, in registration order, and
/// receive a snapshot of the new value. They may read this cell (or any other)
/// and may even write to it; the write re-notifies with the newer value.
pub struct StateCell<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<Observer<T>>>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Clone the current value out of the cell.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value and notify every observer, even when the new value
    /// equals the old one.
    pub fn set(&self, value: T) {
        let snapshot = value.clone();
        *self.value.borrow_mut() = value;

        let observers: Vec<Observer<T>> = self.observers.borrow().clone();
        for observer in observers {
            observer(&snapshot);
        }
    }

    /// Register `observer` to be called after every `set`.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &self.value.borrow())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}
