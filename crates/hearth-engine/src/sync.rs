use std::sync::{Mutex, MutexGuard};

/// Lock a std mutex, recovering the guard if a panicking holder
/// poisoned it. None of our guarded state is left half-written on
/// panic, so the data is still usable.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
