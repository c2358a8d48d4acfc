//! Per-query scratch pool.
//!
//! ANN and BMSSP sub-searches both need scratch `Vec`s for candidate
//! lists; rather than allocate fresh ones on every `search` call, the
//! planner checks one out of a shared pool at query entry and it's
//! returned automatically — including on early-return/error paths —
//! when the guard drops.

use parking_lot::Mutex;

/// A pool of reusable `Vec<T>` scratch buffers.
pub struct Pool<T> {
    free: Mutex<Vec<Vec<T>>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool {
            free: Mutex::new(Vec::new()),
        }
    }
}

impl<T> Pool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Pool::default()
    }

    /// Check out a scratch buffer, reusing a previously-returned one
    /// (cleared but with its capacity retained) if available.
    pub fn checkout(&self) -> PoolGuard<'_, T> {
        let buf = self.free.lock().pop().unwrap_or_default();
        PoolGuard {
            pool: self,
            buf: Some(buf),
        }
    }

    fn release(&self, mut buf: Vec<T>) {
        buf.clear();
        self.free.lock().push(buf);
    }

    /// Number of buffers currently parked in the pool.
    pub fn parked(&self) -> usize {
        self.free.lock().len()
    }
}

/// RAII handle for a checked-out scratch buffer. Returns the buffer to
/// its pool on drop, regardless of how the caller's scope exits.
pub struct PoolGuard<'a, T> {
    pool: &'a Pool<T>,
    buf: Option<Vec<T>>,
}

impl<'a, T> std::ops::Deref for PoolGuard<'a, T> {
    type Target = Vec<T>;
    fn deref(&self) -> &Vec<T> {
        self.buf.as_ref().expect("buffer taken before drop")
    }
}

impl<'a, T> std::ops::DerefMut for PoolGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        self.buf.as_mut().expect("buffer taken before drop")
    }
}

impl<'a, T> Drop for PoolGuard<'a, T> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}
