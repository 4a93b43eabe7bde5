use crate::value::Value;

/// A heap-allocated trampoline argument, owned by the spawned thread and
/// freed by it on exit (`spec.md` §4.4.8) — `pthread_create`'s `void *arg`
/// only has room for one pointer, so the entry function and its single
/// Nytrix argument are boxed together rather than passed as two raw
/// pointers the C ABI has no slot for.
struct Trampoline {
    entry: usize,
    arg: Value,
}

unsafe extern "C" fn run_trampoline(raw: *mut libc::c_void) -> *mut libc::c_void {
    let boxed = Box::from_raw(raw as *mut Trampoline);
    let Trampoline { entry, arg } = *boxed;
    type Entry = unsafe extern "C" fn(i64) -> i64;
    let f: Entry = std::mem::transmute::<usize, Entry>(entry);
    let result = f(arg.0);
    result as *mut libc::c_void
}

/// Spawns a native thread running `entry(arg)`, returning the opaque
/// `pthread_t` handle tagged as a raw integer (`spec.md` §4.4.8).
///
/// # Safety
/// `entry` must be callable as `unsafe extern "C" fn(i64) -> i64`.
pub unsafe fn spawn(entry: usize, arg: Value) -> Result<libc::pthread_t, i32> {
    let boxed = Box::new(Trampoline { entry, arg });
    let raw = Box::into_raw(boxed) as *mut libc::c_void;

    let mut handle: libc::pthread_t = std::mem::zeroed();
    let rc = libc::pthread_create(&mut handle, std::ptr::null(), Some(run_trampoline), raw);
    if rc != 0 {
        drop(Box::from_raw(raw as *mut Trampoline));
        return Err(rc);
    }
    Ok(handle)
}

/// Joins a thread previously returned by [`spawn`], yielding its `i64`
/// return value reinterpreted as a tagged [`Value`].
///
/// # Safety
/// `handle` must be a live, unjoined handle from [`spawn`].
pub unsafe fn join(handle: libc::pthread_t) -> Result<Value, i32> {
    let mut retval: *mut libc::c_void = std::ptr::null_mut();
    let rc = libc::pthread_join(handle, &mut retval);
    if rc != 0 {
        return Err(rc);
    }
    Ok(Value(retval as i64))
}

/// A thin wrapper over `pthread_mutex_t`, heap-allocated so a tagged
/// pointer to it can travel through compiled code like any other value
/// (`spec.md` §4.4.8).
pub struct Mutex(*mut libc::pthread_mutex_t);

impl Mutex {
    pub fn new() -> Self {
        unsafe {
            let raw = Box::into_raw(Box::new(std::mem::zeroed::<libc::pthread_mutex_t>()));
            libc::pthread_mutex_init(raw, std::ptr::null());
            Mutex(raw)
        }
    }

    /// # Safety
    /// Must not be called reentrantly from the same thread without an
    /// intervening [`Mutex::unlock`].
    pub unsafe fn lock(&self) {
        libc::pthread_mutex_lock(self.0);
    }

    /// # Safety
    /// The calling thread must currently hold the lock.
    pub unsafe fn unlock(&self) {
        libc::pthread_mutex_unlock(self.0);
    }

    pub fn as_ptr(&self) -> *mut libc::pthread_mutex_t {
        self.0
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Mutex {
    fn drop(&mut self) {
        unsafe {
            libc::pthread_mutex_destroy(self.0);
            drop(Box::from_raw(self.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn double_it(a: i64) -> i64 {
        a * 2
    }

    #[test]
    fn spawn_and_join_round_trips_the_result() {
        unsafe {
            let handle = spawn(double_it as usize, Value(21)).expect("spawn succeeds");
            let result = join(handle).expect("join succeeds");
            assert_eq!(result.0, 42);
        }
    }

    #[test]
    fn mutex_lock_unlock_does_not_deadlock_single_threaded() {
        let m = Mutex::new();
        unsafe {
            m.lock();
            m.unlock();
        }
    }
}
