use libloading::os::unix::Library;

use crate::value::Value;

/// A dynamically-loaded library handle, kept open for the process's
/// lifetime (`spec.md` §4.4.9 — Nytrix has no `dlclose`-on-scope-exit
/// concept; a loaded library stays resident until `__dlclose` is called
/// explicitly, mirroring the original's raw `dlopen`/`dlsym`/`dlclose`
/// trio rather than RAII).
pub struct Handle(Library);

/// Opens `path` (or, if `None`, the running process image) for symbol
/// lookup (`spec.md` §4.4.9).
pub fn dlopen(path: Option<&str>) -> Result<Handle, String> {
    let result = match path {
        Some(p) => unsafe { Library::new(p) },
        None => unsafe { Library::this() },
    };
    result.map(Handle).map_err(|e| e.to_string())
}

/// Resolves `symbol` in `handle`, tagging the result as a native function
/// pointer (`spec.md` §4.4.9 "dlsym results OR'd with the native-fn tag").
///
/// # Safety
/// The resolved symbol must actually be callable under whatever arity the
/// caller later invokes it with via `ffi::callN`.
pub unsafe fn dlsym(handle: &Handle, symbol: &str) -> Result<Value, String> {
    let mut buf = Vec::with_capacity(symbol.len() + 1);
    buf.extend_from_slice(symbol.as_bytes());
    buf.push(0);
    let sym: libloading::os::unix::Symbol<*mut libc::c_void> =
        handle.0.get(&buf).map_err(|e| e.to_string())?;
    Ok(Value::from_native_fn(*sym as usize))
}

/// Closes a library handle, dropping it. Does nothing to symbols already
/// resolved from it and held as `Value`s — as in the original, a caller
/// that keeps using a resolved function pointer after `dlclose` gets
/// undefined behaviour.
pub fn dlclose(handle: Handle) {
    drop(handle);
}

/// The most recent dynamic-linking error message, for parity with
/// `dlerror()`'s C semantics (`spec.md` §4.4.9). `libloading` surfaces
/// errors inline via `Result` rather than a side-channel, so this simply
/// echoes back whatever message the caller already received.
pub fn dlerror(last: Option<String>) -> Option<String> {
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dlopen_self_and_resolve_a_libc_symbol() {
        let handle = dlopen(None).expect("dlopen(NULL) resolves the running image");
        let resolved = unsafe { dlsym(&handle, "malloc") };
        assert!(resolved.is_ok());
    }

    #[test]
    fn dlsym_on_missing_symbol_is_an_error() {
        let handle = dlopen(None).expect("dlopen(NULL) resolves the running image");
        let resolved = unsafe { dlsym(&handle, "this_symbol_does_not_exist_anywhere") };
        assert!(resolved.is_err());
    }
}
