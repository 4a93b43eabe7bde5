//! The runtime symbol vocabulary compiled Nytrix code links against
//! directly: thin, `extern "C"`-callable wrappers around the typed
//! primitives in [`crate::arith`], [`crate::float`], and raw syscalls the
//! original exposed unmediated rather than through libc wrappers.

use crate::runtime::Runtime;
use crate::value::Value;
use crate::{arith, ffi, float, heap, strings};

/// Default PRNG seed, matching the original's fixed bring-up seed so a
/// freshly started program's first `__rand64()` call is reproducible
/// across runs until `__srand` reseeds it.
const DEFAULT_SEED: u64 = 0x123456789ABCDEF0;

/// A process-wide xorshift64* generator (`spec.md` §5 "`__srand`/
/// `__rand64`"). Not cryptographically secure; Nytrix programs that need
/// that reach for a std-library module built on OS entropy instead.
pub struct Rng(u64);

impl Rng {
    pub fn new() -> Self {
        Rng(DEFAULT_SEED)
    }

    pub fn seed(&mut self, seed: u64) {
        self.0 = if seed == 0 { DEFAULT_SEED } else { seed };
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! forward_binop {
    ($name:ident, $inner:path) => {
        pub extern "C" fn $name(a: i64, b: i64) -> i64 {
            $inner(Value(a), Value(b)).0
        }
    };
}

forward_binop!(__add, arith::add);
forward_binop!(__sub, arith::sub);
forward_binop!(__mul, arith::mul);
forward_binop!(__div, arith::div);
forward_binop!(__mod, arith::rem);
forward_binop!(__and, arith::and);
forward_binop!(__or, arith::or);
forward_binop!(__xor, arith::xor);
forward_binop!(__shl, arith::shl);
forward_binop!(__shr, arith::shr);
forward_binop!(__eq, arith::eq);
forward_binop!(__lt, arith::lt);
forward_binop!(__le, arith::le);
forward_binop!(__gt, arith::gt);
forward_binop!(__ge, arith::ge);

pub extern "C" fn __not(a: i64) -> i64 {
    arith::not(Value(a)).0
}

/// `None` (non-numeric operand) collapses to tagged `false`, matching the
/// float comparison family's fail-soft contract (`spec.md` §4.4.4).
fn flt_bool(result: Option<bool>) -> i64 {
    Value::from_bool(result.unwrap_or(false)).0
}

pub extern "C" fn __flt_lt(a: i64, b: i64) -> i64 {
    flt_bool(float::flt_lt(Value(a), Value(b)))
}

pub extern "C" fn __flt_gt(a: i64, b: i64) -> i64 {
    flt_bool(float::flt_gt(Value(a), Value(b)))
}

pub extern "C" fn __flt_eq(a: i64, b: i64) -> i64 {
    flt_bool(float::flt_eq(Value(a), Value(b)))
}

pub extern "C" fn __flt_trunc(a: i64) -> i64 {
    float::flt_trunc(Value(a)).unwrap_or(0)
}

macro_rules! forward_flt_binop {
    ($name:ident, $inner:path) => {
        pub extern "C" fn $name(a: i64, b: i64) -> i64 {
            $inner(Value(a), Value(b)).map(|v| v.0).unwrap_or(crate::value::NIL.0)
        }
    };
}

forward_flt_binop!(__flt_add, float::flt_add);
forward_flt_binop!(__flt_sub, float::flt_sub);
forward_flt_binop!(__flt_mul, float::flt_mul);
forward_flt_binop!(__flt_div, float::flt_div);

pub extern "C" fn __flt_box_val(bits: u64) -> i64 {
    float::box_float(f64::from_bits(bits)).0
}

/// # Safety
/// `v` must be a value satisfying `float::is_float`.
pub unsafe extern "C" fn __flt_unbox_val(v: i64) -> u64 {
    float::unbox_float(Value(v)).to_bits()
}

/// Raw `read(2)` passthrough at a caller-supplied file offset, bypassing
/// libc buffering the way the original's `__sys_read_off` does
/// (`spec.md` §5).
///
/// # Safety
/// `buf` must be valid for `count` bytes.
pub unsafe extern "C" fn __sys_read_off(fd: i32, buf: *mut u8, count: usize, offset: i64) -> isize {
    libc::pread(fd, buf as *mut libc::c_void, count, offset as libc::off_t) as isize
}

/// # Safety
/// `buf` must be valid for `count` bytes.
pub unsafe extern "C" fn __sys_write_off(
    fd: i32,
    buf: *const u8,
    count: usize,
    offset: i64,
) -> isize {
    libc::pwrite(fd, buf as *const libc::c_void, count, offset as libc::off_t) as isize
}

/// A raw 6-argument syscall passthrough for whatever the standard library
/// needs that has no dedicated wrapper (`spec.md` §5 "`__syscall`").
///
/// # Safety
/// Caller is responsible for `number`'s arguments being valid for
/// whatever that syscall actually does.
pub unsafe extern "C" fn __syscall(
    number: i64,
    a1: i64,
    a2: i64,
    a3: i64,
    a4: i64,
    a5: i64,
    a6: i64,
) -> i64 {
    libc::syscall(number as libc::c_long, a1, a2, a3, a4, a5, a6) as i64
}

/// # Safety
/// `argv`/`envp` must be valid, NUL-terminated `char**` arrays.
pub unsafe extern "C" fn __execve(
    path: *const libc::c_char,
    argv: *const *const libc::c_char,
    envp: *const *const libc::c_char,
) -> i32 {
    libc::execve(path, argv, envp)
}

/// Generic heap box, type-tagged as an owned string blob — the fallback
/// allocation a backend reaches for when it has no more specific type tag
/// in hand (`spec.md` §4.5.4 "`__malloc`").
pub extern "C" fn __malloc(size: i64) -> i64 {
    unsafe { heap::alloc(size.max(0) as usize, strings::OWNED_TAG).0 }
}

/// # Safety
/// `ptr` must be a tagged pointer this module's allocators produced, or a
/// value [`heap::is_heap_owned`] safely rejects.
pub unsafe extern "C" fn __free(ptr: i64) {
    heap::free(Value(ptr).as_ptr() as *mut u8)
}

/// # Safety
/// Same as [`heap::realloc`].
pub unsafe extern "C" fn __realloc(ptr: i64, size: i64) -> i64 {
    heap::realloc(Value(ptr).as_ptr() as *mut u8, size.max(0) as usize).0
}

/// # Safety
/// `dst`/`src` must be tagged pointers valid for `n` bytes.
pub unsafe extern "C" fn __memcpy(dst: i64, src: i64, n: i64) {
    heap::memcpy(Value(dst).as_ptr() as *mut u8, Value(src).as_ptr() as *const u8, n.max(0) as usize)
}

/// # Safety
/// `dst` must be a tagged pointer valid for `n` bytes.
pub unsafe extern "C" fn __memset(dst: i64, byte: i64, n: i64) {
    heap::memset(Value(dst).as_ptr() as *mut u8, byte as u8, n.max(0) as usize)
}

/// # Safety
/// `a`/`b` must be tagged pointers valid for `n` bytes.
pub unsafe extern "C" fn __memcmp(a: i64, b: i64, n: i64) -> i64 {
    heap::memcmp(Value(a).as_ptr() as *const u8, Value(b).as_ptr() as *const u8, n.max(0) as usize) as i64
}

pub extern "C" fn __str_concat(a: i64, b: i64) -> i64 {
    strings::concat(Value(a), Value(b)).0
}

pub extern "C" fn __to_str(a: i64) -> i64 {
    strings::to_str(Value(a)).0
}

macro_rules! call_symbol {
    ($name:ident, $inner:path [$($arg:ident),*]) => {
        /// # Safety
        /// `callee` must be callable at this arity under the convention
        /// implied by its tag (see [`crate::ffi`]).
        pub unsafe extern "C" fn $name(callee: i64 $(, $arg: i64)*) -> i64 {
            $inner(Value(callee) $(, Value($arg))*).0
        }
    };
}

call_symbol!(__call0, ffi::call0 []);
call_symbol!(__call1, ffi::call1 [a1]);
call_symbol!(__call2, ffi::call2 [a1, a2]);
call_symbol!(__call3, ffi::call3 [a1, a2, a3]);
call_symbol!(__call4, ffi::call4 [a1, a2, a3, a4]);
call_symbol!(__call5, ffi::call5 [a1, a2, a3, a4, a5]);
call_symbol!(__call6, ffi::call6 [a1, a2, a3, a4, a5, a6]);
call_symbol!(__call7, ffi::call7 [a1, a2, a3, a4, a5, a6, a7]);
call_symbol!(__call8, ffi::call8 [a1, a2, a3, a4, a5, a6, a7, a8]);
call_symbol!(__call9, ffi::call9 [a1, a2, a3, a4, a5, a6, a7, a8, a9]);
call_symbol!(__call10, ffi::call10 [a1, a2, a3, a4, a5, a6, a7, a8, a9, a10]);
call_symbol!(__call11, ffi::call11 [a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a11]);
call_symbol!(__call12, ffi::call12 [a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a11, a12]);
call_symbol!(__call13, ffi::call13 [a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a11, a12, a13]);
call_symbol!(__call14, ffi::call14 [a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a11, a12, a13, a14]);
call_symbol!(__call15, ffi::call15 [a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a11, a12, a13, a14, a15]);

/// Every runtime symbol's base name (before a backend's `.N` disambiguation
/// suffix) paired with its bound address, for the AOT/JIT backend to
/// register as global symbol mappings (`spec.md` §4.5.4, §4.5.6).
///
/// Symbols whose behaviour depends on a [`Runtime`] instance (panic
/// frames, `__globals`) are not included here — a backend binds those by
/// emitting an extra leading `rt` pointer argument at the call site and
/// resolving it through [`crate::Runtime`] directly, not through this
/// process-wide table.
pub fn stateless_table() -> Vec<(&'static str, usize)> {
    vec![
        ("__malloc", __malloc as usize),
        ("__free", __free as usize),
        ("__realloc", __realloc as usize),
        ("__memcpy", __memcpy as usize),
        ("__memset", __memset as usize),
        ("__memcmp", __memcmp as usize),
        ("__str_concat", __str_concat as usize),
        ("__to_str", __to_str as usize),
        ("__add", __add as usize),
        ("__sub", __sub as usize),
        ("__mul", __mul as usize),
        ("__div", __div as usize),
        ("__mod", __mod as usize),
        ("__and", __and as usize),
        ("__or", __or as usize),
        ("__xor", __xor as usize),
        ("__shl", __shl as usize),
        ("__shr", __shr as usize),
        ("__not", __not as usize),
        ("__eq", __eq as usize),
        ("__lt", __lt as usize),
        ("__le", __le as usize),
        ("__gt", __gt as usize),
        ("__ge", __ge as usize),
        ("__flt_add", __flt_add as usize),
        ("__flt_sub", __flt_sub as usize),
        ("__flt_mul", __flt_mul as usize),
        ("__flt_div", __flt_div as usize),
        ("__flt_lt", __flt_lt as usize),
        ("__flt_gt", __flt_gt as usize),
        ("__flt_eq", __flt_eq as usize),
        ("__flt_trunc", __flt_trunc as usize),
        ("__flt_box_val", __flt_box_val as usize),
        ("__flt_unbox_val", __flt_unbox_val as usize),
        ("__call0", __call0 as usize),
        ("__call1", __call1 as usize),
        ("__call2", __call2 as usize),
        ("__call3", __call3 as usize),
        ("__call4", __call4 as usize),
        ("__call5", __call5 as usize),
        ("__call6", __call6 as usize),
        ("__call7", __call7 as usize),
        ("__call8", __call8 as usize),
        ("__call9", __call9 as usize),
        ("__call10", __call10 as usize),
        ("__call11", __call11 as usize),
        ("__call12", __call12 as usize),
        ("__call13", __call13 as usize),
        ("__call14", __call14 as usize),
        ("__call15", __call15 as usize),
        ("__sys_read_off", __sys_read_off as usize),
        ("__sys_write_off", __sys_write_off as usize),
        ("__syscall", __syscall as usize),
        ("__execve", __execve as usize),
        ("__set_args", __set_args as usize),
        ("__argc", __argc as usize),
        ("__argv", __argv as usize),
    ]
}

/// Strips a backend-assigned disambiguation suffix like the `.9` in
/// `__malloc.9` back to the base symbol name (`spec.md` §4.5.4).
pub fn base_symbol_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, suffix)) if suffix.chars().all(|c| c.is_ascii_digit()) && !suffix.is_empty() => base,
        _ => name,
    }
}

/// `__panic`/`__set_panic_env`/`__get_panic_val`/`__globals` all need a
/// live [`Runtime`]; a backend passes its context pointer as the hidden
/// first argument at every call site, so these take `&mut Runtime`
/// directly rather than threading it through a raw `i64`.
///
/// `panic` itself never returns to its caller (`spec.md` §4.4.7): it either
/// unwinds straight to the enclosing [`crate::panic::PanicStack::guard`] or,
/// with no frame open, prints and exits the process.
pub fn __panic(rt: &mut Runtime, val: i64) -> ! {
    rt.panic_stack().panic(Value(val))
}

pub fn __set_panic_env(rt: &mut Runtime) {
    rt.panic_stack().push_frame();
}

pub fn __get_panic_val(rt: &mut Runtime) -> i64 {
    rt.panic_stack().get_panic_val().0
}

/// Accessor for the globals table, growing it to `min_len` tagged slots
/// on demand (`spec.md` §9 "`g_globals_ptr`").
pub fn __globals(rt: &mut Runtime, min_len: i64) -> *mut Value {
    rt.globals_ptr(min_len.max(0) as usize)
}

/// Reseeds the process-wide PRNG (`spec.md` §5 "`__srand`"); `0` resets it
/// to the default bring-up seed, matching [`Rng::seed`].
pub fn __srand(rt: &mut Runtime, seed: i64) {
    rt.rng().seed(seed as u64);
}

/// Draws the next xorshift64* value, tagged as a Nytrix integer truncated
/// to 63 bits the way every other integer-producing symbol is (`spec.md`
/// §5 "`__rand64`").
pub fn __rand64(rt: &mut Runtime) -> i64 {
    Value::from_int(rt.rng().next_u64() as i64).0
}

/// `argc`/`argv` as process-wide runtime globals (`spec.md` §7.4
/// "Shared-resource policy" lists `g_argc`/`g_argv` by name), unlike the
/// panic stack and globals table, which are deliberately per-`Runtime` so
/// an embedder can run more than one Nytrix program in a process — an AOT
/// binary's own `main` has no `Runtime` to thread through at all, so argv
/// has to live somewhere reachable without one.
static G_ARGC: std::sync::atomic::AtomicI32 = std::sync::atomic::AtomicI32::new(0);
static G_ARGV: std::sync::atomic::AtomicPtr<*const libc::c_char> =
    std::sync::atomic::AtomicPtr::new(std::ptr::null_mut());

/// Records `argc`/`argv` for the process (`spec.md` §4.5.4, §7.4); called
/// once from the AOT entry point before `__script_top` runs.
///
/// # Safety
/// `argv` must stay valid for `argc` entries for the remainder of the
/// process, which holds for the `char**` a real `main` receives.
pub unsafe extern "C" fn __set_args(argc: i32, argv: *const *const libc::c_char) {
    use std::sync::atomic::Ordering;
    G_ARGC.store(argc, Ordering::SeqCst);
    G_ARGV.store(argv as *mut *const libc::c_char, Ordering::SeqCst);
}

pub extern "C" fn __argc() -> i32 {
    G_ARGC.load(std::sync::atomic::Ordering::SeqCst)
}

/// Fetches argument `i` as a heap string, or `nil` before `__set_args` has
/// run or past `__argc()`.
///
/// # Safety
/// `i` should be less than the most recent `__set_args`'s `argc`.
pub unsafe extern "C" fn __argv(i: i32) -> i64 {
    use std::sync::atomic::Ordering;
    let base = G_ARGV.load(Ordering::SeqCst);
    if base.is_null() || i < 0 || i >= G_ARGC.load(Ordering::SeqCst) {
        return crate::value::NIL.0;
    }
    let cstr = std::ffi::CStr::from_ptr(*base.offset(i as isize));
    strings::alloc_string(&cstr.to_string_lossy()).0
}

/// Pushes a deferred closure onto the current scope (`spec.md` §4.4.7:
/// "`defer` blocks are pushed and popped through runtime-exported
/// helpers"). `callee` is whatever [`ffi::call0`] knows how to invoke.
pub fn __push_defer(rt: &mut Runtime, callee: i64) {
    rt.defer_stack().push(Value(callee));
}

/// Opens a new defer scope; every `__push_defer` until the matching
/// `__run_defers` targets it.
pub fn __open_defer_scope(rt: &mut Runtime) {
    rt.defer_stack().open_scope();
}

/// Runs every closure pushed to the innermost open scope, most recently
/// deferred first, then closes that scope (`spec.md` §4.4.7: "popped on
/// normal or exceptional exit of the enclosing scope").
///
/// # Safety
/// Every pushed callee must still be callable at zero arguments.
pub unsafe fn __run_defers(rt: &mut Runtime) {
    for callee in rt.defer_stack().close_scope() {
        ffi::call0(callee);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_reseed_to_zero_falls_back_to_default_seed() {
        let mut rng = Rng::new();
        rng.seed(0);
        assert_eq!(rng.0, DEFAULT_SEED);
    }

    #[test]
    fn rng_sequence_is_deterministic_for_a_given_seed() {
        let mut a = Rng::new();
        let mut b = Rng::new();
        assert_eq!(a.next_u64(), b.next_u64());
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn bitwise_symbol_matches_arith_module() {
        assert_eq!(__and(Value::from_int(0b110).0, Value::from_int(0b011).0), Value::from_int(0b010).0);
    }

    #[test]
    fn flt_trunc_symbol_truncates_toward_zero() {
        assert_eq!(__flt_trunc(float::box_float(3.9).0), 3);
    }

    #[test]
    fn malloc_free_round_trip_via_symbols() {
        unsafe {
            let ptr = __malloc(10);
            assert!(heap::is_heap_owned(Value(ptr).as_ptr() as *const u8));
            __free(ptr);
        }
    }

    #[test]
    fn base_symbol_name_strips_numeric_disambiguation_suffix() {
        assert_eq!(base_symbol_name("__malloc.9"), "__malloc");
        assert_eq!(base_symbol_name("__malloc"), "__malloc");
        assert_eq!(base_symbol_name("std.core.panic"), "std.core.panic");
    }

    #[test]
    fn panic_symbol_unwinds_to_the_guard_that_opened_its_frame() {
        let mut rt = Runtime::new(vec![]);
        let raw: *mut Runtime = &mut rt;
        // Safety: `__panic` only unwinds as far as `guard`'s own
        // `catch_unwind`, called through the same `rt` below.
        let result = rt.panic_stack().guard(|| __panic(unsafe { &mut *raw }, Value::from_int(5).0));
        assert_eq!(result, Value::from_int(5));
    }

    #[test]
    fn rand_symbols_are_deterministic_until_reseeded() {
        let mut a = Runtime::new(vec![]);
        let mut b = Runtime::new(vec![]);
        assert_eq!(__rand64(&mut a), __rand64(&mut b));
        __srand(&mut a, 99);
        __srand(&mut b, 99);
        assert_eq!(__rand64(&mut a), __rand64(&mut b));
    }

    #[test]
    fn defer_symbols_run_in_reverse_push_order() {
        use std::sync::atomic::{AtomicI64, Ordering};
        static LOG: AtomicI64 = AtomicI64::new(0);

        extern "C" fn record_1() -> i64 {
            LOG.store(LOG.load(Ordering::SeqCst) * 10 + 1, Ordering::SeqCst);
            0
        }
        extern "C" fn record_2() -> i64 {
            LOG.store(LOG.load(Ordering::SeqCst) * 10 + 2, Ordering::SeqCst);
            0
        }

        let mut rt = Runtime::new(vec![]);
        __open_defer_scope(&mut rt);
        __push_defer(&mut rt, Value::from_fn_ptr(record_1 as usize).0);
        __push_defer(&mut rt, Value::from_fn_ptr(record_2 as usize).0);
        unsafe { __run_defers(&mut rt) };
        assert_eq!(LOG.load(Ordering::SeqCst), 21);
    }

    #[test]
    fn set_args_symbol_round_trips_through_argc_argv() {
        use std::ffi::CString;
        let owned = [CString::new("nytrix").unwrap(), CString::new("script.ny").unwrap()];
        let argv: Vec<*const libc::c_char> = owned.iter().map(|s| s.as_ptr()).collect();
        unsafe {
            __set_args(2, argv.as_ptr());
            assert_eq!(__argc(), 2);
            let first = __argv(0);
            assert_eq!(strings::as_str(Value(first)), "nytrix");
            assert_eq!(__argv(5), crate::value::NIL.0);
        }
    }
}
