use crate::heap;
use crate::value::Value;

/// Untags an index argument that may arrive either raw or tagged
/// (`spec.md` §4.4.2 "Index may be raw or tagged").
fn untag_index(idx: Value) -> i64 {
    if idx.is_int() { idx.as_int() } else { idx.0 }
}

/// Whether `v` looks like *some* pointer at all — non-zero, even (tag bit
/// clear), and above the first page, the precondition before any
/// load/store touches it (`spec.md` §4.4.2 "Reject pointers that are not
/// 'any_ptr'").
fn is_any_ptr(v: Value) -> bool {
    v.0 != 0 && v.0 & 1 == 0 && (v.0 as usize) >= 4096
}

/// Bounds-checks `idx + access_size` against a heap-owned pointer's
/// recorded size; negative indices are only permitted within the 64-byte
/// header (`spec.md` §4.4.2).
fn check_bounds(ptr: *const u8, idx: i64, access_size: usize) -> Result<(), String> {
    unsafe {
        if heap::is_heap_owned(ptr) {
            if idx < 0 {
                if (-idx) as usize > heap::HEADER_SIZE {
                    return Err(format!("index {idx} reaches before the heap header"));
                }
                return Ok(());
            }
            let size = heap::size_of(ptr);
            if idx as usize + access_size > size {
                return Err(format!("index {idx} out of bounds for a {size}-byte object"));
            }
        }
        Ok(())
    }
}

macro_rules! load_fn {
    ($name:ident, $ty:ty) => {
        /// # Safety
        /// `ptr` must be a pointer-tagged [`Value`] pointing at readable
        /// memory of at least `idx + size_of::<$ty>()` bytes when not
        /// heap-owned (heap-owned pointers are bounds-checked).
        pub unsafe fn $name(ptr: Value, idx: Value) -> Result<Value, String> {
            if !is_any_ptr(ptr) {
                return Err("load target is not a pointer".to_string());
            }
            let base = ptr.as_ptr() as *const u8;
            let offset = untag_index(idx);
            check_bounds(base, offset, std::mem::size_of::<$ty>())?;
            let addr = base.offset(offset as isize) as *const $ty;
            Ok(Value::from_int(addr.read_unaligned() as i64))
        }
    };
}

macro_rules! store_fn {
    ($name:ident, $ty:ty) => {
        /// # Safety
        /// Same preconditions as the matching load function.
        pub unsafe fn $name(ptr: Value, idx: Value, value: Value) -> Result<(), String> {
            if !is_any_ptr(ptr) {
                return Err("store target is not a pointer".to_string());
            }
            let base = ptr.as_ptr() as *mut u8;
            let offset = untag_index(idx);
            check_bounds(base, offset, std::mem::size_of::<$ty>())?;
            let addr = base.offset(offset as isize) as *mut $ty;
            let raw = if value.is_int() { value.as_int() } else { value.0 };
            addr.write_unaligned(raw as $ty);
            Ok(())
        }
    };
}

load_fn!(load8, i8);
load_fn!(load16, i16);
load_fn!(load32, i32);
load_fn!(load64, i64);

store_fn!(store8, i8);
store_fn!(store16, i16);
store_fn!(store32, i32);
store_fn!(store64, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_load_round_trips_within_bounds() {
        unsafe {
            let v = heap::alloc(64, 100);
            store64(v, Value::from_int(0), Value::from_int(12345)).unwrap();
            let loaded = load64(v, Value::from_int(0)).unwrap();
            assert_eq!(loaded.as_int(), 12345);
            heap::free(v.as_ptr() as *mut u8);
        }
    }

    #[test]
    fn store_rejects_out_of_bounds_index() {
        unsafe {
            let v = heap::alloc(16, 100);
            let result = store64(v, Value::from_int(64), Value::from_int(1));
            assert!(result.is_err());
            heap::free(v.as_ptr() as *mut u8);
        }
    }

    #[test]
    fn negative_index_within_header_is_allowed() {
        unsafe {
            let v = heap::alloc(64, 241);
            let result = load64(v, Value::from_int(-8));
            assert!(result.is_ok());
            heap::free(v.as_ptr() as *mut u8);
        }
    }

    #[test]
    fn non_pointer_target_is_rejected() {
        let result = load64(Value::from_int(5), Value::from_int(0));
        assert!(result.is_err());
    }
}
