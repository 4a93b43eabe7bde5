use crate::float;
use crate::strings;
use crate::value::{Tag, Value, FALSE, TRUE};

fn tagged_bool(b: bool) -> Value {
    if b { TRUE } else { FALSE }
}

/// Dispatches `+` across int/int, float-involved, pointer+int, and
/// string+string operand pairs (`spec.md` §4.4.3).
pub fn add(a: Value, b: Value) -> Value {
    if a.is_int() && b.is_int() {
        return Value(a.0.wrapping_add(b.0).wrapping_sub(1));
    }
    if strings::is_string(a) || strings::is_string(b) {
        return strings::concat(a, b);
    }
    if a.tag() == Tag::Pointer && b.is_int() {
        return Value::from_ptr((a.as_ptr() as i64).wrapping_add(b.as_int()) as usize);
    }
    if b.tag() == Tag::Pointer && a.is_int() {
        return Value::from_ptr((b.as_ptr() as i64).wrapping_add(a.as_int()) as usize);
    }
    float::flt_add(a, b).expect("add: operands are neither integers, strings, nor numeric")
}

/// `-`: integer/integer, float-involved, pointer-int (pointer arithmetic),
/// and pointer-pointer (address difference as a tagged int).
pub fn sub(a: Value, b: Value) -> Value {
    if a.is_int() && b.is_int() {
        return Value(a.0.wrapping_sub(b.0).wrapping_add(1));
    }
    if a.tag() == Tag::Pointer && b.tag() == Tag::Pointer {
        let diff = (a.as_ptr() as i64) - (b.as_ptr() as i64);
        return Value::from_int(diff);
    }
    if a.tag() == Tag::Pointer && b.is_int() {
        return Value::from_ptr((a.as_ptr() as i64).wrapping_sub(b.as_int()) as usize);
    }
    float::flt_sub(a, b).expect("sub: operands are neither integers, pointers, nor numeric")
}

pub fn mul(a: Value, b: Value) -> Value {
    if a.is_int() && b.is_int() {
        let product = a.as_int().wrapping_mul(b.as_int());
        return Value::from_int(product);
    }
    float::flt_mul(a, b).expect("mul: operands are neither integers nor numeric")
}

/// Integer division by zero yields `0`; mirrors the original's
/// fail-soft behaviour rather than panicking the host process
/// (`spec.md` §4.4.3).
pub fn div(a: Value, b: Value) -> Value {
    if a.is_int() && b.is_int() {
        let (x, y) = (a.as_int(), b.as_int());
        return Value::from_int(if y == 0 { 0 } else { x / y });
    }
    float::flt_div(a, b).expect("div: operands are neither integers nor numeric")
}

/// Modulo by zero yields `none`, matching `rt_mod`'s C fallback
/// (`spec.md` §4.4.3).
pub fn rem(a: Value, b: Value) -> Value {
    if a.is_int() && b.is_int() {
        let (x, y) = (a.as_int(), b.as_int());
        if y == 0 {
            return crate::value::NONE;
        }
        return Value::from_int(x % y);
    }
    float::flt_div(a, b).expect("rem: operands are neither integers nor numeric")
}

/// Deep equality: `nil`/`0`/`NONE` singletons compare equal to each other,
/// strings compare by content, everything else by tagged bit identity
/// (`spec.md` §4.4.3 "`==` is reflexive... deep string compare").
pub fn eq(a: Value, b: Value) -> Value {
    use crate::value::{NIL, NONE};

    let a_nilish = matches!(a, NIL | NONE) || a == Value::from_int(0);
    let b_nilish = matches!(b, NIL | NONE) || b == Value::from_int(0);
    if a_nilish && b_nilish {
        return TRUE;
    }
    if strings::is_string(a) && strings::is_string(b) {
        let equal = unsafe { strings::as_str(a) == strings::as_str(b) };
        return tagged_bool(equal);
    }
    tagged_bool(a == b)
}

pub fn neq(a: Value, b: Value) -> Value {
    tagged_bool(eq(a, b) == FALSE)
}

macro_rules! int_or_float_cmp {
    ($name:ident, $int_op:tt, $flt_fn:path) => {
        pub fn $name(a: Value, b: Value) -> Value {
            if a.is_int() && b.is_int() {
                return tagged_bool(a.as_int() $int_op b.as_int());
            }
            tagged_bool($flt_fn(a, b).unwrap_or(false))
        }
    };
}

int_or_float_cmp!(lt, <, float::flt_lt);
int_or_float_cmp!(gt, >, float::flt_gt);

pub fn le(a: Value, b: Value) -> Value {
    tagged_bool(lt(a, b) == TRUE || eq(a, b) == TRUE)
}

pub fn ge(a: Value, b: Value) -> Value {
    tagged_bool(gt(a, b) == TRUE || eq(a, b) == TRUE)
}

fn untag_bits(v: Value) -> i64 {
    if v.is_int() { v.as_int() } else { v.0 }
}

macro_rules! bitwise_binop {
    ($name:ident, $op:tt) => {
        pub fn $name(a: Value, b: Value) -> Value {
            Value::from_int(untag_bits(a) $op untag_bits(b))
        }
    };
}

bitwise_binop!(and, &);
bitwise_binop!(or, |);
bitwise_binop!(xor, ^);
bitwise_binop!(shl, <<);
bitwise_binop!(shr, >>);

pub fn not(a: Value) -> Value {
    Value::from_int(!untag_bits(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_addition_stays_in_integer_tag_space() {
        let sum = add(Value::from_int(2), Value::from_int(3));
        assert!(sum.is_int());
        assert_eq!(sum.as_int(), 5);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let result = div(Value::from_int(10), Value::from_int(0));
        assert_eq!(result.as_int(), 0);
    }

    #[test]
    fn modulo_by_zero_yields_none() {
        assert_eq!(rem(Value::from_int(10), Value::from_int(0)), crate::value::NONE);
    }

    #[test]
    fn string_concat_via_plus() {
        let joined = add(strings::alloc_string("a"), strings::alloc_string("b"));
        assert_eq!(unsafe { strings::as_str(joined) }, "ab");
    }

    #[test]
    fn equality_treats_nil_zero_and_none_as_equal() {
        assert_eq!(eq(crate::value::NIL, crate::value::NONE), TRUE);
        assert_eq!(eq(crate::value::NIL, Value::from_int(0)), TRUE);
    }

    #[test]
    fn ordering_compares_by_value() {
        assert_eq!(lt(Value::from_int(1), Value::from_int(2)), TRUE);
        assert_eq!(ge(Value::from_int(2), Value::from_int(2)), TRUE);
    }

    #[test]
    fn bitwise_ops_untag_and_retag() {
        let result = and(Value::from_int(0b110), Value::from_int(0b011));
        assert_eq!(result.as_int(), 0b010);
    }
}
