use std::collections::HashMap;

use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::AddressSpace;

use nytrix_ast::{Arena, Expr, ExprKind, LiteralValue, Program, Stmt, StmtKind};

use super::codegen::Interns;

/// Walks every top-level statement for string literals and interns each
/// into a global whose payload layout matches §3.7's heap object header
/// (magic words, size mirrors, type tag `243` for a constant string, the
/// trailing canary) so JIT and AOT code see an identical representation —
/// this emitter only ever needs the *constant* string tag, `241`
/// (owned/freeable) strings are allocated at runtime via `__malloc`.
pub fn intern_string_literals<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    program: &Program,
    _arena: &Arena,
) -> Interns<'ctx> {
    let mut globals = HashMap::new();
    let mut index = 0usize;
    for stmt in program.statements.iter() {
        walk_stmt(context, module, stmt, &mut globals, &mut index);
    }
    Interns { globals }
}

fn walk_stmt<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    stmt: &Stmt,
    globals: &mut HashMap<String, inkwell::values::GlobalValue<'ctx>>,
    index: &mut usize,
) {
    match &stmt.kind {
        StmtKind::ExprStmt(expr) | StmtKind::Return(Some(expr)) => {
            walk_expr(context, module, expr, globals, index)
        }
        StmtKind::Var { exprs, .. } => {
            for e in exprs.iter() {
                walk_expr(context, module, e, globals, index);
            }
        }
        StmtKind::Block(statements) => {
            for s in statements.iter() {
                walk_stmt(context, module, s, globals, index);
            }
        }
        _ => {}
    }
}

fn walk_expr<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    expr: &Expr,
    globals: &mut HashMap<String, inkwell::values::GlobalValue<'ctx>>,
    index: &mut usize,
) {
    match &expr.kind {
        ExprKind::Literal { value: LiteralValue::Str(s), .. } => {
            if !globals.contains_key(*s) {
                let name = format!("__nytrix_str_{}", *index);
                *index += 1;
                let global = build_header_prefixed_string(context, module, &name, s);
                globals.insert((*s).to_string(), global);
            }
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            walk_expr(context, module, lhs, globals, index);
            walk_expr(context, module, rhs, globals, index);
        }
        ExprKind::Unary { operand, .. } => walk_expr(context, module, operand, globals, index),
        ExprKind::Call { callee, args } => {
            walk_expr(context, module, callee, globals, index);
            for a in args.iter() {
                walk_expr(context, module, a.value, globals, index);
            }
        }
        _ => {}
    }
}

const MAGIC_A: u64 = 0x0054_5249_584E_5954;
const MAGIC_B: u64 = 0x004E_5954_5249_584E;
const CANARY: u64 = 0xDEAD_BEEF_CAFE_BABE;
const CONST_STRING_TAG: u64 = 243;

/// Builds a global whose bytes are laid out exactly as the 64-byte,
/// 64-byte-aligned heap header from §3.7 followed by the NUL-terminated
/// string payload and trailing canary, so a pointer 64 bytes into this
/// global is a valid tagged string value at both JIT and AOT time.
fn build_header_prefixed_string<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    name: &str,
    s: &str,
) -> inkwell::values::GlobalValue<'ctx> {
    let i64_ty = context.i64_type();
    let i8_ty = context.i8_type();

    let size = (s.len() + 1) as u64;
    let header_words = [
        MAGIC_A,
        size,
        MAGIC_B,
        0, // reserved/type-specific metadata (24 bytes, only the low word used)
        0,
        0,
        size,
        CONST_STRING_TAG,
    ];
    let header_consts: Vec<_> = header_words.iter().map(|w| i64_ty.const_int(*w, false)).collect();
    let header = i64_ty.const_array(&header_consts);

    let mut payload_bytes: Vec<u8> = s.bytes().collect();
    payload_bytes.push(0);
    let payload_consts: Vec<_> = payload_bytes.iter().map(|b| i8_ty.const_int(*b as u64, false)).collect();
    let payload = i8_ty.const_array(&payload_consts);

    let canary = i64_ty.const_int(CANARY, false);

    let struct_ty = context.struct_type(
        &[header.get_type().into(), payload.get_type().into(), i64_ty.into()],
        true,
    );
    let initializer = struct_ty.const_named_struct(&[header.into(), payload.into(), canary.into()]);

    let global = module.add_global(struct_ty, Some(AddressSpace::default()), name);
    global.set_initializer(&initializer);
    global.set_constant(true);
    global.set_linkage(Linkage::Private);
    global
}
