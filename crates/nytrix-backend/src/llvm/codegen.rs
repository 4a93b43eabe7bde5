use std::collections::HashMap;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::values::IntValue;

use nytrix_ast::{BinaryOp, Expr, ExprKind, LiteralValue, Program, Stmt, StmtKind};

use crate::error::BackendError;
use crate::symbols;

/// Declares every `extern` symbol the program's top-level names, as an
/// `i64(i64, i64, i64, i64) -> i64` function (the widest arity this
/// bounded emitter calls through; real variadic/typed FFI signatures are
/// out of scope alongside full codegen bodies).
///
/// Only top-level `extern` declarations are scanned — nested ones (inside
/// a function body) aren't, since this emitter doesn't lower function
/// bodies other than `__script_top` itself.
pub fn declare_runtime_symbols<'ctx>(context: &'ctx Context, module: &Module<'ctx>, program: &Program) {
    let i64_ty = context.i64_type();
    let fn_ty = i64_ty.fn_type(&[i64_ty.into(), i64_ty.into(), i64_ty.into(), i64_ty.into()], false);

    for stmt in program.statements.iter() {
        if let StmtKind::Extern { name, link_name, .. } = &stmt.kind {
            let symbol = link_name.unwrap_or(name);
            let base = symbols::base_symbol_name(symbol);
            if symbols::resolve_stateless(base).is_some() || symbols::needs_runtime_context(base) {
                if module.get_function(symbol).is_none() {
                    module.add_function(symbol, fn_ty, Some(Linkage::External));
                }
            }
        }
    }
}

pub struct Interns<'ctx> {
    pub globals: HashMap<String, inkwell::values::GlobalValue<'ctx>>,
}

/// Lowers `__script_top`'s body: the linearised top-level statements,
/// returning the final expression's value as a tagged `i64` (`spec.md`
/// §4.5.4). Only the subset of statements/expressions a bounded,
/// contract-level emitter needs is handled — integer/bool literals,
/// arithmetic, and `return`; anything else yields
/// [`BackendError::Unsupported`] rather than a silently wrong lowering.
pub fn emit_script_top<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
    program: &Program,
    _interns: &Interns<'ctx>,
) -> Result<(), BackendError> {
    let i64_ty = context.i64_type();
    let fn_ty = i64_ty.fn_type(&[], false);
    let function = module.add_function("__script_top", fn_ty, None);
    let entry = context.append_basic_block(function, "entry");
    builder.position_at_end(entry);

    let mut last = i64_ty.const_int(1, false); // tagged `0`
    for stmt in program.statements.iter() {
        last = lower_stmt(context, module, builder, stmt)?.unwrap_or(last);
    }
    builder
        .build_return(Some(&last))
        .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;
    Ok(())
}

/// Synthesises the AOT entry point (`spec.md` §4.5.4, §7.4): `main(argc,
/// argv, envp)` hands `argc`/`argv` to the runtime's process-wide argv
/// globals via `__set_args` before calling `__script_top`, then untags
/// its result and returns it as the process exit code. `envp` is accepted
/// to match the C entry point's signature but otherwise unused — Nytrix
/// has no `__environ` surface yet.
pub fn emit_aot_main<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
) -> Result<(), BackendError> {
    let i32_ty = context.i32_type();
    let i64_ty = context.i64_type();
    let i8_ptr_ty = context.i8_type().ptr_type(inkwell::AddressSpace::default());
    let argv_ty = i8_ptr_ty.ptr_type(inkwell::AddressSpace::default());
    let main_ty = i32_ty.fn_type(&[i32_ty.into(), argv_ty.into(), argv_ty.into()], false);
    let main_fn = module.add_function("main", main_ty, None);
    let entry = context.append_basic_block(main_fn, "entry");
    builder.position_at_end(entry);

    let argc = main_fn
        .get_nth_param(0)
        .ok_or_else(|| BackendError::Runtime("main is missing its argc parameter".into()))?
        .into_int_value();
    let argv = main_fn
        .get_nth_param(1)
        .ok_or_else(|| BackendError::Runtime("main is missing its argv parameter".into()))?;

    let set_args_ty = context.void_type().fn_type(&[i32_ty.into(), argv_ty.into()], false);
    let set_args = module.get_function("__set_args").unwrap_or_else(|| {
        module.add_function("__set_args", set_args_ty, Some(Linkage::External))
    });
    builder
        .build_call(set_args, &[argc.into(), argv.into()], "")
        .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;

    let script_top = module
        .get_function("__script_top")
        .ok_or_else(|| BackendError::Runtime("__script_top missing before main synthesis".into()))?;
    let call = builder
        .build_call(script_top, &[], "result")
        .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;
    let tagged = call
        .try_as_basic_value()
        .left()
        .ok_or_else(|| BackendError::Runtime("__script_top returned no value".into()))?
        .into_int_value();

    // Untag: `(n << 1) | 1` on the way in, `n >> 1` on the way out
    // (`spec.md` §3.6).
    let one = i64_ty.const_int(1, false);
    let shifted = builder
        .build_right_shift(tagged, one, true, "untagged")
        .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;
    let exit_code = builder
        .build_int_truncate(shifted, i32_ty, "exit_code")
        .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;
    builder
        .build_return(Some(&exit_code))
        .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;
    Ok(())
}

fn lower_stmt<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
    stmt: &Stmt,
) -> Result<Option<IntValue<'ctx>>, BackendError> {
    match &stmt.kind {
        StmtKind::ExprStmt(expr) => Ok(Some(lower_expr(context, module, builder, expr)?)),
        StmtKind::Return(Some(expr)) => {
            let value = lower_expr(context, module, builder, expr)?;
            builder
                .build_return(Some(&value))
                .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;
            Ok(None)
        }
        StmtKind::Block(statements) => {
            let mut last = None;
            for s in statements.iter() {
                last = lower_stmt(context, module, builder, s)?;
            }
            Ok(last)
        }
        StmtKind::Use { .. } | StmtKind::Extern { .. } => Ok(None),
        other => Err(BackendError::Unsupported(stmt_kind_name(other))),
    }
}

fn lower_expr<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
    expr: &Expr,
) -> Result<IntValue<'ctx>, BackendError> {
    let i64_ty = context.i64_type();
    match &expr.kind {
        ExprKind::Literal { value: LiteralValue::Int(n), .. } => {
            Ok(i64_ty.const_int(((*n << 1) | 1) as u64, true))
        }
        ExprKind::Literal { value: LiteralValue::Bool(b), .. } => {
            Ok(i64_ty.const_int(if *b { 2 } else { 4 }, false))
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let a = lower_expr(context, module, builder, lhs)?;
            let b = lower_expr(context, module, builder, rhs)?;
            let symbol = match op {
                BinaryOp::Add => "__add",
                BinaryOp::Sub => "__sub",
                BinaryOp::Mul => "__mul",
                BinaryOp::Div => "__div",
                BinaryOp::Mod => "__mod",
                _ => return Err(BackendError::Unsupported("comparison/bitwise operators in AOT codegen")),
            };
            let function = module.get_function(symbol).ok_or(BackendError::Unsupported(
                "arithmetic requires the corresponding runtime symbol to be `extern`-declared",
            ))?;
            let zero = i64_ty.const_int(1, false);
            let call = builder
                .build_call(function, &[a.into(), b.into(), zero.into(), zero.into()], "binop")
                .map_err(|e| BackendError::Runtime(format!("LLVM IR build failed: {e}")))?;
            Ok(call.try_as_basic_value().left().unwrap().into_int_value())
        }
        _ => Err(BackendError::Unsupported(
            "this expression form requires full codegen, which is out of scope for this backend",
        )),
    }
}

fn stmt_kind_name(stmt: &StmtKind) -> &'static str {
    match stmt {
        StmtKind::Var { .. } => "var declarations in AOT codegen",
        StmtKind::If { .. } => "if statements in AOT codegen",
        StmtKind::While { .. } => "while loops in AOT codegen",
        StmtKind::For { .. } => "for loops in AOT codegen",
        StmtKind::Try { .. } => "try/catch in AOT codegen",
        StmtKind::Func { .. } => "nested function declarations in AOT codegen",
        StmtKind::Struct { .. } | StmtKind::Layout { .. } | StmtKind::Enum { .. } => "type declarations in AOT codegen",
        StmtKind::Match { .. } => "match statements in AOT codegen",
        StmtKind::Module { .. } => "nested modules in AOT codegen",
        _ => "this statement form in AOT codegen",
    }
}
