use std::rc::Rc;

use nytrix_ast::{Arg, BinaryOp, DictPair, Expr, ExprKind, FStringPart, LogicalOp, Param, Stmt, StmtKind, UnaryOp};
use nytrix_runtime::{arith, strings, Value};

use crate::error::BackendError;
use crate::symbols;

use super::control::{Flow, Signal};
use super::env::EnvRef;
use super::value::{Body, Closure, InterpValue};

/// Evaluates one top-level program: runs every statement in `env` in
/// order and returns the last expression statement's value, mirroring
/// `__script_top`'s contract (`spec.md` §4.5.4) without actually emitting
/// a function named that — the interpreter has no separate "emission"
/// step to name one in.
pub fn eval_program<'a>(statements: &[&'a Stmt<'a>], env: &EnvRef<'a>) -> Flow<'a, InterpValue<'a>> {
    let result = (|| {
        let mut result = InterpValue::nil();
        for stmt in statements {
            result = eval_stmt(stmt, env)?;
        }
        Ok(result)
    })();
    run_defers(env, result)
}

/// Runs `env`'s own deferred bodies on the way out, most recently
/// registered first, regardless of whether `result` is a value, a
/// `break`/`continue`/`return`, or a `panic` (`spec.md` §4.4.7: "popped on
/// normal or exceptional exit of the enclosing scope"). A panic raised by
/// a deferred body itself replaces `result`, the same way a later `panic`
/// overrides an earlier one reaching the same `catch`.
fn run_defers<'a>(env: &EnvRef<'a>, result: Flow<'a, InterpValue<'a>>) -> Flow<'a, InterpValue<'a>> {
    let mut result = result;
    for deferred in env.take_defers() {
        if let Err(signal) = eval_stmt(deferred, env) {
            result = Err(signal);
        }
    }
    result
}

pub fn eval_block<'a>(statements: &[&'a Stmt<'a>], env: &EnvRef<'a>) -> Flow<'a, InterpValue<'a>> {
    let child = env.child();
    eval_program(statements, &child)
}

pub fn eval_stmt<'a>(stmt: &'a Stmt<'a>, env: &EnvRef<'a>) -> Flow<'a, InterpValue<'a>> {
    match &stmt.kind {
        StmtKind::Block(statements) => eval_block(statements, env),

        StmtKind::ExprStmt(expr) => eval_expr(expr, env),

        StmtKind::Var { names, exprs, is_destructure, .. } => {
            eval_var(names, exprs, *is_destructure, env)
        }

        StmtKind::If { test, then_branch, else_branch } => {
            if eval_expr(test, env)?.is_truthy() {
                eval_stmt(then_branch, env)
            } else if let Some(else_branch) = else_branch {
                eval_stmt(else_branch, env)
            } else {
                Ok(InterpValue::nil())
            }
        }

        StmtKind::While { test, body } => {
            while eval_expr(test, env)?.is_truthy() {
                match eval_stmt(body, env) {
                    Ok(_) => {}
                    Err(Signal::Break) => break,
                    Err(Signal::Continue) => continue,
                    other => return other,
                }
            }
            Ok(InterpValue::nil())
        }

        StmtKind::For { iter_var, iterable, body } => eval_for(iter_var, iterable, body, env),

        StmtKind::Try { body, error_name, handler } => match eval_stmt(body, env) {
            Err(Signal::Panic(val)) => {
                let catch_env = env.child();
                if let Some(name) = error_name {
                    catch_env.declare(name, val);
                }
                eval_stmt(handler, &catch_env)
            }
            other => other,
        },

        StmtKind::Func { name, params, body, variadic, .. } => {
            let body = body.ok_or_else(|| {
                BackendError::Runtime(format!("'{name}' has no body and is not declared `extern`"))
            })?;
            let closure = Closure {
                name: Some(*name),
                params: params.iter().cloned().collect(),
                variadic: *variadic,
                body: Body::Stmt(body),
                env: env.clone(),
            };
            env.declare(name, InterpValue::Closure(Rc::new(closure)));
            Ok(InterpValue::nil())
        }

        StmtKind::Extern { name, link_name, .. } => {
            let symbol = link_name.unwrap_or(name);
            match symbols::resolve_stateless(symbol) {
                Some(addr) => env.declare(name, InterpValue::Native(symbol, addr)),
                None => {
                    let handle = nytrix_runtime::dynlink::dlopen(None)
                        .map_err(BackendError::Runtime)?;
                    let resolved = unsafe { nytrix_runtime::dynlink::dlsym(&handle, symbol) }
                        .map_err(BackendError::Runtime)?;
                    env.declare(name, InterpValue::Native(symbol, resolved.untag_native_fn()));
                }
            }
            Ok(InterpValue::nil())
        }

        StmtKind::Return(expr) => {
            let value = match expr {
                Some(e) => eval_expr(e, env)?,
                None => InterpValue::nil(),
            };
            Err(Signal::Return(value))
        }

        StmtKind::Break => Err(Signal::Break),
        StmtKind::Continue => Err(Signal::Continue),

        StmtKind::Defer(body) => {
            env.push_defer(body);
            Ok(InterpValue::nil())
        }

        StmtKind::Use { .. }
        | StmtKind::Export(_)
        | StmtKind::Label(_)
        | StmtKind::Goto(_) => Ok(InterpValue::nil()),

        StmtKind::Match { test, arms, default } => {
            let subject = eval_expr(test, env)?;
            for arm in arms.iter() {
                for pattern in arm.patterns.iter() {
                    let pat_val = eval_expr(pattern, env)?;
                    if values_equal(&subject, &pat_val) {
                        return eval_stmt(arm.consequent, env);
                    }
                }
            }
            match default {
                Some(stmt) => eval_stmt(stmt, env),
                None => Ok(InterpValue::nil()),
            }
        }

        StmtKind::Struct { .. }
        | StmtKind::Layout { .. }
        | StmtKind::Enum { .. }
        | StmtKind::Macro { .. } => {
            Err(BackendError::Unsupported(
                "type/layout declarations are a codegen-level concern handled by the llvm backend",
            )
            .into())
        }
    }
}

fn eval_var<'a>(
    names: &[&'a str],
    exprs: &[&'a Expr<'a>],
    is_destructure: bool,
    env: &EnvRef<'a>,
) -> Flow<'a, InterpValue<'a>> {
    if is_destructure && exprs.len() == 1 {
        let value = eval_expr(exprs[0], env)?;
        let items: Vec<InterpValue<'a>> = match &value {
            InterpValue::List(items) => items.borrow().clone(),
            InterpValue::Tuple(items) => (**items).clone(),
            _ => return Err(BackendError::Runtime("cannot destructure a non-sequence value".into()).into()),
        };
        for (name, item) in names.iter().zip(items.into_iter()) {
            env.declare(name, item);
        }
        return Ok(InterpValue::nil());
    }

    let mut last = InterpValue::nil();
    for (name, expr) in names.iter().zip(exprs.iter()) {
        last = eval_expr(expr, env)?;
        env.declare(name, last.clone());
    }
    Ok(last)
}

fn eval_for<'a>(
    iter_var: &'a str,
    iterable: &'a Expr<'a>,
    body: &'a Stmt<'a>,
    env: &EnvRef<'a>,
) -> Flow<'a, InterpValue<'a>> {
    let subject = eval_expr(iterable, env)?;
    let items: Vec<InterpValue<'a>> = match &subject {
        InterpValue::List(items) => items.borrow().clone(),
        InterpValue::Tuple(items) => (**items).clone(),
        InterpValue::Set(items) => items.borrow().clone(),
        InterpValue::Scalar(v) if v.is_int() => (0..v.as_int()).map(InterpValue::int).collect(),
        _ => return Err(BackendError::Runtime("value is not iterable".into()).into()),
    };
    for item in items {
        let loop_env = env.child();
        loop_env.declare(iter_var, item);
        match eval_stmt(body, &loop_env) {
            Ok(_) => {}
            Err(Signal::Break) => break,
            Err(Signal::Continue) => continue,
            other => return other,
        }
    }
    Ok(InterpValue::nil())
}

pub fn eval_expr<'a>(expr: &'a Expr<'a>, env: &EnvRef<'a>) -> Flow<'a, InterpValue<'a>> {
    match &expr.kind {
        ExprKind::Ident(name) => env
            .get(name)
            .ok_or_else(|| Signal::Error(BackendError::UndefinedName((*name).to_string()))),

        ExprKind::Literal { value, .. } => Ok(eval_literal(value)),

        ExprKind::Unary { op, operand } => eval_unary(*op, operand, env),
        ExprKind::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, env),
        ExprKind::Logical { op, lhs, rhs } => eval_logical(*op, lhs, rhs, env),

        ExprKind::Ternary { cond, then_branch, else_branch } => {
            if eval_expr(cond, env)?.is_truthy() {
                eval_expr(then_branch, env)
            } else {
                eval_expr(else_branch, env)
            }
        }

        ExprKind::Call { callee, args } => {
            // `panic` is a language primitive, not a resolvable runtime
            // symbol, in the interpreter: raising one unwinds via
            // `Signal::Panic` straight to the nearest enclosing `try`,
            // the same way `return`/`break` unwind, rather than through
            // `nytrix_runtime::panic::PanicStack` (which only the
            // FFI/AOT call-stack-crossing case needs).
            if matches!(&callee.kind, ExprKind::Ident(name) if *name == "panic") {
                let mut arg_vals = eval_args(args, env)?;
                let value = arg_vals.pop().map(|(_, v)| v).unwrap_or_else(InterpValue::nil);
                return Err(Signal::Panic(value));
            }
            let callee_val = eval_expr(callee, env)?;
            let arg_vals = eval_args(args, env)?;
            call(&callee_val, arg_vals, env)
        }

        ExprKind::MemberCall { target, name, args } => {
            let receiver = eval_expr(target, env)?;
            let arg_vals = eval_args(args, env)?;
            eval_member_call(&receiver, name, arg_vals)
        }

        ExprKind::Member { target, name } => {
            let receiver = eval_expr(target, env)?;
            eval_member(&receiver, name)
        }

        ExprKind::Index { target, start, stop, step } => eval_index(target, *start, *stop, *step, env),

        ExprKind::Lambda { params, body, variadic, .. } => Ok(InterpValue::Closure(Rc::new(Closure {
            name: None,
            params: params.iter().cloned().collect(),
            variadic: *variadic,
            body: Body::Expr(body),
            env: env.clone(),
        }))),

        ExprKind::Fn { name, params, body, variadic, .. } => Ok(InterpValue::Closure(Rc::new(Closure {
            name: *name,
            params: params.iter().cloned().collect(),
            variadic: *variadic,
            body: Body::Expr(body),
            env: env.clone(),
        }))),

        ExprKind::List(items) => {
            let values = items.iter().map(|e| eval_expr(e, env)).collect::<Flow<'a, Vec<_>>>()?;
            Ok(InterpValue::List(Rc::new(std::cell::RefCell::new(values))))
        }

        ExprKind::Tuple(items) => {
            let values = items.iter().map(|e| eval_expr(e, env)).collect::<Flow<'a, Vec<_>>>()?;
            Ok(InterpValue::Tuple(Rc::new(values)))
        }

        ExprKind::Set(items) => {
            let mut values: Vec<InterpValue<'a>> = Vec::new();
            for e in items.iter() {
                let v = eval_expr(e, env)?;
                if !values.iter().any(|existing| values_equal(existing, &v)) {
                    values.push(v);
                }
            }
            Ok(InterpValue::Set(Rc::new(std::cell::RefCell::new(values))))
        }

        ExprKind::Dict(pairs) => {
            let mut entries = Vec::with_capacity(pairs.len());
            for DictPair { key, value } in pairs.iter() {
                entries.push((eval_expr(key, env)?, eval_expr(value, env)?));
            }
            Ok(InterpValue::Dict(Rc::new(std::cell::RefCell::new(entries))))
        }

        ExprKind::FString(parts) => eval_fstring(parts, env),

        ExprKind::Match { test, arms, default } => {
            let subject = eval_expr(test, env)?;
            for arm in arms.iter() {
                for pattern in arm.patterns.iter() {
                    let pat_val = eval_expr(pattern, env)?;
                    if values_equal(&subject, &pat_val) {
                        return eval_expr(arm.consequent, env);
                    }
                }
            }
            match default {
                Some(e) => eval_expr(e, env),
                None => Ok(InterpValue::nil()),
            }
        }

        ExprKind::Try(inner) => match eval_expr(inner, env) {
            Err(Signal::Panic(val)) => Ok(val),
            other => other,
        },

        ExprKind::Comptime(stmt) => eval_stmt(stmt, env),

        ExprKind::InferredMember(name) => {
            // Resolving `.variant` to a concrete enum requires static type
            // context the tree-walker doesn't track; treat it as a bare
            // name lookup into the current scope instead.
            env.get(name)
                .ok_or_else(|| BackendError::UndefinedName((*name).to_string()).into())
        }

        ExprKind::Asm { .. } | ExprKind::Embed(_) | ExprKind::Sizeof(_) => {
            Err(BackendError::Unsupported("asm/embed/sizeof require real codegen").into())
        }
    }
}

fn eval_literal<'a>(value: &nytrix_ast::LiteralValue<'a>) -> InterpValue<'a> {
    use nytrix_ast::LiteralValue;
    match value {
        LiteralValue::Int(n) => InterpValue::int(*n),
        LiteralValue::Float(f) => InterpValue::Scalar(nytrix_runtime::float::box_float(*f)),
        LiteralValue::Bool(b) => InterpValue::bool(*b),
        LiteralValue::Str(s) => InterpValue::Scalar(strings::alloc_string(s)),
    }
}

fn eval_unary<'a>(op: UnaryOp, operand: &'a Expr<'a>, env: &EnvRef<'a>) -> Flow<'a, InterpValue<'a>> {
    let v = eval_expr(operand, env)?;
    let scalar = require_scalar(&v, "unary operator")?;
    let result = match op {
        UnaryOp::Neg => arith::sub(Value::from_int(0), scalar),
        UnaryOp::Not => Value::from_bool(!scalar.is_truthy()),
        UnaryOp::BitNot => arith::not(scalar),
    };
    Ok(InterpValue::Scalar(result))
}

fn eval_binary<'a>(
    op: BinaryOp,
    lhs: &'a Expr<'a>,
    rhs: &'a Expr<'a>,
    env: &EnvRef<'a>,
) -> Flow<'a, InterpValue<'a>> {
    let l = eval_expr(lhs, env)?;
    let r = eval_expr(rhs, env)?;
    let a = require_scalar(&l, "binary operator")?;
    let b = require_scalar(&r, "binary operator")?;
    let result = match op {
        BinaryOp::Add => arith::add(a, b),
        BinaryOp::Sub => arith::sub(a, b),
        BinaryOp::Mul => arith::mul(a, b),
        BinaryOp::Div => arith::div(a, b),
        BinaryOp::Mod => arith::rem(a, b),
        BinaryOp::Eq => arith::eq(a, b),
        BinaryOp::Neq => arith::neq(a, b),
        BinaryOp::Lt => arith::lt(a, b),
        BinaryOp::Gt => arith::gt(a, b),
        BinaryOp::Le => arith::le(a, b),
        BinaryOp::Ge => arith::ge(a, b),
        BinaryOp::BitAnd => arith::and(a, b),
        BinaryOp::BitOr => arith::or(a, b),
        BinaryOp::BitXor => arith::xor(a, b),
        BinaryOp::Shl => arith::shl(a, b),
        BinaryOp::Shr => arith::shr(a, b),
    };
    Ok(InterpValue::Scalar(result))
}

fn eval_logical<'a>(
    op: LogicalOp,
    lhs: &'a Expr<'a>,
    rhs: &'a Expr<'a>,
    env: &EnvRef<'a>,
) -> Flow<'a, InterpValue<'a>> {
    let l = eval_expr(lhs, env)?;
    match op {
        LogicalOp::And => {
            if !l.is_truthy() {
                Ok(l)
            } else {
                eval_expr(rhs, env)
            }
        }
        LogicalOp::Or => {
            if l.is_truthy() {
                Ok(l)
            } else {
                eval_expr(rhs, env)
            }
        }
    }
}

fn require_scalar<'a>(v: &InterpValue<'a>, context: &'static str) -> Flow<'a, Value> {
    v.as_scalar()
        .ok_or_else(|| BackendError::Runtime(format!("{context}: expected a scalar, found a {}", v.type_name())).into())
}

/// Structural equality used by `match`/`Set`/`Dict` — compound values
/// compare element-wise, scalars defer to [`arith::eq`].
fn values_equal<'a>(a: &InterpValue<'a>, b: &InterpValue<'a>) -> bool {
    match (a, b) {
        (InterpValue::Scalar(x), InterpValue::Scalar(y)) => arith::eq(*x, *y).is_truthy(),
        (InterpValue::Tuple(x), InterpValue::Tuple(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| values_equal(a, b))
        }
        (InterpValue::List(x), InterpValue::List(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| values_equal(a, b))
        }
        _ => false,
    }
}

fn eval_args<'a>(args: &[Arg<'a>], env: &EnvRef<'a>) -> Flow<'a, Vec<(Option<&'a str>, InterpValue<'a>)>> {
    args.iter().map(|a| Ok((a.name, eval_expr(a.value, env)?))).collect()
}

pub fn call<'a>(
    callee: &InterpValue<'a>,
    args: Vec<(Option<&'a str>, InterpValue<'a>)>,
    _env: &EnvRef<'a>,
) -> Flow<'a, InterpValue<'a>> {
    match callee {
        InterpValue::Closure(closure) => call_closure(closure, args),
        InterpValue::Native(name, addr) => call_native(name, *addr, args),
        other => Err(BackendError::NotCallable(other.type_name().to_string()).into()),
    }
}

fn call_closure<'a>(closure: &Rc<Closure<'a>>, args: Vec<(Option<&'a str>, InterpValue<'a>)>) -> Flow<'a, InterpValue<'a>> {
    let call_env = closure.env.child();
    bind_params(&closure.params, closure.variadic, args, &call_env)?;

    match &closure.body {
        Body::Expr(expr) => eval_expr(expr, &call_env),
        Body::Stmt(stmt) => match eval_stmt(stmt, &call_env) {
            Ok(v) => Ok(v),
            Err(Signal::Return(v)) => Ok(v),
            other => other,
        },
    }
}

fn bind_params<'a>(
    params: &[Param<'a>],
    variadic: bool,
    args: Vec<(Option<&'a str>, InterpValue<'a>)>,
    call_env: &EnvRef<'a>,
) -> Flow<'a, ()> {
    let (positional, named): (Vec<_>, Vec<_>) = args.into_iter().partition(|(name, _)| name.is_none());
    let mut positional = positional.into_iter().map(|(_, v)| v);

    let fixed_len = if variadic { params.len().saturating_sub(1) } else { params.len() };

    for (i, param) in params.iter().enumerate() {
        if variadic && i == fixed_len {
            let rest: Vec<InterpValue<'a>> = positional.by_ref().collect();
            call_env.declare(param.name, InterpValue::List(Rc::new(std::cell::RefCell::new(rest))));
            continue;
        }
        let value = if let Some((_, v)) = named.iter().find(|(n, _)| n == &Some(param.name)) {
            v.clone()
        } else if let Some(v) = positional.next() {
            v
        } else if let Some(default) = param.default {
            eval_expr(default, call_env)?
        } else {
            return Err(BackendError::Arity {
                name: param.name.to_string(),
                expected: fixed_len,
                got: 0,
            }
            .into());
        };
        call_env.declare(param.name, value);
    }
    Ok(())
}

fn call_native<'a>(name: &'a str, addr: usize, args: Vec<(Option<&'a str>, InterpValue<'a>)>) -> Flow<'a, InterpValue<'a>> {
    let tagged: Vec<Value> = args
        .into_iter()
        .map(|(_, v)| require_scalar(&v, "native call argument"))
        .collect::<Flow<'a, Vec<_>>>()?;
    let callee = Value::from_native_fn(addr);
    let result = unsafe {
        match tagged.len() {
            0 => nytrix_runtime::ffi::call0(callee),
            1 => nytrix_runtime::ffi::call1(callee, tagged[0]),
            2 => nytrix_runtime::ffi::call2(callee, tagged[0], tagged[1]),
            3 => nytrix_runtime::ffi::call3(callee, tagged[0], tagged[1], tagged[2]),
            4 => nytrix_runtime::ffi::call4(callee, tagged[0], tagged[1], tagged[2], tagged[3]),
            5 => nytrix_runtime::ffi::call5(callee, tagged[0], tagged[1], tagged[2], tagged[3], tagged[4]),
            6 => nytrix_runtime::ffi::call6(
                callee, tagged[0], tagged[1], tagged[2], tagged[3], tagged[4], tagged[5],
            ),
            _ => return Err(BackendError::Unsupported("native calls with more than 6 arguments").into()),
        }
    };
    let _ = name;
    Ok(InterpValue::Scalar(result))
}

fn eval_member<'a>(receiver: &InterpValue<'a>, name: &str) -> Flow<'a, InterpValue<'a>> {
    match (receiver, name) {
        (InterpValue::List(items), "len") => Ok(InterpValue::int(items.borrow().len() as i64)),
        (InterpValue::Tuple(items), "len") => Ok(InterpValue::int(items.len() as i64)),
        (InterpValue::Set(items), "len") => Ok(InterpValue::int(items.borrow().len() as i64)),
        (InterpValue::Dict(items), "len") => Ok(InterpValue::int(items.borrow().len() as i64)),
        _ => Err(BackendError::UndefinedName(format!("{}.{}", receiver.type_name(), name)).into()),
    }
}

fn eval_member_call<'a>(
    receiver: &InterpValue<'a>,
    name: &str,
    args: Vec<(Option<&'a str>, InterpValue<'a>)>,
) -> Flow<'a, InterpValue<'a>> {
    match (receiver, name) {
        (InterpValue::List(items), "push") => {
            for (_, v) in args {
                items.borrow_mut().push(v);
            }
            Ok(InterpValue::nil())
        }
        (InterpValue::List(items), "pop") => Ok(items.borrow_mut().pop().unwrap_or_else(InterpValue::nil)),
        (InterpValue::Dict(items), "get") => {
            let key = args.into_iter().next().map(|(_, v)| v).unwrap_or_else(InterpValue::nil);
            Ok(items
                .borrow()
                .iter()
                .find(|(k, _)| values_equal(k, &key))
                .map(|(_, v)| v.clone())
                .unwrap_or_else(InterpValue::nil))
        }
        (InterpValue::Dict(items), "set") => {
            let mut it = args.into_iter().map(|(_, v)| v);
            let key = it.next().unwrap_or_else(InterpValue::nil);
            let value = it.next().unwrap_or_else(InterpValue::nil);
            let mut items = items.borrow_mut();
            if let Some(slot) = items.iter_mut().find(|(k, _)| values_equal(k, &key)) {
                slot.1 = value;
            } else {
                items.push((key, value));
            }
            Ok(InterpValue::nil())
        }
        _ => Err(BackendError::UndefinedName(format!("{}.{}(..)", receiver.type_name(), name)).into()),
    }
}

fn eval_index<'a>(
    target: &'a Expr<'a>,
    start: Option<&'a Expr<'a>>,
    stop: Option<&'a Expr<'a>>,
    step: Option<&'a Expr<'a>>,
    env: &EnvRef<'a>,
) -> Flow<'a, InterpValue<'a>> {
    let subject = eval_expr(target, env)?;
    if stop.is_some() || step.is_some() {
        return Err(BackendError::Unsupported("slice indexing").into());
    }
    let idx_expr = start.ok_or_else(|| BackendError::Runtime("index expression requires a start bound".into()))?;
    let idx = eval_expr(idx_expr, env)?;
    let idx = require_scalar(&idx, "index")?.as_int();

    match &subject {
        InterpValue::List(items) => Ok(items.borrow().get(idx as usize).cloned().unwrap_or_else(InterpValue::nil)),
        InterpValue::Tuple(items) => Ok(items.get(idx as usize).cloned().unwrap_or_else(InterpValue::nil)),
        _ => Err(BackendError::Runtime(format!("cannot index a {}", subject.type_name())).into()),
    }
}

fn eval_fstring<'a>(parts: &[FStringPart<'a>], env: &EnvRef<'a>) -> Flow<'a, InterpValue<'a>> {
    let mut joined = String::new();
    for part in parts {
        match part {
            FStringPart::Str(s) => joined.push_str(s),
            FStringPart::Expr(e) => {
                let v = eval_expr(e, env)?;
                let scalar = require_scalar(&v, "f-string interpolation")?;
                let text = strings::to_str(scalar);
                joined.push_str(unsafe { strings::as_str(text) });
            }
        }
    }
    Ok(InterpValue::Scalar(strings::alloc_string(&joined)))
}
