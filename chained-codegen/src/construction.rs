//! How a generated `build()` instantiates the target type.

use serde::Serialize;

use crate::{CodeWriter, Parameter, Vocabulary};

/// Argument lists longer than this are written one argument per line.
const MAX_INLINE_ARGS: usize = 3;
const MAX_INLINE_WIDTH: usize = 80;

/// Construction strategy, fixed for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Construction {
    /// Call the visible constructor.
    Direct,
    /// Look up the non-visible constructor reflectively and invoke it.
    Reflective,
    /// Call the static `create` factory of a generated implementation class.
    ImplementationDelegate { implementation: String },
}

impl Construction {
    pub fn is_delegate(&self) -> bool {
        matches!(self, Self::ImplementationDelegate { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Reflective => "reflective",
            Self::ImplementationDelegate { .. } => "implementation-delegate",
        }
    }
}

/// Write the statements returning a new `target` built from `params`.
///
/// Each parameter is read from the variable of the same name in scope.
pub(crate) fn write_construction(
    w: &mut CodeWriter,
    vocab: &Vocabulary,
    target: &str,
    params: &[Parameter],
    construction: &Construction,
) {
    let args: Vec<String> = params.iter().map(|p| argument(w, vocab, p)).collect();
    match construction {
        Construction::Direct => {
            let target = w.class(target);
            write_call(w, &format!("return new {target}("), &args, ");");
        }
        Construction::Reflective => write_reflective(w, target, params, &args),
        Construction::ImplementationDelegate { implementation } => {
            let implementation = w.class(implementation);
            write_call(w, &format!("return {implementation}.create("), &args, ");");
        }
    }
}

/// Argument expression for one parameter, wrapping containers in an
/// unmodifiable view.
fn argument(w: &mut CodeWriter, vocab: &Vocabulary, p: &Parameter) -> String {
    let name = p.name();
    if p.is_prerendered() || !vocab.is_unmodifiable(p.ty()) {
        return name.to_string();
    }
    let helpers = w.class(&vocab.runtime().helpers);
    if p.is_nullable() {
        format!("{name} == null ? null : {helpers}.unmodifiable({name})")
    } else {
        format!("{helpers}.unmodifiable({name})")
    }
}

fn write_reflective(w: &mut CodeWriter, target: &str, params: &[Parameter], args: &[String]) {
    let constructor = w.class("java.lang.reflect.Constructor");
    let invocation = w.class("java.lang.reflect.InvocationTargetException");
    let no_such_method = w.class("java.lang.NoSuchMethodException");
    let instantiation = w.class("java.lang.InstantiationException");
    let illegal_access = w.class("java.lang.IllegalAccessException");
    let runtime = w.class("java.lang.RuntimeException");
    let target = w.class(target);
    let classes: Vec<String> = params
        .iter()
        .map(|p| format!("{}.class", erasure(w, p)))
        .collect();

    w.push_line("// use reflection to call non-visible constructor");
    w.push_line("try {");
    w.push_line(&format!("{constructor}<{target}> _c = {target}.class"));
    w.push_indent().push_indent();
    w.push_line(&format!(".getDeclaredConstructor({});", classes.join(", ")));
    w.push_dedent().push_dedent();
    w.push_line("_c.setAccessible(true);");
    write_call(w, "return _c.newInstance(", args, ");");
    w.reopen(&format!("catch ({invocation}"));
    w.push_indent().push_indent();
    w.push_line(&format!("| {no_such_method}"));
    w.push_line(&format!("| {instantiation}"));
    w.push_line(&format!("| {illegal_access} e) {{"));
    w.push_dedent().push_dedent();
    w.push_line(&format!("throw new {runtime}(e);"));
    w.close();
}

/// Erased class literal of a parameter type.
fn erasure(w: &mut CodeWriter, p: &Parameter) -> String {
    let base = p.ty().base();
    if p.is_prerendered() {
        return base.split('<').next().unwrap_or(base).trim().to_string();
    }
    w.class(base)
}

/// Write `head` + arguments + `tail`, breaking long argument lists.
pub(crate) fn write_call(w: &mut CodeWriter, head: &str, args: &[String], tail: &str) {
    let inline = format!("{head}{}{tail}", args.join(", "));
    let width = w.current_column() + inline.len();
    if args.len() <= MAX_INLINE_ARGS && width <= MAX_INLINE_WIDTH {
        w.push_line(&inline);
        return;
    }

    w.push_line(head);
    w.push_indent().push_indent();
    for (i, arg) in args.iter().enumerate() {
        if i + 1 == args.len() {
            w.push_line(&format!("{arg}{tail}"));
        } else {
            w.push_line(&format!("{arg},"));
        }
    }
    w.push_dedent().push_dedent();
}
