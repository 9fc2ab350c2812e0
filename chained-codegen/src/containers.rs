//! Sub-builders for list, set and map fields.

use crate::{CodeWriter, ContainerKind, Parameter, Vocabulary};

/// Where a sub-builder hands control back to once its terminal is called.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Continuation<'a> {
    /// Display name of the type returned by the terminal
    pub ty: &'a str,
    /// Expression producing it
    pub expr: &'a str,
}

/// Emit the zero-argument accessor returning a sub-builder bound to the
/// field `owner.<name>`. Does nothing unless `p` has a container shape.
///
/// The backing collection is replaced by a fresh mutable copy on each call
/// so that seeded or caller-supplied collections are never mutated.
pub(crate) fn write_sub_builder(
    w: &mut CodeWriter,
    vocab: &Vocabulary,
    p: &Parameter,
    owner: &str,
    continuation: Continuation<'_>,
) {
    if p.is_prerendered() {
        return;
    }
    let Some(shape) = vocab.container(p.ty()) else {
        return;
    };

    let runtime = vocab.runtime();
    let builder = match shape.kind {
        ContainerKind::List => w.class(&runtime.list_builder),
        ContainerKind::Set => w.class(&runtime.set_builder),
        ContainerKind::Map => w.class(&runtime.map_builder),
    };
    let type_args: Vec<String> = p.ty().args().iter().map(|a| w.ty(a)).collect();
    let implementation = w.class(shape.implementation);
    let name = p.name();
    let field = format!("{owner}.{name}");

    tracing::trace!(parameter = name, kind = ?shape.kind, "emitting sub-builder");

    w.push_blank();
    w.push_line(&format!(
        "public {builder}<{}, {}> {name}() {{",
        type_args.join(", "),
        continuation.ty
    ));
    w.push_line(&format!(
        "{field} = {field} == null ? new {implementation}<>() : new {implementation}<>({field});"
    ));
    w.push_line(&format!(
        "return new {builder}<>(() -> {}, {field});",
        continuation.expr
    ));
    w.close();
}
