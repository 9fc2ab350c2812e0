//! Indentation-aware Java source writer.

use crate::{ImportRegistry, TypeNode};

/// Marker replaced by the import block when the writer is finished.
const IMPORTS_HERE: &str = "<<IMPORTS_HERE>>";

/// One level of indentation.
const INDENT: &str = "    ";

/// Writes one compilation unit.
///
/// A line ending with `{` opens a block and indents what follows; [`close`]
/// dedents and writes the matching `}`. Class references go through the
/// writer's [`ImportRegistry`], and the import block is substituted where
/// [`imports_here`] was called once the body is complete.
///
/// [`close`]: CodeWriter::close
/// [`imports_here`]: CodeWriter::imports_here
///
/// # Example
///
/// ```
/// use chained_codegen::CodeWriter;
///
/// let mut w = CodeWriter::new("me.Thing");
/// w.push_line("package me;");
/// w.imports_here();
/// w.push_blank();
/// let list = w.class("java.util.List");
/// w.push_line("public final class Thing {");
/// w.push_line(&format!("private {list}<String> names;"));
/// w.close();
///
/// assert_eq!(
///     w.finish(),
///     "package me;\n\nimport java.util.List;\n\npublic final class Thing {\n    private List<String> names;\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodeWriter {
    imports: ImportRegistry,
    indent_level: usize,
    buffer: String,
}

impl CodeWriter {
    /// Create a writer for the class `owner` (qualified).
    pub fn new(owner: &str) -> Self {
        Self {
            imports: ImportRegistry::new(owner),
            indent_level: 0,
            buffer: String::new(),
        }
    }

    /// Claim a simple name declared inside this file.
    pub fn reserve(&mut self, simple: &str) -> &mut Self {
        self.imports.reserve(simple);
        self
    }

    /// Display name of a class reference.
    pub fn class(&mut self, qualified: &str) -> String {
        self.imports.register(qualified)
    }

    /// Display text of a type expression.
    pub fn ty(&mut self, node: &TypeNode) -> String {
        self.imports.render(node)
    }

    /// Write a line at the current indentation, opening a block if it ends with `{`.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        if s.ends_with('{') {
            self.indent_level += 1;
        }
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level, used for continuation lines.
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Close the innermost block.
    pub fn close(&mut self) -> &mut Self {
        self.push_dedent();
        self.push_line("}")
    }

    /// Close the innermost block and continue on the same line, e.g. `} catch (`.
    pub fn reopen(&mut self, s: &str) -> &mut Self {
        self.push_dedent();
        self.push_line(&format!("}} {s}"))
    }

    /// Write the import block placeholder.
    pub fn imports_here(&mut self) -> &mut Self {
        self.push_line(IMPORTS_HERE)
    }

    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// Column at which the next line's text starts.
    pub fn current_column(&self) -> usize {
        self.indent_level * INDENT.len()
    }

    /// Consume the writer, substituting the import block.
    pub fn finish(self) -> String {
        let code = self.imports.to_code();
        let block = if code.is_empty() {
            String::new()
        } else {
            format!("\n{code}")
        };
        self.buffer.replacen(&format!("{IMPORTS_HERE}\n"), &block, 1)
    }
}
