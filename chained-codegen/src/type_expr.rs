//! Textual generic type expressions.
//!
//! Parsing is purely syntactic: angle brackets are balanced, arguments are
//! split on top-level commas, and everything else (wildcards, bounds, array
//! suffixes, qualified names) is kept verbatim in the leaf token. Nothing is
//! resolved against real types.

use std::fmt;

use crate::{Error, Result};

/// A parsed type expression such as `java.util.Map<K, java.util.List<V>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    base: String,
    args: Vec<TypeNode>,
}

impl TypeNode {
    /// A leaf node without type arguments.
    pub fn leaf(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            args: Vec::new(),
        }
    }

    pub fn new(base: impl Into<String>, args: Vec<TypeNode>) -> Self {
        Self {
            base: base.into(),
            args,
        }
    }

    /// Parse a type expression.
    ///
    /// Fails only when the angle brackets are unbalanced, when text follows
    /// the outermost closing `>`, or when a type argument is empty.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        check_balanced(text)?;

        let Some(open) = text.find('<') else {
            return Ok(Self::leaf(text));
        };
        if !text.ends_with('>') {
            return Err(malformed(text, "text follows the closing '>'"));
        }

        let base = text[..open].trim();
        if base.is_empty() {
            return Err(malformed(text, "missing base type before '<'"));
        }
        let inner = &text[open + 1..text.len() - 1];
        let args = split_top_level(inner)
            .into_iter()
            .map(|arg| {
                if arg.trim().is_empty() {
                    Err(malformed(text, "empty type argument"))
                } else {
                    Self::parse(arg)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(base, args))
    }

    /// The base name, e.g. `java.util.Map` for `java.util.Map<K, V>`.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn args(&self) -> &[TypeNode] {
        &self.args
    }

    pub fn is_leaf(&self) -> bool {
        self.args.is_empty()
    }

    /// Render with every base name passed through `transform`.
    ///
    /// Used to route each referenced class through an import registry.
    pub fn render_with<F>(&self, transform: &mut F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let base = transform(&self.base);
        if self.args.is_empty() {
            return base;
        }
        let args: Vec<String> = self.args.iter().map(|a| a.render_with(transform)).collect();
        format!("{}<{}>", base, args.join(", "))
    }

    /// Render the expression with canonical `, ` argument separators.
    pub fn render(&self) -> String {
        self.render_with(&mut |base| base.to_string())
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn malformed(text: &str, reason: &'static str) -> Error {
    Error::MalformedType {
        text: text.to_string(),
        reason,
    }
}

fn check_balanced(text: &str) -> Result<()> {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed(text, "unmatched '>'"))?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(malformed(text, "unclosed '<'"));
    }
    Ok(())
}

/// Split on commas that are not nested inside angle brackets.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
