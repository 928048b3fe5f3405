//! Route pattern compilation.
//!
//! Patterns are literal text with two token kinds: `:name` matches one path
//! segment and `*name` matches the remainder of the path. A token runs up to
//! the next `/` or the end of the pattern, so the compiled text can be
//! inserted into the tree with token boundaries intact.

use thiserror::Error;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("route pattern is empty")]
    Empty,

    #[error("invalid parameter name '{name}' in pattern '{pattern}'")]
    InvalidParamName { pattern: String, name: String },

    #[error("cannot use identifier '{name}' more than once in pattern '{pattern}'")]
    DuplicateParam { pattern: String, name: String },

    #[error("wildcard '*{name}' must be the last token of pattern '{pattern}'")]
    WildcardNotLast { pattern: String, name: String },
}

/// Kind of a parameter token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `:name`, one segment.
    Named,
    /// `*name`, the rest of the path.
    Wildcard,
}

/// A parameter declared by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
}

/// A validated, normalized route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    params: Vec<ParamSpec>,
}

impl Pattern {
    /// Compile `input`, prefixing a `/` when it is missing.
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PatternError::Empty);
        }

        let source = if input.starts_with('/') {
            input.to_string()
        } else {
            format!("/{input}")
        };

        let mut params = Vec::new();
        let bytes = source.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let kind = match bytes[i] {
                b':' => ParamKind::Named,
                b'*' => ParamKind::Wildcard,
                _ => {
                    i += 1;
                    continue;
                }
            };

            let end = source[i..].find('/').map_or(source.len(), |offset| i + offset);
            let name = &source[i + 1..end];

            if !is_identifier(name) {
                return Err(PatternError::InvalidParamName {
                    pattern: source.clone(),
                    name: name.to_string(),
                });
            }
            if kind == ParamKind::Wildcard && end != source.len() {
                return Err(PatternError::WildcardNotLast {
                    pattern: source.clone(),
                    name: name.to_string(),
                });
            }
            if params.iter().any(|p: &ParamSpec| p.name == name) {
                return Err(PatternError::DuplicateParam {
                    pattern: source.clone(),
                    name: name.to_string(),
                });
            }

            params.push(ParamSpec {
                name: name.to_string(),
                kind,
            });
            i = end;
        }

        Ok(Self { source, params })
    }

    /// The normalized pattern text, as inserted into the tree.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Whether this pattern declares a parameter called `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// The pattern with every token name dropped, e.g. `/a/:/b/*`.
    ///
    /// Two patterns with the same shape reach the same tree position.
    pub fn shape(&self) -> String {
        let mut shape = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();
        while let Some(start) = rest.find([':', '*']) {
            shape.push_str(&rest[..=start]);
            rest = &rest[start..];
            rest = rest.find('/').map_or("", |end| &rest[end..]);
        }
        shape.push_str(rest);
        shape
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// `[A-Za-z][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}
