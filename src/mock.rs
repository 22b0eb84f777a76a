//! Mock metadata carried by test classes
//!
//! `@MockMethod` marks a method in a test class as the replacement for a
//! method of the class under test; `MockScope` says which test cases see it.

use crate::ast::{Annotation, ClassDecl, MethodDecl, TypeRef};
use crate::consts::MOCK_METHOD_ANNOTATION;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Visibility of a mock method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MockScope {
    /// Only test cases of the test class the mock belongs to
    #[default]
    Associated,
    /// Every test case
    Global,
}

impl FromStr for MockScope {
    type Err = Error;

    /// Accepts `ASSOCIATED`, `MockScope.GLOBAL` and the like, in any case
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        let name = name.rsplit('.').next().unwrap_or(name);
        match name.to_ascii_uppercase().as_str() {
            "ASSOCIATED" => Ok(MockScope::Associated),
            "GLOBAL" => Ok(MockScope::Global),
            _ => Err(Error::malformed("MockScope", format!("unknown mock scope '{}'", s))),
        }
    }
}

impl fmt::Display for MockScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MockScope::Associated => "ASSOCIATED",
            MockScope::Global => "GLOBAL",
        })
    }
}

/// Contents of a `@MockMethod` annotation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockMethod {
    /// Name of the mocked method when it differs from the mock's own name
    pub target_method: Option<String>,
    /// Owner of the mocked method when it is not the first parameter's type
    pub target_class: Option<TypeRef>,
}

impl MockMethod {
    /// Read a `@MockMethod` annotation. Other annotations yield `None`.
    pub fn from_annotation(annotation: &Annotation) -> Result<Option<Self>> {
        if annotation.simple_name() != MOCK_METHOD_ANNOTATION {
            return Ok(None);
        }

        let target_method = match annotation.argument("targetMethod") {
            Some(raw) => Some(string_value(raw).ok_or_else(|| {
                Error::malformed(format!("@{}", annotation.name), format!("targetMethod must be a string literal, got {}", raw))
            })?),
            None => None,
        }
        .filter(|name| !name.is_empty());

        let target_class = match annotation.argument("targetClass") {
            Some(raw) => Some(class_literal(raw).ok_or_else(|| {
                Error::malformed(format!("@{}", annotation.name), format!("targetClass must be a class literal, got {}", raw))
            })?),
            None => None,
        }
        .filter(|t| t.simple_name() != "NullType");

        Ok(Some(Self {
            target_method,
            target_class,
        }))
    }

    /// Name of the method this mock replaces
    pub fn target_name<'a>(&'a self, mock: &'a MethodDecl) -> &'a str {
        self.target_method.as_deref().unwrap_or(&mock.name)
    }

    /// Mock methods declared in a test class, in declaration order
    pub fn collect(class: &ClassDecl) -> Result<Vec<(&MethodDecl, MockMethod)>> {
        let mut mocks = Vec::new();
        for method in class.methods() {
            for annotation in &method.annotations {
                if let Some(mock) = Self::from_annotation(annotation)? {
                    mocks.push((method, mock));
                }
            }
        }
        Ok(mocks)
    }
}

fn string_value(raw: &str) -> Option<String> {
    let inner = raw.trim().strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                other => out.push(other),
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn class_literal(raw: &str) -> Option<TypeRef> {
    let name = raw.trim().strip_suffix(".class")?.trim();
    let (base, dims) = {
        let mut base = name;
        let mut dims = 0;
        while let Some(rest) = base.strip_suffix("[]") {
            base = rest.trim_end();
            dims += 1;
        }
        (base, dims)
    };
    if base.is_empty() {
        return None;
    }
    let mut type_ref = TypeRef::named(base);
    type_ref.array_dims = dims;
    Some(type_ref)
}
