//! Rewritten method and constructor declarations

use super::statement::Statement;
use crate::ast::{ConstructorDecl, MethodDecl, Modifier, ModifierSet, Parameter, TypeParam, TypeRef};
use crate::consts::CONSTRUCTOR_NAME;

#[derive(Debug, Clone, PartialEq)]
pub enum MethodKind {
    Constructor,
    Method { name: String, return_type: TypeRef },
}

/// A generated member of the synthetic class
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub kind: MethodKind,
    pub modifiers: ModifierSet,
    /// Carries `@Override`
    pub is_override: bool,
    pub type_params: Vec<TypeParam>,
    pub parameters: Vec<Parameter>,
    pub exceptions: Vec<TypeRef>,
    pub statements: Vec<Statement>,
}

impl MethodSpec {
    pub fn name(&self) -> &str {
        match &self.kind {
            MethodKind::Constructor => CONSTRUCTOR_NAME,
            MethodKind::Method { name, .. } => name,
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, MethodKind::Constructor)
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        match &self.kind {
            MethodKind::Constructor => None,
            MethodKind::Method { return_type, .. } => Some(return_type),
        }
    }
}

/// Drop `private` and `protected`, add `public`, keep everything else
pub fn to_public_flags(modifiers: ModifierSet) -> ModifierSet {
    modifiers
        .without(Modifier::Private)
        .without(Modifier::Protected)
        .with(Modifier::Public)
}

/// Rebuild `method` as a public member of the synthetic class.
///
/// A private original is not overridden at runtime, so its counterpart gets
/// no `@Override` and declares `permissive_exception` in place of the
/// original `throws` list. Anything else is an override with the same
/// `throws` list.
pub fn build_member_method(method: &MethodDecl, permissive_exception: &str, statements: Vec<Statement>) -> MethodSpec {
    let (is_override, exceptions) = if method.is_private() {
        (false, vec![TypeRef::named(permissive_exception)])
    } else {
        (true, method.throws.clone())
    };

    MethodSpec {
        kind: MethodKind::Method {
            name: method.name.clone(),
            return_type: method.return_type.clone(),
        },
        modifiers: to_public_flags(method.modifiers),
        is_override,
        type_params: method.type_params.clone(),
        parameters: copy_parameters(&method.parameters),
        exceptions,
        statements,
    }
}

/// Rebuild `ctor` as a public constructor with the same parameters.
/// Declared exceptions are not carried over.
pub fn build_constructor(ctor: &ConstructorDecl, statements: Vec<Statement>) -> MethodSpec {
    MethodSpec {
        kind: MethodKind::Constructor,
        modifiers: ModifierSet::of(&[Modifier::Public]),
        is_override: false,
        type_params: ctor.type_params.clone(),
        parameters: copy_parameters(&ctor.parameters),
        exceptions: Vec::new(),
        statements,
    }
}

// name, type and varargs only
fn copy_parameters(parameters: &[Parameter]) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|p| Parameter {
            modifiers: ModifierSet::empty(),
            annotations: Vec::new(),
            type_ref: p.type_ref.clone(),
            name: p.name.clone(),
            varargs: p.varargs,
            span: p.span,
        })
        .collect()
}
