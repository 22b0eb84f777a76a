//! Rewritable members of a class and the eligibility filter

use super::collector::MethodCollector;
use crate::ast::{ClassDecl, ConstructorDecl, MethodDecl, Modifier, ModifierSet, Parameter, TypeParam, TypeRef};
use crate::consts::CONSTRUCTOR_NAME;

/// A member collected from a class body. Whether it is a constructor is
/// decided once, by the variant, when the member is collected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'a> {
    Constructor(&'a ConstructorDecl),
    Method(&'a MethodDecl),
}

impl<'a> Member<'a> {
    /// Method name, or `<init>` for constructors
    pub fn name(&self) -> &'a str {
        match self {
            Member::Constructor(_) => CONSTRUCTOR_NAME,
            Member::Method(m) => &m.name,
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self, Member::Constructor(_))
    }

    pub fn modifiers(&self) -> ModifierSet {
        match self {
            Member::Constructor(c) => c.modifiers,
            Member::Method(m) => m.modifiers,
        }
    }

    pub fn parameters(&self) -> &'a [Parameter] {
        match self {
            Member::Constructor(c) => &c.parameters,
            Member::Method(m) => &m.parameters,
        }
    }

    pub fn type_params(&self) -> &'a [TypeParam] {
        match self {
            Member::Constructor(c) => &c.type_params,
            Member::Method(m) => &m.type_params,
        }
    }

    pub fn throws(&self) -> &'a [TypeRef] {
        match self {
            Member::Constructor(c) => &c.throws,
            Member::Method(m) => &m.throws,
        }
    }

    /// `None` for constructors
    pub fn return_type(&self) -> Option<&'a TypeRef> {
        match self {
            Member::Constructor(_) => None,
            Member::Method(m) => Some(&m.return_type),
        }
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers().contains(Modifier::Abstract)
    }

    pub fn signature(&self) -> String {
        match self {
            Member::Constructor(c) => c.signature(),
            Member::Method(m) => m.signature(),
        }
    }
}

/// Whether a collected member gets a counterpart in the synthetic class.
/// Abstract methods have no body to forward to and are dropped.
pub fn is_eligible(member: &Member<'_>) -> bool {
    !member.is_abstract()
}

/// Members of `class` that will be rewritten, in declaration order
pub fn eligible_members(class: &ClassDecl) -> Vec<Member<'_>> {
    let mut members = MethodCollector::collect(class);
    members.retain(|m| {
        let keep = is_eligible(m);
        if !keep {
            log::trace!("skipping abstract {}", m.signature());
        }
        keep
    });
    members
}
