use super::member::Member;
use crate::ast::{AstNode, AstVisitor, ClassDecl, ClassMember, ConstructorDecl, MethodDecl};

/// Collects the methods and constructors declared directly in a class body.
///
/// Nested types and initializer blocks are not descended into, and abstract
/// methods are still reported; filtering is up to the caller.
#[derive(Debug, Default)]
pub struct MethodCollector<'a> {
    members: Vec<Member<'a>>,
}

impl<'a> MethodCollector<'a> {
    pub fn collect(class: &'a ClassDecl) -> Vec<Member<'a>> {
        let mut collector = Self::default();
        class.accept(&mut collector);
        log::trace!("collected {} members from {}", collector.members.len(), class.name);
        collector.members
    }
}

impl<'a> AstVisitor<'a> for MethodCollector<'a> {
    fn visit_class_decl(&mut self, class: &'a ClassDecl) {
        for member in &class.body {
            self.visit_member(member);
        }
    }

    fn visit_member(&mut self, member: &'a ClassMember) {
        match member {
            ClassMember::Method(m) => self.visit_method_decl(m),
            ClassMember::Constructor(c) => self.visit_constructor_decl(c),
            _ => {}
        }
    }

    fn visit_method_decl(&mut self, method: &'a MethodDecl) {
        self.members.push(Member::Method(method));
    }

    fn visit_constructor_decl(&mut self, constructor: &'a ConstructorDecl) {
        self.members.push(Member::Constructor(constructor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_class;

    #[test]
    fn test_collects_in_declaration_order() {
        let (_, class) = parse_class(
            r#"class Foo {
                int count;
                void a() {}
                Foo() {}
                static { init(); }
                abstract void b();
                class Inner { void hidden() {} }
                Foo(int x) {}
                void c() {}
            }"#,
            "Foo",
        )
        .expect("parse");

        let signatures: Vec<String> = MethodCollector::collect(&class).iter().map(|m| m.signature()).collect();
        assert_eq!(signatures, vec!["a()", "<init>()", "b()", "<init>(int)", "c()"]);
    }

    #[test]
    fn test_empty_class_collects_nothing() {
        let (_, class) = parse_class("class Empty {}", "Empty").expect("parse");
        assert!(MethodCollector::collect(&class).is_empty());
    }
}
