//! Body statements and the providers that supply them
//!
//! A [`Statement`] is a format template plus positional arguments, expanded by
//! the writer. Which statements a rewritten member gets is decided by a
//! [`StatementProvider`] injected into the synthesizer.

use super::member::Member;
use crate::ast::{ClassDecl, MethodDecl, Parameter, TypeParam, TypeRef};

/// Positional argument of a statement template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementArg {
    /// Emitted as-is by `$L`
    Literal(String),
    /// Identifier for `$N`
    Name(String),
    /// Quoted and escaped by `$S`
    Str(String),
    /// Type name for `$T`
    Type(String),
}

impl StatementArg {
    /// Raw text of the argument before any quoting
    pub fn text(&self) -> &str {
        match self {
            StatementArg::Literal(s) | StatementArg::Name(s) | StatementArg::Str(s) | StatementArg::Type(s) => s,
        }
    }

    /// Placeholder letter this argument is meant for
    pub fn placeholder(&self) -> char {
        match self {
            StatementArg::Literal(_) => 'L',
            StatementArg::Name(_) => 'N',
            StatementArg::Str(_) => 'S',
            StatementArg::Type(_) => 'T',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub template: String,
    pub args: Vec<StatementArg>,
}

impl Statement {
    pub fn new(template: impl Into<String>, args: Vec<StatementArg>) -> Self {
        Self {
            template: template.into(),
            args,
        }
    }

    /// Statement without placeholders. A `$` in `code` is escaped.
    pub fn code(code: &str) -> Self {
        Self::new(code.replace('$', "$$"), Vec::new())
    }
}

/// Supplies the body of each rewritten member.
///
/// `class_name` is the simple name of the synthetic class being built.
pub trait StatementProvider {
    fn provide(&self, class_name: &str, member: &Member<'_>) -> Vec<Statement>;

    /// Same as [`provide`](Self::provide) with the original class at hand.
    /// The synthesizer calls this one.
    fn provide_in(&self, _original: &ClassDecl, class_name: &str, member: &Member<'_>) -> Vec<Statement> {
        self.provide(class_name, member)
    }
}

impl<F> StatementProvider for F
where
    F: Fn(&str, &Member<'_>) -> Vec<Statement>,
{
    fn provide(&self, class_name: &str, member: &Member<'_>) -> Vec<Statement> {
        self(class_name, member)
    }
}

/// Pins a closure to the provider signature so its arguments are inferred
/// as borrowed for any lifetime.
pub fn provider_fn<F>(f: F) -> F
where
    F: Fn(&str, &Member<'_>) -> Vec<Statement>,
{
    f
}

/// Forwards every member to its superclass counterpart.
///
/// Private members cannot be called through `super`, so they go through
/// reflection, which is also why rewritten private methods declare a
/// permissive exception. Static members are called on the original class.
///
/// Naming the original class and erasing its type variables needs
/// [`provide_in`](StatementProvider::provide_in); plain `provide` only knows
/// the member's own type variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallSuperStatements;

impl CallSuperStatements {
    fn forward(&self, original: Option<&ClassDecl>, member: &Member<'_>) -> Vec<Statement> {
        let args = argument_list(member.parameters());

        let method = match member {
            Member::Constructor(_) => {
                return vec![Statement::new("super($L)", vec![StatementArg::Literal(args)])];
            }
            Member::Method(m) => *m,
        };
        if method.is_private() {
            return reflective_call(original, method);
        }

        let (target, mut call_args) = match original {
            Some(class) if method.is_static() => ("$T", vec![StatementArg::Type(class.name.clone())]),
            _ => {
                if method.is_static() {
                    log::warn!("static {} forwarded through super without its declaring class", method.signature());
                }
                ("super", Vec::new())
            }
        };
        let template = if method.return_type.is_void() {
            format!("{}.$N($L)", target)
        } else {
            format!("return {}.$N($L)", target)
        };
        call_args.push(StatementArg::Name(method.name.clone()));
        call_args.push(StatementArg::Literal(args));
        vec![Statement::new(template, call_args)]
    }
}

impl StatementProvider for CallSuperStatements {
    fn provide(&self, _class_name: &str, member: &Member<'_>) -> Vec<Statement> {
        self.forward(None, member)
    }

    fn provide_in(&self, original: &ClassDecl, _class_name: &str, member: &Member<'_>) -> Vec<Statement> {
        self.forward(Some(original), member)
    }
}

fn argument_list(parameters: &[Parameter]) -> String {
    parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
}

/// Erased name of `type_ref` for a `Class` literal. Type variables are looked
/// up in `scope`, innermost first, and replaced by their first bound.
fn erase(type_ref: &TypeRef, scope: &[&TypeParam]) -> String {
    let dims = "[]".repeat(type_ref.array_dims);
    let mut raw = type_ref.raw_name();
    for _ in 0..=scope.len() {
        match scope.iter().find(|tp| tp.name == raw) {
            Some(tp) => raw = tp.bounds.first().map_or_else(|| "Object".to_string(), |b| b.raw_name()),
            None => return format!("{}{}", raw, dims),
        }
    }
    // bounds that loop back on themselves
    format!("Object{}", dims)
}

fn reflective_call(original: Option<&ClassDecl>, method: &MethodDecl) -> Vec<Statement> {
    let class_params: &[TypeParam] = original.map(|c| c.type_params.as_slice()).unwrap_or(&[]);
    let scope: Vec<&TypeParam> = method.type_params.iter().chain(class_params).collect();

    let class_literals: String = method
        .parameters
        .iter()
        .map(|p| {
            let dims = if p.varargs { "[]" } else { "" };
            format!(", {}{}.class", erase(&p.type_ref, &scope), dims)
        })
        .collect();
    let invoke_args: String = method.parameters.iter().map(|p| format!(", {}", p.name)).collect();

    let method_type = StatementArg::Type("java.lang.reflect.Method".to_string());
    let lookup = match original {
        Some(class) if method.is_static() => Statement::new(
            "$T superMethod = $T.class.getDeclaredMethod($S$L)",
            vec![
                method_type,
                StatementArg::Type(class.name.clone()),
                StatementArg::Str(method.name.clone()),
                StatementArg::Literal(class_literals),
            ],
        ),
        None if method.is_static() => Statement::new(
            "$T superMethod = java.lang.invoke.MethodHandles.lookup().lookupClass().getSuperclass().getDeclaredMethod($S$L)",
            vec![method_type, StatementArg::Str(method.name.clone()), StatementArg::Literal(class_literals)],
        ),
        _ => Statement::new(
            "$T superMethod = getClass().getSuperclass().getDeclaredMethod($S$L)",
            vec![method_type, StatementArg::Str(method.name.clone()), StatementArg::Literal(class_literals)],
        ),
    };
    let receiver = if method.is_static() { "null" } else { "this" };

    let mut statements = vec![lookup, Statement::code("superMethod.setAccessible(true)")];
    if method.return_type.is_void() {
        statements.push(Statement::new(
            format!("superMethod.invoke({}$L)", receiver),
            vec![StatementArg::Literal(invoke_args)],
        ));
    } else {
        statements.push(Statement::new(
            format!("return ($T) superMethod.invoke({}$L)", receiver),
            vec![
                StatementArg::Type(method.return_type.to_string()),
                StatementArg::Literal(invoke_args),
            ],
        ));
    }
    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, ConstructorDecl, Modifier, ModifierSet, Span};
    use crate::parser::parse_class;

    fn method(name: &str, modifiers: &[Modifier], return_type: &str, params: Vec<Parameter>) -> MethodDecl {
        MethodDecl {
            modifiers: ModifierSet::of(modifiers),
            annotations: Vec::new(),
            type_params: Vec::new(),
            return_type: TypeRef::named(return_type),
            name: name.to_string(),
            parameters: params,
            throws: Vec::new(),
            body: Some(Block::default()),
            span: Span::synthetic(),
        }
    }

    #[test]
    fn test_constructor_calls_super() {
        let ctor = ConstructorDecl {
            modifiers: ModifierSet::empty(),
            annotations: Vec::new(),
            type_params: Vec::new(),
            name: "Foo".to_string(),
            parameters: vec![Parameter::new(TypeRef::named("int"), "x"), Parameter::new(TypeRef::named("String"), "y")],
            throws: Vec::new(),
            body: Block::default(),
            span: Span::synthetic(),
        };
        let statements = CallSuperStatements.provide("FooTestable", &Member::Constructor(&ctor));
        assert_eq!(statements, vec![Statement::new("super($L)", vec![StatementArg::Literal("x, y".into())])]);
    }

    #[test]
    fn test_public_method_returns_super_result() {
        let m = method("bar", &[Modifier::Public], "int", vec![Parameter::new(TypeRef::named("String"), "s")]);
        let statements = CallSuperStatements.provide("FooTestable", &Member::Method(&m));
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].template, "return super.$N($L)");
        assert_eq!(statements[0].args[0], StatementArg::Name("bar".into()));
    }

    #[test]
    fn test_void_method_has_no_return() {
        let m = method("run", &[Modifier::Protected], "void", Vec::new());
        let statements = CallSuperStatements.provide("FooTestable", &Member::Method(&m));
        assert_eq!(statements[0].template, "super.$N($L)");
        assert_eq!(statements[0].args[1], StatementArg::Literal(String::new()));
    }

    #[test]
    fn test_private_method_goes_through_reflection() {
        let mut varargs = Parameter::new(TypeRef::named("String"), "names");
        varargs.varargs = true;
        let mut m = method(
            "secret",
            &[Modifier::Private],
            "T",
            vec![Parameter::new(TypeRef::named("T"), "seed"), varargs],
        );
        m.type_params.push(TypeParam { name: "T".into(), bounds: Vec::new(), span: Span::synthetic() });

        let statements = CallSuperStatements.provide("FooTestable", &Member::Method(&m));
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].args[1], StatementArg::Str("secret".into()));
        assert_eq!(statements[0].args[2], StatementArg::Literal(", Object.class, String[].class".into()));
        assert_eq!(statements[1], Statement::new("superMethod.setAccessible(true)", Vec::new()));
        assert_eq!(statements[2].template, "return ($T) superMethod.invoke(this$L)");
        assert_eq!(statements[2].args[1], StatementArg::Literal(", seed, names".into()));
    }

    #[test]
    fn test_static_methods_are_called_on_original_class() {
        let (_, class) = parse_class(
            "class U { static int pub_(int x) { return x; } private static void hid(int x, long y) { } }",
            "U",
        )
        .expect("parse");
        let mut methods = class.methods();
        let public = Member::Method(methods.next().expect("pub_"));
        let hidden = Member::Method(methods.next().expect("hid"));

        let statements = CallSuperStatements.provide_in(&class, "UTestable", &public);
        assert_eq!(
            statements,
            vec![Statement::new(
                "return $T.$N($L)",
                vec![
                    StatementArg::Type("U".into()),
                    StatementArg::Name("pub_".into()),
                    StatementArg::Literal("x".into()),
                ],
            )]
        );

        let statements = CallSuperStatements.provide_in(&class, "UTestable", &hidden);
        assert_eq!(statements[0].template, "$T superMethod = $T.class.getDeclaredMethod($S$L)");
        assert_eq!(statements[0].args[1], StatementArg::Type("U".into()));
        assert_eq!(statements[0].args[3], StatementArg::Literal(", int.class, long.class".into()));
        assert_eq!(statements[2], Statement::new("superMethod.invoke(null$L)", vec![StatementArg::Literal(", x, y".into())]));
    }

    #[test]
    fn test_private_static_without_class_uses_lookup_class() {
        let m = method("hid", &[Modifier::Private, Modifier::Static], "int", Vec::new());
        let statements = CallSuperStatements.provide("UTestable", &Member::Method(&m));
        assert!(statements[0].template.contains("MethodHandles.lookup().lookupClass().getSuperclass()"));
        assert_eq!(statements[2].template, "return ($T) superMethod.invoke(null$L)");
    }

    #[test]
    fn test_class_type_variables_are_erased() {
        let (_, class) = parse_class(
            "class Box<T extends Number, U> { private <U> void put(T t, U[] u, java.util.List<T> l, T... more) { } }",
            "Box",
        )
        .expect("parse");
        let put = Member::Method(class.methods().next().expect("put"));

        let statements = CallSuperStatements.provide_in(&class, "BoxTestable", &put);
        assert_eq!(statements[0].template, "$T superMethod = getClass().getSuperclass().getDeclaredMethod($S$L)");
        assert_eq!(
            statements[0].args[2],
            StatementArg::Literal(", Number.class, Object[].class, java.util.List.class, Number[].class".into())
        );
    }

    #[test]
    fn test_closures_are_providers() {
        let provider = provider_fn(|class_name, member| {
            vec![Statement::new("log($S)", vec![StatementArg::Str(format!("{}#{}", class_name, member.name()))])]
        });
        let m = method("bar", &[], "void", Vec::new());
        let statements = provider.provide("X", &Member::Method(&m));
        assert_eq!(statements[0].args[0].text(), "X#bar");
        assert_eq!(statements[0].args[0].placeholder(), 'S');
    }

    #[test]
    fn test_code_escapes_dollar() {
        assert_eq!(Statement::code("a$b").template, "a$$b");
    }
}
