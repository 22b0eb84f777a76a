use super::{AstNode, AstVisitor, Span};
use crate::consts::{CONSTRUCTOR_NAME, PRIMITIVE_TYPES};
use std::fmt;

// Package and Import Declarations
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDecl {
    pub name: String,
    pub span: Span,
}

impl AstNode for PackageDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_package_decl(self)
    }
}

impl fmt::Display for PackageDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {};", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub span: Span,
}

impl AstNode for ImportDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_import_decl(self)
    }
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "import static ")?;
        } else {
            write!(f, "import ")?;
        }

        if self.is_wildcard {
            write!(f, "{}.*;", self.name)
        } else {
            write!(f, "{};", self.name)
        }
    }
}

// Type Declarations
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Opaque(OpaqueTypeDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Class(c) => &c.name,
            TypeDecl::Interface(i) => &i.name,
            TypeDecl::Opaque(o) => &o.name,
        }
    }
}

impl AstNode for TypeDecl {
    fn span(&self) -> Span {
        match self {
            TypeDecl::Class(c) => c.span(),
            TypeDecl::Interface(i) => i.span(),
            TypeDecl::Opaque(o) => o.span,
        }
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_type_decl(self)
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDecl::Class(c) => write!(f, "{}", c),
            TypeDecl::Interface(i) => write!(f, "{}", i),
            TypeDecl::Opaque(o) => write!(f, "{} {}", o.kind, o.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

impl ClassDecl {
    /// The class's own type, with its type parameters as type arguments.
    /// `class Box<T extends Number>` yields `Box<T>`.
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef {
            name: self.name.clone(),
            type_args: self
                .type_params
                .iter()
                .map(|p| TypeArg::Type(TypeRef::named(p.name.clone())))
                .collect(),
            array_dims: 0,
            enclosing: None,
            span: self.span,
        }
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.body.iter().filter_map(|m| match m {
            ClassMember::Method(m) => Some(m),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
        self.body.iter().filter_map(|m| match m {
            ClassMember::Constructor(c) => Some(c),
            _ => None,
        })
    }
}

impl AstNode for ClassDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_class_decl(self)
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

impl AstNode for InterfaceDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_interface_decl(self)
    }
}

impl fmt::Display for InterfaceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    Enum,
    Annotation,
    Record,
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpaqueKind::Enum => "enum",
            OpaqueKind::Annotation => "@interface",
            OpaqueKind::Record => "record",
        })
    }
}

/// Type declaration recorded by name only; its body is skipped by the parser
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueTypeDecl {
    pub kind: OpaqueKind,
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub span: Span,
}

// Modifiers and Annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    /// All modifiers in the order Java style guides print them
    pub const ALL: [Modifier; 12] = [
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Abstract,
        Modifier::Default,
        Modifier::Static,
        Modifier::Final,
        Modifier::Transient,
        Modifier::Volatile,
        Modifier::Synchronized,
        Modifier::Native,
        Modifier::Strictfp,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Immutable set of modifier flags
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u16);

impl ModifierSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(modifiers: &[Modifier]) -> Self {
        modifiers.iter().fold(Self::empty(), |set, m| set.with(*m))
    }

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    #[must_use]
    pub fn with(self, modifier: Modifier) -> Self {
        Self(self.0 | modifier.bit())
    }

    #[must_use]
    pub fn without(self, modifier: Modifier) -> Self {
        Self(self.0 & !modifier.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in canonical order
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, m| set.with(m))
    }
}

impl fmt::Debug for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(m.keyword())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<AnnotationArg>,
    pub span: Span,
}

impl Annotation {
    /// Simple name, `MockMethod` for both `@MockMethod` and `@a.b.MockMethod`
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Raw source of a named argument, or of the single value for `value`
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.iter().find_map(|arg| match arg {
            AnnotationArg::Named(n, v) if n == name => Some(v.as_str()),
            AnnotationArg::Value(v) if name == "value" => Some(v.as_str()),
            _ => None,
        })
    }
}

impl AstNode for Annotation {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_annotation(self)
    }
}

/// Annotation argument, value kept as raw source text
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArg {
    Value(String),
    Named(String, String),
}

// Type References
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
    pub type_args: Vec<TypeArg>,
    pub array_dims: usize,
    /// Parameterized prefix of a member type: `Outer<String>` in
    /// `Outer<String>.Inner<Integer>`. `name` then holds only what follows it.
    pub enclosing: Option<Box<TypeRef>>,
    pub span: Span,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
            array_dims: 0,
            enclosing: None,
            span: Span::synthetic(),
        }
    }

    pub fn void() -> Self {
        Self::named("void")
    }

    pub fn is_void(&self) -> bool {
        self.name == "void" && self.array_dims == 0 && self.enclosing.is_none()
    }

    pub fn is_primitive(&self) -> bool {
        self.array_dims == 0 && self.enclosing.is_none() && PRIMITIVE_TYPES.contains(&self.name.as_str())
    }

    /// Simple name without package qualification
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Dotted name with the type arguments of every segment dropped
    pub fn raw_name(&self) -> String {
        match &self.enclosing {
            Some(outer) => format!("{}.{}", outer.raw_name(), self.name),
            None => self.name.clone(),
        }
    }

    /// Erased form used for `Class` literals: `List<String>[]` becomes `List[]`
    pub fn erasure(&self) -> String {
        format!("{}{}", self.raw_name(), "[]".repeat(self.array_dims))
    }
}

impl AstNode for TypeRef {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_type_ref(self)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(outer) = &self.enclosing {
            write!(f, "{}.", outer)?;
        }
        f.write_str(&self.name)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeArg {
    Type(TypeRef),
    Wildcard(WildcardType),
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Type(t) => write!(f, "{}", t),
            TypeArg::Wildcard(w) => match &w.bound {
                None => f.write_str("?"),
                Some((BoundKind::Extends, t)) => write!(f, "? extends {}", t),
                Some((BoundKind::Super, t)) => write!(f, "? super {}", t),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WildcardType {
    pub bound: Option<(BoundKind, TypeRef)>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeRef>,
    pub span: Span,
}

impl AstNode for TypeParam {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_type_param(self)
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            if i == 0 {
                write!(f, " extends {}", bound)?;
            } else {
                write!(f, " & {}", bound)?;
            }
        }
        Ok(())
    }
}

// Class and Interface Members
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Initializer(InitializerBlock),
    TypeDecl(TypeDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
    pub initializer: Option<Fragment>,
    pub span: Span,
}

impl AstNode for FieldDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_field_decl(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub return_type: TypeRef,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub body: Option<Block>,
    pub span: Span,
}

impl MethodDecl {
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifier::Abstract)
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.contains(Modifier::Private)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifier::Static)
    }

    /// `name(T1, T2)` form used in logs and errors
    pub fn signature(&self) -> String {
        signature_of(&self.name, &self.parameters)
    }
}

impl AstNode for MethodDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_method_decl(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub body: Block,
    pub span: Span,
}

impl ConstructorDecl {
    /// `<init>(T1, T2)` form used in logs and errors
    pub fn signature(&self) -> String {
        signature_of(CONSTRUCTOR_NAME, &self.parameters)
    }
}

impl AstNode for ConstructorDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_constructor_decl(self)
    }
}

fn signature_of(name: &str, parameters: &[Parameter]) -> String {
    let types: Vec<String> = parameters
        .iter()
        .map(|p| {
            if p.varargs {
                format!("{}...", p.type_ref)
            } else {
                p.type_ref.to_string()
            }
        })
        .collect();
    format!("{}({})", name, types.join(", "))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
    pub varargs: bool,
    pub span: Span,
}

impl Parameter {
    pub fn new(type_ref: TypeRef, name: impl Into<String>) -> Self {
        Self {
            modifiers: ModifierSet::empty(),
            annotations: Vec::new(),
            type_ref,
            name: name.into(),
            varargs: false,
            span: Span::synthetic(),
        }
    }
}

impl AstNode for Parameter {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_parameter(self)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.varargs {
            write!(f, "{}... {}", self.type_ref, self.name)
        } else {
            write!(f, "{} {}", self.type_ref, self.name)
        }
    }
}

// Statements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl AstNode for Block {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_block(self)
    }
}

/// Statement inside a body. Nested blocks are structural; everything else
/// is kept as the source text it was written as.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    Fragment(Fragment),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub span: Span,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializerBlock {
    pub is_static: bool,
    pub body: Block,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_set_is_a_value() {
        let original = ModifierSet::of(&[Modifier::Private, Modifier::Static]);
        let public = original.without(Modifier::Private).with(Modifier::Public);

        assert!(original.contains(Modifier::Private));
        assert!(!public.contains(Modifier::Private));
        assert!(public.contains(Modifier::Public));
        assert!(public.contains(Modifier::Static));
        assert_eq!(public.len(), 2);
    }

    #[test]
    fn test_modifier_set_canonical_order() {
        let set: ModifierSet = [Modifier::Final, Modifier::Static, Modifier::Public]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "public static final");
        assert_eq!(format!("{:?}", set), "{Public, Static, Final}");
    }

    #[test]
    fn test_type_ref_display() {
        let map = TypeRef {
            name: "java.util.Map".to_string(),
            type_args: vec![
                TypeArg::Type(TypeRef::named("String")),
                TypeArg::Wildcard(WildcardType {
                    bound: Some((BoundKind::Extends, TypeRef::named("Number"))),
                    span: Span::synthetic(),
                }),
            ],
            array_dims: 1,
            enclosing: None,
            span: Span::synthetic(),
        };
        assert_eq!(map.to_string(), "java.util.Map<String, ? extends Number>[]");
        assert_eq!(map.simple_name(), "Map");
        assert_eq!(map.erasure(), "java.util.Map[]");
        assert!(!map.is_primitive());
        assert!(TypeRef::named("int").is_primitive());
        assert!(TypeRef::void().is_void());
    }

    #[test]
    fn test_member_type_keeps_outer_arguments() {
        let mut outer = TypeRef::named("pkg.Outer");
        outer.type_args.push(TypeArg::Type(TypeRef::named("String")));
        let mut inner = TypeRef::named("Inner.Leaf");
        inner.type_args.push(TypeArg::Type(TypeRef::named("Integer")));
        inner.enclosing = Some(Box::new(outer));
        inner.array_dims = 1;

        assert_eq!(inner.to_string(), "pkg.Outer<String>.Inner.Leaf<Integer>[]");
        assert_eq!(inner.raw_name(), "pkg.Outer.Inner.Leaf");
        assert_eq!(inner.erasure(), "pkg.Outer.Inner.Leaf[]");
        assert_eq!(inner.simple_name(), "Leaf");
    }

    #[test]
    fn test_class_as_type_ref_uses_type_params() {
        let class = ClassDecl {
            modifiers: ModifierSet::empty(),
            annotations: Vec::new(),
            name: "Box".to_string(),
            type_params: vec![TypeParam {
                name: "T".to_string(),
                bounds: vec![TypeRef::named("Number")],
                span: Span::synthetic(),
            }],
            extends: None,
            implements: Vec::new(),
            body: Vec::new(),
            span: Span::synthetic(),
        };
        assert_eq!(class.as_type_ref().to_string(), "Box<T>");
        assert_eq!(class.type_params[0].to_string(), "T extends Number");
    }
}
