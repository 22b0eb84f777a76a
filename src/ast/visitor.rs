use super::*;

/// AST visitor trait for traversing and processing AST nodes.
///
/// Every method has a default implementation that walks into the children,
/// so implementors override only the nodes they care about and call the
/// matching `walk_*` function to keep descending. Nodes are handed out with
/// the tree's lifetime `'ast`, so a visitor may keep references to them.
pub trait AstVisitor<'ast> {
    // AST root
    fn visit_ast(&mut self, ast: &'ast Ast) {
        walk_ast(self, ast)
    }

    // Package and imports
    fn visit_package_decl(&mut self, _package: &'ast PackageDecl) {}
    fn visit_import_decl(&mut self, _import: &'ast ImportDecl) {}

    // Type declarations
    fn visit_type_decl(&mut self, type_decl: &'ast TypeDecl) {
        walk_type_decl(self, type_decl)
    }

    fn visit_class_decl(&mut self, class: &'ast ClassDecl) {
        walk_class_decl(self, class)
    }

    fn visit_interface_decl(&mut self, interface: &'ast InterfaceDecl) {
        walk_interface_decl(self, interface)
    }

    // Class and interface members
    fn visit_member(&mut self, member: &'ast ClassMember) {
        walk_member(self, member)
    }

    fn visit_field_decl(&mut self, field: &'ast FieldDecl) {
        for annotation in &field.annotations {
            self.visit_annotation(annotation);
        }
        self.visit_type_ref(&field.type_ref);
    }

    fn visit_method_decl(&mut self, method: &'ast MethodDecl) {
        walk_method_decl(self, method)
    }

    fn visit_constructor_decl(&mut self, constructor: &'ast ConstructorDecl) {
        walk_constructor_decl(self, constructor)
    }

    fn visit_parameter(&mut self, parameter: &'ast Parameter) {
        for annotation in &parameter.annotations {
            self.visit_annotation(annotation);
        }
        self.visit_type_ref(&parameter.type_ref);
    }

    // Statements
    fn visit_block(&mut self, block: &'ast Block) {
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if let Stmt::Block(block) = stmt {
            self.visit_block(block);
        }
    }

    // Types
    fn visit_type_ref(&mut self, _type_ref: &'ast TypeRef) {}
    fn visit_type_param(&mut self, _type_param: &'ast TypeParam) {}

    // Annotations
    fn visit_annotation(&mut self, _annotation: &'ast Annotation) {}
}

pub fn walk_ast<'ast, V: AstVisitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast) {
    if let Some(ref package) = ast.package_decl {
        visitor.visit_package_decl(package);
    }

    for import in &ast.imports {
        visitor.visit_import_decl(import);
    }

    for type_decl in &ast.type_decls {
        visitor.visit_type_decl(type_decl);
    }
}

pub fn walk_type_decl<'ast, V: AstVisitor<'ast> + ?Sized>(visitor: &mut V, type_decl: &'ast TypeDecl) {
    match type_decl {
        TypeDecl::Class(c) => visitor.visit_class_decl(c),
        TypeDecl::Interface(i) => visitor.visit_interface_decl(i),
        TypeDecl::Opaque(o) => {
            for annotation in &o.annotations {
                visitor.visit_annotation(annotation);
            }
        }
    }
}

pub fn walk_class_decl<'ast, V: AstVisitor<'ast> + ?Sized>(visitor: &mut V, class: &'ast ClassDecl) {
    for annotation in &class.annotations {
        visitor.visit_annotation(annotation);
    }

    for type_param in &class.type_params {
        visitor.visit_type_param(type_param);
    }

    if let Some(ref extends) = class.extends {
        visitor.visit_type_ref(extends);
    }

    for implements in &class.implements {
        visitor.visit_type_ref(implements);
    }

    for member in &class.body {
        visitor.visit_member(member);
    }
}

pub fn walk_interface_decl<'ast, V: AstVisitor<'ast> + ?Sized>(visitor: &mut V, interface: &'ast InterfaceDecl) {
    for annotation in &interface.annotations {
        visitor.visit_annotation(annotation);
    }

    for type_param in &interface.type_params {
        visitor.visit_type_param(type_param);
    }

    for extends in &interface.extends {
        visitor.visit_type_ref(extends);
    }

    for member in &interface.body {
        visitor.visit_member(member);
    }
}

pub fn walk_member<'ast, V: AstVisitor<'ast> + ?Sized>(visitor: &mut V, member: &'ast ClassMember) {
    match member {
        ClassMember::Field(f) => visitor.visit_field_decl(f),
        ClassMember::Method(m) => visitor.visit_method_decl(m),
        ClassMember::Constructor(c) => visitor.visit_constructor_decl(c),
        ClassMember::Initializer(i) => visitor.visit_block(&i.body),
        ClassMember::TypeDecl(t) => visitor.visit_type_decl(t),
    }
}

pub fn walk_method_decl<'ast, V: AstVisitor<'ast> + ?Sized>(visitor: &mut V, method: &'ast MethodDecl) {
    for annotation in &method.annotations {
        visitor.visit_annotation(annotation);
    }

    for type_param in &method.type_params {
        visitor.visit_type_param(type_param);
    }

    visitor.visit_type_ref(&method.return_type);

    for parameter in &method.parameters {
        visitor.visit_parameter(parameter);
    }

    for throws in &method.throws {
        visitor.visit_type_ref(throws);
    }

    if let Some(ref body) = method.body {
        visitor.visit_block(body);
    }
}

pub fn walk_constructor_decl<'ast, V: AstVisitor<'ast> + ?Sized>(visitor: &mut V, constructor: &'ast ConstructorDecl) {
    for annotation in &constructor.annotations {
        visitor.visit_annotation(annotation);
    }

    for type_param in &constructor.type_params {
        visitor.visit_type_param(type_param);
    }

    for parameter in &constructor.parameters {
        visitor.visit_parameter(parameter);
    }

    for throws in &constructor.throws {
        visitor.visit_type_ref(throws);
    }

    visitor.visit_block(&constructor.body);
}
