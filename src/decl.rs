// Declaration work items. Builders produce these; rendering interprets them.
// Nothing here resolves types: every type expression is already final.

use serde_json::Value;

use crate::classify::Primitive;
use crate::code::{CodeBuffer, CodeScript};
use crate::docs::{DocBlock, escape_comment};

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Struct(StructDecl),
    Enum(EnumDecl),
    Union(UnionDecl),
    Custom(CodeScript), // hand-written, replayed verbatim
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub doc: DocBlock,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub type_expr: String,
    pub optional: bool,
    pub doc: DocBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub doc: DocBlock,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: String, // original literal, untouched
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionDecl {
    pub name: String,
    pub doc: DocBlock,
    pub branches: Vec<Primitive>, // distinct, in schema order
}

impl Declaration {
    pub fn write_to(&self, code: &mut dyn CodeBuffer) {
        match self {
            Declaration::Struct(s) => s.write_to(code),
            Declaration::Enum(e) => e.write_to(code),
            Declaration::Union(u) => u.write_to(code),
            Declaration::Custom(script) => script.replay(code),
        }
    }
}

impl StructDecl {
    fn write_to(&self, code: &mut dyn CodeBuffer) {
        self.doc.write_to(code);
        code.open_block(&format!("export interface {}", self.name));
        for field in &self.fields {
            field.doc.write_to(code);
            let optional = if field.optional { "?" } else { "" };
            code.line(&format!("readonly {}{optional}: {};", field.name, field.type_expr));
            code.line("");
        }
        code.close_block();
    }
}

impl EnumDecl {
    fn write_to(&self, code: &mut dyn CodeBuffer) {
        self.doc.write_to(code);
        code.open_block(&format!("export enum {}", self.name));
        for member in &self.members {
            let literal = Value::String(member.value.clone());
            code.line(&format!("/** {} */", escape_comment(&member.value)));
            code.line(&format!("{} = {literal},", member.name));
        }
        code.close_block();
    }
}

impl UnionDecl {
    fn write_to(&self, code: &mut dyn CodeBuffer) {
        let name = &self.name;
        self.doc.write_to(code);
        code.open_block(&format!("export class {name}"));
        for branch in &self.branches {
            let ty = branch.type_expr();
            code.open_block(&format!(
                "public static {}(value: {ty}): {name}",
                branch.factory_name()
            ));
            code.line(&format!("return new {name}(value);"));
            code.close_block();
        }
        code.open_block("private constructor(value: any)");
        code.line("Object.defineProperty(this, 'resolve', { value: () => value });");
        code.close_block();
        code.close_block();
    }
}
