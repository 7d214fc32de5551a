pub mod jsdoc;
pub mod typescript;

/// What a top-level declaration introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Interface,
    Function { is_async: bool },
}

/// A named top-level declaration. `body` is a struct body such as
/// `{ "a": string; }` or a function signature such as `(arg0: number): void`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub body: String,
    pub kind: DeclarationKind,
}

impl Declaration {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclarationKind::Function { .. })
    }
}

/// Plugin trait for writing declarations out in a target syntax
pub trait DeclarationWriter {
    /// Write a single declaration
    fn write_declaration(&self, declaration: &Declaration) -> String;

    /// Write every declaration, one per line
    fn write_declarations(&self, declarations: &[Declaration]) -> String {
        declarations
            .iter()
            .map(|declaration| self.write_declaration(declaration))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
