use crate::codegen::{Declaration, DeclarationKind, DeclarationWriter};

/// Writes declarations as TypeScript interfaces and functions
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptWriter {
    /// Prefix every declaration with `export`
    pub export: bool,
}

impl TypeScriptWriter {
    pub fn new(export: bool) -> Self {
        Self { export }
    }
}

impl DeclarationWriter for TypeScriptWriter {
    fn write_declaration(&self, declaration: &Declaration) -> String {
        let export = if self.export { "export " } else { "" };

        match declaration.kind {
            DeclarationKind::Interface => {
                format!("{}interface {} {}", export, declaration.name, declaration.body)
            }
            DeclarationKind::Function { is_async } => {
                let modifier = if is_async { "async " } else { "" };
                format!(
                    "{}{}function {}{}",
                    export, modifier, declaration.name, declaration.body
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface() -> Declaration {
        Declaration {
            name: "Person".to_string(),
            body: r#"{ "name": string; "age"?: number; }"#.to_string(),
            kind: DeclarationKind::Interface,
        }
    }

    fn function(is_async: bool) -> Declaration {
        Declaration {
            name: "greet".to_string(),
            body: "(arg0: Person): Promise<string>".to_string(),
            kind: DeclarationKind::Function { is_async },
        }
    }

    #[test]
    fn test_write_interface() {
        let writer = TypeScriptWriter::default();

        assert_eq!(
            writer.write_declaration(&interface()),
            r#"interface Person { "name": string; "age"?: number; }"#
        );
    }

    #[test]
    fn test_write_exported() {
        let writer = TypeScriptWriter::new(true);

        assert!(writer
            .write_declaration(&interface())
            .starts_with("export interface Person {"));
        assert_eq!(
            writer.write_declaration(&function(true)),
            "export async function greet(arg0: Person): Promise<string>"
        );
    }

    #[test]
    fn test_write_function() {
        let writer = TypeScriptWriter::default();

        assert_eq!(
            writer.write_declaration(&function(false)),
            "function greet(arg0: Person): Promise<string>"
        );
    }

    #[test]
    fn test_write_declarations_joins_lines() {
        let writer = TypeScriptWriter::default();
        let output = writer.write_declarations(&[interface(), function(false)]);

        assert_eq!(output.lines().count(), 2);
        assert!(!output.ends_with('\n'));
        assert_eq!(writer.write_declarations(&[]), "");
    }
}
