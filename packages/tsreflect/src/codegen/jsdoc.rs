use crate::codegen::{Declaration, DeclarationWriter};

/// Writes declarations as JSDoc typedef comments, for plain JavaScript
/// consumers
#[derive(Debug, Clone, Copy, Default)]
pub struct JsDocWriter;

impl DeclarationWriter for JsDocWriter {
    fn write_declaration(&self, declaration: &Declaration) -> String {
        format!("/** @typedef {{{}}} {} */", declaration.body, declaration.name)
    }
}
