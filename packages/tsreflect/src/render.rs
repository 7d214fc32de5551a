use crate::generator::{Generator, Typer};
use crate::registry::{embedded_struct, is_emittable, FunctionBinding};
use crate::universe::{Field, Kind, Signature, TypeId};

const ANY: &str = "any";

/// Implemented by types that know their own TypeScript type.
///
/// `optional` is set when the type is rendered for an optional property,
/// where absence is already expressed by the `?` marker.
pub trait TypeScriptTyper {
    fn typescript_type(&self, generator: &Generator, optional: bool) -> String;
}

impl<F> TypeScriptTyper for F
where
    F: Fn(&Generator, bool) -> String,
{
    fn typescript_type(&self, generator: &Generator, optional: bool) -> String {
        self(generator, optional)
    }
}

/// How a type is turned into a TypeScript expression, probed once per
/// render in precedence order.
pub enum TypingStrategy<'g> {
    /// The type carries its own [`TypeScriptTyper`]
    SelfDescribing(&'g dyn TypeScriptTyper),
    /// A typer was registered with the generator for this exact type
    Registered(&'g Typer),
    /// Rendered from the type's structure. `unresolved_serializer` is set
    /// when the type serializes itself, so its structure is probably wrong.
    Structural { unresolved_serializer: bool },
}

pub(crate) fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

pub(crate) fn nullable(ty: &str, optional: bool) -> String {
    if optional {
        ty.to_string()
    } else {
        format!("({} | null)", ty)
    }
}

impl Generator {
    pub fn typing_strategy(&self, id: TypeId) -> TypingStrategy<'_> {
        if let Some(typer) = self.universe.self_typer(id) {
            return TypingStrategy::SelfDescribing(typer);
        }

        if let Some(typer) = self.typers.get(&id) {
            return TypingStrategy::Registered(typer);
        }

        TypingStrategy::Structural {
            unresolved_serializer: self.universe.has_custom_serializer(id),
        }
    }

    /// True when the type is rendered by a typer rather than structurally
    pub fn has_custom_type(&self, id: TypeId) -> bool {
        !matches!(self.typing_strategy(id), TypingStrategy::Structural { .. })
    }

    /// TypeScript type of `id` in a non-optional context
    pub fn type_of(&self, id: TypeId) -> String {
        self.render(Some(id), false)
    }

    /// TypeScript type of `id`. `None` renders the top type.
    ///
    /// Works for any type of the universe, registered or not; rendering never
    /// adds declarations.
    pub fn render(&self, id: Option<TypeId>, optional: bool) -> String {
        self.render_type(id, optional, &mut Vec::new())
    }

    /// `inlining` holds the named types being expanded, so a recursive type
    /// that is not rendered by name cannot expand forever.
    fn render_type(&self, id: Option<TypeId>, optional: bool, inlining: &mut Vec<TypeId>) -> String {
        let Some(id) = id else {
            return ANY.to_string();
        };

        match self.typing_strategy(id) {
            TypingStrategy::SelfDescribing(typer) => typer.typescript_type(self, optional),
            TypingStrategy::Registered(typer) => typer(self, optional),
            TypingStrategy::Structural {
                unresolved_serializer,
            } => {
                if unresolved_serializer && self.options.warnings {
                    (self.warn)(&format!(
                        "custom serializer implemented for type {:?} but no corresponding typer could be found",
                        self.universe.info(id).display_name()
                    ));
                }
                self.render_named(id, optional, inlining)
            }
        }
    }

    /// Only named types can refer to themselves. On re-entry the type is
    /// rendered by its declaration name, or as the top type without one.
    fn render_named(&self, id: TypeId, optional: bool, inlining: &mut Vec<TypeId>) -> String {
        if !self.universe.info(id).is_named() {
            return self.render_structural(id, optional, inlining);
        }

        if inlining.contains(&id) {
            return self.registry.symbol(id).unwrap_or(ANY).to_string();
        }

        inlining.push(id);
        let rendered = self.render_structural(id, optional, inlining);
        inlining.pop();
        rendered
    }

    fn render_structural(&self, id: TypeId, optional: bool, inlining: &mut Vec<TypeId>) -> String {
        match self.universe.kind(id) {
            Kind::Bool => "boolean".to_string(),
            kind if kind.is_numeric() => "number".to_string(),
            Kind::String => "string".to_string(),
            Kind::Array { elem, len } => {
                let elem = self.render_type(Some(*elem), false, inlining);
                format!("[{}]", vec![elem; *len].join(", "))
            }
            Kind::Slice(elem) => {
                let elem = self.render_type(Some(*elem), false, inlining);
                nullable(&format!("{}[]", elem), optional)
            }
            Kind::Map { key, value } => {
                let key = self.render_type(Some(*key), false, inlining);
                let value = self.render_type(Some(*value), false, inlining);
                nullable(&format!("{{ [key in ({})]: ({}) }}", key, value), optional)
            }
            Kind::Pointer(elem) => {
                let elem = self.render_type(Some(*elem), false, inlining);
                nullable(&elem, optional)
            }
            Kind::Struct(_) => self.render_struct(id, inlining),
            Kind::Interface => ANY.to_string(),
            // Channels, functions, complex numbers and raw pointers have no
            // serialized form
            _ => String::new(),
        }
    }

    fn render_struct(&self, id: TypeId, inlining: &mut Vec<TypeId>) -> String {
        if let Some(name) = self.registry.symbol(id) {
            if self.registry.is_circular(id) || !self.options.flatten {
                return name.to_string();
            }
        }

        self.struct_body(id, inlining)
    }

    /// `{ "a": A; "b"?: B; }`
    pub(crate) fn struct_body(&self, id: TypeId, inlining: &mut Vec<TypeId>) -> String {
        let mut out = String::from("{ ");
        self.write_struct_fields(&mut out, id, inlining, &mut vec![id]);
        out.push('}');
        out
    }

    fn write_struct_fields(
        &self,
        out: &mut String,
        id: TypeId,
        inlining: &mut Vec<TypeId>,
        embedding: &mut Vec<TypeId>,
    ) {
        let fields = self.universe.kind(id).fields();
        for field in fields.iter().filter(|f| is_emittable(&self.options.tags, f)) {
            match embedded_struct(&self.universe, field) {
                Some(inner) => {
                    if embedding.contains(&inner) {
                        continue;
                    }
                    embedding.push(inner);
                    self.write_struct_fields(out, inner, inlining, embedding);
                    embedding.pop();
                }
                None => {
                    out.push_str(&self.render_field(field, inlining));
                    out.push_str("; ");
                }
            }
        }
    }

    fn render_field(&self, field: &Field, inlining: &mut Vec<TypeId>) -> String {
        let directives = self.options.tags.directives(&field.tag);
        let name = directives.name.as_deref().unwrap_or(&field.name);

        let ty = if directives.stringify {
            "string".to_string()
        } else {
            self.render_type(Some(field.ty), directives.optional, inlining)
        };

        if directives.optional {
            format!("{}?: {}", quote(name), ty)
        } else {
            format!("{}: {}", quote(name), ty)
        }
    }

    /// `(arg0: A, arg1: B): R`, followed by the implementation if any
    pub(crate) fn function_body(&self, signature: &Signature, binding: &FunctionBinding) -> String {
        let params: Vec<String> = signature
            .params
            .iter()
            .enumerate()
            .map(|(i, &param)| format!("arg{}: {}", i, self.type_of(param)))
            .collect();

        let error = self.universe.builtins().error;
        let results: Vec<String> = signature
            .results
            .iter()
            .filter(|&&result| result != error)
            .map(|&result| self.type_of(result))
            .collect();

        let returns = match results.as_slice() {
            [] => "void".to_string(),
            [single] => single.clone(),
            many => format!("[{}]", many.join(", ")),
        };

        let mut body = if binding.is_async {
            format!("({}): Promise<{}>", params.join(", "), returns)
        } else {
            format!("({}): {}", params.join(", "), returns)
        };

        if let Some(implementation) = binding.implementation.as_deref().filter(|s| !s.is_empty()) {
            body.push_str(" {\n");
            body.push_str(implementation);
            body.push_str("\n}");
        }

        body
    }
}
