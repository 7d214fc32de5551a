use crate::codegen::jsdoc::JsDocWriter;
use crate::codegen::typescript::TypeScriptWriter;
use crate::codegen::{Declaration, DeclarationKind, DeclarationWriter};
use crate::error::{GenerateError, GenerateResult};
use crate::naming::Namer;
use crate::options::GeneratorOptions;
use crate::reflect::Reflect;
use crate::registry::{Binding, Registry};
use crate::render::nullable;
use crate::universe::{Kind, TypeId, TypeUniverse};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// Override that renders one exact type. Receives the generator and whether
/// the type is rendered in an optional context.
pub type Typer = Rc<dyn Fn(&Generator, bool) -> String>;

/// Collects Rust types and callables and renders them as TypeScript
/// declarations.
///
/// ```
/// use tsreflect::{Field, Generator, GeneratorOptions, Kind};
///
/// let mut generator = Generator::new(GeneratorOptions::default());
/// let universe = generator.universe_mut();
/// let string = universe.basic(Kind::String);
/// let user = universe.declare("User", "app", Kind::Struct(vec![
///     Field::new("Name", string).tag(r#"json:"name""#),
/// ]));
///
/// generator.add_type(user).unwrap();
/// assert_eq!(
///     generator.declarations_typescript(),
///     r#"interface User { "name": string; }"#
/// );
/// ```
pub struct Generator {
    pub(crate) universe: TypeUniverse,
    pub(crate) options: GeneratorOptions,
    namer: Box<dyn Namer>,
    pub(crate) typers: HashMap<TypeId, Typer>,
    pub(crate) warn: Box<dyn Fn(&str)>,
    pub(crate) registry: Registry,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        let universe = TypeUniverse::new();
        let builtins = universe.builtins();

        let mut typers: HashMap<TypeId, Typer> = HashMap::new();
        typers.insert(
            builtins.bytes,
            Rc::new(|_: &Generator, optional: bool| nullable("string", optional)),
        );
        typers.insert(builtins.time, Rc::new(|_: &Generator, _: bool| "string".to_string()));
        typers.insert(
            builtins.big_int,
            Rc::new(|_: &Generator, optional: bool| nullable("number", optional)),
        );

        Self {
            universe,
            namer: options.naming.namer(),
            options,
            typers,
            warn: Box::new(|message| warn!("{}", message)),
            registry: Registry::new(),
        }
    }

    /// Replace the naming strategy chosen by the options
    pub fn with_namer(mut self, namer: impl Namer + 'static) -> Self {
        self.namer = Box::new(namer);
        self
    }

    /// Send warnings to `sink` instead of the `tracing` subscriber
    pub fn with_warning_sink(mut self, sink: impl Fn(&str) + 'static) -> Self {
        self.warn = Box::new(sink);
        self
    }

    /// Render the Rust type `T` with `typer` instead of structurally
    pub fn with_typer<T: Reflect>(mut self, typer: impl Fn(&Generator, bool) -> String + 'static) -> Self {
        let id = self.universe.reflect::<T>();
        self.typers.insert(id, Rc::new(typer));
        self
    }

    /// Render the type `id` with `typer` instead of structurally
    pub fn with_typer_for(
        mut self,
        id: TypeId,
        typer: impl Fn(&Generator, bool) -> String + 'static,
    ) -> Self {
        self.typers.insert(id, Rc::new(typer));
        self
    }

    pub fn universe(&self) -> &TypeUniverse {
        &self.universe
    }

    pub fn universe_mut(&mut self) -> &mut TypeUniverse {
        &mut self.universe
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Describe the Rust type `T` and register it
    pub fn add<T: Reflect>(&mut self) -> GenerateResult<TypeId> {
        let id = self.universe.reflect::<T>();
        self.add_type(id)?;
        Ok(id)
    }

    /// Register `id` and every type reachable from it. Registering the same
    /// type again is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this generator's universe.
    #[instrument(
        skip(self),
        fields(name = self.universe.get(id).map_or("?", |info| info.display_name()))
    )]
    pub fn add_type(&mut self, id: TypeId) -> GenerateResult<()> {
        self.registry
            .add_type(&self.universe, &self.options.tags, self.namer.as_ref(), id)
    }

    /// Bind the function type `id` under `name`, with at most one
    /// implementation body.
    #[instrument(skip(self, implementations))]
    pub fn add_func(
        &mut self,
        id: TypeId,
        name: &str,
        is_async: bool,
        implementations: &[&str],
    ) -> GenerateResult<()> {
        if implementations.len() > 1 {
            return Err(GenerateError::TooManyImplementations {
                name: name.to_string(),
                count: implementations.len(),
            });
        }

        let implementation = implementations.first().map(|body| body.to_string());
        self.registry.add_function(
            &self.universe,
            &self.options.tags,
            self.namer.as_ref(),
            id,
            (name, is_async, implementation),
        )
    }

    /// Every top-level declaration, sorted by name
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        for (name, binding) in self.registry.bindings() {
            match binding {
                Binding::Struct(id) => {
                    let inlined = self.options.flatten && !self.registry.is_circular(id);
                    if inlined || self.has_custom_type(id) {
                        continue;
                    }

                    declarations.push(Declaration {
                        name: name.to_string(),
                        body: self.struct_body(id, &mut vec![id]),
                        kind: DeclarationKind::Interface,
                    });
                }
                Binding::Function(function) => {
                    let Kind::Func(signature) = self.universe.kind(function.ty) else {
                        continue;
                    };

                    declarations.push(Declaration {
                        name: name.to_string(),
                        body: self.function_body(signature, function),
                        kind: DeclarationKind::Function {
                            is_async: function.is_async,
                        },
                    });
                }
            }
        }

        debug!(count = declarations.len(), "Collected declarations");
        declarations
    }

    /// Declarations as TypeScript interfaces and functions, one per line
    pub fn declarations_typescript(&self) -> String {
        TypeScriptWriter::new(self.options.export).write_declarations(&self.declarations())
    }

    /// Declarations as JSDoc typedefs, one per line
    pub fn declarations_jsdoc(&self) -> String {
        JsDocWriter.write_declarations(&self.declarations())
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("typers", &self.typers.len())
            .finish_non_exhaustive()
    }
}
