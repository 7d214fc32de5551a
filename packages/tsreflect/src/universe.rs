//! The type universe: a read-only oracle describing host types.
//!
//! Every type handed to a [`Generator`](crate::Generator) lives in a
//! [`TypeUniverse`] and is referred to by a [`TypeId`]. Unnamed types are
//! interned structurally, so building `[]uint8` twice yields the same
//! identity. Named types get a fresh identity on every [`declare`], which is
//! what lets two distinct types share a short name.
//!
//! [`declare`]: TypeUniverse::declare

use crate::reflect::Reflect;
use crate::render::TypeScriptTyper;
use crate::tag::StructTag;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Stable, comparable handle of one type in a [`TypeUniverse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural classification of a type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Array { elem: TypeId, len: usize },
    Slice(TypeId),
    Pointer(TypeId),
    Map { key: TypeId, value: TypeId },
    Chan(TypeId),
    Func(Signature),
    /// The top type: any value
    Interface,
    Struct(Vec<Field>),
    UnsafePointer,
}

impl Kind {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Kind::Int
                | Kind::Int8
                | Kind::Int16
                | Kind::Int32
                | Kind::Int64
                | Kind::Uint
                | Kind::Uint8
                | Kind::Uint16
                | Kind::Uint32
                | Kind::Uint64
                | Kind::Uintptr
                | Kind::Float32
                | Kind::Float64
        )
    }

    /// Basic kinds carry no component types
    pub fn is_basic(&self) -> bool {
        self.is_numeric()
            || matches!(
                self,
                Kind::Bool | Kind::Complex64 | Kind::Complex128 | Kind::String | Kind::UnsafePointer
            )
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            Kind::Struct(fields) => fields,
            _ => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::String => "string",
            Kind::Array { .. } => "array",
            Kind::Slice(_) => "slice",
            Kind::Pointer(_) => "ptr",
            Kind::Map { .. } => "map",
            Kind::Chan(_) => "chan",
            Kind::Func(_) => "func",
            Kind::Interface => "interface",
            Kind::Struct(_) => "struct",
            Kind::UnsafePointer => "unsafe.Pointer",
        }
    }
}

/// Parameter and result types of a callable
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<TypeId>,
    pub results: Vec<TypeId>,
}

/// A struct field descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub exported: bool,
    pub embedded: bool,
    pub tag: StructTag,
}

impl Field {
    /// An exported, non-embedded field with no tag
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            exported: true,
            embedded: false,
            tag: StructTag::default(),
        }
    }

    pub fn tag(mut self, tag: impl Into<StructTag>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// Everything the universe knows about one type
pub struct TypeInfo {
    id: TypeId,
    name: String,
    pkg_path: String,
    kind: Kind,
    typer: Option<Rc<dyn TypeScriptTyper>>,
    custom_serializer: bool,
}

impl TypeInfo {
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Declared short name; empty for unnamed types
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the declaring package; empty for unnamed and predeclared types
    pub fn pkg_path(&self) -> &str {
        &self.pkg_path
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// Name for diagnostics: the declared name, or the kind label
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.kind.label()
        } else {
            &self.name
        }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pkg_path", &self.pkg_path)
            .field("kind", &self.kind)
            .field("typer", &self.typer.is_some())
            .field("custom_serializer", &self.custom_serializer)
            .finish()
    }
}

/// Identities of the types every universe starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtins {
    /// `[]uint8`, serialized as a base64 string
    pub bytes: TypeId,
    /// `time.Time`, serialized as an RFC 3339 string
    pub time: TypeId,
    /// `*big.Int`, serialized as a bare number
    pub big_int: TypeId,
    /// `error`, excluded from callable results
    pub error: TypeId,
}

pub struct TypeUniverse {
    types: Vec<TypeInfo>,
    interned: HashMap<Kind, TypeId>,
    rust_types: HashMap<std::any::TypeId, TypeId>,
    builtins: Builtins,
}

impl TypeUniverse {
    pub fn new() -> Self {
        let placeholder = TypeId(0);
        let mut universe = Self {
            types: Vec::new(),
            interned: HashMap::new(),
            rust_types: HashMap::new(),
            builtins: Builtins {
                bytes: placeholder,
                time: placeholder,
                big_int: placeholder,
                error: placeholder,
            },
        };

        let uint8 = universe.basic(Kind::Uint8);
        let bytes = universe.slice_of(uint8);

        let uint64 = universe.basic(Kind::Uint64);
        let int64 = universe.basic(Kind::Int64);
        let time = universe.declare(
            "Time",
            "time",
            Kind::Struct(vec![
                Field::new("wall", uint64).private(),
                Field::new("ext", int64).private(),
            ]),
        );
        universe.set_custom_serializer(time);

        let boolean = universe.basic(Kind::Bool);
        let uint = universe.basic(Kind::Uint);
        let words = universe.slice_of(uint);
        let int = universe.declare(
            "Int",
            "math/big",
            Kind::Struct(vec![
                Field::new("neg", boolean).private(),
                Field::new("abs", words).private(),
            ]),
        );
        let big_int = universe.pointer_to(int);
        universe.set_custom_serializer(big_int);

        let error = universe.declare("error", "", Kind::Interface);

        universe.builtins = Builtins {
            bytes,
            time,
            big_int,
            error,
        };
        universe
    }

    pub fn builtins(&self) -> Builtins {
        self.builtins
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this universe.
    pub fn info(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.index()]
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(id.index())
    }

    pub fn kind(&self, id: TypeId) -> &Kind {
        &self.info(id).kind
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn push(&mut self, name: String, pkg_path: String, kind: Kind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeInfo {
            id,
            name,
            pkg_path,
            kind,
            typer: None,
            custom_serializer: false,
        });
        id
    }

    /// Identity of the unnamed type with this structure
    pub fn intern(&mut self, kind: Kind) -> TypeId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }

        let id = self.push(String::new(), String::new(), kind.clone());
        self.interned.insert(kind, id);
        id
    }

    pub fn basic(&mut self, kind: Kind) -> TypeId {
        debug_assert!(kind.is_basic(), "{} is not a basic kind", kind.label());
        self.intern(kind)
    }

    pub fn slice_of(&mut self, elem: TypeId) -> TypeId {
        self.intern(Kind::Slice(elem))
    }

    pub fn array_of(&mut self, elem: TypeId, len: usize) -> TypeId {
        self.intern(Kind::Array { elem, len })
    }

    pub fn pointer_to(&mut self, elem: TypeId) -> TypeId {
        self.intern(Kind::Pointer(elem))
    }

    pub fn map_of(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(Kind::Map { key, value })
    }

    pub fn chan_of(&mut self, elem: TypeId) -> TypeId {
        self.intern(Kind::Chan(elem))
    }

    pub fn func_of(&mut self, params: Vec<TypeId>, results: Vec<TypeId>) -> TypeId {
        self.intern(Kind::Func(Signature { params, results }))
    }

    /// An anonymous struct
    pub fn struct_of(&mut self, fields: Vec<Field>) -> TypeId {
        self.intern(Kind::Struct(fields))
    }

    pub fn interface(&mut self) -> TypeId {
        self.intern(Kind::Interface)
    }

    /// Declare a new named type. Each call yields a distinct identity.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        pkg_path: impl Into<String>,
        kind: Kind,
    ) -> TypeId {
        self.push(name.into(), pkg_path.into(), kind)
    }

    /// Replace the structure of a named type, completing a forward
    /// declaration. Unnamed types are interned and cannot be redefined;
    /// returns false for them.
    pub fn define(&mut self, id: TypeId, kind: Kind) -> bool {
        let info = &mut self.types[id.index()];
        if !info.is_named() {
            return false;
        }

        info.kind = kind;
        true
    }

    /// Declare the named type standing for the Rust type `T`, once.
    ///
    /// The identity is registered before `build` runs, so `build` may
    /// describe types that refer back to `T`.
    pub fn declare_rust<T, F>(
        &mut self,
        name: impl Into<String>,
        pkg_path: impl Into<String>,
        build: F,
    ) -> TypeId
    where
        T: ?Sized + 'static,
        F: FnOnce(&mut Self) -> Kind,
    {
        let key = std::any::TypeId::of::<T>();
        if let Some(&id) = self.rust_types.get(&key) {
            return id;
        }

        let id = self.declare(name, pkg_path, Kind::Struct(Vec::new()));
        self.rust_types.insert(key, id);

        let kind = build(self);
        self.define(id, kind);
        id
    }

    /// Identity of a Rust type previously described with [`declare_rust`].
    ///
    /// [`declare_rust`]: TypeUniverse::declare_rust
    pub fn lookup<T: ?Sized + 'static>(&self) -> Option<TypeId> {
        self.rust_types.get(&std::any::TypeId::of::<T>()).copied()
    }

    pub fn reflect<T: Reflect + ?Sized>(&mut self) -> TypeId {
        T::describe(self)
    }

    /// Attach a self-describing TypeScript typer to `id`.
    pub fn set_typer(&mut self, id: TypeId, typer: impl TypeScriptTyper + 'static) {
        self.types[id.index()].typer = Some(Rc::new(typer));
    }

    /// Mark `id` as encoding itself with custom serialization logic.
    pub fn set_custom_serializer(&mut self, id: TypeId) {
        self.types[id.index()].custom_serializer = true;
    }

    /// Whether the method set of `id` includes the capability. A pointer's
    /// method set includes the capabilities of its pointee.
    fn implements(&self, id: TypeId, own: fn(&TypeInfo) -> bool) -> bool {
        let info = self.info(id);
        own(info) || matches!(info.kind, Kind::Pointer(elem) if own(self.info(elem)))
    }

    /// Capability probe used by the renderer. A pointer only counts when its
    /// pointee lacks the capability, so the pointee handles it after the
    /// pointer is rendered structurally.
    fn has_capability(&self, id: TypeId, own: fn(&TypeInfo) -> bool) -> bool {
        match self.info(id).kind {
            Kind::Pointer(elem) if self.implements(id, own) => !self.implements(elem, own),
            _ => self.implements(id, own),
        }
    }

    /// The self-describing typer that applies to `id`, if any
    pub fn self_typer(&self, id: TypeId) -> Option<&dyn TypeScriptTyper> {
        if self.has_capability(id, |info| info.typer.is_some()) {
            self.info(id).typer.as_deref()
        } else {
            None
        }
    }

    pub fn has_custom_serializer(&self, id: TypeId) -> bool {
        self.has_capability(id, |info| info.custom_serializer)
    }
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeUniverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeUniverse")
            .field("types", &self.types)
            .field("builtins", &self.builtins)
            .finish()
    }
}
