//! Generate TypeScript declarations from Rust type descriptions.
//!
//! Types are described into a [`TypeUniverse`], either by hand or through the
//! [`Reflect`] trait, and registered with a [`Generator`]. The generator walks
//! everything reachable from a registered type, names the structs that need
//! a top-level declaration, detects recursive types and renders the result
//! as TypeScript interfaces or JSDoc typedefs.
//!
//! ```
//! use tsreflect::{Field, Generator, GeneratorOptions, Kind, Reflect, TypeId, TypeUniverse};
//!
//! struct Comment {
//!     text: String,
//!     replies: Vec<Comment>,
//! }
//!
//! impl Reflect for Comment {
//!     fn describe(u: &mut TypeUniverse) -> TypeId {
//!         u.declare_rust::<Self, _>("Comment", "app/forum", |u| {
//!             Kind::Struct(vec![
//!                 Field::new("Text", String::describe(u)).tag(r#"json:"text""#),
//!                 Field::new("Replies", <Vec<Comment>>::describe(u))
//!                     .tag(r#"json:"replies,omitempty""#),
//!             ])
//!         })
//!     }
//! }
//!
//! let mut generator = Generator::new(GeneratorOptions::default());
//! let comment = generator.add::<Comment>().unwrap();
//!
//! assert!(generator.registry().is_circular(comment));
//! assert_eq!(
//!     generator.declarations_typescript(),
//!     r#"interface Comment { "text": string; "replies"?: Comment[]; }"#
//! );
//! ```

pub mod codegen;
pub mod error;
pub mod generator;
pub mod naming;
pub mod options;
pub mod reflect;
pub mod registry;
pub mod render;
pub mod tag;
pub mod universe;

pub use codegen::jsdoc::JsDocWriter;
pub use codegen::typescript::TypeScriptWriter;
pub use codegen::{Declaration, DeclarationKind, DeclarationWriter};
pub use error::{GenerateError, GenerateResult};
pub use generator::{Generator, Typer};
pub use naming::{DefaultNamer, Namer, PackageNamer};
pub use options::{GeneratorOptions, NamingStrategy};
pub use reflect::Reflect;
pub use registry::{Binding, FunctionBinding, Registry};
pub use render::{TypeScriptTyper, TypingStrategy};
pub use tag::{FieldDirectives, StructTag, TagKeys};
pub use universe::{Builtins, Field, Kind, Signature, TypeId, TypeInfo, TypeUniverse};
