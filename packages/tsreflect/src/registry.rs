use crate::error::{GenerateError, GenerateResult};
use crate::naming::{function_name, Namer};
use crate::tag::TagKeys;
use crate::universe::{Field, Kind, TypeId, TypeUniverse};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// A callable bound under a declaration name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBinding {
    pub ty: TypeId,
    pub is_async: bool,
    pub implementation: Option<String>,
}

/// What a declaration name is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<'a> {
    Struct(TypeId),
    Function(&'a FunctionBinding),
}

/// Tables built while walking the type graph.
///
/// Growth is monotonic: types are only ever added, and a name once bound
/// stays bound to the same identity.
#[derive(Debug, Default)]
pub struct Registry {
    visited: HashSet<TypeId>,
    circular: HashSet<TypeId>,
    symbols: HashMap<TypeId, String>,
    names: HashMap<String, TypeId>,
    functions: HashMap<String, FunctionBinding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk every type reachable from `id`, naming the structs that need a
    /// declaration and marking the ones that sit on a cycle.
    pub fn add_type(
        &mut self,
        universe: &TypeUniverse,
        tags: &TagKeys,
        namer: &dyn Namer,
        id: TypeId,
    ) -> GenerateResult<()> {
        Walk::new(self, universe, tags, namer).visit(id)?;
        Ok(())
    }

    /// Bind the callable `id` under the declaration name derived from `name`
    /// and walk its signature.
    ///
    /// Unlike other types, callables are processed again on every call so a
    /// single signature may be bound under several names. Names that only
    /// differ in the case of their first letter collide.
    pub fn add_function(
        &mut self,
        universe: &TypeUniverse,
        tags: &TagKeys,
        namer: &dyn Namer,
        id: TypeId,
        binding: (&str, bool, Option<String>),
    ) -> GenerateResult<()> {
        let (name, is_async, implementation) = binding;

        let Kind::Func(signature) = universe.kind(id) else {
            return Err(GenerateError::NotCallable {
                name: name.to_string(),
            });
        };

        let declared = function_name(name);
        let conflicting = self.names.contains_key(name)
            || self.names.contains_key(&declared)
            || self.functions.get(&declared).is_some_and(|bound| bound.ty != id);
        if conflicting {
            return Err(GenerateError::FunctionNameTaken {
                name: name.to_string(),
            });
        }

        debug!(function = %declared, ty = %id, is_async, "Bound function");
        self.functions.insert(
            declared,
            FunctionBinding {
                ty: id,
                is_async,
                implementation,
            },
        );

        let mut walk = Walk::new(self, universe, tags, namer);
        for &ty in signature.params.iter().chain(&signature.results) {
            walk.visit(ty)?;
        }

        Ok(())
    }

    pub fn is_visited(&self, id: TypeId) -> bool {
        self.visited.contains(&id)
    }

    pub fn is_circular(&self, id: TypeId) -> bool {
        self.circular.contains(&id)
    }

    /// Declaration name assigned to a struct
    pub fn symbol(&self, id: TypeId) -> Option<&str> {
        self.symbols.get(&id).map(String::as_str)
    }

    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names.contains_key(name) || self.functions.contains_key(name)
    }

    /// Function bound under the declaration name `name`
    pub fn function(&self, name: &str) -> Option<&FunctionBinding> {
        self.functions.get(name)
    }

    /// Every bound name, sorted lexicographically
    pub fn bindings(&self) -> Vec<(&str, Binding<'_>)> {
        let mut bindings: Vec<(&str, Binding<'_>)> = self
            .names
            .iter()
            .map(|(name, &ty)| (name.as_str(), Binding::Struct(ty)))
            .chain(
                self.functions
                    .iter()
                    .map(|(name, function)| (name.as_str(), Binding::Function(function))),
            )
            .collect();

        bindings.sort_by(|a, b| a.0.cmp(b.0));
        bindings
    }
}

/// Fields that take part in serialization: exported and not tagged `"-"`
pub(crate) fn is_emittable(tags: &TagKeys, field: &Field) -> bool {
    field.exported && !tags.is_omitted(&field.tag)
}

/// The struct whose fields an embedded field splices into its parent
pub(crate) fn embedded_struct(universe: &TypeUniverse, field: &Field) -> Option<TypeId> {
    if !field.embedded {
        return None;
    }

    let target = match universe.kind(field.ty) {
        Kind::Pointer(elem) => *elem,
        _ => field.ty,
    };

    matches!(universe.kind(target), Kind::Struct(_)).then_some(target)
}

fn has_emittable_fields(
    universe: &TypeUniverse,
    tags: &TagKeys,
    id: TypeId,
    seen: &mut HashSet<TypeId>,
) -> bool {
    if !seen.insert(id) {
        return false;
    }

    for field in universe.kind(id).fields() {
        if !is_emittable(tags, field) {
            continue;
        }

        match embedded_struct(universe, field) {
            Some(inner) => {
                if has_emittable_fields(universe, tags, inner, seen) {
                    return true;
                }
            }
            None => return true,
        }
    }

    false
}

/// One depth-first traversal. Types stay on `stack` until the strongly
/// connected component they belong to is complete; `frames` maps each of
/// them to its stack position.
struct Walk<'a> {
    registry: &'a mut Registry,
    universe: &'a TypeUniverse,
    tags: &'a TagKeys,
    namer: &'a dyn Namer,
    stack: Vec<TypeId>,
    frames: HashMap<TypeId, usize>,
}

fn lowest(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl<'a> Walk<'a> {
    fn new(
        registry: &'a mut Registry,
        universe: &'a TypeUniverse,
        tags: &'a TagKeys,
        namer: &'a dyn Namer,
    ) -> Self {
        Self {
            registry,
            universe,
            tags,
            namer,
            stack: Vec::new(),
            frames: HashMap::new(),
        }
    }

    /// Visit `id` and everything reachable from it.
    ///
    /// Returns the lowest stack position of an enclosing type reached again
    /// from here, i.e. the cycle signal. `None` means every path out of `id`
    /// ends in a completed component.
    fn visit(&mut self, id: TypeId) -> GenerateResult<Option<usize>> {
        if self.registry.visited.contains(&id) {
            return Ok(self.frames.get(&id).copied());
        }

        let universe = self.universe;
        let kind = universe.kind(id);
        trace!(ty = %id, kind = kind.label(), "Visiting type");

        self.registry.visited.insert(id);
        let frame = self.stack.len();
        self.frames.insert(id, frame);
        self.stack.push(id);

        let mut low = None;
        match kind {
            Kind::Array { elem, .. } | Kind::Slice(elem) | Kind::Pointer(elem) => {
                low = self.visit(*elem)?;
            }
            Kind::Map { key, value } => {
                // Both sides are always walked
                let key_low = self.visit(*key)?;
                let value_low = self.visit(*value)?;
                low = lowest(key_low, value_low);
            }
            Kind::Struct(fields) => {
                let tags = self.tags;
                for field in fields.iter().filter(|f| is_emittable(tags, f)) {
                    low = lowest(low, self.visit(field.ty)?);
                }
                self.assign_name(id)?;
            }
            _ => {}
        }

        if low.is_some_and(|low| low < frame) {
            return Ok(low);
        }

        // `id` closes a strongly connected component
        let members = self.stack.split_off(frame);
        for member in &members {
            self.frames.remove(member);
        }

        if members.len() > 1 || low == Some(frame) {
            for &member in &members {
                if matches!(universe.kind(member), Kind::Struct(_)) {
                    debug!(ty = %member, name = universe.info(member).display_name(), "Marked circular");
                    self.registry.circular.insert(member);
                }
            }
        }

        Ok(None)
    }

    fn assign_name(&mut self, id: TypeId) -> GenerateResult<()> {
        let universe = self.universe;
        let info = universe.info(id);
        if !info.is_named() || !has_emittable_fields(universe, self.tags, id, &mut HashSet::new())
        {
            return Ok(());
        }

        let registry = &*self.registry;
        let name = self
            .namer
            .name(info, &|candidate| registry.is_name_taken(candidate));

        if self.registry.is_name_taken(&name) {
            return Err(GenerateError::NameTaken { name });
        }

        debug!(ty = %id, name = %name, "Assigned declaration name");
        self.registry.symbols.insert(id, name.clone());
        self.registry.names.insert(name, id);
        Ok(())
    }
}
