use crate::universe::{Kind, TypeId, TypeUniverse};
use chrono::{DateTime, TimeZone};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

/// Types that can describe themselves to a [`TypeUniverse`].
///
/// Structs implement this by hand with [`TypeUniverse::declare_rust`], which
/// reserves the identity before the fields are described so recursive types
/// terminate:
///
/// ```
/// use tsreflect::{Field, Kind, Reflect, TypeId, TypeUniverse};
///
/// struct Node {
///     value: i64,
///     next: Option<Box<Node>>,
/// }
///
/// impl Reflect for Node {
///     fn describe(u: &mut TypeUniverse) -> TypeId {
///         u.declare_rust::<Self, _>("Node", "app/list", |u| {
///             Kind::Struct(vec![
///                 Field::new("value", i64::describe(u)),
///                 Field::new("next", <Option<Box<Node>>>::describe(u)),
///             ])
///         })
///     }
/// }
///
/// let mut universe = TypeUniverse::new();
/// let node = universe.reflect::<Node>();
/// assert_eq!(universe.info(node).name(), "Node");
/// ```
pub trait Reflect: 'static {
    fn describe(universe: &mut TypeUniverse) -> TypeId;
}

macro_rules! reflect_basic {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn describe(universe: &mut TypeUniverse) -> TypeId {
                    universe.basic(Kind::$kind)
                }
            }
        )*
    };
}

reflect_basic! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Uint,
    f32 => Float32,
    f64 => Float64,
    char => String,
    String => String,
}

impl<T: Reflect> Reflect for Vec<T> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        let elem = T::describe(universe);
        universe.slice_of(elem)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        let elem = T::describe(universe);
        universe.array_of(elem, N)
    }
}

// `None` serializes as null, which is exactly a nullable pointer.
impl<T: Reflect> Reflect for Option<T> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        let elem = T::describe(universe);
        universe.pointer_to(elem)
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        T::describe(universe)
    }
}

impl<T: Reflect + ?Sized> Reflect for Rc<T> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        T::describe(universe)
    }
}

impl<T: Reflect + ?Sized> Reflect for Arc<T> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        T::describe(universe)
    }
}

impl<K: Reflect, V: Reflect, S: 'static> Reflect for HashMap<K, V, S> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        let key = K::describe(universe);
        let value = V::describe(universe);
        universe.map_of(key, value)
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        let key = K::describe(universe);
        let value = V::describe(universe);
        universe.map_of(key, value)
    }
}

impl Reflect for serde_json::Value {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        universe.interface()
    }
}

impl<Tz: TimeZone + 'static> Reflect for DateTime<Tz> {
    fn describe(universe: &mut TypeUniverse) -> TypeId {
        universe.builtins().time
    }
}
