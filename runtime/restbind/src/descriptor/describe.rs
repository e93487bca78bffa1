use std::collections::{BTreeMap, HashMap, VecDeque};

use indexmap::IndexMap;

use super::TypeDescriptor;

/// A type that knows its own [`TypeDescriptor`].
///
/// Implement it via `#[derive(Describe)]` for structs with named fields.
/// Each field can be annotated with `#[rest = "<tag>"]`, where `<tag>` is a
/// comma-separated list of tokens:
///
/// - `required` marks the field as mandatory;
/// - any other token overrides the name the field is looked up with. The default
///   lookup name is the field name, lower-cased.
///
/// ```rust
/// use restbind::Describe;
/// use restbind::descriptor::TypeDescriptor;
///
/// #[derive(Describe)]
/// pub struct Listing {
///     #[rest = "required"]
///     address: String,
///     #[rest = "price_in_cents"]
///     price: u64,
///     tags: Vec<String>,
/// }
///
/// let TypeDescriptor::Record(record) = Listing::descriptor() else {
///     unreachable!()
/// };
/// assert_eq!(record.fields[1].lookup_name(), "price_in_cents");
/// ```
///
/// Recursive types can't be described: the descriptor of a type is a tree, built eagerly.
pub trait Describe {
    fn descriptor() -> TypeDescriptor;
}

pub use restbind_macros::Describe;

macro_rules! describe_as {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::$variant
                }
            }
        )+
    };
}

describe_as!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_as!(Float => f32, f64);
describe_as!(Boolean => bool);
describe_as!(Text => String, Box<str>);

impl<T: Describe> Describe for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::descriptor())
    }
}

impl<T: Describe> Describe for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(K::descriptor(), V::descriptor())
    }
}

impl<K: Describe, V: Describe, S> Describe for IndexMap<K, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(K::descriptor(), V::descriptor())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(K::descriptor(), V::descriptor())
    }
}
