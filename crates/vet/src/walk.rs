use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Display;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use crate::naming::FieldInfo;
use crate::Validate;

pub type Elements<'a> = Box<dyn Iterator<Item = &'a dyn Walk> + 'a>;
pub type Entries<'a> = Box<dyn Iterator<Item = (String, &'a dyn Walk)> + 'a>;

/// The structural kind of a value, as seen by the validator.
pub enum Shape<'a> {
    /// A leaf: nothing to descend into.
    Scalar,
    Record(Record<'a>),
    /// Growable sequence; children are keyed by index.
    Sequence(Elements<'a>),
    /// Fixed-size sequence; children are keyed by index.
    Array(Elements<'a>),
    /// Children keyed by the `Display` form of their key.
    Map(Entries<'a>),
    /// A value that may be absent.
    Pointer(Option<&'a dyn Walk>),
}

/// The fields of a record value, in declaration order.
pub struct Record<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Record<'a> {
    pub fn new(fields: Vec<Field<'a>>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    /// Looks a field up by its declared name, whatever its visibility.
    pub fn field_by_name(&self, name: &str) -> Option<&Field<'a>> {
        self.fields.iter().find(|field| field.info.name == name)
    }
}

pub struct Field<'a> {
    pub info: &'static FieldInfo,
    /// `None` for fields that are named but never descended into.
    pub value: Option<&'a dyn Walk>,
}

impl<'a> Field<'a> {
    pub fn new(info: &'static FieldInfo, value: &'a dyn Walk) -> Self {
        Self {
            info,
            value: Some(value),
        }
    }

    pub fn opaque(info: &'static FieldInfo) -> Self {
        Self { info, value: None }
    }
}

/// Values the validator can walk.
///
/// Implemented here for scalars, strings, std collections, `Option` and smart
/// pointers; use `#[derive(Walk)]` for your own types.
pub trait Walk {
    fn shape(&self) -> Shape<'_>;

    /// The validation contract of this value, if it has one.
    ///
    /// For a [`Shape::Pointer`] it runs when the target is present, before the
    /// target's own contract.
    fn contract(&self) -> Option<&dyn Validate> {
        None
    }
}

macro_rules! scalar_walk {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Walk for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar
                }
            }
        )*
    };
}

scalar_walk!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    str,
    String,
    std::path::PathBuf,
    std::time::Duration,
);

impl<T: Walk> Walk for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(Box::new(self.iter().map(|item| item as &dyn Walk)))
    }
}

impl<T: Walk> Walk for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(Box::new(self.iter().map(|item| item as &dyn Walk)))
    }
}

impl<T: Walk> Walk for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(Box::new(self.iter().map(|item| item as &dyn Walk)))
    }
}

impl<T: Walk, const N: usize> Walk for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Array(Box::new(self.iter().map(|item| item as &dyn Walk)))
    }
}

impl<K: Display, V: Walk, S: BuildHasher> Walk for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(Box::new(
            self.iter().map(|(key, value)| (key.to_string(), value as &dyn Walk)),
        ))
    }
}

impl<K: Display, V: Walk> Walk for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(Box::new(
            self.iter().map(|(key, value)| (key.to_string(), value as &dyn Walk)),
        ))
    }
}

impl<T: Walk> Walk for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Pointer(self.as_ref().map(|value| value as &dyn Walk))
    }
}

// Pointers that can never be absent are transparent.
macro_rules! deref_walk {
    ($($ptr:ident),* $(,)?) => {
        $(
            impl<T: Walk + ?Sized> Walk for $ptr<T> {
                fn shape(&self) -> Shape<'_> {
                    (**self).shape()
                }

                fn contract(&self) -> Option<&dyn Validate> {
                    (**self).contract()
                }
            }
        )*
    };
}

deref_walk!(Box, Rc, Arc);

impl<T: Walk + ?Sized> Walk for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn contract(&self) -> Option<&dyn Validate> {
        (**self).contract()
    }
}

/// Contract detection for derived impls.
///
/// `(&Probe(value)).vet_contract()` resolves to [`ViaValidate`] when the
/// value's type implements [`Validate`] and to [`ViaWalk`] otherwise.
pub mod probe {
    use crate::Validate;

    pub struct Probe<'a, T: ?Sized>(pub &'a T);

    pub trait ViaValidate<'a> {
        fn vet_contract(&self) -> Option<&'a dyn Validate>;
    }

    impl<'a, T: Validate + 'a> ViaValidate<'a> for Probe<'a, T> {
        fn vet_contract(&self) -> Option<&'a dyn Validate> {
            Some(self.0)
        }
    }

    pub trait ViaWalk<'a> {
        fn vet_contract(&self) -> Option<&'a dyn Validate>;
    }

    impl<'a, T: ?Sized> ViaWalk<'a> for &Probe<'a, T> {
        fn vet_contract(&self) -> Option<&'a dyn Validate> {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Errors;

    struct Checked;

    impl Validate for Checked {
        fn validate(&self) -> Result<(), Errors> {
            Ok(())
        }
    }

    struct Unchecked;

    #[test]
    fn probe_detects_contracts() {
        use probe::{Probe, ViaValidate as _, ViaWalk as _};

        assert!((&Probe(&Checked)).vet_contract().is_some());
        assert!((&Probe(&Unchecked)).vet_contract().is_none());
    }

    #[test]
    fn shapes_of_std_types() {
        assert!(matches!(42u8.shape(), Shape::Scalar));
        assert!(matches!("x".shape(), Shape::Scalar));
        assert!(matches!(None::<u8>.shape(), Shape::Pointer(None)));
        assert!(matches!(Some(1u8).shape(), Shape::Pointer(Some(_))));
        assert!(matches!(Box::new(vec![1u8]).shape(), Shape::Sequence(_)));
        assert!(matches!([1u8, 2].shape(), Shape::Array(_)));

        let map = BTreeMap::from([(42, "a".to_string())]);
        let Shape::Map(entries) = map.shape() else {
            panic!("expected map shape");
        };
        let keys: Vec<String> = entries.map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["42"]);
    }
}
