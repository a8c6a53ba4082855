//! Leaf checks for use inside [`crate::Validate`] impls.
//!
//! Each check takes the field name the failure should be reported against and
//! returns `Err` with a fixed-format message when the value fails.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use regex::Regex;

use crate::Error;

/// Values that can be blank: empty, zero, `false` or absent.
pub trait Required {
    fn is_blank(&self) -> bool;
}

/// Values with a length. Strings are measured in bytes.
pub trait Length {
    fn length(&self) -> usize;
}

/// Numbers [`in_range`] can compare.
pub trait Numeric: Copy {
    fn to_f64(self) -> f64;
}

/// Fails with `is required` when `value` is blank.
pub fn require_field<T: Required + ?Sized>(field: &str, value: &T) -> Result<(), Error> {
    if value.is_blank() {
        return Err(Error::field(field, "is required"));
    }
    Ok(())
}

/// Fails unless `min <= value <= max`.
pub fn in_range<N: Numeric>(field: &str, value: N, min: f64, max: f64) -> Result<(), Error> {
    let value = value.to_f64();
    if value < min || value > max {
        return Err(Error::field(
            field,
            format!("must be in range [{min:.6}, {max:.6}]"),
        ));
    }
    Ok(())
}

pub fn min_length<T: Length + ?Sized>(field: &str, value: &T, min: usize) -> Result<(), Error> {
    if value.length() < min {
        return Err(Error::field(
            field,
            format!("must have a minimum length of {min}"),
        ));
    }
    Ok(())
}

pub fn max_length<T: Length + ?Sized>(field: &str, value: &T, max: usize) -> Result<(), Error> {
    if value.length() > max {
        return Err(Error::field(
            field,
            format!("must have a maximum length of {max}"),
        ));
    }
    Ok(())
}

pub fn match_regexp(field: &str, value: impl AsRef<str>, pattern: &Regex) -> Result<(), Error> {
    let value = value.as_ref();
    if !pattern.is_match(value) {
        return Err(Error::field(
            field,
            format!("does not match pattern '{pattern}': '{value}'"),
        ));
    }
    Ok(())
}

pub fn not_nil<T>(field: &str, value: &Option<T>) -> Result<(), Error> {
    if value.is_none() {
        return Err(Error::field(field, "must not be nil"));
    }
    Ok(())
}

impl Required for str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Required for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Required for bool {
    fn is_blank(&self) -> bool {
        !*self
    }
}

impl Required for char {
    fn is_blank(&self) -> bool {
        *self == '\0'
    }
}

impl<T: Required> Required for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().map_or(true, Required::is_blank)
    }
}

macro_rules! numeric {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Numeric for $ty {
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }

            impl Required for $ty {
                fn is_blank(&self) -> bool {
                    *self == (0 as $ty)
                }
            }
        )*
    };
}

numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

macro_rules! collection {
    ($([$($gen:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($gen)*> Length for $ty {
                fn length(&self) -> usize {
                    self.len()
                }
            }

            impl<$($gen)*> Required for $ty {
                fn is_blank(&self) -> bool {
                    self.is_empty()
                }
            }
        )*
    };
}

collection!(
    [T] Vec<T>,
    [T] VecDeque<T>,
    [T] [T],
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
    [T, S] HashSet<T, S>,
    [T] BTreeSet<T>,
);

impl Length for str {
    fn length(&self) -> usize {
        self.len()
    }
}

impl Length for String {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> Length for [T; N] {
    fn length(&self) -> usize {
        N
    }
}

macro_rules! deref_checks {
    ($($ptr:ident),* $(,)?) => {
        $(
            impl<T: Required + ?Sized> Required for $ptr<T> {
                fn is_blank(&self) -> bool {
                    (**self).is_blank()
                }
            }

            impl<T: Length + ?Sized> Length for $ptr<T> {
                fn length(&self) -> usize {
                    (**self).length()
                }
            }
        )*
    };
}

deref_checks!(Box, Rc, Arc);

impl<T: Required + ?Sized> Required for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Length + ?Sized> Length for &T {
    fn length(&self) -> usize {
        (**self).length()
    }
}
