//! Runtime field values
//!
//! Rules never see concrete field types. Every field is converted into a
//! [`Value`] through [`ToValue`], and rules match on the variant they support.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use crate::Validate;

/// Supported value shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Seq,
    Map,
    Record,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Nil => "nil",
            Kind::Bool => "boolean",
            Kind::Int => "integer",
            Kind::Uint => "unsigned integer",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::Seq => "sequence",
            Kind::Map => "map",
            Kind::Record => "record",
        };
        f.write_str(name)
    }
}

/// A borrowed view of a field's runtime value
#[derive(Clone)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Seq(Vec<Value<'a>>),
    Map(Vec<(Value<'a>, Value<'a>)>),
    Record(&'a dyn Validate),
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
            Value::Record(_) => Kind::Record,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Number of items for sequences and maps, characters for strings
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Seq(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Str(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&'a dyn Validate> {
        match self {
            Value::Record(record) => Some(*record),
            _ => None,
        }
    }

    /// Zero value check used by `nonzero`
    ///
    /// A present record is never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(b) => !b,
            Value::Int(n) => *n == 0,
            Value::Uint(n) => *n == 0,
            Value::Float(n) => *n == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Record(_) => false,
        }
    }

    /// Records reachable one level down: the value itself, or the records
    /// held directly by a sequence or by a map's values
    pub fn records(&self) -> Vec<&'a dyn Validate> {
        match self {
            Value::Record(record) => vec![*record],
            Value::Seq(items) => items.iter().filter_map(Value::as_record).collect(),
            Value::Map(entries) => entries
                .iter()
                .filter_map(|(_, value)| value.as_record())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Record(record) => f.debug_tuple("Record").field(&record.type_name()).finish(),
        }
    }
}

/// Conversion of a field into a [`Value`]
///
/// Implemented for primitives, strings, smart pointers, `Option`, and the
/// standard collections. `#[derive(Validate)]` implements it for records.
pub trait ToValue {
    fn to_value(&self) -> Value<'_>;
}

impl ToValue for () {
    fn to_value(&self) -> Value<'_> {
        Value::Nil
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! int_to_value {
    ($variant:ident, $target:ty, $($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value<'_> {
                    Value::$variant(*self as $target)
                }
            }
        )*
    };
}

int_to_value!(Int, i64, i8, i16, i32, i64, isize);
int_to_value!(Uint, u64, u8, u16, u32, u64, usize);

impl ToValue for f32 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::Str(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::Str(self)
    }
}

impl ToValue for Cow<'_, str> {
    fn to_value(&self) -> Value<'_> {
        Value::Str(self)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &mut T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(value) => value.to_value(),
            None => Value::Nil,
        }
    }
}

impl<T: ToValue> ToValue for OnceCell<T> {
    fn to_value(&self) -> Value<'_> {
        self.get().map_or(Value::Nil, ToValue::to_value)
    }
}

impl<T: ToValue> ToValue for OnceLock<T> {
    fn to_value(&self) -> Value<'_> {
        self.get().map_or(Value::Nil, ToValue::to_value)
    }
}

fn seq<'a, T, I>(items: I) -> Value<'a>
where
    T: ToValue + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Seq(items.into_iter().map(ToValue::to_value).collect())
}

fn map<'a, K, V, I>(entries: I) -> Value<'a>
where
    K: ToValue + 'a,
    V: ToValue + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    Value::Map(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_value(), value.to_value()))
            .collect(),
    )
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value<'_> {
        seq(self)
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value<'_> {
        seq(self)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value<'_> {
        seq(self)
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value<'_> {
        seq(self)
    }
}

impl<T: ToValue, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value<'_> {
        seq(self)
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value<'_> {
        seq(self)
    }
}

impl<K: ToValue, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value<'_> {
        map(self)
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value<'_> {
        map(self)
    }
}
