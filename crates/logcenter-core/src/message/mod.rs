//! Message formatting
//!
//! Logging calls take a template and a slice of dynamically typed [`Arg`]s.
//! [`format_message`] decides how the two combine:
//!
//! 1. no args: the template verbatim (`%` sequences are left alone)
//! 2. non-empty template: printf-style substitution
//! 3. empty template and a single string arg: that string verbatim
//! 4. otherwise: every arg printed, space-separated when neither neighbour
//!    is a string

mod printf;

use std::borrow::Cow;
use std::fmt;

pub use printf::sprintf;

/// A dynamically typed logging argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Any other value, captured as its rendered text
    Value {
        type_name: &'static str,
        repr: String,
    },
}

impl Arg {
    /// Capture a value through its `Display` implementation
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Arg::Value {
            type_name: short_type_name(std::any::type_name::<T>()),
            repr: value.to_string(),
        }
    }

    /// Capture a value through its `Debug` implementation
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Arg::Value {
            type_name: short_type_name(std::any::type_name::<T>()),
            repr: format!("{:?}", value),
        }
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Arg::Str(_))
    }

    /// Type name used in formatting diagnostics (`%!d(string=hi)`)
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Str(_) => "string",
            Arg::Int(_) => "int",
            Arg::Uint(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::Value { type_name, .. } => type_name,
        }
    }
}

/// Default rendering, identical to the `%v` verb
impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Uint(n) => write!(f, "{}", n),
            Arg::Float(x) => f.write_str(&printf::format_float_shortest(*x)),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Value { repr, .. } => f.write_str(repr),
        }
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    // "alloc::string::String" -> "String", keeps generics readable enough
    match full.find('<') {
        Some(_) => full,
        None => full.rsplit("::").next().unwrap_or(full),
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

impl From<Cow<'_, str>> for Arg {
    fn from(value: Cow<'_, str>) -> Self {
        Arg::Str(value.into_owned())
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Arg::Int(value as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Arg::Uint(value as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

/// Build an array of [`Arg`]s from heterogeneous values.
///
/// ```
/// use logcenter_core::{args, format_message};
///
/// assert_eq!(format_message("%s=%d", &args!["port", 8080]), "port=8080");
/// ```
#[macro_export]
macro_rules! args {
    () => {{
        let empty: [$crate::Arg; 0] = [];
        empty
    }};
    ($($arg:expr),+ $(,)?) => {
        [$($crate::Arg::from($arg)),+]
    };
}

/// Combine a template and its arguments into the final log message
pub fn format_message(template: &str, args: &[Arg]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    if !template.is_empty() {
        return sprintf(template, args);
    }

    if let [Arg::Str(only)] = args {
        return only.clone();
    }

    sprint(args)
}

/// Print every argument in its default form.
///
/// A space separates two operands when neither of them is a string.
pub fn sprint(args: &[Arg]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !arg.is_str() && !args[i - 1].is_str() {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    out
}
