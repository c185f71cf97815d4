//! Core value types for arrayflow
//!
//! Every operand, argument and result flowing through a primitive graph is a
//! [`Value`]. The model covers storage, shape introspection,
//! equality and a handful of conversions. All behaviour lives in primitives.
//!
//! # Main Types
//!
//! - [`Value`] - Tagged union over scalars, strings, arrays, lists and primitive handles
//! - [`NumericArray`] - N-dimensional `f64`/`i64`/`bool` storage backed by `ndarray`
//! - [`ElementType`] - Element type tag of a [`NumericArray`]
//!
//! # Ranks
//!
//! Arrays of rank 0 (scalar), 1 (vector) and 2 (matrix) are handled by every
//! kernel; higher ranks can be stored but most primitives reject them. Rank
//! changes are always explicit (see [`NumericArray::flatten`]).

use crate::execution::PrimitiveHandle;
use ndarray::{Array1, Array2, ArrayD, IxDyn, ShapeError};
use std::fmt;

/// Element type of a numeric array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// 64-bit floating point
    Float64,
    /// 64-bit signed integer
    Int64,
    /// Boolean
    Bool,
}

impl ElementType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementType::Float64 => "float64",
            ElementType::Int64 => "int64",
            ElementType::Bool => "bool",
        }
    }
}

/// N-dimensional numeric storage.
///
/// The shape always matches the number of stored elements; `ndarray` enforces
/// this at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
    Bool(ArrayD<bool>),
}

impl NumericArray {
    /// Rank-0 float array.
    pub fn scalar(value: f64) -> Self {
        NumericArray::Float(ArrayD::from_elem(IxDyn(&[]), value))
    }

    /// Rank-1 float array.
    pub fn vector(values: Vec<f64>) -> Self {
        NumericArray::Float(Array1::from_vec(values).into_dyn())
    }

    /// Rank-2 float array from row-major data.
    pub fn matrix(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, ShapeError> {
        Ok(NumericArray::Float(
            Array2::from_shape_vec((rows, cols), values)?.into_dyn(),
        ))
    }

    /// Float array of arbitrary shape from row-major data.
    pub fn from_shape_vec(shape: &[usize], values: Vec<f64>) -> Result<Self, ShapeError> {
        Ok(NumericArray::Float(ArrayD::from_shape_vec(
            IxDyn(shape),
            values,
        )?))
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            NumericArray::Float(_) => ElementType::Float64,
            NumericArray::Int(_) => ElementType::Int64,
            NumericArray::Bool(_) => ElementType::Bool,
        }
    }

    pub fn rank(&self) -> usize {
        self.shape().len()
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            NumericArray::Float(a) => a.shape(),
            NumericArray::Int(a) => a.shape(),
            NumericArray::Bool(a) => a.shape(),
        }
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        match self {
            NumericArray::Float(a) => a.len(),
            NumericArray::Int(a) => a.len(),
            NumericArray::Bool(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the elements coerced to `f64` (`true` = 1.0).
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            NumericArray::Float(a) => a.clone(),
            NumericArray::Int(a) => a.mapv(|x| x as f64),
            NumericArray::Bool(a) => a.mapv(|x| if x { 1.0 } else { 0.0 }),
        }
    }

    /// Like [`NumericArray::to_f64`], without copying float storage.
    pub fn into_f64(self) -> ArrayD<f64> {
        match self {
            NumericArray::Float(a) => a,
            other => other.to_f64(),
        }
    }

    /// True if at least one element is non-zero.
    pub fn any_true(&self) -> bool {
        match self {
            NumericArray::Float(a) => a.iter().any(|&x| x != 0.0),
            NumericArray::Int(a) => a.iter().any(|&x| x != 0),
            NumericArray::Bool(a) => a.iter().any(|&x| x),
        }
    }

    /// Explicit conversion to a rank-1 array in row-major order.
    pub fn flatten(self) -> Self {
        fn flat<T: Clone>(a: ArrayD<T>) -> ArrayD<T> {
            let values: Vec<T> = a.iter().cloned().collect();
            Array1::from_vec(values).into_dyn()
        }
        match self {
            NumericArray::Float(a) => NumericArray::Float(flat(a)),
            NumericArray::Int(a) => NumericArray::Int(flat(a)),
            NumericArray::Bool(a) => NumericArray::Bool(flat(a)),
        }
    }
}

impl From<ArrayD<f64>> for NumericArray {
    fn from(array: ArrayD<f64>) -> Self {
        NumericArray::Float(array)
    }
}

impl From<ArrayD<i64>> for NumericArray {
    fn from(array: ArrayD<i64>) -> Self {
        NumericArray::Int(array)
    }
}

impl From<ArrayD<bool>> for NumericArray {
    fn from(array: ArrayD<bool>) -> Self {
        NumericArray::Bool(array)
    }
}

impl From<Array1<f64>> for NumericArray {
    fn from(array: Array1<f64>) -> Self {
        NumericArray::Float(array.into_dyn())
    }
}

impl From<Array2<f64>> for NumericArray {
    fn from(array: Array2<f64>) -> Self {
        NumericArray::Float(array.into_dyn())
    }
}

impl From<Array1<i64>> for NumericArray {
    fn from(array: Array1<i64>) -> Self {
        NumericArray::Int(array.into_dyn())
    }
}

impl From<Array1<bool>> for NumericArray {
    fn from(array: Array1<bool>) -> Self {
        NumericArray::Bool(array.into_dyn())
    }
}

/// A value flowing through the primitive graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// No value; also the result of side-effect-only primitives.
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(NumericArray),
    /// Ordered literal fragments.
    List(Vec<Value>),
    /// Reference to a live primitive instance.
    Primitive(PrimitiveHandle),
}

impl Value {
    /// A value is valid as an operand unless it is `Empty`.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Value::Empty)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int64",
            Value::Float(_) => "float64",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Primitive(_) => "primitive",
        }
    }

    /// Number of dimensions for numeric values, `None` otherwise.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Some(0),
            Value::Array(a) => Some(a.rank()),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveHandle> {
        match self {
            Value::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of `Int` scalars and rank-0 integer arrays.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Array(NumericArray::Int(a)) if a.ndim() == 0 => a.first().copied(),
            _ => None,
        }
    }

    /// Float view of any numeric rank-0 value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Array(a) if a.rank() == 0 => a.to_f64().first().copied(),
            _ => None,
        }
    }

    /// Integer content as an `i64` array, if the value holds only integers.
    pub fn to_int_array(&self) -> Option<ArrayD<i64>> {
        match self {
            Value::Int(i) => Some(ArrayD::from_elem(IxDyn(&[]), *i)),
            Value::Array(NumericArray::Int(a)) => Some(a.clone()),
            _ => None,
        }
    }

    /// Numeric content as an `f64` array; scalars become rank-0 arrays.
    pub fn to_numeric(&self) -> Option<ArrayD<f64>> {
        match self {
            Value::Array(a) => Some(a.to_f64()),
            other => other
                .as_f64()
                .map(|x| ArrayD::from_elem(IxDyn(&[]), x)),
        }
    }

    /// Truthiness of an already evaluated value.
    ///
    /// Scalars are true when non-zero, strings and lists when non-empty and
    /// arrays when any element is non-zero. Returns `None` for primitive
    /// handles, which must be evaluated first.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Value::Empty => Some(false),
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            Value::Str(s) => Some(!s.is_empty()),
            Value::Array(a) => Some(a.any_true()),
            Value::List(items) => Some(!items.is_empty()),
            Value::Primitive(_) => None,
        }
    }

    /// Wrap a boolean array, collapsing rank 0 to `Value::Bool`.
    pub fn from_bool_array(array: ArrayD<bool>) -> Self {
        if array.ndim() == 0 {
            Value::Bool(array.first().copied().unwrap_or(false))
        } else {
            Value::Array(NumericArray::Bool(array))
        }
    }

    /// Wrap a float array, collapsing rank 0 to `Value::Float`.
    pub fn from_f64_array(array: ArrayD<f64>) -> Self {
        if array.ndim() == 0 {
            Value::Float(array.first().copied().unwrap_or(0.0))
        } else {
            Value::Array(NumericArray::Float(array))
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<NumericArray> for Value {
    fn from(v: NumericArray) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Array(NumericArray::vector(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<PrimitiveHandle> for Value {
    fn from(v: PrimitiveHandle) -> Self {
        Value::Primitive(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Array(NumericArray::Float(a)) => write!(f, "{}", a),
            Value::Array(NumericArray::Int(a)) => write!(f, "{}", a),
            Value::Array(NumericArray::Bool(a)) => write!(f, "{}", a),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Primitive(p) => write!(f, "<primitive {}>", p.name()),
        }
    }
}
