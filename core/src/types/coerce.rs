//! Type compatibility rules for SQL types.

use super::{Any, BigInt, Bool, DataType, Double, Int, Numeric, Text};

/// Marker trait indicating two SQL types can be compared or assigned.
///
/// - Each type compares with itself (reflexive)
/// - Integers and doubles compare with each other
/// - `Any` compares with everything
///
/// ```ignore
/// requires_compatible::<Int, BigInt>();   // OK - numeric family
/// requires_compatible::<Int, Text>();     // ERROR - incompatible
/// ```
#[diagnostic::on_unimplemented(
    message = "SQL type `{Self}` is not compatible with `{Rhs}`",
    label = "these SQL types cannot be compared or assigned",
    note = "compatible types are: numeric with numeric, text with text, and any type with itself"
)]
pub trait Compatible<Rhs: DataType = Self>: DataType {}

impl<T: DataType> Compatible<T> for T {}

// Numeric family
impl Compatible<BigInt> for Int {}
impl Compatible<Double> for Int {}
impl Compatible<Int> for BigInt {}
impl Compatible<Double> for BigInt {}
impl Compatible<Int> for Double {}
impl Compatible<BigInt> for Double {}

// Any <-> concrete
macro_rules! any_compatible {
    ($($ty:ty),*) => {
        $(
            impl Compatible<Any> for $ty {}
            impl Compatible<$ty> for Any {}
        )*
    };
}

any_compatible!(Int, BigInt, Double, Text, Bool);

/// Result type of arithmetic between two numeric types.
///
/// Integers widen to `BigInt` and anything combined with `Double` is a
/// `Double`, matching SQLite's numeric affinity.
#[diagnostic::on_unimplemented(
    message = "no arithmetic between `{Self}` and `{Rhs}`",
    label = "arithmetic needs numeric operands"
)]
pub trait Promote<Rhs: Numeric>: Numeric {
    type Output: Numeric;
}

macro_rules! promote {
    ($($lhs:ty, $rhs:ty => $out:ty);* $(;)?) => {
        $(
            impl Promote<$rhs> for $lhs {
                type Output = $out;
            }
        )*
    };
}

promote! {
    Int, Int => Int;
    Int, BigInt => BigInt;
    Int, Double => Double;
    Int, Any => Any;
    BigInt, Int => BigInt;
    BigInt, BigInt => BigInt;
    BigInt, Double => Double;
    BigInt, Any => Any;
    Double, Int => Double;
    Double, BigInt => Double;
    Double, Double => Double;
    Double, Any => Any;
    Any, Int => Any;
    Any, BigInt => Any;
    Any, Double => Any;
    Any, Any => Any;
}
