//! Named-slot projections.
//!
//! The target is created with `Default` and every selected column is written
//! into the property it is matched with. Matching is by alias, falling back to
//! the natural name of the expression (the column name). All matching and kind
//! checks happen when the projection is constructed, so a mismatched query is
//! rejected before it is sent to the store.

use core::marker::PhantomData;

use crate::error::{BuildError, QueryError};
use crate::row::RowReader;
use crate::value::{FromValue, SqlKind, Value};

use super::{Projection, Selection};

/// One property of a named-slot target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    /// Storage class the property accepts.
    pub kind: SqlKind,
    /// Whether the property accepts NULL.
    pub nullable: bool,
}

impl Slot {
    pub const fn of<T: FromValue>(name: &'static str) -> Self {
        Self {
            name,
            kind: T::KIND,
            nullable: T::NULLABLE,
        }
    }
}

/// A type populated through setter methods.
///
/// Implement with [`setter_target!`](crate::setter_target).
pub trait SetterTarget: Default {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Properties and the values each one accepts.
    const PROPERTIES: &'static [Slot];

    /// Calls the setter for `property`.
    fn set(&mut self, property: &str, value: Value) -> Result<(), QueryError>;
}

/// A type populated by writing its fields directly.
///
/// Implement with [`field_target!`](crate::field_target).
pub trait FieldTarget: Default {
    const NAME: &'static str;

    const PROPERTIES: &'static [Slot];

    /// Assigns the field named `property`.
    fn write_field(&mut self, property: &str, value: Value) -> Result<(), QueryError>;
}

/// Matches every selection to a property, returning the property per column.
fn bind_slots(
    selections: &[Selection],
    target: &'static str,
    properties: &'static [Slot],
) -> Result<Vec<&'static str>, BuildError> {
    let lookup = |name: &str| properties.iter().find(|slot| slot.name == name);

    selections
        .iter()
        .map(|selection| {
            let slot = match (selection.alias(), selection.natural_name()) {
                (Some(alias), _) => lookup(alias).ok_or(BuildError::UnknownProperty {
                    property: alias,
                    target,
                })?,
                (None, natural) => natural.and_then(lookup).ok_or_else(|| {
                    BuildError::AliasRequired {
                        expression: selection.describe(),
                        target,
                    }
                })?,
            };
            if !selection.kind().fits(slot.kind) {
                return Err(BuildError::TypeMismatch {
                    slot: format!("{target}.{}", slot.name),
                    expected: slot.kind,
                    found: selection.kind(),
                });
            }
            if selection.is_nullable() && !slot.nullable {
                return Err(BuildError::NullIntoRequired {
                    slot: format!("{target}.{}", slot.name),
                    expression: selection.describe(),
                });
            }
            Ok(slot.name)
        })
        .collect()
}

/// Projection writing through setters. See [`Projections::bean`](super::Projections::bean).
#[derive(Debug)]
pub struct BeanProjection<T> {
    selections: Vec<Selection>,
    slots: Vec<&'static str>,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for BeanProjection<T> {
    fn clone(&self) -> Self {
        Self {
            selections: self.selections.clone(),
            slots: self.slots.clone(),
            _target: PhantomData,
        }
    }
}

impl<T: SetterTarget> BeanProjection<T> {
    pub(crate) fn new(selections: Vec<Selection>) -> Result<Self, BuildError> {
        let slots = bind_slots(&selections, T::NAME, T::PROPERTIES)?;
        Ok(Self {
            selections,
            slots,
            _target: PhantomData,
        })
    }
}

impl<T: SetterTarget> Projection for BeanProjection<T> {
    type Output = T;

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn decode(&self, row: &mut RowReader) -> Result<T, QueryError> {
        let mut target = T::default();
        for property in &self.slots {
            target.set(property, row.take()?)?;
        }
        Ok(target)
    }
}

/// Projection writing fields directly. See [`Projections::fields`](super::Projections::fields).
#[derive(Debug)]
pub struct FieldProjection<T> {
    selections: Vec<Selection>,
    slots: Vec<&'static str>,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for FieldProjection<T> {
    fn clone(&self) -> Self {
        Self {
            selections: self.selections.clone(),
            slots: self.slots.clone(),
            _target: PhantomData,
        }
    }
}

impl<T: FieldTarget> FieldProjection<T> {
    pub(crate) fn new(selections: Vec<Selection>) -> Result<Self, BuildError> {
        let slots = bind_slots(&selections, T::NAME, T::PROPERTIES)?;
        Ok(Self {
            selections,
            slots,
            _target: PhantomData,
        })
    }
}

impl<T: FieldTarget> Projection for FieldProjection<T> {
    type Output = T;

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn decode(&self, row: &mut RowReader) -> Result<T, QueryError> {
        let mut target = T::default();
        for property in &self.slots {
            target.write_field(property, row.take()?)?;
        }
        Ok(target)
    }
}

/// Implements [`SetterTarget`] for a type by listing its properties with
/// their slot types and setters.
///
/// ```ignore
/// setter_target!(MemberDto {
///     username: Option<String> => set_username,
///     age: i32 => set_age,
/// });
/// ```
#[macro_export]
macro_rules! setter_target {
    ($target:ident { $($property:ident : $slot:ty => $setter:ident),+ $(,)? }) => {
        impl $crate::projection::SetterTarget for $target {
            const NAME: &'static str = stringify!($target);

            const PROPERTIES: &'static [$crate::projection::Slot] = &[
                $($crate::projection::Slot::of::<$slot>(stringify!($property))),+
            ];

            fn set(
                &mut self,
                property: &str,
                value: $crate::value::Value,
            ) -> ::core::result::Result<(), $crate::error::QueryError> {
                match property {
                    $(
                        stringify!($property) => {
                            self.$setter(<$slot as $crate::value::FromValue>::from_value(value)?);
                            Ok(())
                        }
                    )+
                    other => Err($crate::error::QueryError::Mapping(format!(
                        "{} has no property `{}`",
                        stringify!($target),
                        other
                    ))),
                }
            }
        }
    };
}

/// Implements [`FieldTarget`] for a type by listing its fields and their types.
///
/// ```ignore
/// field_target!(MemberDto { username: Option<String>, age: i32 });
/// ```
#[macro_export]
macro_rules! field_target {
    ($target:ident { $($field:ident : $slot:ty),+ $(,)? }) => {
        impl $crate::projection::FieldTarget for $target {
            const NAME: &'static str = stringify!($target);

            const PROPERTIES: &'static [$crate::projection::Slot] = &[
                $($crate::projection::Slot::of::<$slot>(stringify!($field))),+
            ];

            fn write_field(
                &mut self,
                property: &str,
                value: $crate::value::Value,
            ) -> ::core::result::Result<(), $crate::error::QueryError> {
                match property {
                    $(
                        stringify!($field) => {
                            self.$field = <$slot as $crate::value::FromValue>::from_value(value)?;
                            Ok(())
                        }
                    )+
                    other => Err($crate::error::QueryError::Mapping(format!(
                        "{} has no field `{}`",
                        stringify!($target),
                        other
                    ))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{NonNull, Null, alias, count, max};
    use crate::projection::Projections;
    use crate::schema::Column;
    use crate::types::{Int, Text};

    const USERNAME: Column<Text, Null> = Column::new("member", "username");
    const AGE: Column<Int, NonNull> = Column::new("member", "age");

    #[derive(Debug, Default, PartialEq)]
    struct UserDto {
        name: Option<String>,
        age: i32,
    }

    impl UserDto {
        fn set_name(&mut self, name: Option<String>) {
            self.name = name;
        }

        fn set_age(&mut self, age: i32) {
            self.age = age;
        }
    }

    crate::setter_target!(UserDto {
        name: Option<String> => set_name,
        age: i32 => set_age,
    });

    #[derive(Debug, Default, PartialEq)]
    struct AgeOnly {
        age: i32,
    }

    crate::field_target!(AgeOnly { age: i32 });

    #[test]
    fn unaliased_mismatch_requires_an_alias() {
        let err = Projections::bean::<UserDto, _>((USERNAME, AGE)).unwrap_err();
        assert!(matches!(err, BuildError::AliasRequired { target: "UserDto", .. }));
    }

    #[test]
    fn alias_binds_the_slot() {
        let projection = Projections::bean::<UserDto, _>((alias(USERNAME, "name"), AGE)).unwrap();
        let mut row = RowReader::new(vec![Value::Text("member1".into()), Value::Integer(10)]);
        assert_eq!(
            projection.decode(&mut row).unwrap(),
            UserDto {
                name: Some("member1".into()),
                age: 10
            }
        );
    }

    #[test]
    fn unknown_alias_is_rejected() {
        let err = Projections::fields::<AgeOnly, _>((alias(AGE, "years"),)).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownProperty {
                property: "years",
                target: "AgeOnly"
            }
        );
    }

    #[test]
    fn text_into_a_numeric_slot_is_a_type_mismatch() {
        let err = Projections::fields::<AgeOnly, _>((alias(USERNAME, "age"),)).unwrap_err();
        assert!(matches!(
            err,
            BuildError::TypeMismatch {
                expected: SqlKind::Integer,
                found: SqlKind::Text,
                ..
            }
        ));
    }

    #[test]
    fn aggregates_bind_by_alias() {
        let projection = Projections::fields::<AgeOnly, _>((alias(count(AGE), "age"),)).unwrap();
        let mut row = RowReader::new(vec![Value::Integer(4)]);
        assert_eq!(projection.decode(&mut row).unwrap(), AgeOnly { age: 4 });
    }

    #[test]
    fn nullable_column_needs_an_optional_slot() {
        let err = Projections::fields::<AgeOnly, _>((alias(max(AGE), "age"),)).unwrap_err();
        assert_eq!(
            err,
            BuildError::NullIntoRequired {
                slot: "AgeOnly.age".into(),
                expression: r#"MAX("member"."age")"#.into(),
            }
        );

        #[derive(Debug, Default)]
        struct NameOnly {
            username: String,
        }
        crate::field_target!(NameOnly { username: String });

        let err = Projections::fields::<NameOnly, _>((USERNAME,)).unwrap_err();
        assert!(matches!(err, BuildError::NullIntoRequired { .. }));
    }
}
