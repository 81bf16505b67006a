//! Conversion traits between foreign values and native Rust types.
//!
//! - [`FromFre`]: extract a native value from a [`FreValue`] slot
//! - [`IntoFre`]: wrap a native value as a [`FreValue`]
//!
//! Narrowing integer conversions are bounds-checked. Floats accept integer
//! promotion. Everything else is a strict tag match; a null slot fails with
//! [`ConversionError::NullValue`] so handlers can treat absence as a
//! recoverable failure.

use chrono::{DateTime, Utc};

use crate::error::ConversionError;
use crate::geom::{Point, Rectangle};
use crate::value::FreValue;

/// Extract a native value from a foreign value slot.
pub trait FromFre: Sized {
    /// Extract a value, failing on tag mismatch, overflow or null.
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError>;
}

/// Wrap a native value as a foreign value.
pub trait IntoFre {
    /// Convert this value into a foreign value.
    fn into_fre(self) -> FreValue;
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_from_fre_int {
    ($($ty:ty),*) => {
        $(
            impl FromFre for $ty {
                fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
                    let wide = match value {
                        FreValue::Int(v) => i64::from(*v),
                        FreValue::UInt(v) => i64::from(*v),
                        FreValue::Null => {
                            return Err(ConversionError::NullValue {
                                target_type: stringify!($ty),
                            });
                        }
                        other => {
                            return Err(ConversionError::TypeMismatch {
                                expected: "int",
                                actual: other.type_name(),
                            });
                        }
                    };
                    <$ty>::try_from(wide).map_err(|_| ConversionError::IntegerOverflow {
                        value: wide,
                        target_type: stringify!($ty),
                    })
                }
            }
        )*
    };
}

impl_from_fre_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_into_fre_signed {
    ($($ty:ty),*) => {
        $(
            impl IntoFre for $ty {
                fn into_fre(self) -> FreValue {
                    FreValue::Int(i32::from(self))
                }
            }
        )*
    };
}

macro_rules! impl_into_fre_unsigned {
    ($($ty:ty),*) => {
        $(
            impl IntoFre for $ty {
                fn into_fre(self) -> FreValue {
                    FreValue::UInt(u32::from(self))
                }
            }
        )*
    };
}

impl_into_fre_signed!(i8, i16, i32);
impl_into_fre_unsigned!(u8, u16, u32);

// ============================================================================
// Float implementations
// ============================================================================

impl FromFre for f64 {
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
        match value {
            FreValue::Number(v) => Ok(*v),
            FreValue::Int(v) => Ok(f64::from(*v)),
            FreValue::UInt(v) => Ok(f64::from(*v)),
            FreValue::Null => Err(ConversionError::NullValue { target_type: "f64" }),
            other => Err(ConversionError::TypeMismatch {
                expected: "number",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoFre for f64 {
    fn into_fre(self) -> FreValue {
        FreValue::Number(self)
    }
}

impl FromFre for f32 {
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
        let wide = f64::from_fre(value).map_err(|err| match err {
            ConversionError::NullValue { .. } => ConversionError::NullValue { target_type: "f32" },
            other => other,
        })?;
        if wide.is_finite() && (wide < f64::from(f32::MIN) || wide > f64::from(f32::MAX)) {
            return Err(ConversionError::FloatConversion {
                value: wide,
                target_type: "f32",
            });
        }
        // Infinities and NaN narrow losslessly.
        Ok(wide as f32)
    }
}

impl IntoFre for f32 {
    fn into_fre(self) -> FreValue {
        FreValue::Number(f64::from(self))
    }
}

// ============================================================================
// Bool and string implementations
// ============================================================================

impl FromFre for bool {
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
        match value {
            FreValue::Boolean(v) => Ok(*v),
            FreValue::Null => Err(ConversionError::NullValue {
                target_type: "bool",
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: "boolean",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoFre for bool {
    fn into_fre(self) -> FreValue {
        FreValue::Boolean(self)
    }
}

impl FromFre for String {
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
        match value {
            FreValue::String(s) => Ok(s.clone()),
            FreValue::Null => Err(ConversionError::NullValue {
                target_type: "String",
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: "string",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoFre for String {
    fn into_fre(self) -> FreValue {
        FreValue::String(self)
    }
}

impl IntoFre for &str {
    fn into_fre(self) -> FreValue {
        FreValue::String(self.to_string())
    }
}

// ============================================================================
// Date and geometry implementations
// ============================================================================

impl FromFre for DateTime<Utc> {
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
        match value {
            FreValue::Date(d) => Ok(*d),
            FreValue::Null => Err(ConversionError::NullValue {
                target_type: "DateTime<Utc>",
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: "date",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoFre for DateTime<Utc> {
    fn into_fre(self) -> FreValue {
        FreValue::Date(self)
    }
}

impl FromFre for Point {
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
        match value {
            FreValue::Point(p) => Ok(*p),
            FreValue::Null => Err(ConversionError::NullValue {
                target_type: "Point",
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: "point",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoFre for Point {
    fn into_fre(self) -> FreValue {
        FreValue::Point(self)
    }
}

impl FromFre for Rectangle {
    fn from_fre(value: &FreValue) -> Result<Self, ConversionError> {
        match value {
            FreValue::Rectangle(r) => Ok(*r),
            FreValue::Null => Err(ConversionError::NullValue {
                target_type: "Rectangle",
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: "rectangle",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoFre for Rectangle {
    fn into_fre(self) -> FreValue {
        FreValue::Rectangle(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ========================================================================
    // FromFre tests
    // ========================================================================

    #[test]
    fn from_fre_i8() {
        assert_eq!(i8::from_fre(&FreValue::Int(42)).unwrap(), 42i8);
        assert_eq!(i8::from_fre(&FreValue::Int(-128)).unwrap(), -128i8);
        assert!(i8::from_fre(&FreValue::Int(128)).is_err());
        assert!(i8::from_fre(&FreValue::Boolean(true)).is_err());
    }

    #[test]
    fn from_fre_i32() {
        assert_eq!(i32::from_fre(&FreValue::Int(100_000)).unwrap(), 100_000);
        assert_eq!(i32::from_fre(&FreValue::UInt(7)).unwrap(), 7);
        assert!(i32::from_fre(&FreValue::UInt(u32::MAX)).is_err());
        assert!(i32::from_fre(&FreValue::Number(1.5)).is_err());
    }

    #[test]
    fn from_fre_u32() {
        assert_eq!(u32::from_fre(&FreValue::UInt(u32::MAX)).unwrap(), u32::MAX);
        assert_eq!(u32::from_fre(&FreValue::Int(7)).unwrap(), 7);
        assert!(u32::from_fre(&FreValue::Int(-1)).is_err());
    }

    #[test]
    fn from_fre_null_is_a_distinct_failure() {
        assert!(matches!(
            i32::from_fre(&FreValue::Null),
            Err(ConversionError::NullValue { .. })
        ));
        assert!(matches!(
            String::from_fre(&FreValue::Null),
            Err(ConversionError::NullValue { .. })
        ));
    }

    #[test]
    fn from_fre_f64_promotes_integers() {
        assert_eq!(f64::from_fre(&FreValue::Number(3.5)).unwrap(), 3.5);
        assert_eq!(f64::from_fre(&FreValue::Int(-2)).unwrap(), -2.0);
        assert_eq!(f64::from_fre(&FreValue::UInt(9)).unwrap(), 9.0);
        assert!(f64::from_fre(&FreValue::String("x".into())).is_err());
    }

    #[test]
    fn from_fre_f32_checks_range() {
        assert_eq!(f32::from_fre(&FreValue::Number(1.5)).unwrap(), 1.5f32);
        assert!(f32::from_fre(&FreValue::Number(1e300)).is_err());
        assert!(
            f32::from_fre(&FreValue::Number(f64::INFINITY))
                .unwrap()
                .is_infinite()
        );
    }

    #[test]
    fn from_fre_string() {
        assert_eq!(
            String::from_fre(&FreValue::String("hello".into())).unwrap(),
            "hello"
        );
        assert!(String::from_fre(&FreValue::Int(1)).is_err());
    }

    #[test]
    fn from_fre_date() {
        let date = Utc.timestamp_millis_opt(1_234_567_890_123).unwrap();
        assert_eq!(
            DateTime::<Utc>::from_fre(&FreValue::Date(date)).unwrap(),
            date
        );
        assert!(DateTime::<Utc>::from_fre(&FreValue::Number(0.0)).is_err());
    }

    #[test]
    fn from_fre_geometry() {
        let point = Point::new(1.0, 2.0);
        let rect = Rectangle::new(0.0, 0.0, 3.0, 4.0);
        assert_eq!(Point::from_fre(&FreValue::Point(point)).unwrap(), point);
        assert_eq!(
            Rectangle::from_fre(&FreValue::Rectangle(rect)).unwrap(),
            rect
        );
        assert!(Point::from_fre(&FreValue::Rectangle(rect)).is_err());
    }

    // ========================================================================
    // IntoFre tests
    // ========================================================================

    #[test]
    fn into_fre_integers() {
        assert_eq!(42i32.into_fre(), FreValue::Int(42));
        assert_eq!((-7i8).into_fre(), FreValue::Int(-7));
        assert_eq!(9u16.into_fre(), FreValue::UInt(9));
        assert_eq!(u32::MAX.into_fre(), FreValue::UInt(u32::MAX));
    }

    #[test]
    fn into_fre_floats_and_strings() {
        assert_eq!(1.5f64.into_fre(), FreValue::Number(1.5));
        assert_eq!(2.0f32.into_fre(), FreValue::Number(2.0));
        assert_eq!("hi".into_fre(), FreValue::String("hi".into()));
    }

    #[test]
    fn roundtrip_date_preserves_millis() {
        let date = Utc.timestamp_millis_opt(1_500_000_000_777).unwrap();
        let back = DateTime::<Utc>::from_fre(&date.into_fre()).unwrap();
        assert_eq!(back.timestamp_millis(), 1_500_000_000_777);
    }
}
