//! Display/FromStr derivation for domain enums
//!
//! Enum variants are stored and transported as lowercase strings. This macro
//! keeps the two directions of that mapping in one place per enum: `Display`
//! renders the canonical lowercase form, `FromStr` accepts any casing.
//!
//! # Example
//!
//! ```rust
//! use medmatch_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Proficiency {
//!     Beginner,
//!     Intermediate,
//!     Fluent,
//! }
//!
//! impl_domain_enum_conversions!(Proficiency {
//!     Beginner => "beginner",
//!     Intermediate => "intermediate",
//!     Fluent => "fluent",
//! });
//!
//! assert_eq!(Proficiency::Fluent.to_string(), "fluent");
//! assert_eq!("FLUENT".parse::<Proficiency>(), Ok(Proficiency::Fluent));
//! ```

/// Implements `Display` and `FromStr` for an enum from one variant/string
/// table
///
/// Parsing is ASCII-case-insensitive; rendering always produces the listed
/// string. Unknown input yields an error naming the enum.
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(value if value.eq_ignore_ascii_case($str) => Ok(Self::$variant),)+
                    _ => Err(format!("unknown {} value: {s}", stringify!($enum_name))),
                }
            }
        }
    };
}
