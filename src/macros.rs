//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for wire enums
///
/// The string form is the value the API sends and accepts. Parsing is
/// case-insensitive and also accepts spaces or dashes in place of underscores,
/// so `"In Progress"` and `"in-progress"` both parse as `in_progress`.
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     MyEnum,
///     "my enum",
///     {
///         Variant1 => "variant1",
///         Variant2 => "variant_2",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $kind:literal,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl $enum_name {
            /// All valid string representations of this enum.
            pub const ALL_STRINGS: &[&str] = &[$($str),+];

            /// The wire representation of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::DeskError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
                match normalized.as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($crate::error::DeskError::invalid_value(
                        $kind,
                        s,
                        $enum_name::ALL_STRINGS,
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod test {
    // The one-parameter alias must not leak into the generated `FromStr`.
    use crate::error::Result;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestEnum {
        A,
        InFlight,
    }

    enum_display_fromstr!(TestEnum, "test enum", { A => "a", InFlight => "in_flight" });

    #[test]
    fn test_display() {
        assert_eq!(TestEnum::A.to_string(), "a");
        assert_eq!(TestEnum::InFlight.to_string(), "in_flight");
    }

    #[test]
    fn test_from_str_is_lenient_about_separators() {
        assert_eq!("In Flight".parse::<TestEnum>().unwrap(), TestEnum::InFlight);
        assert_eq!("in-flight".parse::<TestEnum>().unwrap(), TestEnum::InFlight);
        assert_eq!("A".parse::<TestEnum>().unwrap(), TestEnum::A);
    }

    #[test]
    fn test_from_str_error_lists_valid_values() {
        let err = "zzz".parse::<TestEnum>().unwrap_err().to_string();
        assert!(err.contains("invalid test enum 'zzz'"), "{err}");
        assert!(err.contains("a, in_flight"), "{err}");
    }

    #[test]
    fn test_expands_beside_crate_result_alias() -> Result<()> {
        let parsed: TestEnum = "in_flight".parse()?;
        assert_eq!(parsed, TestEnum::InFlight);
        Ok(())
    }
}
