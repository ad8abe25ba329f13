//! Macro for implementing Display and FromStr for wire code enums
//!
//! The backend sends activity and status codes as upper-case strings. This
//! macro maps unit variants to their code so both directions stay in one
//! place. Parsing is case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use crewconnect_domain::impl_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Leg {
//!     Outbound,
//!     Inbound,
//! }
//!
//! impl_code_conversions!(Leg {
//!     Outbound => "outbound",
//!     Inbound => "inbound",
//! });
//!
//! assert_eq!("OUTBOUND".parse::<Leg>(), Ok(Leg::Outbound));
//! assert_eq!(Leg::Inbound.to_string(), "inbound");
//! ```

/// Implements Display and FromStr traits for code enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase code
#[macro_export]
macro_rules! impl_code_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestCode {
        Flight,
        Hotel,
    }

    impl_code_conversions!(TestCode {
        Flight => "flight",
        Hotel => "hotel",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestCode::Flight.to_string(), "flight");
        assert_eq!(TestCode::Hotel.to_string(), "hotel");
    }

    #[test]
    fn test_fromstr_is_case_insensitive() {
        assert_eq!(TestCode::from_str("FLIGHT").unwrap(), TestCode::Flight);
        assert_eq!(TestCode::from_str("Hotel").unwrap(), TestCode::Hotel);
    }

    #[test]
    fn test_fromstr_invalid() {
        let err = TestCode::from_str("taxi").unwrap_err();
        assert!(err.contains("TestCode"));
        assert!(err.contains("taxi"));
    }

    mod with_domain_result_in_scope {
        #[allow(unused_imports)]
        use crate::Result;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Leg {
            Outbound,
            Inbound,
        }

        impl_code_conversions!(Leg {
            Outbound => "outbound",
            Inbound => "inbound",
        });

        #[test]
        fn test_expands_next_to_single_parameter_result_alias() {
            assert_eq!("INBOUND".parse::<Leg>(), Ok(Leg::Inbound));
            assert_eq!(Leg::Outbound.to_string(), "outbound");
            assert!("sideways".parse::<Leg>().unwrap_err().contains("Leg"));
        }
    }
}
