//! Macro for implementing Display and FromStr for code enums
//!
//! Several domain enums travel as fixed string codes (`"no_google_token"`,
//! `"FULL_ROAST"`, `"ON_TRACK"`). This macro provides a single
//! implementation for `as_str`, `Display` and `FromStr` so the code table is
//! written once.
//!
//! # Example
//!
//! ```rust
//! use brief_domain::impl_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Tier {
//!     Low,
//!     High,
//! }
//!
//! impl_code_conversions!(Tier {
//!     Low => "LOW",
//!     High => "HIGH",
//! });
//!
//! assert_eq!(Tier::High.to_string(), "HIGH");
//! assert_eq!("low".parse::<Tier>(), Ok(Tier::Low));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for code enums
///
/// - `as_str` / `Display` emit the code exactly as written
/// - `FromStr` matches codes ASCII case-insensitively
#[macro_export]
macro_rules! impl_code_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire code for this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
