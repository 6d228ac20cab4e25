//! Macros for defining typed resource ID types.

/// Defines a typed resource ID with a fixed kind.
///
/// This generates a newtype wrapper around the code with:
/// - A `KIND` constant
/// - `from_counter()` to derive an ID from a row counter
/// - `parse()` to parse from string
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations (as the `{kind}-{code}` string)
///
/// # Example
///
/// ```ignore
/// define_resource_id!(UserId, "user");
///
/// let encoder = CodeEncoder::with_salt(7);
/// let id = UserId::from_counter(42, &encoder);
/// let parsed: UserId = id.to_string().parse()?;
/// assert_eq!(parsed.counter(&encoder)?, 42);
/// ```
#[macro_export]
macro_rules! define_resource_id {
    ($name:ident, $kind:literal) => {
        /// A typed resource ID for this kind.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// The kind prefix for this ID type.
            pub const KIND: &'static str = $kind;

            /// Derives the ID for a row counter.
            #[must_use]
            pub fn from_counter(counter: u64, encoder: &$crate::CodeEncoder) -> Self {
                Self(encoder.encode(counter))
            }

            /// Returns the code portion.
            #[must_use]
            pub fn code(&self) -> &str {
                &self.0
            }

            /// Recovers the row counter (modulo the code space).
            pub fn counter(&self, encoder: &$crate::CodeEncoder) -> Result<u64, $crate::IdError> {
                encoder.decode(&self.0)
            }

            /// Parses an ID from a string.
            ///
            /// The string must be in the format `{kind}-{code}` with an
            /// alphanumeric code.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                let code = $crate::split_resource_id(s, Self::KIND)?;
                Ok(Self(code.to_string()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}-{}", Self::KIND, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}
