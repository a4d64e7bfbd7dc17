/// Declares a `String` newtype that can only be built from a value with
/// non-whitespace content.
#[macro_export]
macro_rules! non_empty_string {
    ($TypeName: ident) => {
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $TypeName(String);

        impl $TypeName {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl PartialEq<str> for $TypeName {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl std::fmt::Display for $TypeName {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<str> for $TypeName {
            fn as_ref(&self) -> &str {
                self.0.as_ref()
            }
        }

        impl TryFrom<String> for $TypeName {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if value.trim().is_empty() {
                    return Err(format!("{} cannot be empty", stringify!($TypeName)));
                }
                Ok($TypeName(value))
            }
        }

        impl TryFrom<&str> for $TypeName {
            type Error = String;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::try_from(value.to_owned())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::non_empty_string!(Label);

    #[test]
    fn test_blank_values_are_rejected() {
        assert!(Label::try_from("   ").is_err());
        assert!(Label::try_from(String::new()).is_err());
    }

    #[test]
    fn test_value_is_kept_verbatim() {
        let label = Label::try_from("Europe/London").unwrap();
        assert_eq!(label.as_str(), "Europe/London");
        assert_eq!(label.to_string(), "Europe/London");
        assert!(label == *"Europe/London");
    }
}
