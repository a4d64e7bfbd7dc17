use chrono_tz::Tz;
#[cfg(test)]
use mockall::automock;

/// Answers whether a name is a known timezone identifier.
#[cfg_attr(test, automock)]
pub trait TimezoneRegistry: Send + Sync {
    fn is_valid_timezone(&self, name: &str) -> bool;
}

/// Registry backed by the IANA database compiled into `chrono-tz`.
/// Matching is exact and case-sensitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct IanaTimezoneRegistry;

impl TimezoneRegistry for IanaTimezoneRegistry {
    fn is_valid_timezone(&self, name: &str) -> bool {
        name.parse::<Tz>().is_ok()
    }
}
