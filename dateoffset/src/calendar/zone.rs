use std::fmt;

/// An opaque timezone tag. Carried through every arithmetic operation,
/// compared for equality, never interpreted by this crate (spec §3: "an
/// opaque timezone tag that is preserved but not interpreted by the core").
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Zone(Option<String>);

impl Zone {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(Some(id.into()))
    }

    pub fn naive() -> Self {
        Self(None)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(id) => write!(f, "{}", id),
            None => write!(f, "naive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserved_not_interpreted() {
        let z = Zone::new("Australia/Sydney");
        assert_eq!(z.id(), Some("Australia/Sydney"));
        assert_eq!(z, Zone::new("Australia/Sydney"));
        assert_ne!(z, Zone::naive());
    }
}
