use core::fmt::{Display, Formatter};
use core::str::FromStr;
use ohno::app_err;

/// A provider address of the form `namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderPath {
    namespace: String,
    name: String,
}

impl ProviderPath {
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ProviderPath {
    type Err = ohno::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), None) if !namespace.is_empty() && !name.is_empty() => Ok(Self {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            _ => Err(app_err!("invalid provider path '{s}', expected 'namespace/name'")),
        }
    }
}

impl Display for ProviderPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let path: ProviderPath = "hashicorp/aws".parse().unwrap();
        assert_eq!(path.namespace(), "hashicorp");
        assert_eq!(path.name(), "aws");
        assert_eq!(path.to_string(), "hashicorp/aws");
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        for bad in ["aws", "hashicorp/aws/extra", "/aws", "hashicorp/", "", "/"] {
            assert!(bad.parse::<ProviderPath>().is_err(), "'{bad}' should be rejected");
        }
    }

    #[test]
    fn test_error_names_input() {
        let err = "nope".parse::<ProviderPath>().unwrap_err();
        assert!(err.to_string().contains("'nope'"));
    }
}
