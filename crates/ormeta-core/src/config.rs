//! Registry configuration.

/// Configuration for a [`Metadata`](crate::catalog::Metadata) registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataConfig {
    /// Freeze the registry after a successful `validate()`.
    ///
    /// A frozen registry rejects further `add` calls with
    /// [`Error::RegistryFrozen`](crate::Error::RegistryFrozen).
    pub freeze_on_validate: bool,

    /// Validate a registry built from a schema document as soon as every
    /// entity has been added.
    pub validate_on_load: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            freeze_on_validate: true,
            validate_on_load: true,
        }
    }
}

impl MetadataConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep accepting `add` calls after validation.
    pub fn unfrozen() -> Self {
        Self {
            freeze_on_validate: false,
            ..Default::default()
        }
    }

    /// Set whether validation freezes the registry.
    pub fn freeze_on_validate(mut self, freeze: bool) -> Self {
        self.freeze_on_validate = freeze;
        self
    }

    /// Set whether loading a schema document validates it.
    pub fn validate_on_load(mut self, validate: bool) -> Self {
        self.validate_on_load = validate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetadataConfig::default();

        assert!(config.freeze_on_validate);
        assert!(config.validate_on_load);
    }

    #[test]
    fn test_config_builder() {
        let config = MetadataConfig::new()
            .freeze_on_validate(false)
            .validate_on_load(false);

        assert!(!config.freeze_on_validate);
        assert!(!config.validate_on_load);
        assert!(!MetadataConfig::unfrozen().freeze_on_validate);
    }
}
