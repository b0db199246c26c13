//! Errors produced while resolving the client configuration.

use std::fmt;

use thiserror::Error;

use crate::profile::ProfileError;
use crate::validation::{Region, Zone};

/// Mandatory client configuration fields, in validation order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigField {
    /// `access_key` / `SCW_ACCESS_KEY`.
    AccessKey,
    /// `secret_key` / `SCW_SECRET_KEY`.
    SecretKey,
    /// `default_organization_id` / `SCW_DEFAULT_ORGANIZATION_ID`.
    OrganizationId,
    /// `default_zone` / `SCW_DEFAULT_ZONE`.
    Zone,
    /// `default_region` / `SCW_DEFAULT_REGION`.
    Region,
}

impl ConfigField {
    /// Human-readable field description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AccessKey => "access key",
            Self::SecretKey => "secret key",
            Self::OrganizationId => "organization ID",
            Self::Zone => "default zone",
            Self::Region => "default region",
        }
    }

    /// Key recognised in the Scaleway config file.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::AccessKey => "access_key",
            Self::SecretKey => "secret_key",
            Self::OrganizationId => "default_organization_id",
            Self::Zone => "default_zone",
            Self::Region => "default_region",
        }
    }

    /// Environment variable that sets the field.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::AccessKey => "SCW_ACCESS_KEY",
            Self::SecretKey => "SCW_SECRET_KEY",
            Self::OrganizationId => "SCW_DEFAULT_ORGANIZATION_ID",
            Self::Zone => "SCW_DEFAULT_ZONE",
            Self::Region => "SCW_DEFAULT_REGION",
        }
    }

    /// Accepted values for enumerated fields; `None` for free-form ones.
    #[must_use]
    pub fn accepted_values(self) -> Option<Vec<&'static str>> {
        match self {
            Self::Zone => Some(Zone::ALL.into_iter().map(Zone::as_str).collect()),
            Self::Region => Some(Region::ALL.into_iter().map(Region::as_str).collect()),
            Self::AccessKey | Self::SecretKey | Self::OrganizationId => None,
        }
    }

    const fn remediation(self) -> Remediation {
        Remediation(self)
    }

    const fn expectation(self) -> Expectation {
        Expectation(self)
    }

    const fn expected_format(self) -> &'static str {
        match self {
            Self::AccessKey => "expected SCWXXXXXXXXXXXXXXXXX format",
            Self::SecretKey | Self::OrganizationId => {
                "expected a UUID: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
            }
            Self::Zone => "available zones are",
            Self::Region => "available regions are",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Renders the remediation for a missing field.
struct Remediation(ConfigField);

impl fmt::Display for Remediation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.0.config_key();
        write!(
            f,
            "{key} can be initialised using the command \"scw init\". \
             Provide it with the {key} key of the Scaleway config file \
             (~/.config/scw/config.yaml) or with the {} environment variable; \
             the environment variable has the highest priority",
            self.0.env_var()
        )
    }
}

/// Renders the format expectation for a malformed field.
struct Expectation(ConfigField);

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.expected_format())?;
        if let Some(values) = self.0.accepted_values() {
            write!(f, ": {}", values.join(", "))?;
        }
        Ok(())
    }
}

/// Errors raised by the client configuration resolver.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClientConfigError {
    /// A mandatory field is missing from every source.
    #[error("{field} is required. {}", .field.remediation())]
    FieldRequired {
        /// Field that is missing.
        field: ConfigField,
    },
    /// A field is present but does not have the expected shape.
    #[error("invalid {field} format '{value}', {}", .field.expectation())]
    FieldInvalid {
        /// Field that failed validation.
        field: ConfigField,
        /// Offending value.
        value: String,
    },
    /// The config file exists but could not be used.
    #[error(transparent)]
    ConfigFile(#[from] ProfileError),
}

impl ClientConfigError {
    /// Field the error refers to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<ConfigField> {
        match self {
            Self::FieldRequired { field } | Self::FieldInvalid { field, .. } => Some(*field),
            Self::ConfigFile(_) => None,
        }
    }
}
