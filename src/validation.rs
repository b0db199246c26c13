//! Format predicates for Scaleway credentials and locality values.
//!
//! The predicates never fail: they answer whether a string has the shape the
//! Scaleway API accepts. [`Zone`] and [`Region`] carry the published
//! enumerations used by both the predicates and the resolved client
//! configuration.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

const ACCESS_KEY_PREFIX: &str = "SCW";
const ACCESS_KEY_SUFFIX_LEN: usize = 17;
const CANONICAL_UUID_LEN: usize = 36;

/// Scaleway region.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Region {
    /// Paris, France.
    FrPar,
    /// Amsterdam, Netherlands.
    NlAms,
    /// Warsaw, Poland.
    PlWaw,
}

impl Region {
    /// Every region the plugin accepts, in display order.
    pub const ALL: [Self; 3] = [Self::FrPar, Self::NlAms, Self::PlWaw];

    /// Returns the API identifier of the region.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FrPar => "fr-par",
            Self::NlAms => "nl-ams",
            Self::PlWaw => "pl-waw",
        }
    }
}

/// Scaleway availability zone.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Zone {
    /// `fr-par-1`.
    FrPar1,
    /// `fr-par-2`.
    FrPar2,
    /// `fr-par-3`.
    FrPar3,
    /// `nl-ams-1`.
    NlAms1,
    /// `nl-ams-2`.
    NlAms2,
    /// `nl-ams-3`.
    NlAms3,
    /// `pl-waw-1`.
    PlWaw1,
    /// `pl-waw-2`.
    PlWaw2,
    /// `pl-waw-3`.
    PlWaw3,
}

impl Zone {
    /// Every zone the plugin accepts, in display order.
    pub const ALL: [Self; 9] = [
        Self::FrPar1,
        Self::FrPar2,
        Self::FrPar3,
        Self::NlAms1,
        Self::NlAms2,
        Self::NlAms3,
        Self::PlWaw1,
        Self::PlWaw2,
        Self::PlWaw3,
    ];

    /// Returns the API identifier of the zone.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FrPar1 => "fr-par-1",
            Self::FrPar2 => "fr-par-2",
            Self::FrPar3 => "fr-par-3",
            Self::NlAms1 => "nl-ams-1",
            Self::NlAms2 => "nl-ams-2",
            Self::NlAms3 => "nl-ams-3",
            Self::PlWaw1 => "pl-waw-1",
            Self::PlWaw2 => "pl-waw-2",
            Self::PlWaw3 => "pl-waw-3",
        }
    }

    /// Region that contains this zone.
    #[must_use]
    pub const fn region(self) -> Region {
        match self {
            Self::FrPar1 | Self::FrPar2 | Self::FrPar3 => Region::FrPar,
            Self::NlAms1 | Self::NlAms2 | Self::NlAms3 => Region::NlAms,
            Self::PlWaw1 | Self::PlWaw2 | Self::PlWaw3 => Region::PlWaw,
        }
    }
}

/// Raised when a string is not a member of a locality enumeration.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLocality {
    /// Either `zone` or `region`.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

impl FromStr for Region {
    type Err = UnknownLocality;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == value)
            .ok_or_else(|| UnknownLocality {
                kind: "region",
                value: value.to_owned(),
            })
    }
}

impl FromStr for Zone {
    type Err = UnknownLocality;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.as_str() == value)
            .ok_or_else(|| UnknownLocality {
                kind: "zone",
                value: value.to_owned(),
            })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` for `SCW` followed by 17 uppercase alphanumerics.
#[must_use]
pub fn is_access_key(value: &str) -> bool {
    value.strip_prefix(ACCESS_KEY_PREFIX).is_some_and(|suffix| {
        suffix.len() == ACCESS_KEY_SUFFIX_LEN
            && suffix
                .chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
    })
}

/// Returns `true` when `value` is a canonical lowercase hyphenated UUID.
#[must_use]
pub fn is_secret_key(value: &str) -> bool {
    is_canonical_uuid(value)
}

/// Returns `true` when `value` is a canonical lowercase hyphenated UUID.
#[must_use]
pub fn is_organization_id(value: &str) -> bool {
    is_canonical_uuid(value)
}

/// Returns `true` when `value` names a known zone.
#[must_use]
pub fn is_zone(value: &str) -> bool {
    value.parse::<Zone>().is_ok()
}

/// Returns `true` when `value` names a known region.
#[must_use]
pub fn is_region(value: &str) -> bool {
    value.parse::<Region>().is_ok()
}

fn is_canonical_uuid(value: &str) -> bool {
    // `Uuid::try_parse` also accepts the simple, braced and URN forms.
    value.len() == CANONICAL_UUID_LEN
        && !value.chars().any(|ch| ch.is_ascii_uppercase())
        && Uuid::try_parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SCWABCDEFGHIJ0123456A", false)]
    #[case("SCWABCDEFGHIJ01234567", false)]
    #[case("SCWABCDEFGHIJ0123456", true)]
    #[case("SCWabcdefghij0123456", false)]
    #[case("XYZABCDEFGHIJ0123456", false)]
    #[case("", false)]
    fn access_key_shape(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_access_key(input), expected, "input {input}");
    }

    #[rstest]
    #[case("11111111-2222-3333-4444-555555555555", true)]
    #[case("6f1e2a3b-4c5d-4e6f-8a9b-0c1d2e3f4a5b", true)]
    #[case("6F1E2A3B-4C5D-4E6F-8A9B-0C1D2E3F4A5B", false)]
    #[case("6f1e2a3b4c5d4e6f8a9b0c1d2e3f4a5b", false)]
    #[case("{6f1e2a3b-4c5d-4e6f-8a9b-0c1d2e3f4a5b}", false)]
    #[case("not-a-uuid", false)]
    fn uuid_shaped_fields(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_secret_key(input), expected, "input {input}");
        assert_eq!(is_organization_id(input), expected, "input {input}");
    }

    #[rstest]
    fn every_zone_round_trips_and_maps_to_its_region() {
        for zone in Zone::ALL {
            assert!(is_zone(zone.as_str()));
            assert_eq!(zone.as_str().parse::<Zone>(), Ok(zone));
            assert!(zone.as_str().starts_with(zone.region().as_str()));
        }
    }

    #[rstest]
    #[case("fr-par", true)]
    #[case("nl-ams", true)]
    #[case("pl-waw", true)]
    #[case("fr-par-1", false)]
    #[case("us-east-1", false)]
    fn region_membership(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_region(input), expected);
    }

    #[rstest]
    fn unknown_zone_reports_kind_and_value() {
        let err = "fr-par-9".parse::<Zone>().expect_err("zone is unknown");
        assert_eq!(err.kind, "zone");
        assert_eq!(err.value, "fr-par-9");
    }
}
