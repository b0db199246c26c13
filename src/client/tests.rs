//! Unit tests for client configuration resolution.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};

use super::*;
use crate::profile::ConfigFile;

const ACCESS_KEY: &str = "SCWABCDEFGHIJ0123456";
const FILE_ACCESS_KEY: &str = "SCWFILEFILEFILE00000";
const SECRET_KEY: &str = "6f1e2a3b-4c5d-4e6f-8a9b-0c1d2e3f4a5b";
const ORGANIZATION_ID: &str = "11111111-2222-3333-4444-555555555555";

/// Loader returning a canned result regardless of the path.
#[derive(Clone, Debug)]
struct StaticLoader(Result<ConfigFile, ProfileError>);

impl ConfigFileLoader for StaticLoader {
    fn load(&self, _path: &Utf8Path) -> Result<ConfigFile, ProfileError> {
        self.0.clone()
    }
}

fn missing_file() -> StaticLoader {
    StaticLoader(Err(ProfileError::NotFound {
        path: Utf8PathBuf::from("/nowhere/config.yaml"),
    }))
}

fn file_with(default_profile: Profile) -> StaticLoader {
    StaticLoader(Ok(ConfigFile {
        default_profile,
        active_profile: None,
        profiles: BTreeMap::new(),
    }))
}

fn request() -> ResolveRequest {
    ResolveRequest {
        config_path: Some(Utf8PathBuf::from("/etc/scw/config.yaml")),
        ..ResolveRequest::default()
    }
}

#[fixture]
fn full_env() -> EnvironmentSnapshot {
    let mut env = EnvironmentSnapshot::empty();
    env.scaleway.access_key = Some(ACCESS_KEY.to_owned());
    env.scaleway.secret_key = Some(SECRET_KEY.to_owned());
    env.scaleway.default_organization_id = Some(ORGANIZATION_ID.to_owned());
    env.scaleway.default_zone = Some(String::from("fr-par-1"));
    env.scaleway.default_region = Some(String::from("fr-par"));
    env
}

#[rstest]
fn environment_alone_resolves_when_file_is_missing(full_env: EnvironmentSnapshot) {
    let resolver = ClientConfigResolver::with_loader(full_env, missing_file());

    let config = resolver
        .resolve(&request())
        .unwrap_or_else(|err| panic!("resolve: {err}"));

    assert_eq!(
        config,
        ClientConfig {
            access_key: ACCESS_KEY.to_owned(),
            secret_key: SECRET_KEY.to_owned(),
            organization_id: ORGANIZATION_ID.to_owned(),
            zone: Zone::FrPar1,
            region: Region::FrPar,
        }
    );
}

#[rstest]
fn environment_wins_over_file_profile(full_env: EnvironmentSnapshot) {
    let loader = file_with(Profile {
        access_key: Some(FILE_ACCESS_KEY.to_owned()),
        default_zone: Some(String::from("nl-ams-1")),
        default_region: Some(String::from("nl-ams")),
        ..Profile::default()
    });
    let resolver = ClientConfigResolver::with_loader(full_env, loader);

    let config = resolver
        .resolve(&request())
        .unwrap_or_else(|err| panic!("resolve: {err}"));

    assert_eq!(config.access_key, ACCESS_KEY);
    assert_eq!(config.zone, Zone::FrPar1);
    assert_eq!(config.region, Region::FrPar);
}

#[rstest]
fn file_profile_fills_missing_environment_fields() {
    let mut env = EnvironmentSnapshot::empty();
    env.scaleway.secret_key = Some(SECRET_KEY.to_owned());
    let loader = file_with(Profile {
        access_key: Some(FILE_ACCESS_KEY.to_owned()),
        secret_key: Some(String::from("00000000-0000-0000-0000-000000000000")),
        default_organization_id: Some(ORGANIZATION_ID.to_owned()),
        default_zone: Some(String::from("pl-waw-2")),
        default_region: None,
    });
    let resolver = ClientConfigResolver::with_loader(env, loader);

    let config = resolver
        .resolve(&request())
        .unwrap_or_else(|err| panic!("resolve: {err}"));

    assert_eq!(config.access_key, FILE_ACCESS_KEY);
    assert_eq!(config.secret_key, SECRET_KEY);
    assert_eq!(config.zone, Zone::PlWaw2);
    assert_eq!(config.region, Region::PlWaw, "region derived from zone");
}

#[rstest]
fn named_profile_is_selected_from_file(full_env: EnvironmentSnapshot) {
    let mut env = full_env;
    env.scaleway.access_key = None;
    let mut profiles = BTreeMap::new();
    profiles.insert(
        String::from("backup"),
        Profile {
            access_key: Some(FILE_ACCESS_KEY.to_owned()),
            ..Profile::default()
        },
    );
    let loader = StaticLoader(Ok(ConfigFile {
        default_profile: Profile::default(),
        active_profile: None,
        profiles,
    }));
    let resolver = ClientConfigResolver::with_loader(env, loader);

    let config = resolver
        .resolve(&ResolveRequest {
            profile_name: Some(String::from("backup")),
            ..request()
        })
        .unwrap_or_else(|err| panic!("resolve: {err}"));

    assert_eq!(config.access_key, FILE_ACCESS_KEY);
}

#[rstest]
fn unknown_profile_name_is_an_error(full_env: EnvironmentSnapshot) {
    let resolver = ClientConfigResolver::with_loader(full_env, file_with(Profile::default()));

    let err = resolver
        .resolve(&ResolveRequest {
            profile_name: Some(String::from("ghost")),
            ..request()
        })
        .expect_err("profile does not exist");

    assert_eq!(
        err,
        ClientConfigError::ConfigFile(ProfileError::ProfileNotFound {
            name: String::from("ghost")
        })
    );
}

#[rstest]
fn unreadable_file_aborts_resolution(full_env: EnvironmentSnapshot) {
    let failure = ProfileError::Parse {
        path: Utf8PathBuf::from("/etc/scw/config.yaml"),
        message: String::from("bad indentation"),
    };
    let resolver =
        ClientConfigResolver::with_loader(full_env, StaticLoader(Err(failure.clone())));

    let err = resolver.resolve(&request()).expect_err("parse failure");

    assert_eq!(err, ClientConfigError::ConfigFile(failure));
}

#[rstest]
fn malformed_file_profile_fails_fast_even_when_environment_overrides_it(
    full_env: EnvironmentSnapshot,
) {
    let loader = file_with(Profile {
        access_key: Some(String::from("not-an-access-key")),
        ..Profile::default()
    });
    let resolver = ClientConfigResolver::with_loader(full_env, loader);

    let err = resolver.resolve(&request()).expect_err("file profile invalid");

    assert_eq!(
        err,
        ClientConfigError::FieldInvalid {
            field: ConfigField::AccessKey,
            value: String::from("not-an-access-key"),
        }
    );
}

#[rstest]
fn region_override_wins_over_every_source(full_env: EnvironmentSnapshot) {
    let resolver = ClientConfigResolver::with_loader(full_env, missing_file());

    let config = resolver
        .resolve(&ResolveRequest {
            region: Some(String::from("nl-ams")),
            ..request()
        })
        .unwrap_or_else(|err| panic!("resolve: {err}"));

    assert_eq!(config.region, Region::NlAms);
    assert_eq!(config.zone, Zone::FrPar1);
}

#[rstest]
fn invalid_region_override_is_rejected(full_env: EnvironmentSnapshot) {
    let resolver = ClientConfigResolver::with_loader(full_env, missing_file());

    let err = resolver
        .resolve(&ResolveRequest {
            region: Some(String::from("us-east-1")),
            ..request()
        })
        .expect_err("region unknown");

    assert_eq!(err.field(), Some(ConfigField::Region));
    let message = err.to_string();
    assert!(message.contains("us-east-1"), "{message}");
    assert!(message.contains("fr-par, nl-ams, pl-waw"), "{message}");
}

#[rstest]
fn missing_location_uses_environment_only(full_env: EnvironmentSnapshot) {
    let loader = StaticLoader(Err(ProfileError::Io {
        path: Utf8PathBuf::from("/unused"),
        message: String::from("loader must not be called"),
    }));
    let resolver = ClientConfigResolver::with_loader(full_env, loader);

    let config = resolver
        .resolve(&ResolveRequest::default())
        .unwrap_or_else(|err| panic!("resolve: {err}"));

    assert_eq!(config.access_key, ACCESS_KEY);
}

#[rstest]
#[case(ConfigField::AccessKey)]
#[case(ConfigField::SecretKey)]
#[case(ConfigField::OrganizationId)]
#[case(ConfigField::Zone)]
fn first_missing_field_is_reported_with_remediation(
    full_env: EnvironmentSnapshot,
    #[case] missing: ConfigField,
) {
    let mut env = full_env;
    let scw = &mut env.scaleway;
    match missing {
        ConfigField::AccessKey => scw.access_key = None,
        ConfigField::SecretKey => scw.secret_key = Some(String::new()),
        ConfigField::OrganizationId => scw.default_organization_id = None,
        ConfigField::Zone | ConfigField::Region => scw.default_zone = None,
    }

    let err = ClientConfigResolver::with_loader(env, missing_file())
        .resolve(&request())
        .expect_err("field is missing");

    assert_eq!(err, ClientConfigError::FieldRequired { field: missing });
    let message = err.to_string();
    assert!(message.contains(missing.env_var()), "{message}");
    assert!(message.contains(missing.config_key()), "{message}");
}

#[rstest]
fn missing_zone_is_reported_before_region() {
    let mut env = EnvironmentSnapshot::empty();
    env.scaleway.access_key = Some(ACCESS_KEY.to_owned());
    env.scaleway.secret_key = Some(SECRET_KEY.to_owned());
    env.scaleway.default_organization_id = Some(ORGANIZATION_ID.to_owned());
    let resolver = ClientConfigResolver::with_loader(env, missing_file());

    let err = resolver.resolve(&request()).expect_err("zone missing");

    assert_eq!(
        err,
        ClientConfigError::FieldRequired {
            field: ConfigField::Zone
        }
    );
}

#[rstest]
fn checks_follow_the_fixed_field_order() {
    let mut env = EnvironmentSnapshot::empty();
    env.scaleway.access_key = Some(ACCESS_KEY.to_owned());
    env.scaleway.secret_key = Some(String::from("not-a-uuid"));
    env.scaleway.default_zone = Some(String::from("mars-1"));
    let resolver = ClientConfigResolver::with_loader(env, missing_file());

    let err = resolver.resolve(&request()).expect_err("secret invalid");

    assert_eq!(
        err,
        ClientConfigError::FieldInvalid {
            field: ConfigField::SecretKey,
            value: String::from("not-a-uuid"),
        }
    );
    assert!(err.to_string().contains("expected a UUID"));
}

#[rstest]
fn invalid_zone_lists_every_accepted_zone(full_env: EnvironmentSnapshot) {
    let mut env = full_env;
    env.scaleway.default_zone = Some(String::from("fr-par-9"));
    let resolver = ClientConfigResolver::with_loader(env, missing_file());

    let err = resolver.resolve(&request()).expect_err("zone unknown");

    let message = err.to_string();
    for zone in Zone::ALL {
        assert!(message.contains(zone.as_str()), "{message}");
    }
}
