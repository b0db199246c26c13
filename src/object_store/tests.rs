//! Tests for the object storage bridge.

use super::*;
use rstest::rstest;

const ACCESS_KEY: &str = "SCWABCDEFGHIJ0123456";
const SECRET_KEY: &str = "6f1e2a3b-4c5d-4e6f-8a9b-0c1d2e3f4a5b";

fn environment(region: Option<&str>, with_keys: bool) -> EnvironmentSnapshot {
    let mut env = EnvironmentSnapshot::empty();
    env.scaleway.region = region.map(str::to_owned);
    if with_keys {
        env.scaleway.access_key = Some(ACCESS_KEY.to_owned());
        env.scaleway.secret_key = Some(SECRET_KEY.to_owned());
    }
    env
}

#[rstest]
fn builder_combines_environment_inputs() {
    let config = ObjectStoreConfigBuilder::from_environment(&environment(Some("nl-ams"), true))
        .build()
        .unwrap_or_else(|err| panic!("build object store config: {err}"));

    let credentials = config
        .credentials()
        .unwrap_or_else(|err| panic!("credentials: {err}"));
    assert_eq!(credentials.access_key_id, ACCESS_KEY);
    assert_eq!(credentials.secret_access_key, SECRET_KEY);
    assert_eq!(config.endpoint.url, "https://s3.nl-ams.scw.cloud");
    assert_eq!(config.endpoint.signing_region, "nl-ams");
    assert!(!config.force_path_style);
}

#[rstest]
fn explicit_region_replaces_environment_region() {
    let config = ObjectStoreConfigBuilder::from_environment(&environment(Some("nl-ams"), true))
        .region(Some("pl-waw"))
        .build()
        .unwrap_or_else(|err| panic!("build object store config: {err}"));

    assert_eq!(config.endpoint.signing_region, "pl-waw");
}

#[rstest]
fn missing_region_is_unsupported() {
    let err = ObjectStoreConfigBuilder::from_environment(&environment(None, true))
        .build()
        .expect_err("a region is required");

    assert_eq!(
        err,
        BridgeError::UnsupportedRegion {
            region: String::new()
        }
    );
}

#[rstest]
fn explicit_url_overrides_endpoint_but_keeps_signing_region() {
    let config = ObjectStoreConfigBuilder::from_environment(&environment(Some("fr-par"), true))
        .url("http://localhost:9000")
        .force_path_style(true)
        .build()
        .unwrap_or_else(|err| panic!("build object store config: {err}"));

    assert_eq!(config.endpoint.url, "http://localhost:9000");
    assert_eq!(config.endpoint.signing_region, "fr-par");
    assert!(config.force_path_style);
}

#[rstest]
#[case("ftp://example.com")]
#[case("not a url")]
fn malformed_explicit_url_is_rejected(#[case] url: &str) {
    let err = ObjectStoreConfigBuilder::from_environment(&environment(Some("fr-par"), true))
        .url(url)
        .build()
        .expect_err("url must be rejected");

    assert!(matches!(err, BridgeError::InvalidUrl { .. }), "got {err:?}");
}

#[rstest]
fn unverified_build_reports_missing_credentials_on_use() {
    let config = ObjectStoreConfigBuilder::from_environment(&environment(Some("fr-par"), false))
        .build()
        .unwrap_or_else(|err| panic!("build object store config: {err}"));

    assert_eq!(config.endpoint.url, "https://s3.fr-par.scw.cloud");
    assert_eq!(
        config.credentials(),
        Err(BridgeError::CredentialsUnavailable)
    );
}

#[rstest]
fn verified_build_requires_credentials() {
    let err = ObjectStoreConfigBuilder::from_environment(&environment(Some("fr-par"), false))
        .verify_credentials(true)
        .build()
        .expect_err("credentials are verified");

    assert_eq!(err, BridgeError::CredentialsUnavailable);
}

#[rstest]
#[case("https://s3.fr-par.scw.cloud", true)]
#[case("http://localhost:9000", true)]
#[case("s3://bucket", false)]
#[case("", false)]
fn url_scheme_validation(#[case] url: &str, #[case] expected: bool) {
    assert_eq!(is_valid_s3_url_scheme(url), expected);
}

#[rstest]
#[case("team=storage")]
#[case("team=storage&env=prod")]
#[case("empty=")]
fn well_formed_tags_are_accepted(#[case] tagging: &str) {
    assert_eq!(check_tags(tagging), Ok(()));
}

#[rstest]
#[case("no-separator")]
#[case("a=b=c")]
#[case("team=storage&broken")]
fn tags_without_single_separator_are_rejected(#[case] tagging: &str) {
    let err = check_tags(tagging).expect_err("tag must be rejected");
    assert!(matches!(err, BridgeError::InvalidTags { .. }), "got {err:?}");
}

#[rstest]
fn too_many_tags_are_rejected() {
    let tagging = (0..11)
        .map(|index| format!("k{index}=v"))
        .collect::<Vec<_>>()
        .join("&");

    let err = check_tags(&tagging).expect_err("eleven tags exceed the limit");

    let BridgeError::InvalidTags { reason, .. } = &err else {
        panic!("expected InvalidTags, got {err:?}");
    };
    assert!(reason.contains("at most 10"));
}

#[rstest]
#[case(format!("{}=v", "k".repeat(129)), "key")]
#[case(format!("k={}", "v".repeat(257)), "value")]
fn oversized_tag_parts_are_rejected(#[case] tagging: String, #[case] part: &str) {
    let err = check_tags(&tagging).expect_err("tag part is too long");

    let BridgeError::InvalidTags { reason, .. } = &err else {
        panic!("expected InvalidTags, got {err:?}");
    };
    assert!(reason.contains(part), "reason {reason:?} should mention {part}");
}

#[rstest]
fn limits_are_inclusive() {
    let tagging = format!("{}={}", "k".repeat(128), "v".repeat(256));
    assert_eq!(check_tags(&tagging), Ok(()));
}
