mod common;

use story_core::load_persona_fixture_from_env;

#[test]
fn fixture_path_from_environment_is_used() {
    common::ensure_fixture_env();
    let (fixture, metadata) = load_persona_fixture_from_env(None);
    assert!(!metadata.is_builtin());
    assert_eq!(fixture.len(), 3);
    assert_eq!(fixture.first().id, "p1");
}

#[test]
fn explicit_path_wins_over_environment() {
    common::ensure_fixture_env();
    let bogus = common::fixture_path("invalid/no_personas.json");
    let (fixture, metadata) = load_persona_fixture_from_env(Some(&bogus));
    // An unusable override falls back to the builtin set, not the env path.
    assert!(metadata.is_builtin());
    assert_eq!(fixture.len(), 6);
}
