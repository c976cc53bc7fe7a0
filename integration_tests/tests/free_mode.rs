mod common;

use story_core::{Mode, PersonaFixture, Role, ScatterPlot};

#[test]
fn selecting_a_persona_replaces_only_the_path() {
    let fixture = PersonaFixture::builtin();
    let mut shell = common::seeded_shell(fixture.clone(), 1);
    shell.select_mode(Mode::Free);

    let config = shell.config().clone();
    let scatter_before = ScatterPlot::new(fixture.personas(), config.scatter()).render();

    let session = shell.free().expect("free session");
    let planner_path = session.decision_path(&fixture, config.decision_path()).render();
    assert_eq!(planner_path.count(Role::Marker), 4);
    assert_eq!(planner_path.label.as_deref(), Some("Person A — The Planner"));

    assert!(shell.select_persona("B"));
    let session = shell.free().expect("free session");
    let drifter_path = session.decision_path(&fixture, config.decision_path()).render();
    assert_eq!(drifter_path.count(Role::Marker), 5);
    assert_eq!(drifter_path.count(Role::Baseline), 1);
    assert_ne!(planner_path, drifter_path);

    // Fixture data and the other charts are untouched by the selection.
    assert_eq!(fixture.persona("A").map(|p| p.decision_count()), Some(4));
    let scatter_after = ScatterPlot::new(fixture.personas(), config.scatter()).render();
    assert_eq!(scatter_before, scatter_after);
}

#[test]
fn unknown_persona_keeps_current_selection() {
    let mut shell = common::seeded_shell(PersonaFixture::builtin(), 2);
    shell.select_mode(Mode::Free);
    assert!(shell.select_persona("D"));
    assert!(!shell.select_persona("nobody"));
    assert_eq!(shell.free().map(|s| s.selected_id().to_string()), Some("D".into()));
}

#[test]
fn every_builtin_persona_renders_its_full_path() {
    let fixture = PersonaFixture::builtin();
    let mut shell = common::seeded_shell(fixture.clone(), 3);
    shell.select_mode(Mode::Free);
    let config = shell.config().clone();

    let mut counts = Vec::new();
    for persona in fixture.personas() {
        assert!(shell.select_persona(&persona.id));
        let scene = shell
            .free()
            .expect("free session")
            .decision_path(&fixture, config.decision_path())
            .render();
        assert_eq!(scene.count(Role::Event), persona.decision_count());
        counts.push(scene.count(Role::Marker));
    }
    assert_eq!(counts, vec![4, 5, 4, 5, 4, 5]);
}
