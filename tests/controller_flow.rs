use std::path::Path;

use xpath_locator::StrategyKind;
use xpath_picker::{
    load_document, resolve_target, ControllerError, Direction, PickerConfig, PickerState,
    SelectionController,
};

fn fixture() -> dom_snapshot::Document {
    load_document(Path::new("tests/fixtures/page.html")).unwrap()
}

#[test]
fn select_navigate_and_escape() {
    let doc = fixture();
    let config = PickerConfig::default();
    let mut controller = SelectionController::with_options(&doc, config.generator);

    controller.activate();
    let email = resolve_target(&doc, r#"//input[@type="email"]"#).unwrap();
    assert!(controller.hover(email.node_id()));
    assert!(controller.select(email.node_id()).unwrap());

    let selection = controller.selection().unwrap();
    assert_eq!(selection.candidates[0].kind, StrategyKind::Name);
    assert_eq!(selection.candidates[0].xpath, r#"//*[@name="email"]"#);
    assert_eq!(selection.absolute_xpath, "/html/body/div[1]/form/input[1]");

    let password = controller.navigate(Direction::NextSibling).unwrap();
    assert_eq!(
        doc.element_data(password).unwrap().attribute("type"),
        Some("password")
    );

    let form = controller.navigate(Direction::Parent).unwrap();
    assert_eq!(
        controller.selection().unwrap().candidates[0].xpath,
        r#"//*[@id="login"]"#
    );
    assert_eq!(doc.element_data(form).unwrap().tag, "form");

    controller.navigate(Direction::Parent).unwrap();
    assert_eq!(
        controller.navigate(Direction::Parent),
        Err(ControllerError::NoDestination(Direction::Parent))
    );

    controller.deactivate();
    assert_eq!(controller.state(), PickerState::Idle);
    assert!(controller.selection().is_none());
}

#[test]
fn sibling_walk_skips_picker_panel() {
    let doc = fixture();
    let mut controller = SelectionController::new(&doc);
    controller.activate();

    let app = resolve_target(&doc, r#"//*[@id="app"]"#).unwrap();
    controller.select(app.node_id()).unwrap();
    assert_eq!(
        controller.navigate(Direction::NextSibling),
        Err(ControllerError::NoDestination(Direction::NextSibling))
    );

    let copy = resolve_target(&doc, r#"//button[text()="Copy"]"#).unwrap();
    assert!(!controller.select(copy.node_id()).unwrap());
    assert_eq!(controller.selection().unwrap().node, app.node_id());
}

#[test]
fn choose_records_candidate() {
    let doc = fixture();
    let mut controller = SelectionController::new(&doc);
    controller.activate();

    let button = resolve_target(&doc, r#"//*[@id="submit-btn"]"#).unwrap();
    controller.select(button.node_id()).unwrap();
    let chosen = controller.choose(1).unwrap().clone();
    assert_eq!(chosen.kind, StrategyKind::Class);
    assert_eq!(controller.selection().unwrap().chosen, Some(1));
}
