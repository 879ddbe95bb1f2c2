use serde_json::{Value, json};
use treeform::error::FieldError;
use treeform::form::FormControl;
use treeform::source::ValueStream;
use treeform::tree::FlatNode;
use treeform::widgets::tree_select::TreeSelect;

fn init_logging() {
    let _ = simplelog::SimpleLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
    );
}

fn permissions() -> Value {
    json!({
        "user": ["manage", "group"],
        "company": ["manage", "list"],
        "project": {
            "manage": [],
            "schedule": ["manage", "print"]
        }
    })
}

fn connected(options: Value, model: Value) -> (TreeSelect, FormControl) {
    let control = FormControl::with_value(model);
    let select = TreeSelect::new();
    select.bind(control.clone());
    select.connect(&vec![options]).unwrap();
    (select, control)
}

#[test]
fn flat_sequence_is_preorder_with_depths() {
    init_logging();
    let (select, _) = connected(permissions(), json!({}));

    let nodes = select.flat_nodes();
    let rendered: Vec<(String, u16, bool)> = nodes
        .iter()
        .map(|n| (n.label().to_string(), n.depth(), n.is_expandable()))
        .collect();

    assert_eq!(
        rendered,
        [
            ("user".to_string(), 0, true),
            ("manage".to_string(), 1, false),
            ("group".to_string(), 1, false),
            ("company".to_string(), 0, true),
            ("manage".to_string(), 1, false),
            ("list".to_string(), 1, false),
            ("project".to_string(), 0, true),
            ("manage".to_string(), 1, true),
            ("schedule".to_string(), 1, true),
            ("manage".to_string(), 2, false),
            ("print".to_string(), 2, false),
        ]
    );
}

#[test]
fn seeded_model_drives_checked_and_indeterminate() {
    let (select, _) = connected(permissions(), json!({ "user": ["manage"] }));

    assert!(select.is_checked("user/manage"));
    assert!(!select.is_checked("user/group"));
    assert!(select.is_indeterminate("user"));
    assert!(!select.is_checked("user"));
    assert!(!select.is_indeterminate("company"));
}

#[test]
fn toggling_writes_the_model_back_on_every_change() {
    let (select, control) = connected(permissions(), json!({}));
    control.take_changed();

    select.toggle_leaf("user/manage").unwrap();
    assert!(control.take_changed());
    assert_eq!(control.value(), json!({ "user": ["manage"] }));

    select.toggle_leaf("user/group").unwrap();
    assert!(control.take_changed());
    assert_eq!(control.value(), json!({ "user": ["manage", "group"] }));

    select.toggle("user").unwrap();
    assert!(control.take_changed());
    assert_eq!(control.value(), json!({}));
}

#[test]
fn toggling_category_selects_whole_subtree() {
    let (select, control) = connected(permissions(), json!({}));

    select.toggle("project").unwrap();

    assert!(select.is_checked("project/schedule"));
    assert!(select.is_checked("project/schedule/print"));
    assert_eq!(
        control.value(),
        json!({ "project": { "manage": [], "schedule": ["manage", "print"] } })
    );
}

#[test]
fn flat_checked_mirror_follows_toggles() {
    let (select, _) = connected(json!({ "A": { "x": null, "y": null } }), json!({}));

    let x = select.flat_node("A/x").unwrap();
    let a = select.flat_node("A").unwrap();
    assert!(!x.is_checked());
    assert!(!a.is_checked());
    assert!(!a.is_indeterminate());

    select.toggle_leaf("A/x").unwrap();
    assert!(x.is_checked());
    assert!(!x.is_indeterminate());
    assert!(!a.is_checked());
    assert!(a.is_indeterminate());

    select.toggle_leaf("A/y").unwrap();
    assert!(a.is_checked());
    assert!(!a.is_indeterminate());
}

#[test]
fn seeded_model_drives_flat_indeterminate_mirror() {
    let (select, _) = connected(permissions(), json!({ "user": ["manage"] }));

    let user = select.flat_node("user").unwrap();
    assert!(!user.is_checked());
    assert!(user.is_indeterminate());

    let company = select.flat_node("company").unwrap();
    assert!(!company.is_indeterminate());
}

#[test]
fn re_emission_preserves_flat_node_identity() {
    let stream = ValueStream::new();
    let control = FormControl::new();
    let select = TreeSelect::new();
    select.bind(control);
    select.connect(&stream).unwrap();

    stream.emit(&[permissions()]);
    let before = select.flat_nodes();

    stream.emit(&[permissions()]);
    let after = select.flat_nodes();

    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        assert!(
            FlatNode::ptr_eq(old, new),
            "identity lost for {}",
            new.path()
        );
    }
}

#[test]
fn rebuild_reseeds_selection_from_the_current_model() {
    let stream = ValueStream::new();
    let control = FormControl::new();
    let select = TreeSelect::new();
    select.bind(control.clone());
    select.connect(&stream).unwrap();

    stream.emit(&[permissions()]);
    select.toggle_leaf("user/manage").unwrap();
    assert!(select.is_checked("user/manage"));

    // The host replaces the bound value; the next emission reseeds from it.
    control.set_value(json!({ "company": ["list"] }));
    stream.emit(&[permissions()]);

    assert!(!select.is_checked("user/manage"));
    assert!(select.is_checked("company/list"));
    assert!(select.is_indeterminate("company"));
}

#[test]
fn empty_and_multi_element_snapshots_mean_no_tree() {
    let stream = ValueStream::new();
    let select = TreeSelect::new();
    select.bind(FormControl::new());
    select.connect(&stream).unwrap();

    stream.emit(&[permissions()]);
    assert!(!select.is_empty());

    stream.emit(&[]);
    assert!(select.is_empty());

    stream.emit(&[permissions(), permissions()]);
    assert!(select.is_empty());

    // Toggles on a missing tree are no-ops, not errors.
    assert_eq!(select.toggle("user"), Ok(()));
}

#[test]
fn disconnect_releases_the_stream_subscription() {
    let stream = ValueStream::new();
    let select = TreeSelect::new();
    select.bind(FormControl::new());
    select.connect(&stream).unwrap();
    assert_eq!(stream.subscriber_count(), 1);

    select.disconnect();
    assert_eq!(stream.subscriber_count(), 0);

    // Reconnect is allowed after an explicit disconnect.
    select.connect(&stream).unwrap();
    assert_eq!(stream.subscriber_count(), 1);
}

#[test]
fn dropping_the_widget_releases_the_stream_subscription() {
    let stream = ValueStream::new();
    {
        let select = TreeSelect::new();
        select.bind(FormControl::new());
        select.connect(&stream).unwrap();
        assert_eq!(stream.subscriber_count(), 1);
    }
    assert_eq!(stream.subscriber_count(), 0);

    // An emission after teardown reaches nobody.
    stream.emit(&[permissions()]);
}

#[test]
fn second_connect_is_rejected() {
    let select = TreeSelect::new();
    select.bind(FormControl::new());
    select.connect(&vec![permissions()]).unwrap();

    let stream = ValueStream::new();
    assert_eq!(select.connect(&stream), Err(FieldError::AlreadyConnected));
}

#[test]
fn toggle_without_bound_control_is_an_error() {
    let select = TreeSelect::new();
    select.connect(&vec![permissions()]).unwrap();

    assert_eq!(select.toggle_leaf("user/manage"), Err(FieldError::Unbound));
}

#[test]
fn dirty_flag_tracks_changes() {
    let (select, _) = connected(permissions(), json!({}));
    assert!(select.is_dirty());
    select.clear_dirty();

    select.toggle_leaf("user/manage").unwrap();
    assert!(select.is_dirty());
}

#[test]
#[should_panic(expected = "stale node path")]
fn toggling_a_stale_path_panics() {
    let (select, _) = connected(json!({ "A": null }), json!({}));
    let _ = select.toggle("A/gone");
}
