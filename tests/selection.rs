use serde_json::{Value, json};
use treeform::tree::{TreeNode, TreeSelection, build, serialize};

fn permissions() -> Value {
    json!({
        "user": ["manage", "group"],
        "company": ["manage", "list"],
        "project": {
            "manage": [],
            "schedule": ["manage", "print"]
        },
        "salary": {
            "change": ["increase", "decrease"],
            "access": ["read", "print"]
        }
    })
}

fn setup(options: &Value, model: &Value) -> (Vec<TreeNode>, TreeSelection) {
    let built = build(Some(options), Some(model));
    let selection = TreeSelection::seed(&built.roots, &built.seeded);
    (built.roots, selection)
}

/// Leaf paths under each node, collected independently of the engine.
fn leaves_under(node: &TreeNode) -> Vec<String> {
    let mut paths = Vec::new();
    node.walk(0, &mut |n, _| {
        if n.is_leaf() {
            paths.push(n.path().to_string());
        }
    });
    paths
}

#[test]
fn seeded_partial_category_is_indeterminate() {
    let options = json!({ "A": { "x": null, "y": null } });
    let model = json!({ "A": { "x": null } });
    let (_, selection) = setup(&options, &model);

    assert!(selection.contains("A/x"));
    assert!(!selection.contains("A/y"));
    assert!(selection.is_partially_selected("A"));
    assert!(!selection.is_fully_selected("A"));
}

#[test]
fn toggling_last_leaf_completes_category() {
    let options = json!({ "A": { "x": null, "y": null } });
    let model = json!({ "A": { "x": null } });
    let (_, mut selection) = setup(&options, &model);

    selection.toggle_leaf("A/y");

    assert!(selection.is_fully_selected("A"));
    assert!(!selection.is_partially_selected("A"));
    assert_eq!(
        serialize(&options, &selection),
        json!({ "A": { "x": null, "y": null } })
    );
}

#[test]
fn toggling_full_category_off_clears_leaves() {
    let options = json!({ "A": { "x": null, "y": null } });
    let model = json!({ "A": { "x": null, "y": null } });
    let (_, mut selection) = setup(&options, &model);
    assert!(selection.is_fully_selected("A"));

    selection.toggle_node("A");

    assert!(!selection.contains("A/x"));
    assert!(!selection.contains("A/y"));
    assert_eq!(serialize(&options, &selection), json!({}));
}

#[test]
fn leaf_list_serializes_in_original_order() {
    let options = json!({ "Reminders": ["Cook dinner", "Water plants"] });
    let model = json!({ "Reminders": ["Cook dinner"] });
    let (_, mut selection) = setup(&options, &model);

    assert_eq!(
        serialize(&options, &selection),
        json!({ "Reminders": ["Cook dinner"] })
    );

    // Selecting the second entry keeps the original relative order.
    selection.toggle_leaf("Reminders/Water plants");
    assert_eq!(
        serialize(&options, &selection),
        json!({ "Reminders": ["Cook dinner", "Water plants"] })
    );
}

#[test]
fn toggle_node_cascades_over_subtree() {
    let options = permissions();
    let (_, mut selection) = setup(&options, &json!({}));

    selection.toggle_node("salary");
    assert!(selection.is_fully_selected("salary"));
    assert!(selection.is_fully_selected("salary/change"));
    assert!(selection.contains("salary/access/read"));

    selection.toggle_node("salary");
    assert!(selection.is_empty());
}

#[test]
fn derived_state_matches_leaf_membership_after_any_sequence() {
    let options = permissions();
    let (roots, mut selection) = setup(&options, &json!({}));

    selection.toggle_leaf("user/manage");
    selection.toggle_node("salary");
    selection.toggle_leaf("salary/access/read");
    selection.toggle_node("project/schedule");
    selection.toggle_leaf("user/manage");

    for root in &roots {
        root.walk(0, &mut |node, _| {
            if node.is_leaf() {
                return;
            }
            let leaves = leaves_under(node);
            let selected = leaves.iter().filter(|l| selection.contains(l)).count();
            let all = !leaves.is_empty() && selected == leaves.len();
            let some = selected > 0;
            assert_eq!(
                selection.is_fully_selected(node.path()),
                all,
                "fully-selected mismatch at {}",
                node.path()
            );
            assert_eq!(
                selection.is_partially_selected(node.path()),
                some && !all,
                "partially-selected mismatch at {}",
                node.path()
            );
        });
    }
}

#[test]
fn ancestor_recomputation_is_idempotent() {
    let options = permissions();
    let (_, mut selection) = setup(&options, &json!({}));

    selection.toggle_leaf("salary/change/increase");
    let mut first: Vec<String> = selection.selected_paths().map(str::to_string).collect();
    first.sort();

    selection.check_ancestors("salary/change/increase");
    let mut second: Vec<String> = selection.selected_paths().map(str::to_string).collect();
    second.sort();

    assert_eq!(first, second);
}

#[test]
fn empty_category_never_becomes_fully_selected() {
    let options = json!({ "A": { "empty": {}, "x": null } });
    let (_, mut selection) = setup(&options, &json!({}));

    selection.toggle_node("A/empty");
    assert!(selection.contains("A/empty"));
    assert!(!selection.is_fully_selected("A/empty"));
    assert!(!selection.is_partially_selected("A/empty"));

    // The empty sibling contributes nothing to the parent's state.
    selection.toggle_leaf("A/x");
    assert!(selection.is_fully_selected("A"));
}

#[test]
fn empty_leaf_list_category_does_not_force_ancestors() {
    let options = json!({ "project": { "manage": [], "schedule": ["print"] } });
    let (_, mut selection) = setup(&options, &json!({}));

    assert!(!selection.is_fully_selected("project/manage"));
    selection.toggle_leaf("project/schedule/print");
    assert!(selection.is_fully_selected("project"));
}

#[test]
fn seeding_then_serializing_is_identity() {
    let options = permissions();
    let models = [
        json!({}),
        json!({ "user": ["manage"], "company": ["manage"] }),
        json!({ "salary": { "change": ["increase", "decrease"], "access": ["read", "print"] } }),
        json!({ "project": { "schedule": ["print"] } }),
        permissions(),
    ];
    for model in models {
        let (_, selection) = setup(&options, &model);
        assert_eq!(serialize(&options, &selection), model);
    }
}

#[test]
fn shorthand_leaf_takes_label_from_value() {
    let options = json!({ "A": { "x": "Label X", "y": null } });
    let built = build(Some(&options), Some(&json!({ "A": { "x": "Label X" } })));

    let category = &built.roots[0];
    assert_eq!(category.children()[0].label(), "Label X");
    assert_eq!(category.children()[0].path(), "A/x");
    assert!(built.seeded.contains("A/x"));
}

#[test]
fn malformed_value_degrades_to_labeled_leaf() {
    let options = json!({ "A": { "x": 42, "y": null } });
    let built = build(Some(&options), None);

    let category = &built.roots[0];
    assert_eq!(category.children().len(), 2);
    assert_eq!(category.children()[0].label(), "42");
    assert!(category.children()[0].is_leaf());
    assert_eq!(category.children()[1].label(), "y");
}

#[test]
fn missing_options_build_empty_forest() {
    assert!(build(None, None).roots.is_empty());
    assert!(build(Some(&json!(null)), None).roots.is_empty());
    assert!(build(Some(&json!([1, 2])), None).roots.is_empty());
}

#[test]
fn insertion_order_is_preserved() {
    let options = permissions();
    let built = build(Some(&options), None);
    let labels: Vec<&str> = built.roots.iter().map(TreeNode::label).collect();
    assert_eq!(labels, ["user", "company", "project", "salary"]);
}

#[test]
#[should_panic(expected = "stale node path")]
fn toggling_a_stale_path_panics() {
    let options = json!({ "A": { "x": null } });
    let (_, mut selection) = setup(&options, &json!({}));
    selection.toggle_node("B");
}

#[test]
#[should_panic(expected = "toggle_leaf on category")]
fn leaf_toggle_on_a_category_panics() {
    let options = json!({ "A": { "x": null } });
    let (_, mut selection) = setup(&options, &json!({}));
    selection.toggle_leaf("A");
}
