//! Editing derivation trees through a session, in abstract and concrete display

use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;
use treevis::linearize::{resolve_sequence, Symbol};
use treevis::{
    Diagnostic, DisplayMode, Explorer, Grammar, GrammarError, NodeId, SelectError, Session,
};

const FOODS: &str = include_str!("fixtures/foods.json");

fn foods() -> Session {
    Session::new(Grammar::from_json_str(FOODS).unwrap())
}

/// First node in pre-order with this grammar name
fn find(session: &Session, name: &str) -> NodeId {
    let tree = session.tree();
    tree.iter()
        .find(|&id| tree.node(id).unwrap().name == name)
        .unwrap()
}

fn label(session: &Session, id: NodeId) -> &str {
    &session.tree().node(id).unwrap().display_name
}

#[rstest]
#[case::abstract_item(None, "Item", &["This", "That"])]
#[case::abstract_kind(None, "Kind", &["Mod", "Wine", "Pizza"])]
#[case::english_quality(Some("en-US"), "Quality", &["Very", "Warm", "Italian"])]
#[case::italian_quality(Some("it-IT"), "Quality", &["Very", "Warm"])]
#[case::italian_by_id(Some("FoodsIta"), "Item", &["This", "That"])]
fn test_list_alternatives(
    #[case] language: Option<&str>,
    #[case] category: &str,
    #[case] expected: &[&str],
) {
    let mut session = foods();
    session.set_language(language).unwrap();
    let id = find(&session, category);
    assert_eq!(session.list_alternatives(id), expected);
}

#[test]
fn test_function_nodes_have_no_alternatives() {
    let session = foods();
    let alternatives = session.list_alternatives(find(&session, "Pred"));
    assert!(alternatives.is_empty());
}

#[rstest]
#[case::english_pred("en-US", "Comment", "Pred", "Item is Quality")]
#[case::english_that("en-US", "Item", "That", "that Kind")]
#[case::english_wine("en-US", "Kind", "Wine", "wine | wines")]
#[case::italian_pred("it-IT", "Comment", "Pred", "Item è Quality")]
#[case::italian_mod("it-IT", "Kind", "Mod", "Kind Quality")]
#[case::italian_very("it-IT", "Quality", "Very", "molto Quality")]
fn test_concrete_select_labels(
    #[case] language: &str,
    #[case] category: &str,
    #[case] function: &str,
    #[case] expected: &str,
) {
    let mut session = foods();
    session.set_language(Some(language)).unwrap();
    let id = find(&session, category);
    session.select(id, function).unwrap();
    assert_eq!(label(&session, id), expected);
}

#[test]
fn test_custom_separator_for_several_linearizations() {
    let mut session = foods();
    session.set_linearization_separator(" / ");
    session.set_language(Some("en-US")).unwrap();
    let kind = find(&session, "Kind");
    session.select(kind, "Pizza").unwrap();
    assert_eq!(label(&session, kind), "pizza / pizzas");
}

#[test]
fn test_missing_concrete_function_leaves_tree_untouched() {
    let mut session = foods();
    session.set_language(Some("it-IT")).unwrap();
    let quality = find(&session, "Quality");

    let err = session.select(quality, "Italian").unwrap_err();
    assert_eq!(
        err,
        SelectError::NoSuchFunction {
            function: "Italian".to_string(),
            language: "it-IT".to_string(),
        }
    );
    assert_eq!(label(&session, quality), "Quality");
    assert!(session.edited_nodes().is_empty());
}

#[test]
fn test_concrete_select_records_bad_slot() {
    let grammar = Grammar::from_value(json!({
        "abstract": {
            "startcat": "S",
            "funs": { "Go": { "args": ["NP"], "cat": "S" } }
        },
        "concretes": {
            "GoEng": {
                "flags": { "language": "en-US" },
                "productions": { "S": [ { "type": "Apply", "fid": 0, "args": [] } ] },
                "functions": [ { "name": "Go", "lins": [0] } ],
                "sequences": [ [
                    { "type": "SymKS", "args": ["go"] },
                    { "type": "SymCat", "args": [5, 0] }
                ] ]
            }
        }
    }))
    .unwrap();
    let mut session = Session::new(grammar);
    session.set_language(Some("en-US")).unwrap();
    let root = session.tree().root();

    session.select(root, "Go").unwrap();
    assert_eq!(label(&session, root), "go {5}");
    let bad_slot = Diagnostic::OutOfRangeSlot { slot: 5, arity: 1 };
    assert!(session.diagnostics().contains(&bad_slot));

    // Selecting again does not repeat the entry
    session.select(root, "Go").unwrap();
    let count = session
        .diagnostics()
        .iter()
        .filter(|&d| d == &bad_slot)
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_unknown_language_is_rejected() {
    let mut session = foods();
    let err = session.set_language(Some("fr-FR")).unwrap_err();
    assert_eq!(err, SelectError::NoConcreteGrammar("fr-FR".to_string()));
    assert_eq!(session.mode(), &DisplayMode::Abstract);
}

#[test]
fn test_reset_restores_label_before_first_edit() {
    let mut session = foods();
    let item = find(&session, "Item");

    session.select(item, "This").unwrap();
    session.select(item, "That").unwrap();
    assert_eq!(label(&session, item), "That");

    assert!(session.reset(item));
    assert_eq!(label(&session, item), "Item");

    // The original survives a reset, so the cycle can repeat
    session.select(item, "This").unwrap();
    assert!(session.reset(item));
    assert_eq!(label(&session, item), "Item");
}

#[test]
fn test_reset_of_unedited_node_is_noop() {
    let mut session = foods();
    let root = session.tree().root();
    assert!(!session.reset(root));
    assert_eq!(label(&session, root), "Comment");
}

#[test]
fn test_reset_all() {
    let mut session = foods();
    let item = find(&session, "Item");
    let kind = find(&session, "Kind");
    session.select(item, "That").unwrap();
    session.select(kind, "Wine").unwrap();

    assert_eq!(session.edited_nodes(), vec![item, kind]);
    assert_eq!(session.reset_all(), 2);
    assert_eq!(label(&session, item), "Item");
    assert_eq!(label(&session, kind), "Kind");
}

#[test]
fn test_select_changes_only_the_label() {
    let mut session = foods();
    let before = session.snapshot();
    let item = find(&session, "Item");
    session.select(item, "That").unwrap();
    let after = session.snapshot();

    assert_eq!(before.count(), after.count());
    let node = session.tree().node(item).unwrap();
    assert_eq!(node.name, "Item");
    assert_eq!(node.children.len(), 2);
}

#[test]
fn test_switching_mode_keeps_existing_labels() {
    let mut session = foods();
    let item = find(&session, "Item");
    session.select(item, "That").unwrap();

    session.set_language(Some("en-US")).unwrap();
    assert_eq!(label(&session, item), "That");
    // Alternatives still come from the category, not the edited label
    assert_eq!(session.list_alternatives(item), vec!["This", "That"]);
}

#[test]
fn test_explorer_keeps_previous_session_on_failed_load() {
    let mut explorer = Explorer::new();
    assert!(explorer.session().is_none());

    let len = explorer.load_str(FOODS).unwrap().tree().len();

    let missing_abstract = explorer.load_value(json!({ "concretes": {} }));
    assert!(matches!(
        missing_abstract,
        Err(GrammarError::MalformedGrammar { .. })
    ));

    let not_json = explorer.load_str("{ not json");
    assert!(not_json.unwrap_err().is_malformed());

    let session = explorer.session().unwrap();
    assert_eq!(session.tree().len(), len);
    assert_eq!(session.grammar().start_category(), "Comment");
}

#[test]
fn test_explorer_missing_file_is_io_error() {
    let mut explorer = Explorer::new();
    let err = explorer
        .load_file("tests/fixtures/does-not-exist.json")
        .unwrap_err();
    assert!(matches!(err, GrammarError::Io { .. }));
    assert!(!err.is_malformed());
    assert!(explorer.session().is_none());
}

#[test]
fn test_explorer_loads_fixture_from_disk() {
    let mut explorer = Explorer::new();
    let session = explorer.load_file("tests/fixtures/foods.json").unwrap();
    assert_eq!(session.grammar().concrete_ids(), vec!["FoodsEng", "FoodsIta"]);
    assert_eq!(
        session.grammar().concrete_language_tags(),
        vec!["en-US", "it-IT"]
    );
}

#[rstest]
#[case::in_range(vec![Symbol::Literal("a".into()), Symbol::CategoryRef(0), Symbol::Literal("b".into())], "a Foo b")]
#[case::out_of_range(vec![Symbol::CategoryRef(5)], "{5}")]
#[case::empty(vec![], "")]
fn test_resolve_sequence(#[case] sequence: Vec<Symbol>, #[case] expected: &str) {
    assert_eq!(resolve_sequence(&sequence, &["Foo".to_string()]), expected);
}

proptest! {
    #[test]
    fn prop_reset_all_restores_every_label(
        ops in prop::collection::vec((0..21usize, 0..3usize, any::<bool>()), 0..30)
    ) {
        let mut session = foods();
        let ids: Vec<NodeId> = session.tree().iter().collect();
        let initial: Vec<String> = ids.iter().map(|&id| label(&session, id).to_string()).collect();

        for (node, choice, concrete) in ops {
            let id = ids[node % ids.len()];
            session.set_language(if concrete { Some("en-US") } else { None }).unwrap();
            let alternatives = session.list_alternatives(id);
            if let Some(chosen) = alternatives.get(choice) {
                session.select(id, chosen).unwrap();
            }
        }

        session.reset_all();
        for (&id, original) in ids.iter().zip(&initial) {
            prop_assert_eq!(label(&session, id), original.as_str());
        }
    }
}
