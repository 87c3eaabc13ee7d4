use kuy_dashboard_core::catalog;
use kuy_dashboard_core::{
    filter, render, Cell, ColumnKey, Entity, RenderContext, SearchField, SearchState,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-10_000i64..10_000).prop_map(|n| json!(n)),
        "[a-zA-Z ]{0,12}".prop_map(Value::String),
    ]
}

fn arb_entity() -> impl Strategy<Value = Entity> {
    prop::collection::btree_map("[a-z]{1,6}", arb_value(), 0..6)
        .prop_map(|fields| fields.into_iter().collect::<Entity>())
}

fn arb_collection() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::vec(arb_entity(), 0..12)
}

fn arb_field() -> impl Strategy<Value = SearchField> {
    prop_oneof![
        Just(SearchField::All),
        "[a-z]{1,6}".prop_map(|k| SearchField::Column(ColumnKey::new(k).unwrap())),
    ]
}

/// True if `sub` appears in `all` in the same relative order.
fn is_ordered_subset(sub: &[Entity], all: &[Entity]) -> bool {
    let mut rest = all.iter();
    sub.iter().all(|e| rest.any(|a| a == e))
}

proptest! {
    #[test]
    fn empty_search_is_identity(collection in arb_collection(), field in arb_field()) {
        let search = SearchState::new("").in_field(field);
        let out = filter(&collection, &search);
        prop_assert_eq!(out.as_ref(), collection.as_slice());
    }

    #[test]
    fn result_is_ordered_subset(
        collection in arb_collection(),
        text in "[a-zA-Z ]{1,4}",
        field in arb_field(),
    ) {
        let out = filter(&collection, &SearchState::new(text).in_field(field));
        prop_assert!(out.len() <= collection.len());
        prop_assert!(is_ordered_subset(&out, &collection));
    }

    #[test]
    fn filtering_is_idempotent(
        collection in arb_collection(),
        text in "[a-z]{1,3}",
        field in arb_field(),
    ) {
        let search = SearchState::new(text).in_field(field);
        let once = filter(&collection, &search).into_owned();
        let twice = filter(&once, &search).into_owned();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn matching_ignores_case(collection in arb_collection(), text in "[a-z]{1,3}") {
        let lower = filter(&collection, &SearchState::new(text.clone())).into_owned();
        let upper = filter(&collection, &SearchState::new(text.to_uppercase())).into_owned();
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn rendering_is_total(entity in arb_entity()) {
        for schema in catalog::all().unwrap() {
            let ctx = RenderContext::for_schema(&schema, "http://localhost:5000");
            for column in schema.columns() {
                let cell = render(column, &entity, &ctx);
                if entity.get(column.key.as_str()).is_none() {
                    prop_assert!(!matches!(cell, Cell::Image { .. }), "missing field rendered as an image");
                }
            }
        }
    }
}
