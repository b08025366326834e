//! Integration tests for the view model
//!
//! Covers construction, navigation, content classification, dynamic
//! access and the copy/normalize operations.

use xml_view::{Error, NodeKind, Selection, TreeStore, XHTML_NAMESPACE};

const PEOPLE: &str = r#"<people><person id="1"><name>sam</name></person><person id="2"><name>elizabeth</name></person></people>"#;

const MIXED: &str = r#"<mixed>alpha<child/>beta<!--note--><?target data?></mixed>"#;

// ============== Construction ==============

#[test]
fn single_view_wraps_exactly_one_node() {
    let store = TreeStore::new();
    let view = store.parse_view("<a/>", None).unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.node_kind(), NodeKind::Element);
}

#[test]
fn empty_view_is_an_empty_text_node() {
    let store = TreeStore::new();
    let view = store.empty_view();
    assert_eq!(view.len(), 1);
    assert_eq!(view.node_kind(), NodeKind::Text);
    assert_eq!(view.string_value().unwrap(), "");
    assert!(view.has_simple_content());
}

#[test]
fn parse_view_rejects_multiple_roots() {
    let store = TreeStore::new();
    let result = store.parse_view("<a/><b/>", None);
    assert!(matches!(result, Err(Error::Conversion(_))));
}

#[test]
fn parse_view_rejects_malformed_markup() {
    let store = TreeStore::new();
    let result = store.parse_view("<a><unclosed>", None);
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn parse_list_accepts_multiple_roots_in_order() {
    let store = TreeStore::new();
    let list = store.parse_list("<a/><b/>", None).unwrap();
    assert_eq!(list.len(), 2);
    let names: Vec<_> = list.iter().map(|m| m.local_name().unwrap()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn parse_list_of_nothing_is_empty() {
    let store = TreeStore::new();
    let list = store.parse_list("", None).unwrap();
    assert_eq!(list.len(), 0);
    assert!(list.is_empty());
    assert!(list.node().is_none(), "empty list has no sole node");
}

#[test]
fn list_node_is_defined_only_for_length_one() {
    let store = TreeStore::new();
    let a = store.parse_view("<a/>", None).unwrap();
    let b = store.parse_view("<b/>", None).unwrap();

    assert_eq!(store.list_of(vec![]).node(), None);
    assert_eq!(store.list_of(vec![a.node()]).node(), Some(a.node()));
    assert_eq!(store.list_of(vec![a.node(), b.node()]).node(), None);
}

#[test]
fn fragment_default_namespace_applies() {
    let store = TreeStore::new();
    let div = store.parse_view("<div/>", Some(XHTML_NAMESPACE)).unwrap();
    let name = div.name().unwrap();
    assert_eq!(name.local_name, "div");
    assert_eq!(name.namespace, XHTML_NAMESPACE);
}

#[test]
fn fragment_roots_are_independent() {
    let store = TreeStore::new();
    let view = store.parse_view("<a/>", None).unwrap();
    assert!(view.parent().is_none(), "fragment root has no parent");
}

#[test]
fn document_view_wraps_the_document_node() {
    let store = TreeStore::new();
    let doc = store
        .parse_document("<?xml version=\"1.0\"?><root><x/></root>")
        .unwrap();
    assert_eq!(doc.node_kind(), NodeKind::Document);
    assert_eq!(doc.children().len(), 1);
    assert_eq!(doc.get("root").len(), 1);
}

// ============== Navigation ==============

#[test]
fn named_child_lookup_finds_elements() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    let persons = people.child("person");
    assert_eq!(persons.len(), 2);
    assert_eq!(people.child("missing").len(), 0);
}

#[test]
fn children_includes_every_kind_elements_only_the_subset() {
    let store = TreeStore::new();
    let mixed = store.parse_view(MIXED, None).unwrap();
    assert_eq!(mixed.children().len(), 5, "text, element, text, comment, pi");
    assert_eq!(mixed.elements("*").len(), 1);
    assert_eq!(mixed.text().len(), 2);
    assert_eq!(mixed.comments().len(), 1);
    assert_eq!(mixed.processing_instructions("*").len(), 1);
    assert_eq!(mixed.processing_instructions("target").len(), 1);
    assert_eq!(mixed.processing_instructions("other").len(), 0);
}

#[test]
fn positional_child_lookup() {
    let store = TreeStore::new();
    let mixed = store.parse_view(MIXED, None).unwrap();
    let second = mixed.child_at(1);
    assert_eq!(second.len(), 1);
    assert_eq!(second.to_view().unwrap().local_name().unwrap(), "child");
    assert_eq!(mixed.child_at(5).len(), 0, "out of range is empty");
}

#[test]
fn attribute_lookup_by_local_name_and_wildcard() {
    let store = TreeStore::new();
    let view = store.parse_view(r#"<a id="1" class="x"/>"#, None).unwrap();
    assert_eq!(view.attributes().len(), 2);
    assert_eq!(view.attribute("id").len(), 1);
    assert_eq!(view.attribute("id").string_value().unwrap(), "1");
    assert_eq!(view.attribute("*").len(), 2);
    assert_eq!(view.attribute("missing").len(), 0);
}

#[test]
fn descendant_lookup_spans_depths() {
    let store = TreeStore::new();
    let view = store.parse_view("<a><b><c>x</c></b><c/></a>", None).unwrap();
    assert_eq!(view.descendants("c").len(), 2);
    assert_eq!(view.descendants("*").len(), 3);
    assert_eq!(view.descendants("missing").len(), 0);
}

#[test]
fn parent_of_child_and_of_lists() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    let persons = people.child("person");

    let person = persons.index(0).view().unwrap();
    assert!(person.parent().unwrap().is_same(&people));

    // Members agreeing on a parent resolve it; disagreeing members do not.
    assert!(persons.parent().unwrap().is_same(&people));
    let names = persons.child("name");
    assert_eq!(names.len(), 2);
    assert!(names.parent().is_none(), "names have different parents");
    assert!(store.list_of(vec![]).parent().is_none());
}

#[test]
fn list_lookups_aggregate_in_order() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    let names = people.child("person").child("name");
    assert_eq!(names.len(), 2);
    let values: Vec<_> = names
        .iter()
        .map(|n| n.string_value().unwrap())
        .collect();
    assert_eq!(values, ["sam", "elizabeth"]);

    let ids = people.child("person").attribute("id");
    assert_eq!(ids.len(), 2);
    assert_eq!(ids.string_value().unwrap(), "12");
}

#[test]
fn iteration_is_ordered_and_restartable() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    let persons = people.child("person");

    for _ in 0..2 {
        let ids: Vec<_> = persons
            .iter()
            .map(|p| p.attribute("id").string_value().unwrap())
            .collect();
        assert_eq!(ids, ["1", "2"]);
    }

    assert_eq!(people.iter().count(), 1);
    assert_eq!(people.iter().count(), 1, "view iteration restarts");
}

// ============== Filtering ==============

#[test]
fn filter_preserves_relative_order() {
    let store = TreeStore::new();
    let list = store.parse_list("<a/><b/><c/>", None).unwrap();
    let kept = list.filter(|_, index| index != 1);
    assert_eq!(kept.len(), 2);
    let names: Vec<_> = kept.iter().map(|m| m.local_name().unwrap()).collect();
    assert_eq!(names, ["a", "c"]);
    assert!(kept.len() <= list.len());
}

#[test]
fn filter_by_member_content() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    let second = people
        .child("person")
        .filter(|p, _| p.attribute("id").string_value().unwrap() == "2");
    assert_eq!(second.len(), 1);
    assert_eq!(second.child("name").string_value().unwrap(), "elizabeth");
}

#[test]
fn view_filter_is_singleton_or_empty() {
    let store = TreeStore::new();
    let view = store.parse_view("<a/>", None).unwrap();
    assert_eq!(view.filter(|_, _| true).len(), 1);
    assert_eq!(view.filter(|_, _| false).len(), 0);
}

// ============== Content classification ==============

#[test]
fn simple_and_complex_content_are_complements() {
    let store = TreeStore::new();

    let text_only = store.parse_view("<a>text</a>", None).unwrap();
    assert!(text_only.has_simple_content());
    assert!(!text_only.has_complex_content());

    let nested = store.parse_view("<a><b/></a>", None).unwrap();
    assert!(nested.has_complex_content());
    assert!(!nested.has_simple_content());

    // Comments and processing instructions do not make content complex.
    let noisy = store
        .parse_view("<a>x<!--c--><?pi d?></a>", None)
        .unwrap();
    assert!(noisy.has_simple_content());
}

#[test]
fn list_content_rules_cover_empty_and_singleton() {
    let store = TreeStore::new();

    let empty = store.list_of(vec![]);
    assert!(empty.has_simple_content());
    assert!(!empty.has_complex_content());

    let complex_member = store.parse_view("<a><b/></a>", None).unwrap().to_list();
    assert!(complex_member.has_complex_content(), "singleton delegates");

    // Several members: simple only when none is an element.
    let no_elements = store.parse_view("<m>x<!--c--></m>", None).unwrap().children();
    assert_eq!(no_elements.len(), 2);
    assert!(no_elements.has_simple_content());

    let with_element = store.parse_view("<m>x<b/></m>", None).unwrap().children();
    assert_eq!(with_element.len(), 2);
    assert!(with_element.has_complex_content());
}

// ============== String conversion ==============

#[test]
fn string_value_skips_comments_and_processing_instructions() {
    let store = TreeStore::new();
    let view = store
        .parse_view("<p>Hello <!--skip--><?pi skip?>World</p>", None)
        .unwrap();
    assert_eq!(view.string_value().unwrap(), "Hello World");
}

#[test]
fn attribute_views_convert_to_their_value() {
    let store = TreeStore::new();
    let view = store.parse_view(r#"<a id="42"/>"#, None).unwrap();
    let id = view.attribute("id").to_view().unwrap();
    assert_eq!(id.node_kind(), NodeKind::Attribute);
    assert_eq!(id.string_value().unwrap(), "42");
    assert_eq!(id.to_xml().unwrap(), "42");
}

#[test]
fn complex_content_serializes_as_markup() {
    let store = TreeStore::new();
    let view = store.parse_view("<a><b>text</b><c/></a>", None).unwrap();
    insta::assert_snapshot!(view.to_xml().unwrap(), @"<a><b>text</b><c/></a>");
    assert_eq!(
        view.string_value().unwrap(),
        view.to_xml().unwrap(),
        "complex content falls back to markup"
    );
}

#[test]
fn attribute_markup_is_escaped() {
    let store = TreeStore::new();
    let view = store.parse_view(r#"<a title="5 &lt; 6"/>"#, None).unwrap();
    let title = view.attribute("title").to_view().unwrap();
    insta::assert_snapshot!(title.to_xml().unwrap(), @"5 &lt; 6");
}

#[test]
fn list_string_value_concatenates_members() {
    let store = TreeStore::new();
    let list = store.parse_list("one<!--two-->three", None).unwrap();
    assert_eq!(list.len(), 3);
    assert!(list.has_simple_content());
    assert_eq!(list.string_value().unwrap(), "onethree");

    assert_eq!(store.list_of(vec![]).string_value().unwrap(), "");
}

#[test]
fn escaping_helpers() {
    assert_eq!(
        xml_view::escape_text("a&b<c>d"),
        "a&amp;b&lt;c&gt;d"
    );
    assert_eq!(
        xml_view::escape_attribute_value("\"\t\n\r"),
        "&quot;&#x9;&#xA;&#xD;"
    );
}

// ============== Dynamic access ==============

#[test]
fn get_routes_names_attributes_and_positions() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();

    let persons = people.get("person");
    assert_eq!(persons.len(), 2);
    assert!(matches!(&persons, Selection::Many(_)));

    let first = persons.index(0);
    assert!(matches!(&first, Selection::One(_)));
    assert_eq!(first.get("name").string_value().unwrap(), "sam");
    assert_eq!(
        persons.index(1).get("name").string_value().unwrap(),
        "elizabeth"
    );
    assert!(persons.index(2).is_absent(), "past the end is absent");

    assert_eq!(first.get("@id").string_value().unwrap(), "1");
    assert_eq!(persons.get("@id").len(), 2, "attribute lookup aggregates");
}

#[test]
fn get_with_numeric_key_routes_positionally() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    let persons = people.child("person");

    let second = persons.get("1");
    assert_eq!(second.get("name").string_value().unwrap(), "elizabeth");

    // Position 0 of a single view is the view itself.
    let same = people.get("0").view().unwrap();
    assert!(same.is_same(&people));
    assert!(people.get("1").is_absent());
}

#[test]
fn missing_names_select_an_empty_collection_not_absent() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    let missing = people.get("missing");
    assert!(matches!(&missing, Selection::Many(_)));
    assert!(missing.is_empty());
    assert!(!missing.is_absent());
    assert_eq!(missing.string_value().unwrap(), "");
    assert!(missing.get("deeper").is_empty(), "lookups keep chaining");
}

#[test]
fn has_mirrors_get() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    assert!(people.has("person"));
    assert!(!people.has("missing"));
    assert!(people.has("0"));
    assert!(!people.has("1"));

    let person = people.get("person").index(0).view().unwrap();
    assert!(person.has("@id"));
    assert!(!person.has("@missing"));

    let persons = people.child("person");
    assert!(persons.has("1"));
    assert!(!persons.has("2"));
}

#[test]
fn keys_enumerate_positions() {
    let store = TreeStore::new();
    let people = store.parse_view(PEOPLE, None).unwrap();
    assert_eq!(people.keys(), [0]);
    assert_eq!(people.child("person").keys(), [0, 1]);
    assert_eq!(store.list_of(vec![]).keys(), Vec::<usize>::new());
}

#[test]
fn wildcard_keys_match_everything() {
    let store = TreeStore::new();
    let mixed = store.parse_view(MIXED, None).unwrap();
    assert_eq!(mixed.get("*").len(), 5);

    let view = store.parse_view(r#"<a id="1" class="x"/>"#, None).unwrap();
    assert_eq!(view.get("@*").len(), 2);
}

// ============== Conversions between view kinds ==============

#[test]
fn length_one_lists_convert_to_views_and_back() {
    let store = TreeStore::new();
    let view = store.parse_view("<a/>", None).unwrap();
    let list = view.to_list();
    assert_eq!(list.len(), 1);
    assert!(list.to_view().unwrap().is_same(&view));

    let two = store.parse_list("<a/><b/>", None).unwrap();
    assert!(matches!(two.to_view(), Err(Error::Conversion(_))));
    assert!(matches!(
        store.list_of(vec![]).to_view(),
        Err(Error::Conversion(_))
    ));
}

// ============== Copy and normalize ==============

#[test]
fn copy_is_structurally_equal_never_identical() {
    let store = TreeStore::new();
    let original = store.parse_view(PEOPLE, None).unwrap();
    let first = original.copy();
    let second = original.copy();

    for copy in [&first, &second] {
        assert!(copy.is_equal(&original));
        assert!(!copy.is_same(&original));
        assert!(copy.parent().is_none(), "copies are independent roots");
    }
    assert!(first.is_equal(&second));
    assert!(!first.is_same(&second));
}

#[test]
fn list_copy_preserves_order() {
    let store = TreeStore::new();
    let list = store.parse_list("<a/><b/>", None).unwrap();
    let copied = list.copy();
    assert_eq!(copied.len(), 2);
    assert!(copied.is_equal(&list));
    assert!(!copied.is_same(&list));
    let names: Vec<_> = copied.iter().map(|m| m.local_name().unwrap()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn normalize_merges_adjacent_text() {
    let store = TreeStore::new();
    let view = store.parse_view("<a>first</a>", None).unwrap();
    {
        let mut xot = store.xot_mut();
        let extra = xot.new_text("more");
        xot.append(view.node(), extra).unwrap();
    }
    view.normalize().unwrap();
    assert_eq!(view.children().len(), 1);
    assert_eq!(view.string_value().unwrap(), "firstmore");
}

#[test]
fn normalize_drops_empty_text() {
    let store = TreeStore::new();
    let view = store.parse_view("<a><b/></a>", None).unwrap();
    {
        let mut xot = store.xot_mut();
        let empty = xot.new_text("");
        xot.append(view.node(), empty).unwrap();
    }
    view.normalize().unwrap();
    assert_eq!(view.children().len(), 1);
}

// ============== Metadata ==============

#[test]
fn names_expose_local_name_and_namespace() {
    let store = TreeStore::new();
    let plain = store.parse_view("<person/>", None).unwrap();
    let name = plain.name().unwrap();
    assert_eq!(name.local_name, "person");
    assert_eq!(name.namespace, "");
    assert_eq!(name.to_string(), "person");

    let qualified = store
        .parse_view(r#"<p:a xmlns:p="urn:p"/>"#, None)
        .unwrap();
    let name = qualified.name().unwrap();
    assert_eq!(name.local_name, "a");
    assert_eq!(name.namespace, "urn:p");
    assert_eq!(name.to_string(), "{urn:p}a");
    assert_eq!(qualified.local_name().unwrap(), "a");

    let text = store.empty_view();
    assert!(text.name().is_none());
}
