mod common;

use common::{code_block, markers, setup_test_logging, visual_runs, TestFont, MARKER};
use line_continuation::{
    insert_line_continuation_markers, Element, MarkerConfig, MarkerError, MismatchKind, Px,
    Selector, Tree, WidthOracle,
};

#[test]
fn short_lines_are_left_alone() {
    let oracle = TestFont::monospace(10.0);
    let mut tree = Tree::new();
    let code = code_block(&mut tree, "short");
    let before = tree.to_string();

    let width = oracle.measure("short", &());
    let config = MarkerConfig::new(width + Px(1.0), (), 8.0, MARKER);
    let report = insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");

    assert_eq!(report.markers, 0);
    assert!(markers(&tree, code).is_empty());
    assert_eq!(tree.to_string(), before);
}

#[test]
fn long_monospace_lines_break_where_the_marker_still_fits() {
    setup_test_logging();
    let oracle = TestFont::monospace(10.0);
    let max_width = Px(205.0);
    let marker_width = Px(8.0);
    let line = "x".repeat(50);

    // derive the expected breaks from measurements, not from 10px per character
    let mut expected = Vec::new();
    let mut start = 0;
    while oracle.measure(&line[start..], &()) > max_width {
        let fits = (start + 1..=line.len())
            .take_while(|&end| oracle.measure(&line[start..end], &()) + marker_width <= max_width)
            .last()
            .expect("a single x fits beside the marker");
        expected.push(fits);
        start = fits;
    }
    assert_eq!(expected.first(), Some(&19));

    let mut tree = Tree::new();
    let code = code_block(&mut tree, &line);
    let config = MarkerConfig::new(max_width, (), marker_width, MARKER);
    let report = insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");
    assert_eq!(report.markers, expected.len());

    let runs = visual_runs(&tree, code);
    let mut position = 0;
    for (breakpoint, (run, _)) in expected.iter().zip(runs.iter()) {
        position += run.len();
        assert_eq!(position, *breakpoint);
    }
    for (run, before_marker) in runs {
        let width = oracle.measure(&run, &());
        if before_marker {
            assert!(width + marker_width <= max_width, "{run:?} leaves no room");
        } else {
            assert!(width <= max_width, "{run:?} overflows");
        }
    }
    assert_eq!(tree.text_content(code), line);
}

#[test]
fn markers_land_inside_nested_inline_markup() {
    // <pre><code>fn <span class="a">long<b>Ident</b></span>ifier()</code></pre>
    let mut tree = Tree::new();
    let pre = tree.append_element(tree.root(), Element::new("pre"));
    let code = tree.append_element(pre, Element::new("code"));
    tree.append_text(code, "fn ");
    let a = tree.append_element(code, Element::new("span").with_class("a"));
    tree.append_text(a, "long");
    let b = tree.append_element(a, Element::new("b"));
    tree.append_text(b, "Ident");
    tree.append_text(code, "ifier()");

    let oracle = TestFont::monospace(10.0);
    let config = MarkerConfig::new(105.0, (), 8.0, MARKER);
    insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");

    let found = markers(&tree, code);
    assert_eq!(found.len(), 1);
    assert_eq!(tree.parent(found[0]), Some(b));
    let fragments: Vec<_> = tree
        .children(b)
        .iter()
        .filter_map(|&child| tree.text(child))
        .collect();
    assert_eq!(fragments, vec!["Id", "ent"]);
    assert_eq!(tree.text_content(code), "fn longIdentifier()");
    assert_eq!(
        tree.to_string(),
        r#"<pre><code>fn <span class="a">long<b>Id<span class="line-continuation"></span>ent</b></span>ifier()</code></pre>"#
    );
}

#[test]
fn breaks_between_text_nodes_stay_with_the_earlier_node() {
    let mut tree = Tree::new();
    let pre = tree.append_element(tree.root(), Element::new("pre"));
    let code = tree.append_element(pre, Element::new("code"));
    tree.append_text(code, "fn ");
    let a = tree.append_element(code, Element::new("span").with_class("a"));
    tree.append_text(a, "long");
    let b = tree.append_element(a, Element::new("b"));
    tree.append_text(b, "Ident");
    tree.append_text(code, "ifier()");

    let oracle = TestFont::monospace(10.0);
    let config = MarkerConfig::new(85.0, (), 8.0, MARKER);
    let report = insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");

    assert_eq!(report.markers, 2);
    assert_eq!(
        tree.to_string(),
        concat!(
            r#"<pre><code>fn <span class="a">long<span class="line-continuation"></span>"#,
            r#"<b>Ident</b></span>if<span class="line-continuation"></span>ier()</code></pre>"#
        )
    );
}

#[test]
fn oversized_markers_fail_before_any_edit() {
    let oracle = TestFont::monospace(10.0);
    let mut tree = Tree::new();
    code_block(&mut tree, &"y".repeat(100));
    code_block(&mut tree, "short");
    let before = tree.to_string();

    let config = MarkerConfig::new(50.0, (), 60.0, MARKER);
    let err = insert_line_continuation_markers(&mut tree, &config, &oracle)
        .expect_err("the marker can never fit");
    assert!(matches!(err, MarkerError::MarkerTooWide { .. }));
    assert_eq!(tree.to_string(), before);
}

#[test]
fn combining_sequences_are_never_split() {
    let accented = "e\u{0301}";
    let oracle = TestFont::monospace(10.0).with_width(accented, 14.0);
    let line = format!("aaaa{accented}aaaa");
    let mut tree = Tree::new();
    let code = code_block(&mut tree, &line);

    let config = MarkerConfig::new(55.0, (), 8.0, MARKER);
    let report = insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");
    assert!(report.markers > 0);

    let texts: Vec<&str> = tree
        .text_leaves(code)
        .into_iter()
        .filter_map(|leaf| tree.text(leaf))
        .collect();
    assert_eq!(texts.first(), Some(&"aaaa"));
    for text in texts.iter() {
        assert!(!text.starts_with('\u{0301}'), "{text:?} starts with a bare accent");
    }
    assert_eq!(tree.text_content(code), line);
}

#[test]
fn unplaceable_graphemes_are_reported_with_their_location() {
    setup_test_logging();
    let oracle = TestFont::monospace(10.0).with_width("\u{FDFD}", 80.0);
    let mut tree = Tree::new();
    code_block(&mut tree, "fine");
    let second = code_block(&mut tree, "ok\nab\u{FDFD}cd");

    let config = MarkerConfig::new(60.0, (), 8.0, MARKER);
    let err = insert_line_continuation_markers(&mut tree, &config, &oracle)
        .expect_err("the ligature is wider than the page");
    match err {
        MarkerError::Unplaceable {
            container,
            line,
            source,
        } => {
            assert_eq!(container, 1);
            assert_eq!(line, 1);
            assert_eq!(source.index, 2);
            assert_eq!(source.segment, "\u{FDFD}");
            assert_eq!(source.width, Px(80.0));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(tree.children(second).len(), 1);
}

#[test]
fn graphemes_split_across_markup_are_rejected() {
    setup_test_logging();
    let mut tree = Tree::new();
    let pre = tree.append_element(tree.root(), Element::new("pre"));
    let code = tree.append_element(pre, Element::new("code"));
    tree.append_text(code, "aaaaaae");
    let accent = tree.append_element(code, Element::new("span"));
    tree.append_text(accent, "\u{0301}aaaaaa");
    let before = tree.to_string();

    let oracle = TestFont::monospace(10.0);
    let config = MarkerConfig::new(50.0, (), 8.0, MARKER);
    let err = insert_line_continuation_markers(&mut tree, &config, &oracle)
        .expect_err("the accent is separated from its base");
    assert!(matches!(
        err,
        MarkerError::StructuralMismatch {
            container: 0,
            kind: MismatchKind::SplitGrapheme { offset: 7 }
        }
    ));
    assert_eq!(tree.to_string(), before);
}

#[test]
fn selectors_matching_nothing_are_a_no_op() {
    let oracle = TestFont::monospace(10.0);
    let mut tree = Tree::new();
    code_block(&mut tree, &"z".repeat(40));
    let before = tree.to_string();

    let config = MarkerConfig::new(50.0, (), 8.0, MARKER)
        .with_selector("table td".parse::<Selector>().expect("valid selector"));
    let report = insert_line_continuation_markers(&mut tree, &config, &oracle).expect("no-op");
    assert_eq!(report.containers, 0);
    assert_eq!(tree.to_string(), before);
}

#[test]
fn every_selected_container_is_processed_in_order() {
    let oracle = TestFont::monospace(10.0);
    let mut tree = Tree::new();
    let first = code_block(&mut tree, &"a".repeat(12));
    let paragraph = tree.append_element(tree.root(), Element::new("p"));
    let inline = tree.append_element(paragraph, Element::new("code"));
    tree.append_text(inline, "b".repeat(12));
    let listing = tree.append_element(tree.root(), Element::new("div").with_class("listing"));
    tree.append_text(listing, "c".repeat(12));

    let config = MarkerConfig::new(100.0, (), 8.0, MARKER).with_selector(
        "pre > code, .listing"
            .parse::<Selector>()
            .expect("valid selector"),
    );
    let report = insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");

    assert_eq!(report.containers, 2);
    assert_eq!(markers(&tree, first).len(), 1);
    assert!(markers(&tree, inline).is_empty());
    assert_eq!(markers(&tree, listing).len(), 1);
}

#[test]
fn repeated_runs_are_identical() {
    let oracle = TestFont::monospace(7.0).with_width("W", 11.0);
    let text = "fn main() {\n    println!(\"WWWW wide WWWW wide WWWW\");\n}\n";

    let render = || {
        let mut tree = Tree::new();
        code_block(&mut tree, text);
        let config = MarkerConfig::new(120.0, (), 9.0, MARKER).with_locale("en-US");
        insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");
        tree.to_string()
    };
    assert_eq!(render(), render());
}

#[test]
fn overlapping_selectors_mark_each_break_once() {
    let oracle = TestFont::monospace(10.0);
    let mut tree = Tree::new();
    let listing = tree.append_element(tree.root(), Element::new("div").with_class("listing"));
    let code = tree.append_element(listing, Element::new("code"));
    tree.append_text(code, "a".repeat(30));

    let config = MarkerConfig::new(105.0, (), 8.0, MARKER).with_selector(
        ".listing, .listing code"
            .parse::<Selector>()
            .expect("valid selector"),
    );
    let report = insert_line_continuation_markers(&mut tree, &config, &oracle).expect("fits");

    assert_eq!(report.containers, 1);
    assert_eq!(report.markers, 3);
    assert_eq!(markers(&tree, listing).len(), 3);
    for (run, _) in visual_runs(&tree, listing) {
        assert!(!run.is_empty(), "two markers sit side by side");
    }
    assert_eq!(tree.text_content(listing), "a".repeat(30));
}
