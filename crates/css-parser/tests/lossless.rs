//! Printing an unmodified tree must reproduce the input exactly, whatever
//! the input looks like.

use css_parser::{parse, ParseErrorKind, Processor, ProcessOptions};
use pretty_assertions::assert_eq;

const SHEETS: &[&str] = &[
    "",
    "   \n\t",
    ".a{}",
    ".a, .b,\n.c { color: red; background: url(\"x{}.png\") }",
    "@charset \"utf-8\";\n@import url(a.css) screen;\n",
    "@media (min-width: 10px) and (max-width: 20px) {\n  .a { b: c }\n}\n",
    "@-webkit-keyframes spin { from { transform: rotate(0) } to { transform: rotate(1turn) } }",
    "/* a */ .x /* b */ , .y { /* c */ }\n/* trailing",
    ".parent { color: red; .child { color: blue } &:hover { color: green } }",
    "a[title='}'] , a[href*=\";\"] { content: '\\'' }",
    "@supports not (display: grid) { @media print { :root { --x: { a: b } } } }",
    ".unterminated { color: red",
    "}} .stray {}",
    ".é, .日本 { font-family: \"Noto Sans\" }",
];

#[test]
fn test_unmodified_sheets_print_identically() {
    for source in SHEETS {
        let result = parse(source);
        assert_eq!(result.stylesheet.to_css(), *source, "sheet: {source:?}");
    }
}

#[test]
fn test_empty_processor_is_lossless() {
    let processor = Processor::new();
    for source in SHEETS {
        let result = processor
            .process(source, ProcessOptions::default())
            .unwrap();
        assert_eq!(result.css, *source);
    }
}

#[test]
fn test_rules_are_visited_in_document_order() {
    let result = parse(
        ".a {}\n@media print { .b { .c {} } }\n@font-face { src: x }\n.d {}",
    );
    let selectors: Vec<&str> = result
        .stylesheet
        .rules()
        .map(|(_, rule)| rule.selector())
        .collect();
    assert_eq!(selectors, vec![".a", ".b", ".c", ".d"]);
}

#[test]
fn test_ancestor_chain_of_nested_rule() {
    let sheet = parse("@supports (a: b) { .outer { @media print { .inner {} } } }").stylesheet;
    let (inner, _) = sheet
        .rules()
        .find(|(_, rule)| rule.selector() == ".inner")
        .unwrap();

    let chain: Vec<String> = sheet
        .ancestors(inner)
        .map(|(_, node)| match node.kind.as_at_rule() {
            Some(at_rule) => format!("@{}", at_rule.name),
            None => "rule".to_string(),
        })
        .collect();
    assert_eq!(chain, vec!["@media", "rule", "@supports"]);
}

#[test]
fn test_recovered_errors_are_reported() {
    let result = parse(".a { color: red");
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e.kind, ParseErrorKind::UnclosedBlock { .. })));
}

#[test]
fn test_rewrite_and_print() {
    let mut sheet = parse("@media print {\n  .a,\n  .b { color: red }\n}\n").stylesheet;
    let ids: Vec<_> = sheet.rules().map(|(id, _)| id).collect();
    for id in ids {
        let rule = sheet.rule_mut(id).unwrap();
        let rewritten: Vec<String> = rule
            .selectors()
            .iter()
            .map(|s| format!(".ns {s}"))
            .collect();
        rule.set_selectors(&rewritten);
    }

    insta::assert_snapshot!(sheet.to_css(), @r"
@media print {
  .ns .a,
  .ns .b { color: red }
}
");
}
