use camino::Utf8Path;
use css_parser::{ProcessError, ProcessOptions, Processor};
use pretty_assertions::assert_eq;
use selector_namespace::{selector_namespace, Namespace, NamespaceOptions, SelectorPattern};

fn transform(input: &str, options: NamespaceOptions) -> String {
    transform_file(input, options, None)
}

fn transform_file(input: &str, options: NamespaceOptions, from: Option<&str>) -> String {
    let plugin = selector_namespace(options).unwrap();
    Processor::new()
        .with(plugin)
        .process(
            input,
            ProcessOptions {
                from: from.map(Into::into),
            },
        )
        .unwrap()
        .css
}

fn expect_unchanged(input: &str, options: NamespaceOptions) {
    assert_eq!(transform(input, options), input);
}

#[test]
fn test_default_self_selector() {
    assert_eq!(
        transform(":--namespace {}", NamespaceOptions::with_namespace(".my-component")),
        ".my-component {}"
    );
}

#[test]
fn test_default_namespace() {
    assert_eq!(transform(".foo {}", NamespaceOptions::default()), ".self .foo {}");
}

#[test]
fn test_root_is_dropped() {
    assert_eq!(
        transform(":root .foo {}", NamespaceOptions::with_namespace(".my-component")),
        ".foo {}"
    );
}

#[test]
fn test_lone_root_is_kept() {
    expect_unchanged(":root {}", NamespaceOptions::default());
}

#[test]
fn test_keyframes_unchanged() {
    expect_unchanged(
        "@keyframes fadeout { from { opacity: 1 } to { opacity: 0 }}",
        NamespaceOptions::with_namespace(".my-component"),
    );
    expect_unchanged(
        "@-webkit-keyframes fadeout { 0% { opacity: 1 } 100% { opacity: 0 }}",
        NamespaceOptions::with_namespace(".my-component"),
    );
}

#[test]
fn test_supports_is_namespaced() {
    assert_eq!(
        transform(
            "@supports (display: flex) { .bar { display: flex; } }",
            NamespaceOptions::with_namespace(".my-component"),
        ),
        "@supports (display: flex) { .my-component .bar { display: flex; } }"
    );
}

#[test]
fn test_media_and_for_are_namespaced() {
    assert_eq!(
        transform(
            "@media print { .a {} } @for $i from 1 to 2 { .b-$(i) {} }",
            NamespaceOptions::with_namespace(".c"),
        ),
        "@media print { .c .a {} } @for $i from 1 to 2 { .c .b-$(i) {} }"
    );
}

#[test]
fn test_nested_rules_unchanged() {
    assert_eq!(
        transform(
            ".a { color: red; .b { color: blue } }",
            NamespaceOptions::with_namespace(".c"),
        ),
        ".c .a { color: red; .b { color: blue } }"
    );
}

#[test]
fn test_multiple_self_selectors() {
    let options = NamespaceOptions {
        self_selector: SelectorPattern::regex("&|:--component"),
        ..NamespaceOptions::with_namespace(".my-component")
    };
    let input = "\
& {}
:--component {}
& + & {}
:--component.is-active > .child {}
.other {}
";
    insta::assert_snapshot!(transform(input, options), @r"
.my-component {}
.my-component {}
.my-component + .my-component {}
.my-component.is-active > .child {}
.my-component .other {}
");
}

#[test]
fn test_basic_stylesheet() {
    let options = NamespaceOptions {
        self_selector: SelectorPattern::regex(":--component"),
        ..NamespaceOptions::with_namespace(".namespaced")
    };
    let input = "\
:--component {
  color: red;
}

:--component .title, .subtitle {
  font-weight: bold;
}

:root {
  --brand: blue;
}

:root .body {
  color: var(--brand);
}

@media (min-width: 600px) {
  .wide {
    display: grid;
  }
}

@keyframes pulse {
  from { opacity: 1; }
  to { opacity: 0.5; }
}
";
    insta::assert_snapshot!(transform(input, options), @r"
.namespaced {
  color: red;
}

.namespaced .title, .namespaced .subtitle {
  font-weight: bold;
}

:root {
  --brand: blue;
}

.body {
  color: var(--brand);
}

@media (min-width: 600px) {
  .namespaced .wide {
    display: grid;
  }
}

@keyframes pulse {
  from { opacity: 1; }
  to { opacity: 0.5; }
}
");
}

#[test]
fn test_namespace_alternatives() {
    assert_eq!(
        transform(
            ".a, :--namespace:hover {}",
            NamespaceOptions::with_namespace(".x,.y"),
        ),
        ".x .a,.y .a, .x:hover,.y:hover {}"
    );
}

#[test]
fn test_namespace_with_dollar_is_literal() {
    assert_eq!(
        transform(":--namespace {}", NamespaceOptions::with_namespace(".$1")),
        ".$1 {}"
    );
}

#[test]
fn test_per_file_namespace() {
    let options = NamespaceOptions::with_namespace(Namespace::per_file(|file| {
        Ok(file.and_then(Utf8Path::file_stem).map(|stem| format!(".{stem}")))
    }));
    assert_eq!(
        transform_file(".a {}", options.clone(), Some("components/button.css")),
        ".button .a {}"
    );
    assert_eq!(transform_file(".a {}", options, None), ".a {}");
}

#[test]
fn test_per_file_error_fails_the_run() {
    let plugin = selector_namespace(NamespaceOptions::with_namespace(Namespace::per_file(
        |_| Err("cannot name this file".into()),
    )))
    .unwrap();
    let err = Processor::new()
        .with(plugin)
        .process(".a {}", ProcessOptions::default())
        .unwrap_err();
    let ProcessError::Plugin { plugin, source } = err;
    assert_eq!(plugin, "selector-namespace");
    assert_eq!(
        source.to_string(),
        "failed to compute namespace for <input>: cannot name this file"
    );
}

#[test]
fn test_keep_root_options() {
    let keep = NamespaceOptions {
        drop_root: false,
        ..NamespaceOptions::with_namespace(".c")
    };
    expect_unchanged(":root .foo {}", keep);

    let prefix = NamespaceOptions {
        ignore_root: false,
        ..NamespaceOptions::with_namespace(".c")
    };
    assert_eq!(transform(":root .foo {}", prefix), ".c :root .foo {}");
}

#[test]
fn test_html_tag_mode() {
    let options = NamespaceOptions {
        process_html_tag_specifically: true,
        ..NamespaceOptions::with_namespace(".app")
    };
    assert_eq!(
        transform("html { font-size: 62.5% } html body, .a {}", options),
        "html.app { font-size: 62.5% } html.app body, .app .a {}"
    );
}

#[test]
fn test_shared_plugin_has_no_state_between_documents() {
    let plugin = selector_namespace(NamespaceOptions {
        self_selector: SelectorPattern::regex("&"),
        ..NamespaceOptions::with_namespace(".c")
    })
    .unwrap();
    let processor = Processor::new().with(plugin);
    for _ in 0..3 {
        let result = processor.process("& .a {}", ProcessOptions::default()).unwrap();
        assert_eq!(result.css, ".c .a {}");
    }
}
