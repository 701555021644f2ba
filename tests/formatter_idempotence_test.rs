//! Canonical formatting over fixed fixtures and generated programs.

use indoc::indoc;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use pylens::{format, parse, FormatError, FormatOptions, Formatter};

#[test]
fn test_messy_module_is_canonicalized() {
    let source = indoc! {"
        import os
        def area( w,h ):
          # width times height
          return w*h



        class Box :
           def __init__( self , w , h ):   # store
              self.size = ( w,h )
    "};
    let expected = indoc! {"
        import os
        def area(w, h):
            # width times height
            return w*h


        class Box :
            def __init__(self, w, h):  # store
                self.size = (w, h)
    "};
    assert_eq!(format(source).unwrap(), expected);
}

#[test]
fn test_canonical_text_is_a_fixed_point() {
    let source = indoc! {r#"
        def report(items, *, verbose=False):
            """Print items.

              Indented docstring lines stay as written.
            """
            for item in items:
                if verbose:
                    print(item,
                          len(item))
    "#};
    let once = format(source).unwrap();
    assert_eq!(once, source);
    assert_eq!(format(&once).unwrap(), once);
}

#[test]
fn test_formatting_preserves_non_space_characters() {
    let source = "x=[ 1,2 ,3 ]  # list\nif x :\n\ty = {'a':1}";
    let formatted = format(source).unwrap();
    let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert_eq!(squash(&formatted), squash(source));
}

#[test]
fn test_formatted_output_parses() {
    let formatted = format("while  True :\n  break").unwrap();
    assert!(parse(&formatted).is_ok());
}

#[test]
fn test_invalid_source_is_rejected() {
    let err = format("function (").unwrap_err();
    assert!(matches!(err, FormatError::Syntax(_)));
}

#[test]
fn test_options_change_layout() {
    let formatter = Formatter::new(FormatOptions {
        indent_width: 2,
        max_blank_lines: 1,
        max_nested_blank_lines: 0,
        verify_idempotence: true,
    });
    let source = "def f():\n    a = 1\n\n    b = 2\n\n\n\nx = 1";
    assert_eq!(
        formatter.format(source).unwrap(),
        "def f():\n  a = 1\n  b = 2\n\nx = 1\n"
    );
}

/// Python keywords and names with special parsing to avoid
const RESERVED: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "case", "class", "continue", "def", "del",
    "elif", "else", "except", "exec", "finally", "for", "from", "global", "if", "import", "in",
    "is", "lambda", "match", "nonlocal", "not", "or", "pass", "print", "raise", "return", "try",
    "type", "while", "with", "yield",
];

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("not reserved", |s| !RESERVED.contains(&s.as_str()))
}

fn gap() -> impl Strategy<Value = String> {
    "[ ]{0,3}"
}

fn expression() -> impl Strategy<Value = String> {
    prop_oneof![
        identifier(),
        "[1-9][0-9]{0,3}",
        "'[a-z ,]{0,8}'",
        (gap(), prop::collection::vec(identifier(), 0..4), gap())
            .prop_map(|(a, items, b)| format!("[{a}{}{b}]", items.join(&format!(",{a}")))),
    ]
}

fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        (identifier(), gap(), gap(), expression())
            .prop_map(|(name, a, b, value)| format!("{name}{a}={b}{value}")),
        (identifier(), gap(), prop::collection::vec(expression(), 0..4)).prop_map(
            |(name, pad, args)| format!("{name}({pad}{}{pad})", args.join(&format!("{pad},{pad}")))
        ),
        (identifier(), "[a-z ]{0,10}").prop_map(|(name, note)| format!("{name} = 1 #{note}")),
        Just("pass".to_string()),
    ]
}

fn header() -> impl Strategy<Value = String> {
    prop_oneof![
        (identifier(), gap()).prop_map(|(cond, pad)| format!("if {cond}{pad}:")),
        (identifier(), gap()).prop_map(|(cond, pad)| format!("while {cond}{pad}:")),
        (identifier(), prop::collection::vec(identifier(), 0..3), gap()).prop_map(
            |(name, params, pad)| format!("def {name}({pad}{}{pad}):", params.join(", "))
        ),
    ]
}

#[derive(Debug, Clone)]
enum Item {
    Statement(String),
    Comment(String),
    Block(String, Vec<Item>),
}

fn item() -> impl Strategy<Value = Item> {
    let leaf = prop_oneof![
        4 => statement().prop_map(Item::Statement),
        1 => "[a-z ]{0,12}".prop_map(|text| Item::Comment(format!("#{text}"))),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        (header(), prop::collection::vec(inner, 1..4)).prop_map(|(head, body)| {
            // a block needs at least one statement
            let mut body = body;
            body.push(Item::Statement("pass".into()));
            Item::Block(head, body)
        })
    })
}

fn render(
    items: &[Item],
    unit: &str,
    level: usize,
    blanks: &mut impl Iterator<Item = usize>,
    out: &mut String,
) {
    for item in items {
        for _ in 0..blanks.next().unwrap_or(0) {
            out.push('\n');
        }
        let indent = unit.repeat(level);
        match item {
            Item::Statement(text) => out.push_str(&format!("{indent}{text}\n")),
            Item::Comment(text) => out.push_str(&format!("{indent}{text}\n")),
            Item::Block(head, body) => {
                out.push_str(&format!("{indent}{head}\n"));
                render(body, unit, level + 1, blanks, out);
            }
        }
    }
}

fn program() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(item(), 1..6),
        prop_oneof![
            Just(" ".to_string()),
            Just("  ".to_string()),
            Just("   ".to_string()),
            Just("\t".to_string()),
            Just("        ".to_string()),
        ],
        prop::collection::vec(0usize..4, 64),
    )
        .prop_map(|(items, unit, blanks)| {
            let mut out = String::new();
            render(&items, &unit, 0, &mut blanks.into_iter().cycle(), &mut out);
            out
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generated_programs_parse(source in program()) {
        prop_assert!(parse(&source).is_ok(), "generator produced invalid source:\n{}", source);
    }

    #[test]
    fn prop_format_is_idempotent(source in program()) {
        let once = format(&source);
        prop_assert!(once.is_ok(), "{:?} for:\n{}", once, source);
        let once = once.unwrap();
        let twice = format(&once).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_format_keeps_every_non_space_character(source in program()) {
        let formatted = format(&source).unwrap();
        let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        prop_assert_eq!(squash(&formatted), squash(&source));
    }
}
