// tests/parser_tests.rs

use std::str::FromStr;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use sift_query::ast::{
    ActionNode, CompOp, FilterNode, Joiner, JoinerNode, Literal, Operand, Param, Query,
};
use sift_query::error::{Error, LexError, ParseError};
use sift_query::lexer::Lexer;
use sift_query::parser::Parser;
use sift_query::{ParseOptions, parse, parse_with};

fn filter_root(input: &str) -> JoinerNode {
    parse(input)
        .unwrap()
        .filter_root()
        .cloned()
        .expect("expected a filter tree")
}

fn eq(key: &str, n: i64) -> JoinerNode {
    JoinerNode::leaf(FilterNode::scalar(key, CompOp::Equal, Literal::Integer(n)))
}

fn parse_error(input: &str) -> ParseError {
    match parse(input) {
        Err(Error::Parse(e)) => e,
        other => panic!("Expected parse error for {:?}, got {:?}", input, other),
    }
}

/// Renders a tree with every combination parenthesized; groups vanish.
fn association(tree: &JoinerNode) -> String {
    tree.walk(
        |filter| filter.key().to_string(),
        |left, joiner, right| format!("({} {} {})", left, joiner, right),
    )
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_single_filter_is_a_leaf() {
    let root = filter_root("title == \"Hello\"");

    assert!(root.is_leaf());
    assert_eq!(
        root.leaf_filter(),
        Some(&FilterNode::scalar(
            "title",
            CompOp::Equal,
            Literal::String("Hello".to_string())
        ))
    );
}

#[test]
fn test_all_operators_are_preserved() {
    for op in CompOp::ALL {
        let root = filter_root(&format!("x {} 1", op));
        assert_eq!(root.leaf_filter().unwrap().operator(), op, "Failed for {}", op);
    }
}

#[test]
fn test_operator_classes() {
    let test_cases = vec![
        ("contains", false, true),
        ("!contains", true, true),
        ("in", false, true),
        ("!in", true, true),
        ("==", false, false),
        ("!=", true, false),
        (">=", false, false),
        ("<=", false, false),
        (">", false, false),
        ("<", false, false),
    ];

    for (input, negated, membership) in test_cases {
        let op = filter_root(&format!("x {} 1", input))
            .leaf_filter()
            .unwrap()
            .operator();
        assert_eq!(op.is_negated(), negated, "Failed for {}", input);
        assert_eq!(op.is_membership(), membership, "Failed for {}", input);
    }
    assert_eq!(CompOp::from_str("=~"), Err("unknown comparison operator '=~'".to_string()));
}

#[test]
fn test_operand_literal_kinds() {
    let test_cases = vec![
        ("x == 'a'", Literal::String("a".to_string())),
        ("x == -3", Literal::Integer(-3)),
        ("x == 2.25", Literal::Decimal(Decimal::from_str("2.25").unwrap())),
        ("x == 12:20", Literal::Time("12:20".to_string())),
        ("x == 2013-2-1", Literal::Date("2013-2-1".to_string())),
        ("x == 2013-2-1 8:00 am", Literal::DateTime("2013-2-1 8:00 am".to_string())),
    ];

    for (input, expected) in test_cases {
        let root = filter_root(input);
        assert_eq!(
            root.leaf_filter().unwrap().operand(),
            &Operand::Scalar(expected),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_dotted_key() {
    let root = filter_root("meta.author.name != 'bob'");
    let filter = root.leaf_filter().unwrap();

    assert_eq!(filter.key(), "meta.author.name");
    assert_eq!(filter.key_path().collect::<Vec<_>>(), vec!["meta", "author", "name"]);
}

#[test]
fn test_array_operand_keeps_order() {
    let root = filter_root(r#"tag in ["a", "b", "c"]"#);
    let filter = root.leaf_filter().unwrap();

    assert_eq!(filter.operator(), CompOp::In);
    assert_eq!(
        filter.operand(),
        &Operand::List(vec![
            Literal::String("a".to_string()),
            Literal::String("b".to_string()),
            Literal::String("c".to_string()),
        ])
    );
}

#[test]
fn test_empty_and_mixed_arrays() {
    let root = filter_root("tags !in []");
    assert_eq!(root.leaf_filter().unwrap().operand(), &Operand::List(vec![]));

    let root = filter_root("x in [7, 'yes', 77, 1.5, 10:00, 2020-1-1]");
    assert_eq!(
        root.leaf_filter().unwrap().operand().as_list().unwrap(),
        &[
            Literal::Integer(7),
            Literal::String("yes".to_string()),
            Literal::Integer(77),
            Literal::Decimal(Decimal::from_str("1.5").unwrap()),
            Literal::Time("10:00".to_string()),
            Literal::Date("2020-1-1".to_string()),
        ]
    );
}

// ============================================================================
// Association
// ============================================================================

#[test]
fn test_flat_chain_associates_left_to_right() {
    let root = filter_root("a==1 and b==2 or c==3");

    let expected = JoinerNode::join(
        JoinerNode::join(eq("a", 1), Joiner::And, eq("b", 2)),
        Joiner::Or,
        eq("c", 3),
    );
    assert_eq!(root, expected);
    assert_eq!(association(&root), "((a and b) or c)");
}

#[test]
fn test_or_before_and_still_left_to_right() {
    let root = filter_root("a==1 or b==2 and c==3");
    assert_eq!(association(&root), "((a or b) and c)");
}

#[test]
fn test_explicit_left_group_matches_flat_chain() {
    let flat = filter_root("a==1 and b==2 or c==3");
    let grouped = filter_root("(a==1 and b==2) or c==3");

    let expected = JoinerNode::join(
        JoinerNode::group(JoinerNode::join(eq("a", 1), Joiner::And, eq("b", 2))),
        Joiner::Or,
        eq("c", 3),
    );
    assert_eq!(grouped, expected);
    assert_eq!(association(&grouped), association(&flat));
}

#[test]
fn test_group_overrides_association() {
    let root = filter_root("a==1 and (b==2 or c==3)");

    assert_eq!(root.joiner(), Some(Joiner::And));
    assert_eq!(root.left(), Some(&eq("a", 1)));

    let group = root.right().unwrap();
    assert!(!group.has_right());
    assert_eq!(
        group.left(),
        Some(&JoinerNode::join(eq("b", 2), Joiner::Or, eq("c", 3)))
    );
    assert_eq!(association(&root), "(a and (b or c))");
}

#[test]
fn test_group_chain_inside_parentheses() {
    let root = filter_root("(a==1 and b==2 or c==3)");

    let expected = JoinerNode::group(JoinerNode::join(
        JoinerNode::join(eq("a", 1), Joiner::And, eq("b", 2)),
        Joiner::Or,
        eq("c", 3),
    ));
    assert_eq!(root, expected);
}

#[test]
fn test_two_groups() {
    let root = filter_root("(a==1 or b==2) and (c==3 or d==4) or e==5");
    assert_eq!(association(&root), "(((a or b) and (c or d)) or e)");
}

#[test]
fn test_single_filter_group() {
    let root = filter_root("(a == 1)");
    assert_eq!(root, JoinerNode::group(eq("a", 1)));
}

#[test]
fn test_parsing_is_deterministic() {
    let input = "(time == 12:20 and name == \"Sabuj\") or list == [7, \"yes\", 77] | :sortby name 70; :limit 40";
    assert_eq!(parse(input).unwrap(), parse(input).unwrap());
}

// ============================================================================
// Actions
// ============================================================================

#[test]
fn test_filter_with_actions() {
    let query = parse("x==1 | :sortby name asc; :limit 10").unwrap();

    assert_eq!(query.filter_root(), Some(&eq("x", 1)));
    assert_eq!(
        query.actions(),
        &[
            ActionNode::new(
                ":sortby",
                vec![Param::Key("name".to_string()), Param::Key("asc".to_string())]
            ),
            ActionNode::new(":limit", vec![Param::Literal(Literal::Integer(10))]),
        ]
    );
    assert_eq!(query.actions()[0].name(), "sortby");
}

#[test]
fn test_actions_only() {
    let query = parse("| :limit 5").unwrap();

    assert!(!query.has_filter());
    assert!(query.has_actions());
    assert_eq!(query.actions().len(), 1);
    assert_eq!(query.actions()[0].action_key(), ":limit");
}

#[test]
fn test_action_parameter_kinds() {
    let query = parse("| :between 2020-01-01 'x' 2.5 meta.date 9:30pm").unwrap();

    assert_eq!(
        query.actions()[0].params(),
        &[
            Param::Literal(Literal::Date("2020-01-01".to_string())),
            Param::Literal(Literal::String("x".to_string())),
            Param::Literal(Literal::Decimal(Decimal::from_str("2.5").unwrap())),
            Param::Key("meta.date".to_string()),
            Param::Literal(Literal::Time("9:30pm".to_string())),
        ]
    );
}

#[test]
fn test_action_order_is_preserved() {
    let query = parse("| :c 1; :a 2; :b 3").unwrap();
    let keys: Vec<&str> = query.actions().iter().map(|a| a.action_key()).collect();
    assert_eq!(keys, vec![":c", ":a", ":b"]);
}

// ============================================================================
// Empty input
// ============================================================================

#[test]
fn test_empty_input() {
    for input in ["", "   ", "\n\t \n"] {
        let query = parse(input).unwrap();
        assert!(!query.has_filter());
        assert!(!query.has_actions());
        assert_eq!(query, Query::empty());
    }
}

#[test]
fn test_untrimmed_whitespace_input() {
    let options = ParseOptions::default().trim(false);
    assert!(parse_with("  \n ", &options).unwrap().is_empty());
    assert_eq!(
        parse_with("  x == 1  ", &options).unwrap().filter_root(),
        Some(&eq("x", 1))
    );
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_temporal_validation_option() {
    assert!(parse("start > 13:99").is_ok());

    let options = ParseOptions::new().validate_temporal(true);
    match parse_with("start > 13:99", &options) {
        Err(Error::Lex(LexError::InvalidLiteral { kind, .. })) => assert_eq!(kind, "time"),
        other => panic!("Expected invalid time, got {:?}", other),
    }
    assert!(parse_with("start > 12:59 and day == 2024-2-29", &options).is_ok());
}

#[test]
fn test_parser_over_explicit_lexer() {
    let mut parser = Parser::new(Lexer::new("a == 1 | :limit 1")).unwrap();
    let query = parser.parse_query().unwrap();
    assert!(query.has_filter());
    assert!(query.has_actions());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_value_is_end_of_input() {
    let err = parse_error("x ==");

    assert!(err.is_eof());
    assert_eq!(err.position(), 4);
    assert!(err.to_string().contains("end of input"));
}

#[test]
fn test_unterminated_string_is_lex_error() {
    assert!(matches!(
        parse("x == \"abc"),
        Err(Error::Lex(LexError::UnterminatedString { .. }))
    ));
}

#[test]
fn test_dangling_joining_op() {
    match parse_error("x == 1 and") {
        ParseError::UnexpectedEof { expected, .. } => assert_eq!(expected, "a filter or '('"),
        other => panic!("Expected end of input, got {:?}", other),
    }
}

#[test]
fn test_missing_joining_op() {
    match parse_error("x == 1 y == 2") {
        ParseError::UnexpectedToken {
            found, position, ..
        } => {
            assert_eq!(found, "key 'y'");
            assert_eq!(position, 7);
        }
        other => panic!("Expected unexpected token, got {:?}", other),
    }
}

#[test]
fn test_unclosed_group() {
    let err = parse_error("(a == 1 or b == 2");
    assert!(err.is_eof());
}

#[test]
fn test_groups_do_not_nest() {
    match parse_error("((a == 1))") {
        ParseError::UnexpectedToken { found, expected, .. } => {
            assert_eq!(found, "'('");
            assert_eq!(expected, "a key");
        }
        other => panic!("Expected unexpected token, got {:?}", other),
    }
}

#[test]
fn test_key_is_not_a_value() {
    assert!(matches!(
        parse_error("x == y"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_bad_arrays() {
    assert!(parse_error("x in [1, 2").is_eof());
    match parse_error("x in [1,]") {
        ParseError::UnexpectedToken { found, .. } => assert_eq!(found, "']'"),
        other => panic!("Expected unexpected token, got {:?}", other),
    }
}

#[test]
fn test_bad_actions() {
    match parse_error("| :limit") {
        ParseError::UnexpectedEof { expected, .. } => assert_eq!(expected, "an action parameter"),
        other => panic!("Expected end of input, got {:?}", other),
    }
    assert!(matches!(
        parse_error("x == 1 | limit 10"),
        ParseError::UnexpectedToken { .. }
    ));
    assert!(parse_error("x == 1 | :limit 10;").is_eof());
    assert!(matches!(
        parse_error("x == 1 | :limit 10 (a == 1)"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_leading_joining_op() {
    match parse_error("and x == 1") {
        ParseError::UnexpectedToken { expected, .. } => {
            assert_eq!(expected, "a filter, '(' or '|'")
        }
        other => panic!("Expected unexpected token, got {:?}", other),
    }
}

#[test]
fn test_error_line_and_render() {
    let source = "a == 1 and\nb == ]";
    let err = parse(source).unwrap_err();

    assert_eq!(err.line(), 2);
    assert_eq!(
        err.render(source),
        format!("{}\nb == ]\n_____^", err)
    );
}

#[test]
fn test_render_against_untrimmed_source() {
    // U+3000 is whitespace, so the error position refers to the trimmed text.
    let source = "\u{3000}x é";
    let err = parse(source).unwrap_err();

    assert_eq!(err.position(), 2);
    assert_eq!(err.render(source), format!("{}\n{}\n^^^^", err, source));
}
