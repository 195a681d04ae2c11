//! Integration tests for whole-program parsing

use aadl_core::ast::{AssignKind, Condition, ExprKind, FileKind, Spanned, StmtKind, SubmoduleItem};
use aadl_core::{MemorySink, ParseOptions, ParseOutput, Parser};
use tempfile::tempdir;

fn quiet() -> ParseOptions {
    ParseOptions::default().with_error_sink(MemorySink::new())
}

fn parse(source: &str) -> ParseOutput {
    Parser::parse_source(source, quiet())
}

const LEDGER: &str = r#"
package org.example.ledger;

header @{ import java.math.BigDecimal; }@

const RATE : Decimal = 1.08;

function taxed(base : Exalge) : Exalge {
    return base * RATE;
}

program Ledger {
    var journal : Exalge;
    journal <<- csvfile("journal.csv");
    var limit : Decimal = $2;
    var rows : Exalge = { taxed(x) | x <- journal.rows(), x > limit };
    sif (limit > 0) journal = taxed(journal);
    selse journal = journal;
    { total = total + y; | y <- rows }
    journal ->> csvfile($1);
}

function report(e : Exalge) {
    @{ System.out.println(e); }@;
}

const VERSION : String = "1.0";
"#;

#[test]
fn test_complete_program() {
    let output = parse(LEDGER);
    assert!(!output.failed, "{:?}", output.diagnostics);

    assert_eq!(output.info.class_name, "Ledger");
    let functions: Vec<_> = output
        .info
        .functions
        .iter()
        .map(|f| f.name.name.as_str())
        .collect();
    assert_eq!(functions, ["taxed", "report"]);

    let consts: Vec<_> = output
        .tree
        .consts
        .iter()
        .map(|c| c.name.name.as_str())
        .collect();
    assert_eq!(consts, ["RATE", "VERSION"]);

    let args: Vec<u32> = output.info.command_args.iter().map(|a| a.index).collect();
    assert_eq!(args, [2, 1]);

    let tree = &output.tree;
    assert_eq!(
        tree.package.as_ref().map(|p| p.path.path()).as_deref(),
        Some("org.example.ledger")
    );
    assert_eq!(tree.header_actions.len(), 1);
    assert!(matches!(
        tree.leading.as_ref().unwrap().items[..],
        [SubmoduleItem::Const(_), SubmoduleItem::Function(_)]
    ));
    assert!(matches!(
        tree.trailing.as_ref().unwrap().items[..],
        [SubmoduleItem::Function(_), SubmoduleItem::Const(_)]
    ));

    let body = &tree.main.as_ref().unwrap().body.stmts;
    assert_eq!(body.len(), 7);
    assert!(matches!(
        &body[1].kind,
        StmtKind::Assign(a) if matches!(&a.kind, AssignKind::Input(f) if f.kind == FileKind::Csv)
    ));
    assert!(matches!(&body[4].kind, StmtKind::If { else_branch: Some(_), .. }));
    assert!(matches!(&body[5].kind, StmtKind::InvolvingBlock(_)));
    assert!(matches!(
        &body[6].kind,
        StmtKind::Assign(a) if matches!(a.kind, AssignKind::Output(_))
    ));
}

#[test]
fn test_tree_span_reaches_end_of_input() {
    let source = "program P { }\n\n";
    let output = parse(source);
    assert_eq!(output.tree.span().start, 0);
    assert_eq!(output.tree.span().end as usize, source.len());
}

#[test]
fn test_command_args_follow_token_order_across_modules() {
    let output = parse(
        r#"
        function f() { return $3; }
        program P { x = $1 + $2; y = $1; }
        function g() { return $4; }
        "#,
    );
    assert!(!output.failed);
    let args: Vec<_> = output
        .info
        .command_args
        .iter()
        .map(|a| a.text.as_str())
        .collect();
    assert_eq!(args, ["$3", "$1", "$2", "$1", "$4"]);
}

#[test]
fn test_nested_command_args_keep_token_order() {
    let output = parse(
        r#"
        function f() { return g(h($2), <$3, "yen">); }
        program P { r = { x | x <- rows($4), x > $1 }; }
        const C : Exalge = <<$6, [$5]>>;
        "#,
    );
    assert!(!output.failed, "{:?}", output.diagnostics);
    let args: Vec<u32> = output.info.command_args.iter().map(|a| a.index).collect();
    assert_eq!(args, [2, 3, 4, 1, 6, 5]);
}

#[test]
fn test_each_parse_starts_with_fresh_state() {
    let first = parse("function f() { } program A { x = $1; } const C : Int = 1;");
    let second = parse("program B { }");

    assert_eq!(first.info.functions.len(), 1);
    assert_eq!(first.info.command_args.len(), 1);
    assert_eq!(first.tree.consts.len(), 1);

    assert_eq!(second.info.class_name, "B");
    assert!(second.info.functions.is_empty());
    assert!(second.info.command_args.is_empty());
    assert!(second.tree.consts.is_empty());
}

#[test]
fn test_filter_conditions_keep_source_order() {
    let output = parse("program P { r = { y | y = x * 2, x <- src, y > 0 }; }");
    assert!(!output.failed);

    let body = &output.tree.main.as_ref().unwrap().body.stmts;
    let StmtKind::Assign(assign) = &body[0].kind else {
        panic!("expected assignment");
    };
    let AssignKind::Value(value) = &assign.kind else {
        panic!("expected value assignment");
    };
    let ExprKind::Involving(involving) = &value.kind else {
        panic!("expected involving");
    };
    assert!(matches!(involving.conditions[0], Condition::Alias(_)));
    assert!(matches!(involving.conditions[1], Condition::List(_)));
    assert!(matches!(involving.conditions[2], Condition::Filter(_)));

    let forward = involving.forward_references();
    assert_eq!(forward.len(), 1);
    assert_eq!(forward[0].binding.name, "x");
}

#[test]
fn test_missing_semicolon_is_reported_once() {
    let sink = MemorySink::new();
    let options = ParseOptions::default()
        .with_source_name("calc.aadl")
        .with_error_sink(sink.clone());
    let source = "program P { x = 1 y = 2; }";
    let output = Parser::parse_source(source, options);

    assert!(output.failed);
    assert_eq!(sink.lines(), vec!["calc.aadl:1:19:missing ';' at 'y'"]);
    assert_eq!(output.diagnostics.len(), 1);

    let body = &output.tree.main.as_ref().unwrap().body.stmts;
    assert_eq!(body.len(), 2);
    assert_eq!(output.tree.span.end as usize, source.len());
}

#[test]
fn test_errors_inside_functions_do_not_lose_later_declarations() {
    let output = parse(
        r#"
        function f() { x = ; y = 1; }
        function g() { }
        program P { z = 2; }
        "#,
    );
    assert!(output.failed);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.info.functions.len(), 2);
    assert_eq!(output.info.functions[0].body.stmts.len(), 1);
    assert_eq!(output.info.class_name, "P");
}

#[test]
fn test_diagnostic_limit_only_affects_printing() {
    let sink = MemorySink::new();
    let mut options = ParseOptions::from_toml_str("max_diagnostics = 1").unwrap();
    options = options.with_error_sink(sink.clone());

    let output = Parser::parse_source("program P { x = 1 y = 2 z = 3; }", options);

    assert!(output.failed);
    assert_eq!(sink.lines().len(), 1);
    assert_eq!(output.diagnostics.len(), 2);
}

#[test]
fn test_verbose_summary() {
    let out = MemorySink::new();
    let mut options = quiet().with_output_sink(out.clone());
    options.verbose = true;

    let _ = Parser::parse_source(LEDGER, options);

    assert_eq!(
        out.lines(),
        vec![
            "parsed program 'Ledger': 2 function(s), 2 const(s), 2 command argument(s), 0 error(s)"
        ]
    );
}

#[test]
fn test_json_output() {
    let output = parse("program P { x = $1; }");
    let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

    assert_eq!(json["info"]["class_name"], "P");
    assert_eq!(json["info"]["command_args"][0]["index"], 1);
    assert_eq!(json["failed"], false);
    assert!(json["diagnostics"].as_array().unwrap().is_empty());
}

#[test]
fn test_options_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aadl.toml");
    std::fs::write(&path, "source_name = \"from-file.aadl\"\nverbose = false\n").unwrap();

    let options = ParseOptions::load(&path).unwrap();

    assert_eq!(options.source_name, "from-file.aadl");
    let sink = MemorySink::new();
    let output = Parser::parse_source("program { }", options.with_error_sink(sink.clone()));
    assert!(output.failed);
    assert!(sink.lines()[0].starts_with("from-file.aadl:1:9:"));
}
