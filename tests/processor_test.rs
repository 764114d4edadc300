use pretty_assertions::assert_eq;
use qrender::env::Environment;
use qrender::processor::{process, Diagnostic, LineOutcome, Processor};
use std::io::{self, Write};

fn env(pairs: &[(&str, &str)]) -> Environment {
    pairs.iter().copied().collect()
}

fn run(document: &str, env: &Environment) -> (String, Vec<Diagnostic>) {
    let mut out = Vec::new();
    let diagnostics = process(document, env, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), diagnostics)
}

const IF_ELSE: &str = "A\n{{if x == 1}}\nB\n{{else}}\nC\n{{endif}}\nD";

#[test]
fn test_if_else_taken_branch() {
    let (out, diagnostics) = run(IF_ELSE, &env(&[("x", "1")]));
    assert_eq!(out, "A\nB\nD\n");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_if_else_fallback_branch() {
    assert_eq!(run(IF_ELSE, &env(&[("x", "2")])).0, "A\nC\nD\n");
    assert_eq!(run(IF_ELSE, &Environment::new()).0, "A\nC\nD\n");
}

#[test]
fn test_document_without_directives_is_unchanged() {
    let doc = "first\n  indented  \n\nlast\n";
    assert_eq!(run(doc, &Environment::new()).0, doc);
}

#[test]
fn test_else_if_chain_selects_one_branch() {
    let doc = "{{if n == 1}}\none\n{{else if n == 2}}\ntwo\n{{else if n == 3}}\nthree\n{{else}}\nother\n{{endif}}\n";
    assert_eq!(run(doc, &env(&[("n", "1")])).0, "one\n");
    assert_eq!(run(doc, &env(&[("n", "2")])).0, "two\n");
    assert_eq!(run(doc, &env(&[("n", "3")])).0, "three\n");
    assert_eq!(run(doc, &env(&[("n", "4")])).0, "other\n");
}

#[test]
fn test_chain_without_else_can_emit_nothing() {
    let doc = "{{if n == 1}}\none\n{{else if n == 2}}\ntwo\n{{endif}}\nend\n";
    assert_eq!(run(doc, &env(&[("n", "9")])).0, "end\n");
}

#[test]
fn test_first_match_wins() {
    let doc = "{{if n > 0}}\npositive\n{{else if n > -10}}\nsmall\n{{else}}\nother\n{{endif}}\n";
    assert_eq!(run(doc, &env(&[("n", "5")])).0, "positive\n");
}

#[test_log::test]
fn test_branches_after_a_match_are_not_evaluated() {
    let doc = "{{if x == 1}}\nyes\n{{else if this is not a condition}}\nno\n{{endif}}\n";
    let (out, diagnostics) = run(doc, &env(&[("x", "1")]));
    assert_eq!(out, "yes\n");
    assert!(diagnostics.is_empty());

    // the same branch is evaluated, and reported, when nothing matched before it
    let (out, diagnostics) = run(doc, &env(&[("x", "0")]));
    assert_eq!(out, "");
    assert_eq!(diagnostics, vec![Diagnostic::InvalidCondition { line: 3 }]);
}

#[test]
fn test_ancestor_suppression_dominates() {
    let doc = "{{if outer == yes}}\nouter\n{{if inner == yes}}\ninner\n{{endif}}\n{{endif}}\nafter\n";
    let (out, _) = run(doc, &env(&[("outer", "no"), ("inner", "yes")]));
    assert_eq!(out, "after\n");
}

#[test]
fn test_inner_else_under_suppressed_parent_stays_hidden() {
    let doc = "{{if outer == yes}}\n{{if inner == yes}}\na\n{{else if inner == no}}\nb\n{{else}}\nc\n{{endif}}\n{{endif}}\n";
    let (out, diagnostics) = run(doc, &env(&[("outer", "no"), ("inner", "no")]));
    assert_eq!(out, "");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_suppressed_parent_with_else_branch() {
    // The outer else re-enables output; the nested block inside the hidden
    // branch must not leak anything.
    let doc = "{{if a == 1}}\n{{if b == 1}}\nhidden\n{{endif}}\n{{else}}\n{{if b == 1}}\nshown\n{{endif}}\n{{endif}}\n";
    let (out, _) = run(doc, &env(&[("a", "0"), ("b", "1")]));
    assert_eq!(out, "shown\n");
}

#[test]
fn test_nested_blocks() {
    let doc = "{{if a == 1}}\na\n{{if b == 1}}\nab\n{{else}}\na-not-b\n{{endif}}\nmore-a\n{{endif}}\n";
    assert_eq!(run(doc, &env(&[("a", "1"), ("b", "1")])).0, "a\nab\nmore-a\n");
    assert_eq!(run(doc, &env(&[("a", "1"), ("b", "0")])).0, "a\na-not-b\nmore-a\n");
    assert_eq!(run(doc, &env(&[("a", "0"), ("b", "1")])).0, "");
}

#[test_log::test]
fn test_unmatched_directives_are_reported() {
    let doc = "{{endif}}\nA\n{{else}}\n{{else if x == 1}}\nB\n{{if x == 1}}\nC\n{{endif}}\n";
    let (out, diagnostics) = run(doc, &env(&[("x", "1")]));
    assert_eq!(out, "A\nB\nC\n");
    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::UnmatchedEndif { line: 1 },
            Diagnostic::UnmatchedElse { line: 3 },
            Diagnostic::UnmatchedElseIf { line: 4 },
        ]
    );
}

#[test]
fn test_extra_endif_does_not_corrupt_later_blocks() {
    let doc = "{{if x == 1}}\na\n{{endif}}\n{{endif}}\n{{if x == 2}}\nb\n{{endif}}\nc\n";
    let (out, diagnostics) = run(doc, &env(&[("x", "1")]));
    assert_eq!(out, "a\nc\n");
    assert_eq!(diagnostics, vec![Diagnostic::UnmatchedEndif { line: 4 }]);
}

#[test_log::test]
fn test_unclosed_blocks_are_reported_per_level() {
    let doc = "top\n{{if a == 1}}\none\n{{if b == 1}}\ntwo\n";
    let (out, diagnostics) = run(doc, &env(&[("a", "1"), ("b", "1")]));
    assert_eq!(out, "top\none\ntwo\n");
    assert_eq!(
        diagnostics,
        vec![Diagnostic::UnclosedBlock { line: 2 }, Diagnostic::UnclosedBlock { line: 4 }]
    );
}

#[test]
fn test_invalid_if_pushes_no_block() {
    let doc = "{{if broken}}\nline\n{{endif}}\n";
    let (out, diagnostics) = run(doc, &Environment::new());
    assert_eq!(out, "line\n");
    assert_eq!(
        diagnostics,
        vec![Diagnostic::InvalidCondition { line: 1 }, Diagnostic::UnmatchedEndif { line: 3 }]
    );
}

#[test]
fn test_else_if_after_else_is_still_evaluated() {
    let doc = "{{if x == 1}}\na\n{{else}}\nb\n{{else if x == 1}}\nd\n{{endif}}\n";
    let (out, diagnostics) = run(doc, &env(&[("x", "2")]));
    assert_eq!(out, "b\n");
    assert!(diagnostics.is_empty());

    let doc = "{{if x == 1}}\na\n{{else}}\nb\n{{else if x == 2}}\nd\n{{endif}}\n";
    assert_eq!(run(doc, &env(&[("x", "2")])).0, "b\nd\n");
}

#[test]
fn test_repeated_else_follows_matched_flag() {
    let doc = "{{if x == 1}}\na\n{{else}}\nb\n{{else}}\nc\n{{endif}}\n";
    assert_eq!(run(doc, &env(&[("x", "2")])).0, "b\nc\n");
    assert_eq!(run(doc, &env(&[("x", "1")])).0, "a\n");
}

#[test]
fn test_comment_prefixed_directives() {
    let doc = "# config\n#@{{if mode == dev}}\ndebug = true\n#@{{else}}\ndebug = false\n#@{{endif}}\n";
    assert_eq!(run(doc, &env(&[("mode", "dev")])).0, "# config\ndebug = true\n");
}

#[test]
fn test_directives_wrapped_in_host_comments() {
    let doc = "<!-- {{if x == 1}} -->\nhidden\n<!-- {{endif}} -->\n";
    let (out, diagnostics) = run(doc, &env(&[("x", "2")]));
    assert_eq!(out, "");
    assert!(diagnostics.is_empty());

    let doc = "fn main() {\n// {{if target == wasm}}\n    wasm();\n// {{else}}\n    native();\n// {{endif}}\n}\n";
    assert_eq!(run(doc, &env(&[("target", "linux")])).0, "fn main() {\n    native();\n}\n");
}

#[test]
fn test_lines_are_emitted_verbatim() {
    let doc = "  keep  \r\n{{if a == 1}}\n\tindented\n{{endif}}\n";
    assert_eq!(run(doc, &env(&[("a", "1")])).0, "  keep  \r\n\tindented\n");
}

#[test]
fn test_processor_feed_outcomes() {
    let env = env(&[("x", "1")]);
    let mut processor = Processor::new(&env);

    assert_eq!(processor.feed("start"), LineOutcome::Emit);
    assert_eq!(processor.feed("{{if x != 1}}"), LineOutcome::Directive);
    assert_eq!(processor.stack().depth(), 1);
    assert_eq!(processor.feed("hidden"), LineOutcome::Suppress);
    assert_eq!(processor.feed("{{else}}"), LineOutcome::Directive);
    assert_eq!(processor.feed("shown"), LineOutcome::Emit);
    assert_eq!(processor.feed("{{endif}}"), LineOutcome::Directive);
    assert!(processor.stack().is_empty());
    assert!(processor.finish().is_empty());
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_is_fatal() {
    let result = process("line\n", &Environment::new(), &mut FailingWriter);
    assert!(matches!(result, Err(qrender::error::Error::WriteError(_))));
}

#[test]
fn test_suppressed_lines_do_not_touch_the_writer() {
    let doc = "{{if x == 1}}\nhidden\n{{endif}}\n";
    assert!(process(doc, &Environment::new(), &mut FailingWriter).is_ok());
}
