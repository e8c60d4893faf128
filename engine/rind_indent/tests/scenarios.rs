//! End-to-end scenarios through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use rind_indent::{
    indent_line, BlockNavigator, Direction, IndentCalculator, IndentConfig, IndentResult,
};
use rind_lexer_core::{Classifier, SourceBuffer};

fn indent(src: &str, line: u32) -> IndentResult {
    let buf = SourceBuffer::new(src);
    IndentCalculator::new(&buf, IndentConfig::default())
        .compute_indent(line)
        .unwrap()
}

#[test]
fn argument_aligns_after_open_paren() {
    let src = "foo(1, 2,\n   3)";
    assert_eq!(indent(src, 1), IndentResult::Column(4));
}

#[test]
fn if_body_and_end() {
    let src = "if x\n  y\nend";
    assert_eq!(indent(src, 1), IndentResult::Column(2));
    assert_eq!(indent(src, 2), IndentResult::Column(0));
}

#[test]
fn trailing_modifier_keeps_depth_zero() {
    let buf = SourceBuffer::new("x = 1 if y");
    let classifier = Classifier::new(&buf, IndentConfig::default().scan_options());
    let state = classifier.classify(0, buf.len()).unwrap();
    assert_eq!(state.depth(), 0);
    assert!(state.nest().is_empty());
}

#[test]
fn unterminated_string_is_indeterminate() {
    assert_eq!(indent("foo(\"abc\nbar", 1), IndentResult::Indeterminate);
}

#[test]
fn heredoc_lines_classify_as_string_until_terminator() {
    let src = "x = <<EOF\none\n  two\nEOF\ny\n";
    let buf = SourceBuffer::new(src);
    let classifier = Classifier::new(&buf, IndentConfig::default().scan_options());
    let inside: Vec<bool> = (1..buf.line_count())
        .map(|line| {
            classifier
                .classify(0, buf.line_start(line))
                .unwrap()
                .is_in_string()
        })
        .collect();
    assert_eq!(inside, vec![true, true, false, false, false]);
}

#[test]
fn end_of_block_stops_at_enclosing_end() {
    let src = "def foo\n  1\nend\n\ndef bar\nend";
    let buf = SourceBuffer::new(src);
    let nav = BlockNavigator::new(&buf, IndentConfig::default());

    let inside_foo = 10;
    let boundary = nav.move_to_block(inside_foo, Direction::Forward, 1);
    assert_eq!(boundary.line, 2);
    assert_eq!(nav.end_of_block(inside_foo), Some(15));
}

#[test]
fn reapplying_a_computed_column_is_stable() {
    let src = "class A\ndef f\nfoo(a,\nb)\nend\nend\n";
    let mut text = src.to_owned();
    for line in 0..6 {
        let buf = SourceBuffer::new(&text);
        if let Some(edit) = indent_line(&buf, line, &IndentConfig::default()).unwrap() {
            text = edit.apply(&text);
        }
        let buf = SourceBuffer::new(&text);
        assert_eq!(
            indent_line(&buf, line, &IndentConfig::default()).unwrap(),
            None
        );
    }
    assert_eq!(text, "class A\n  def f\n    foo(a,\n        b)\n  end\nend\n");
}
