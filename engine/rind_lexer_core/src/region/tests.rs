use super::*;
use pretty_assertions::assert_eq;

fn classifier(buf: &SourceBuffer) -> Classifier<'_> {
    Classifier::new(buf, ScanOptions::default())
}

// === Classification ===

#[test]
fn well_formed_brackets_classify_balanced() {
    let buf = SourceBuffer::new("foo(a, [1, {b: 2}], (c))\nbar[x]");
    let state = classifier(&buf).classify(0, buf.len());
    assert_eq!(state.as_ref().map(ScanState::depth), Ok(0));
    assert_eq!(state.map(|s| s.nest().is_empty()), Ok(true));
}

#[test]
fn modifier_line_has_zero_depth() {
    let buf = SourceBuffer::new("x = 1 if y\n");
    let state = classifier(&buf).classify(0, buf.len());
    assert_eq!(state.map(|s| s.depth()), Ok(0));
}

#[test]
fn classify_stops_at_bound() {
    let buf = SourceBuffer::new("if a\n  b\nend\n");
    let state = classifier(&buf).classify(0, buf.line_start(2));
    assert_eq!(state.map(|s| s.depth()), Ok(1));
}

#[test]
fn strict_classify_reports_stray_closer() {
    let buf = SourceBuffer::new("x)\n");
    let c = classifier(&buf);
    assert_eq!(
        c.classify(0, buf.len()),
        Err(ScanError::InvalidNest {
            closer: ')',
            pos: 1
        })
    );
    assert_eq!(c.classify_lenient(0, buf.len()).depth(), -1);
}

#[test]
fn heredoc_body_lines_are_strings() {
    let src = "x = <<EOF\none\ntwo\nEOF\ny\n";
    let buf = SourceBuffer::new(src);
    let c = classifier(&buf);
    for line in 1..=2 {
        let state = c.classify_lenient(0, buf.line_start(line));
        assert!(state.is_in_string(), "line {line} should be inside the heredoc");
    }
    for line in 3..=4 {
        let state = c.classify_lenient(0, buf.line_start(line));
        assert!(!state.is_in_string(), "line {line} should be outside the heredoc");
    }
}

// === Line nesting ===

#[test]
fn line_nesting_counts_keywords_and_brackets() {
    let buf = SourceBuffer::new("foo.each do |x|\n  bar(x,\n  end)\nend\n");
    let c = classifier(&buf);
    assert_eq!(
        c.line_nesting(0),
        LineNesting {
            delta: 1,
            opened: 1,
            closed: 0
        }
    );
    assert_eq!(c.line_nesting(1).delta, 1);
    assert_eq!(c.line_nesting(2).delta, -2);
    assert_eq!(c.line_nesting(3).closed, 1);
}

#[test]
fn line_nesting_of_balanced_line_is_zero() {
    let buf = SourceBuffer::new("if a then b end\n");
    let nesting = classifier(&buf).line_nesting(0);
    assert_eq!(nesting.delta, 0);
    assert_eq!((nesting.opened, nesting.closed), (1, 1));
}

// === Resumption ===

#[test]
fn statement_start_patterns() {
    assert!(is_statement_start(b"def foo"));
    assert!(is_statement_start(b"  def foo"));
    assert!(is_statement_start(b"\tclass Foo < Bar"));
    assert!(is_statement_start(b"module M"));
    assert!(is_statement_start(b"if x"));
    assert!(!is_statement_start(b"  if x"));
    assert!(!is_statement_start(b"define x"));
    assert!(!is_statement_start(b"x = 1"));
    assert!(!is_statement_start(b""));
}

#[test]
fn keyword_labels_are_not_statement_starts() {
    assert!(!is_statement_start(b"    class: 2,"));
    assert!(!is_statement_start(b"  def: nil"));
    assert!(!is_statement_start(b"if: 1"));
    assert!(!is_statement_start(b"begin?"));
    assert!(is_statement_start(b"class Foo::Bar"));
    assert!(is_statement_start(b"  def self.class::x"));
}

#[test]
fn hash_label_line_is_not_a_resume_point() {
    let src = "def f\n  h = {\n    class: 2,\n    id: 3\n  }\nend\n";
    let buf = SourceBuffer::new(src);
    let c = classifier(&buf);
    let target = buf.line_start(4);
    assert_eq!(c.resume_point(target, ResumePolicy::default()), 0);
    assert!(c.classify(0, target).is_ok());
}

#[test]
fn resume_at_nearest_statement_start() {
    let buf = SourceBuffer::new("class A\n  def f\n    x\n  end\nend\n");
    let c = classifier(&buf);
    let target = buf.line_start(2);
    assert_eq!(c.resume_point(target, ResumePolicy::default()), buf.line_start(1));
    assert_eq!(c.resume_point(target, ResumePolicy::BufferStart), 0);
}

#[test]
fn resume_skips_candidates_inside_literals() {
    let src = "x = <<EOS\ndef fake\nEOS\ny = 1\n";
    let buf = SourceBuffer::new(src);
    let c = classifier(&buf);
    let target = buf.line_start(3);
    assert_eq!(c.resume_point(target, ResumePolicy::default()), 0);
    let unverified = ResumePolicy::StatementStart {
        max_lines: None,
        verify: false,
    };
    assert_eq!(c.resume_point(target, unverified), buf.line_start(1));
}

#[test]
fn resume_search_respects_line_limit() {
    let buf = SourceBuffer::new("x\ndef a\n  b\n  c\n  d\n");
    let c = classifier(&buf);
    let limited = |n| ResumePolicy::StatementStart {
        max_lines: Some(n),
        verify: true,
    };
    assert_eq!(c.resume_point(buf.line_start(4), limited(1)), 0);
    assert_eq!(c.resume_point(buf.line_start(4), limited(3)), buf.line_start(1));
}

#[test]
fn checkpoint_is_used_when_not_after_target() {
    let buf = SourceBuffer::new("a\nb\nc\nd\n");
    let c = classifier(&buf);
    let target = buf.line_start(3);
    assert_eq!(
        c.resume_point(target, ResumePolicy::Checkpoint(buf.line_start(1) + 1)),
        buf.line_start(1)
    );
    assert_eq!(c.resume_point(buf.line_start(1), ResumePolicy::Checkpoint(target)), 0);
}

// === Literal map ===

#[test]
fn literal_lines_cover_strings_heredocs_and_block_comments() {
    let src = "a = \"x\ny\"\nb = <<EOS\nbody\nEOS\n=begin\nnote\n=end\nc\n";
    let buf = SourceBuffer::new(src);
    let map = classifier(&buf).literal_lines();
    assert_eq!(
        map,
        vec![false, true, false, true, false, false, true, true, false, false]
    );
}
