use super::*;
use crate::DeepIndentTable;
use pretty_assertions::assert_eq;

fn scan_with(src: &str, options: ScanOptions) -> Result<(ScanState, u32), ScanError> {
    let buf = SourceBuffer::new(src);
    let mut scanner = Scanner::new(&buf, 0, options);
    let mut state = ScanState::default();
    while scanner.pos() < buf.len() {
        state = scanner.advance(buf.len(), state)?;
    }
    Ok((state, scanner.pos()))
}

fn scan(src: &str) -> ScanState {
    match scan_with(src, ScanOptions::default()) {
        Ok((state, _)) => state,
        Err(err) => panic!("unexpected scan error in {src:?}: {err}"),
    }
}

fn scan_to(src: &str, end: u32) -> ScanState {
    let buf = SourceBuffer::new(src);
    let mut scanner = Scanner::new(&buf, 0, ScanOptions::default());
    let mut state = ScanState::default();
    while scanner.pos() < end {
        state = match scanner.advance(end, state) {
            Ok(state) => state,
            Err(err) => panic!("unexpected scan error in {src:?}: {err}"),
        };
    }
    state
}

// === Progress ===

#[test]
fn advance_without_delimiter_stops_at_bound() {
    let buf = SourceBuffer::new("abc def ghi");
    let mut scanner = Scanner::new(&buf, 0, ScanOptions::default());
    let state = scanner.advance(4, ScanState::default());
    assert_eq!(state, Ok(ScanState::default()));
    assert_eq!(scanner.pos(), 4);
}

#[test]
fn advance_stops_after_one_delimiter() {
    let buf = SourceBuffer::new("a(b)c");
    let mut scanner = Scanner::new(&buf, 0, ScanOptions::default());
    let state = scanner.advance(buf.len(), ScanState::default());
    assert_eq!(scanner.pos(), 2);
    assert_eq!(state.map(|s| s.nest().len()), Ok(1));
}

// === Strings ===

#[test]
fn double_quoted_string_hides_keywords() {
    assert!(scan(r#"x = "if end do""#).is_balanced());
}

#[test]
fn escaped_quote_does_not_close() {
    assert!(scan(r#"x = "a\"b" + 'c\'d'"#).is_balanced());
}

#[test]
fn interpolation_braces_balance_inside_string() {
    assert!(scan(r##"x = "a#{ {b: 1}[:b] }c""##).is_balanced());
}

#[test]
fn single_quotes_do_not_interpolate() {
    let state = scan(r"x = 'a#{'");
    assert!(state.is_balanced());
}

#[test]
fn unterminated_string_records_start() {
    let state = scan(r#"foo("abc"#);
    assert_eq!(state.in_string(), Some(4));
}

#[test]
fn string_spans_lines() {
    let src = "x = \"a\nif\nb\"\ny";
    assert!(scan(src).is_balanced());
    assert_eq!(scan_to(src, 9).in_string(), Some(4));
}

// === Regexps ===

#[test]
fn regexp_literal_after_operator() {
    assert!(scan("x = /(if|do)/").is_balanced());
}

#[test]
fn division_is_not_regexp() {
    let state = scan("a = b / c\nif x");
    assert_eq!(state.depth(), 1);
    assert_eq!(state.in_string(), None);
}

#[test]
fn divide_assign_is_operator() {
    assert!(scan("a /= 2 # )").is_balanced());
}

// === Percent literals ===

#[test]
fn percent_paired_delimiters_nest() {
    assert!(scan("x = %w(a (b) c)").is_balanced());
    assert!(scan("x = %q{a {b} c}").is_balanced());
    assert!(scan("x = %i[a b]").is_balanced());
    assert!(scan("x = %<a <b> c>").is_balanced());
}

#[test]
fn percent_repeated_delimiter() {
    assert!(scan("x = %q|a ( b|").is_balanced());
    assert!(scan("x = %r!do!").is_balanced());
}

#[test]
fn percent_backslash_delimiter() {
    assert!(scan(r"x = %q\a ( b\").is_balanced());
}

#[test]
fn modulo_is_not_a_literal() {
    assert!(scan("x = a % (b)").is_balanced());
    assert!(scan("x %= 3").is_balanced());
}

#[test]
fn unterminated_percent_literal() {
    let state = scan("x = %w(a b\nc");
    assert_eq!(state.in_string(), Some(4));
}

// === Character literals and variables ===

#[test]
fn character_literals_hide_brackets() {
    assert!(scan("x = [?(, ?\\), ?\\C-a]").is_balanced());
}

#[test]
fn ternary_question_mark() {
    assert!(scan("x = a ? (b) : c").is_balanced());
}

#[test]
fn sigils_hide_keywords() {
    assert!(scan("@end = $if + @@do").is_balanced());
    assert!(scan("x = $'").is_balanced());
}

// === Symbols and method calls ===

#[test]
fn symbols_hide_keywords_and_brackets() {
    assert!(scan("x = [:if, :end?, :\"do(\", :[], :<=>]").is_balanced());
}

#[test]
fn scope_operator_is_not_symbol() {
    assert!(scan("Foo::Class.new(1)").is_balanced());
}

#[test]
fn method_calls_hide_keywords() {
    assert!(scan("x.class.end\ny = 1..2").is_balanced());
}

#[test]
fn labels_and_predicates_are_not_keywords() {
    assert!(scan("foo(if: 1, end: 2)").is_balanced());
    assert!(scan("x.end? || begin!").is_balanced());
}

// === Comments ===

#[test]
fn line_comment_hides_rest_of_line() {
    let state = scan("x = 1 # if (\ny");
    assert!(state.is_balanced());
}

#[test]
fn block_comment_skips_to_end_marker() {
    let state = scan("=begin\nif (\n=end\nx");
    assert!(state.is_balanced());
}

#[test]
fn block_comment_requires_line_start() {
    // `x =begin` assigns a `begin` block.
    let state = scan("x =begin\nif y");
    assert_eq!(state.depth(), 2);
}

#[test]
fn unterminated_block_comment() {
    let state = scan("x\n=begin\nif (");
    assert_eq!(state.in_string(), Some(2));
}

// === Heredocs ===

#[test]
fn heredoc_body_is_skipped() {
    let state = scan("x = <<EOS\nif (\nEOS\ny");
    assert!(state.is_balanced());
}

#[test]
fn heredoc_rest_of_line_is_scanned() {
    let state = scan("foo(<<EOS, bar do\nbody\nEOS\n");
    assert_eq!(state.nest().len(), 2);
}

#[test]
fn heredocs_sharing_a_line_skip_bodies_in_order() {
    let state = scan("foo(<<A, <<B)\nif (\nA\nend ]\nB\nbar(");
    assert_eq!(state.in_string(), None);
    assert_eq!(state.nest().len(), 1);
}

#[test]
fn unterminated_heredoc_on_shared_line() {
    // `B` never terminates.
    assert_eq!(scan("foo(<<A, <<B)\na\nA\nb\n").in_string(), Some(12));
    // `A` never terminates, so `B` in the body is just text.
    assert_eq!(scan("x(<<A, <<B)\nB\n").in_string(), Some(5));
}

#[test]
fn indented_terminator_needs_dash_or_tilde() {
    assert!(scan("x = <<-EOS\n  if\n  EOS\n").is_balanced());
    assert!(scan("x = <<~EOS\n  if\n  EOS\n").is_balanced());
    let state = scan("x = <<EOS\n  if\n  EOS\n");
    assert_eq!(state.in_string(), Some(9));
}

#[test]
fn quoted_heredoc_identifier() {
    assert!(scan("x = <<'EOS'\n#{(\nEOS\n").is_balanced());
    assert!(scan("x = <<\"END\"\nend\nEND\n").is_balanced());
}

#[test]
fn heredoc_open_at_bound() {
    let src = "x = <<EOS\nabc\nEOS\ny";
    assert_eq!(scan_to(src, 13).in_string(), Some(9));
    // The terminator line itself is outside the heredoc.
    assert_eq!(scan_to(src, 14).in_string(), None);
}

#[test]
fn shift_operator_is_not_heredoc() {
    assert!(scan("a << b\nc <<= 1").is_balanced());
    assert!(scan("x = y<<z").is_balanced());
}

// === Brackets ===

#[test]
fn balanced_brackets_return_to_zero() {
    assert!(scan("a(b[c{d}], (e))").is_balanced());
}

#[test]
fn deep_paren_records_anchor() {
    let state = scan("foo(1, 2,");
    assert_eq!(state.depth(), 0);
    let entry = state.innermost();
    assert_eq!(
        entry.map(|e| (e.bracket(), e.open(), e.pos(), e.is_anchored())),
        Some((Some(Bracket::Paren), 3, 4, true))
    );
    assert_eq!(
        state.anchors().last().map(|a| (a.pos(), a.depth())),
        Some((4, 0))
    );
}

#[test]
fn space_style_anchors_on_content() {
    let state = scan("foo(  bar,");
    assert_eq!(state.innermost().map(|e| e.pos()), Some(6));
    let state = scan("foo(  # note\n");
    assert_eq!(state.innermost().map(|e| e.pos()), Some(4));
}

#[test]
fn curly_brace_nests_like_a_block() {
    let state = scan("foo.map { |x|");
    assert_eq!(state.depth(), 1);
    assert_eq!(state.innermost().map(|e| e.is_anchored()), Some(false));
}

#[test]
fn deep_bracket_restores_outer_depth() {
    let state = scan("if x\n  foo(a,\n    b)\n");
    assert_eq!(state.depth(), 1);
    assert_eq!(state.nest().len(), 1);
    assert!(state.anchors().is_empty());
}

#[test]
fn brackets_nest_without_deep_styles() {
    let options = ScanOptions::new(DeepIndentTable::none());
    let state = match scan_with("foo(bar[", options) {
        Ok((state, _)) => state,
        Err(err) => panic!("{err}"),
    };
    assert_eq!(state.depth(), 2);
    assert!(state.anchors().is_empty());
}

#[test]
fn strict_underflow_is_invalid_nest() {
    let result = scan_with("a)\nb", ScanOptions::default());
    assert_eq!(
        result.map(|(s, _)| s),
        Err(ScanError::InvalidNest { closer: ')', pos: 1 })
    );
}

#[test]
fn lenient_underflow_goes_negative() {
    let result = scan_with("a) }", ScanOptions::default().lenient());
    assert_eq!(result.map(|(s, _)| s.depth()), Ok(-2));
}

// === Keywords ===

#[test]
fn if_block_nests() {
    let state = scan("if x\n  y\n");
    assert_eq!(state.depth(), 1);
    assert_eq!(state.innermost().map(|e| (e.open(), e.pos())), Some((0, 2)));
    assert!(state.innermost().is_some_and(|e| e.is_keyword()));
}

#[test]
fn modifier_if_does_not_nest() {
    assert!(scan("x = 1 if y").is_balanced());
    assert!(scan("return unless ok").is_balanced());
    assert!(scan("x += 1 while x < 10").is_balanced());
}

#[test]
fn if_after_assignment_nests() {
    assert_eq!(scan("x = if y").depth(), 1);
}

#[test]
fn end_closes_and_counts() {
    let state = scan("def a\n  if b then c end\nend\nend");
    assert_eq!(state.depth(), -1);
    assert!(state.nest().is_empty());
    assert_eq!(state.keywords_opened(), 2);
    assert_eq!(state.keywords_closed(), 3);
}

#[test]
fn end_suffix_is_not_keyword() {
    assert!(scan("send(x)\nlegend = 1\nend_time").is_balanced());
}

#[test]
fn redundant_do_on_loop_head() {
    assert_eq!(scan("while x do\n").depth(), 1);
    assert_eq!(scan("for a in b do\n").depth(), 1);
    assert_eq!(scan("foo.each do |x|\n").depth(), 1);
    assert_eq!(scan("while x\n  foo do\n").depth(), 2);
}

#[test]
fn def_skips_operator_names() {
    assert_eq!(scan("def <<(x)\n").depth(), 1);
    assert_eq!(scan("def end?\n").depth(), 1);
    assert_eq!(scan("def self.if; end").depth(), 0);
}

#[test]
fn multibyte_identifiers() {
    assert!(scan("café = (1)\nnaïve_end = 2").is_balanced());
}
