mod common;

#[test]
fn line_comment_at_eof() {
    let out = common::run("comment_line_at_eof", "print \"ok\"; // trailing comment, no newline after");

    assert_eq!(out.stdout, "ok\n");
    assert_eq!(out.code, 0);
}

#[test]
fn file_containing_only_a_line_comment_runs_to_nothing() {
    let out = common::run("comment_only_line", "// nothing to see here");

    assert_eq!(out.stdout, "");
    assert_eq!(out.code, 0);
}

#[test]
fn block_comment_with_unicode_inside_is_skipped() {
    let out = common::run("comment_unicode", "/* héllo wörld ☺ */ print \"ok\";");

    assert_eq!(out.stdout, "ok\n");
}

#[test]
fn block_comment_does_not_nest() {
    // The first "*/" closes the comment, leaving a stray "*/" as source text.
    let out = common::run("comment_block_non_nesting", "/* /* inner */ print \"ok\"; */");

    assert!(out.stderr.contains("Unexpected character"));
    assert_eq!(out.code, 65);
}
