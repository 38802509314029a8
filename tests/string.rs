mod common;

#[test]
fn literals_print_without_surrounding_quotes() {
    let out = common::run("string_literals", r#"
        print "()";
        print "a string";
        print "A~unicode";
    "#);

    assert_eq!(out.stdout, "()\na string\nA~unicode\n");
}

#[test]
fn a_string_can_span_multiple_lines() {
    let out = common::run("string_multiline", "print \"1\n2\n3\";");

    assert_eq!(out.stdout, "1\n2\n3\n");
}

#[test]
fn the_line_counter_keeps_advancing_after_a_multiline_string() {
    let out = common::run("string_error_after_multiline", "print \"a\nb\nc\";\nerr;");

    assert!(out.stderr.contains("Undefined variable 'err'."));
    assert_eq!(out.code, 70);
}

#[test]
fn an_unterminated_string_is_a_scan_error_at_its_opening_line() {
    let out = common::run("string_unterminated", "var a = 1;\nprint \"unterminated");

    assert!(out.stderr.contains("[2] Error: Unterminated string."));
    assert_eq!(out.code, 65);
}
