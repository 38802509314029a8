mod common;

#[test]
fn if_true_runs_the_then_branch() {
    let out = common::run("if_true", r#"
        if (true) print "good"; else print "bad";
        if (false) print "bad"; else print "good";
    "#);

    assert_eq!(out.stdout, "good\ngood\n");
}

#[test]
fn dangling_else_binds_to_the_nearest_if() {
    let out = common::run("if_dangling_else", r#"
        if (true) if (false) print "bad"; else print "good";
    "#);

    assert_eq!(out.stdout, "good\n");
}

#[test]
fn else_branch_only_runs_when_condition_is_falsy() {
    let out = common::run("if_else_flow", r#"
        if (true) print "good"; else print "bad";
        if (false) print "bad"; else print "good";
        if (true) { print "block"; }
    "#);

    assert_eq!(out.stdout, "good\ngood\nblock\n");
}

#[test]
fn truthiness_drives_the_branch_taken() {
    let out = common::run("if_truthiness", r#"
        if (false) print "bad"; else print "false is falsy";
        if (nil) print "bad"; else print "nil is falsy";
        if (true) print "true is truthy";
        if (0) print "zero is truthy";
        if ("") print "empty string is truthy";
    "#);

    assert_eq!(
        out.stdout,
        "false is falsy\nnil is falsy\ntrue is truthy\nzero is truthy\nempty string is truthy\n"
    );
}

#[test]
fn a_class_declaration_cannot_be_the_then_branch() {
    let out = common::run("if_class_in_then", "if (true) class Foo {}");

    assert!(out.stderr.contains("Expect expression."));
    assert_eq!(out.code, 65);
}

#[test]
fn a_var_declaration_cannot_be_the_else_branch() {
    let out = common::run("if_var_in_else", "if (true) print 1; else var a = 1;");

    assert!(out.stderr.contains("Expect expression."));
    assert_eq!(out.code, 65);
}
