mod common;

#[test]
fn is_right_associative() {
    let out = common::run("assignment_associativity", r#"
        var a = "a"; var b = "b"; var c = "c";
        a = b = c;
        print a; print b; print c;
    "#);

    assert_eq!(out.stdout, "c\nc\nc\n");
    assert_eq!(out.code, 0);
}

#[test]
fn global_reflects_reassignment() {
    let out = common::run("assignment_global", r#"
        var a = "before";
        print a;
        a = "after";
        print a;
    "#);

    assert_eq!(out.stdout, "before\nafter\n");
}

#[test]
fn local_reflects_reassignment() {
    let out = common::run("assignment_local", r#"
        {
            var a = "before";
            print a;
            a = "after";
            print a;
        }
    "#);

    assert_eq!(out.stdout, "before\nafter\n");
}

#[test]
fn invalid_target_reports_but_does_not_abort() {
    let out = common::run("assignment_invalid_target", r#"
        var a = "a";
        (a) = "value";
    "#);

    assert!(out.stderr.contains("Error at '=': Invalid assignment target."));
    assert_eq!(out.code, 65);
}

#[test]
fn invalid_infix_target_is_reported() {
    let out = common::run("assignment_infix_target", r#"
        var a = "a"; var b = "b";
        a + b = "value";
    "#);

    assert!(out.stderr.contains("Invalid assignment target."));
    assert_eq!(out.code, 65);
}

#[test]
fn undefined_assignment_is_a_runtime_error() {
    let out = common::run("assignment_undefined", "unknown = \"value\";");

    assert!(out.stderr.contains("Undefined variable 'unknown'."));
    assert_eq!(out.code, 70);
}
