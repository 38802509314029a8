mod common;

#[test]
fn duplicate_local_declaration_is_a_resolver_error() {
    let out = common::run("variable_duplicate_local", r#"
        {
            var a = "first";
            var a = "second";
        }
    "#);

    assert!(out.stderr.contains("Already a variable with this name in this scope."));
    assert_eq!(out.code, 65);
}

#[test]
fn a_parameter_colliding_with_a_body_local_is_a_resolver_error() {
    let out = common::run("variable_collide_with_parameter", r#"
        fun f(a) {
            var a = "shadow";
        }
    "#);

    assert!(out.stderr.contains("Already a variable with this name in this scope."));
}

#[test]
fn duplicate_parameter_names_are_a_resolver_error() {
    let out = common::run("variable_duplicate_parameter", "fun f(arg, arg) {}");

    assert!(out.stderr.contains("Already a variable with this name in this scope."));
}

#[test]
fn reading_a_local_in_its_own_initializer_is_a_resolver_error() {
    let out = common::run("variable_self_reference_in_initializer", r#"
        var a = "outer";
        {
            var a = a;
        }
    "#);

    assert!(out.stderr.contains("Can't read local variable in its own initializer."));
    assert_eq!(out.code, 65);
}

#[test]
fn a_function_declared_before_use_sees_its_own_closure_correctly() {
    let out = common::run("variable_early_bound", r#"
        var a = "outer";
        {
            fun f() { print a; }
            f();
            var a = "inner";
            f();
        }
    "#);

    assert_eq!(out.stdout, "outer\nouter\n");
}

#[test]
fn nested_block_reads_the_enclosing_binding() {
    let out = common::run("variable_in_nested_block", r#"
        var a = "outer";
        { { { print a; } } }
    "#);

    assert_eq!(out.stdout, "outer\n");
}

#[test]
fn redeclaring_a_global_variable_is_allowed() {
    let out = common::run("variable_redeclare_global", r#"
        var a = "before";
        var a;
        print a;
    "#);

    assert!(out.stderr.contains("Uninitialized variable 'a'."));
    assert_eq!(out.code, 70);
}

#[test]
fn redefining_a_global_variable_takes_the_new_value() {
    let out = common::run("variable_redefine_global", r#"
        var a = 1;
        var a = 2;
        print a;
    "#);

    assert_eq!(out.stdout, "2\n");
}

#[test]
fn each_block_gets_a_fresh_scope_even_when_reusing_names() {
    let out = common::run("variable_scope_reuse", r#"
        { var a = "first"; print a; }
        { var a = "second"; print a; }
    "#);

    assert_eq!(out.stdout, "first\nsecond\n");
}

#[test]
fn shadowing_a_global_inside_a_block_does_not_affect_the_global() {
    let out = common::run("variable_shadow_global", r#"
        var a = "global";
        {
            var a = "shadow";
            print a;
        }
        print a;
    "#);

    assert_eq!(out.stdout, "shadow\nglobal\n");
}

#[test]
fn shadowing_a_local_in_a_nested_block_does_not_affect_the_outer_local() {
    let out = common::run("variable_shadow_local", r#"
        {
            var a = "local";
            {
                var a = "shadow";
                print a;
            }
            print a;
        }
    "#);

    assert_eq!(out.stdout, "shadow\nlocal\n");
}

#[test]
fn reading_an_undefined_global_is_a_runtime_error() {
    let out = common::run("variable_undefined_global", "print notDefined;");

    assert!(out.stderr.contains("Undefined variable 'notDefined'."));
    assert_eq!(out.code, 70);
}

#[test]
fn reading_an_undefined_name_inside_a_block_is_a_runtime_error() {
    let out = common::run("variable_undefined_local", "{ print notDefined; }");

    assert!(out.stderr.contains("Undefined variable 'notDefined'."));
    assert_eq!(out.code, 70);
}

#[test]
fn a_var_with_no_initializer_reads_as_uninitialized() {
    let out = common::run("variable_uninitialized", "var a; print a;");

    assert!(out.stderr.contains("Uninitialized variable 'a'."));
    assert_eq!(out.code, 70);
}

#[test]
fn an_unreachable_undefined_reference_never_runs() {
    let out = common::run("variable_unreached_undefined", r#"
        if (false) { print notDefined; }
        print "ok";
    "#);

    assert_eq!(out.stdout, "ok\n");
    assert_eq!(out.code, 0);
}

#[test]
fn false_cannot_be_used_as_a_variable_name() {
    let out = common::run("variable_use_false_as_name", "var false = 1;");

    assert!(out.stderr.contains("Expect variable name."));
    assert_eq!(out.code, 65);
}

#[test]
fn nil_cannot_be_used_as_a_variable_name() {
    let out = common::run("variable_use_nil_as_name", "var nil = 1;");

    assert!(out.stderr.contains("Expect variable name."));
}

#[test]
fn this_cannot_be_used_as_a_variable_name() {
    let out = common::run("variable_use_this_as_name", "var this = 1;");

    assert!(out.stderr.contains("Expect variable name."));
}

#[test]
fn a_global_initializer_can_reference_another_global() {
    let out = common::run("variable_use_global_in_initializer", r#"
        var a = "value";
        var b = a;
        print b;
    "#);

    assert_eq!(out.stdout, "value\n");
}
