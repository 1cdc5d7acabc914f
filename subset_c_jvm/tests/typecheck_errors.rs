//! Semantic error reporting, one scenario per diagnostic family.

use pretty_assertions::assert_eq;
use subset_c_jvm::typecheck::{check, Checked};
use subset_c_jvm_parser::parse;

fn check_src(source: &str) -> Checked {
    let program = parse(source).expect("parse failed");
    check(&program, "test.c")
}

/// The messages produced for `source`, in order.
fn messages(source: &str) -> Vec<String> {
    check_src(source)
        .diagnostics
        .into_iter()
        .map(|d| d.message)
        .collect()
}

fn single_message(source: &str) -> String {
    let mut all = messages(source);
    assert_eq!(all.len(), 1, "expected one diagnostic, got {:?}", all);
    all.remove(0)
}

#[test]
fn test_undeclared_identifier() {
    assert_eq!(
        single_message("int main() { return x; }"),
        "Undeclared identifier 'x'"
    );
}

#[test]
fn test_redeclaration_same_scope() {
    assert_eq!(
        single_message("int main() { int a; int a; return 0; }"),
        "Redeclaration of 'a'"
    );
}

#[test]
fn test_shadowing_is_not_redeclaration() {
    let checked = check_src("int a; int main() { int a; a = 1; return a; }");
    assert!(checked.is_ok(), "{:?}", checked.diagnostics);
}

#[test]
fn test_const_assignment_reports_file_and_line() {
    let source = "const int x = 3;\nint main(){ x = 4; return x; }";
    let checked = check_src(source);
    assert_eq!(checked.diagnostics.len(), 1);
    let diagnostic = &checked.diagnostics[0];
    assert_eq!(diagnostic.message, "Assignment to read-only variable 'x'");
    assert_eq!(diagnostic.file, "test.c");
    assert_eq!(diagnostic.line, 2);
}

#[test]
fn test_const_member_through_const_struct() {
    assert_eq!(
        single_message(
            "struct P { int x; };\
             int main() { const struct P p; p.x = 1; return 0; }"
        ),
        "Assignment to read-only variable 'x'"
    );
}

#[test]
fn test_increment_of_const() {
    assert_eq!(
        single_message("int main() { const char c = 'a'; c++; return 0; }"),
        "Increment of read-only variable 'c'"
    );
    assert_eq!(
        single_message("int main() { const int n = 1; --n; return 0; }"),
        "Decrement of read-only variable 'n'"
    );
}

#[test]
fn test_assignment_type_mismatch() {
    assert_eq!(
        single_message("int main() { int a[3]; float f; f = a; return 0; }"),
        "Incompatible types in assignment"
    );
    // Narrowing float -> int is not a widening.
    assert_eq!(
        single_message("int main() { int i; i = 1.5; return i; }"),
        "Incompatible types in assignment"
    );
}

#[test]
fn test_compound_assignment_rules_on_arrays() {
    // += with an integral right side adjusts the reference.
    let checked = check_src("int main() { int a[3]; a += 2; return 0; }");
    assert!(checked.is_ok(), "{:?}", checked.diagnostics);
    // *= is rejected for arrays.
    assert_eq!(
        single_message("int main() { int a[3]; a *= 2; return 0; }"),
        "Incompatible types in assignment"
    );
}

#[test]
fn test_operator_operand_requirements() {
    assert_eq!(
        single_message("int main() { int a[2]; return a * 2; }"),
        "Operator '*' requires numeric operands"
    );
    assert_eq!(
        single_message("int main() { return 1.5 % 2; }"),
        "Operator '%' requires integral operands"
    );
    assert_eq!(
        single_message("int main() { return ~1.5; }"),
        "Operator '~' requires an integral operand"
    );
}

#[test]
fn test_char_arithmetic_yields_char_and_mixed_yields_wider() {
    // char+char, int+int, int+float are all fine.
    let checked = check_src(
        "int main() { char c; float f; c = 'a'; f = 1 + 2.5; c = c + c; return 1 + 2; }",
    );
    assert!(checked.is_ok(), "{:?}", checked.diagnostics);
}

#[test]
fn test_void_variable_and_parameter() {
    assert_eq!(
        single_message("int main() { void v; return 0; }"),
        "Variable 'v' declared void"
    );
    assert_eq!(
        single_message("int f(void x) { return 0; } int main() { return 0; }"),
        "Parameter 'x' declared void"
    );
}

#[test]
fn test_return_rules() {
    assert_eq!(
        single_message("int main() { int a[2]; return a; }"),
        "Return type mismatch"
    );
    assert_eq!(
        single_message("void f() { return 1; } int main() { f(); return 0; }"),
        "Return with a value in void function"
    );
    assert_eq!(
        single_message("int main() { return; }"),
        "Return with no value in non-void function"
    );
}

#[test]
fn test_call_arity_and_argument_types() {
    assert_eq!(
        single_message("int main() { putint(1, 2); return 0; }"),
        "Wrong number of arguments to 'putint'"
    );
    assert_eq!(
        single_message("int main() { int a[2]; putint(a); return 0; }"),
        "Incompatible argument 1 to 'putint'"
    );
}

#[test]
fn test_argument_widening_is_allowed() {
    let checked = check_src("int main() { putfloat(1); putchar('c'); return 0; }");
    assert!(checked.is_ok(), "{:?}", checked.diagnostics);
}

#[test]
fn test_call_of_non_function() {
    assert_eq!(
        single_message("int main() { int f; f = 1; return f(); }"),
        "Called object 'f' is not a function"
    );
}

#[test]
fn test_array_misuse() {
    assert_eq!(
        single_message("int main() { int x; x = 1; return x[0]; }"),
        "Subscripted value is not an array"
    );
    assert_eq!(
        single_message("int main() { int a[2]; return a[1.5]; }"),
        "Array index must be integral"
    );
}

#[test]
fn test_struct_misuse() {
    assert_eq!(
        single_message("int main() { int x; x = 1; return x.y; }"),
        "Member access on non-struct value"
    );
    assert_eq!(
        single_message("struct P { int x; }; int main() { struct P p; return p.y; }"),
        "No member 'y' in struct 'P'"
    );
    assert_eq!(
        single_message("struct S { int a; }; struct S { int b; }; int main() { return 0; }"),
        "Redefinition of struct 'S'"
    );
    assert_eq!(
        single_message("int main() { struct T t; return 0; }"),
        "Unknown struct type 'T'"
    );
}

#[test]
fn test_struct_member_access_types_correctly() {
    let checked = check_src("struct P { int x; }; int main() { struct P p; return p.x; }");
    assert!(checked.is_ok(), "{:?}", checked.diagnostics);
}

#[test]
fn test_break_continue_outside_loop() {
    assert_eq!(
        single_message("int main() { break; return 0; }"),
        "'break' outside of loop"
    );
    assert_eq!(
        single_message("int main() { continue; return 0; }"),
        "'continue' outside of loop"
    );
}

#[test]
fn test_break_continue_inside_loop_are_fine() {
    let checked = check_src(
        "int main() { int i; for (i = 0; i < 9; i++) { if (i == 2) continue; if (i == 5) break; } return i; }",
    );
    assert!(checked.is_ok(), "{:?}", checked.diagnostics);
}

#[test]
fn test_pointer_operators_rejected() {
    assert_eq!(
        single_message("int main() { int x; x = 1; return *x; }"),
        "Pointer operator '*' is not supported"
    );
    assert_eq!(
        single_message("int main() { int x; x = 1; return &x; }"),
        "Pointer operator '&' is not supported"
    );
}

#[test]
fn test_one_error_per_mistake() {
    // The undeclared identifier poisons the sum, which must not produce a
    // second "operand" diagnostic.
    assert_eq!(
        messages("int main() { return nope + 1; }"),
        vec!["Undeclared identifier 'nope'".to_string()]
    );
}

#[test]
fn test_multiple_independent_errors_all_reported() {
    let all = messages("int main() { int a; int a; return b; }");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], "Redeclaration of 'a'");
    assert_eq!(all[1], "Undeclared identifier 'b'");
}

#[test]
fn test_for_scope_closes_after_loop() {
    assert_eq!(
        single_message(
            "int main() { int s; s = 0; for (int i = 0; i < 3; i++) s = s + i; return i; }"
        ),
        "Undeclared identifier 'i'"
    );
}
