use std::cell::RefCell;
use std::rc::Rc;

use nestrepl::repl::Value;

use crate::support::engine;

#[test]
fn test_multi_line_expression_is_evaluated_once_complete() {
    let (mut engine, out) = engine("[1,\n2,\n3] + [4]\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "=> [1, 2, 3, 4]\n");
}

#[test]
fn test_jump_to_top_pops_exactly_two_sessions() {
    let (engine, out) = engine("cd 1\ncd 2\njump-to 0\nself\n");
    let mut engine = engine.on_after_session(|out, _target, level| {
        writeln!(out, "<left {}>", level).unwrap();
    });
    engine.start(Value::main());
    assert_eq!(out.text(), "<left 2>\n<left 1>\n=> main\n<left 0>\n");
}

#[test]
fn test_exit_all_ends_the_engine() {
    let (engine, out) = engine("cd 1\ncd 2\nexit-all\nself\n");
    let left = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&left);
    let mut engine = engine.on_after_session(move |_out, _target, level| seen.borrow_mut().push(level));

    assert_eq!(engine.start(Value::main()), Value::main());
    assert_eq!(*left.borrow(), vec![2, 1, 0]);
    // the line after exit-all is never read
    assert!(out.text().is_empty());
}

#[test]
fn test_before_hook_sees_target_and_level() {
    let (engine, out) = engine("cd [1]\n");
    let mut engine = engine.on_before_session(|out, target, level| {
        writeln!(out, "entering {} at {}", target.inspect(), level).unwrap();
    });
    engine.start(Value::main());
    assert_eq!(out.text(), "entering main at 0\nentering [1] at 1\n");
}

#[test]
fn test_cd_navigation() {
    let script = "cd 1\ncd 2\ncd 3\nnesting\ncd ..\nself\ncd /\nself\n";
    let (mut engine, out) = engine(script);
    engine.start(Value::main());
    assert_eq!(
        out.text(),
        "Nesting status:\n--\n0. main (top level)\n1. 1\n2. 2\n3. 3\n=> 2\n=> main\n"
    );
}

#[test]
fn test_cd_failure_stays_in_session() {
    let (mut engine, out) = engine("cd nope\nself\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "NameError: undefined local variable `nope`\n=> main\n");
}

#[test]
fn test_last_result_is_shared_between_sessions() {
    let (mut engine, out) = engine("6 * 7\ncd 1\n_\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 42\n=> 42\n");
    assert_eq!(engine.context().eval_count(), 2);
}

#[test]
fn test_jump_to_current_level() {
    let (mut engine, out) = engine("cd 1\njump-to 1\nself\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "Already at nesting level 1\n=> 1\n");
}
