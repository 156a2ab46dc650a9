use std::fs;

use nestrepl::repl::{Arity, CommandOutcome, CommandSpec, Value};

use crate::support::{engine, ScriptedEditor};

#[test]
fn test_players_is_not_play() {
    let (mut engine, out) = engine("let players = 3\nplayers\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 3\n=> 3\n");
}

#[test]
fn test_unmatched_line_is_an_expression() {
    let (mut engine, out) = engine("hist2\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "NameError: undefined local variable `hist2`\n");
}

#[test]
fn test_clear_buffer() {
    let (mut engine, out) = engine("(1 +\n!\n5\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "Input buffer cleared!\n=> 5\n");
}

#[test]
fn test_show_input_does_not_evaluate() {
    let (mut engine, out) = engine("(1 +\n2 +\nshow-input\n3)\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "1: (1 +\n2: 2 +\n=> 6\n");
}

#[test]
fn test_amend_then_evaluate() {
    let (mut engine, out) = engine("(1 +\n3 +\namend-line 2 2)\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "1: (1 +\n2: 2)\n=> 3\n");
}

#[test]
fn test_amend_out_of_range_reports_and_continues() {
    let (mut engine, out) = engine("(1 +\n%5 x\n2)\n");
    engine.start(Value::main());
    assert_eq!(
        out.text(),
        "Error: Line range 5 is out of range for a 1-line input buffer\n=> 3\n"
    );
}

#[test]
fn test_hist_head_and_tail() {
    let (mut engine, out) = engine("1\n2\n3\n4\n5\nhist --head 2\nhist --tail 2\n");
    engine.start(Value::main());
    assert!(out
        .text()
        .ends_with("=> 5\n0: 1\n1: 2\n4: 5\n5: hist --head 2\n"));
}

#[test]
fn test_hist_show_with_huge_range_end() {
    let (mut engine, out) = engine("1\nhist --show 0..9223372036854775807\nhist --replay 5..9223372036854775807\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 1\n0: 1\nError: No history lines in range 5..9223372036854775807\n");
}

#[test]
fn test_hist_replay_range() {
    let (mut engine, out) = engine("let x = 1\n(x +\n1)\nhist --replay 1..2\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 1\n=> 2\n=> 2\n");
    assert_eq!(engine.history().len(), 4);
}

#[test]
fn test_hist_exclude_hides_commands() {
    let (mut engine, out) = engine("1\nshow-input\nhist -e\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 1\n0: 1\n");
}

#[test]
fn test_play_method() {
    let (mut engine, out) = engine("let area = (\n3 *\n4)\nplay -m area -l 1..2\n5)\n");
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 12\n=> 15\n");
}

#[test]
fn test_show_source_of_a_binding() {
    let (mut engine, out) = engine("let area = (\n3 *\n4)\n$ area\n");
    engine.start(Value::main());
    assert_eq!(
        out.text(),
        "=> 12\nFrom: area\nNumber of lines: 3\n\nlet area = (\n3 *\n4)\n"
    );
}

#[test]
fn test_play_needs_a_source() {
    let (mut engine, out) = engine("play\n");
    engine.start(Value::main());
    assert!(out.text().starts_with("Error: "));
}

#[test]
fn test_edit_replaces_buffer() {
    let (engine, out) = engine("(1 +\nedit\n");
    let editor = ScriptedEditor {
        replacement: Some("2 + 2\n".to_string()),
        ..ScriptedEditor::default()
    };
    let opened = editor.opened.clone();
    let mut engine = engine.with_editor(editor);
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 4\n");
    assert_eq!(*opened.borrow(), vec![1]);
}

#[test]
fn test_edited_text_without_final_newline() {
    let (engine, out) = engine("edit\n+\nshow-input\n");
    let editor = ScriptedEditor {
        replacement: Some("(1 +\n2".to_string()),
        ..ScriptedEditor::default()
    };
    let mut engine = engine.with_editor(editor);
    engine.start(Value::main());
    assert_eq!(out.text(), "1: (1 +\n2: 2\n3: +\n");
}

#[test]
fn test_edit_file_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answer.calc");
    fs::write(&path, "7 * 6\n").unwrap();

    let script = format!("edit --reload {}:1\n", path.display());
    let (engine, out) = engine(&script);
    let mut engine = engine.with_editor(ScriptedEditor::default());
    engine.start(Value::main());
    assert_eq!(out.text(), "=> 42\n");
}

#[test]
fn test_custom_command_and_alias() {
    let (mut engine, out) = engine("greet world\nhi there\n");
    let registry = engine.registry_mut();
    registry.register(CommandSpec::new(
        "greet",
        "Say hello",
        Arity::Fixed(1),
        |args, ctx| {
            let name = args.into_iter().flatten().next().unwrap_or_default();
            ctx.say(format!("hello {}", name))?;
            Ok(CommandOutcome::Continue)
        },
    ));
    registry.alias_name("hi", "greet").unwrap();

    engine.start(Value::main());
    assert_eq!(out.text(), "hello world\nhello there\n");
}

#[test]
fn test_help_lists_commands() {
    let (mut engine, out) = engine("help\n");
    engine.start(Value::main());
    let text = out.text();
    assert!(text.starts_with("Commands:\n"));
    assert!(text.contains("\n  hist "));
    assert!(text.contains("\n  !!! "));
}
