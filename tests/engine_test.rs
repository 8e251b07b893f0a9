//! Integration tests for the recipe engine through the public API.
//!
//! Each test builds a recipe document, runs it against a temp store with a
//! scripted [`MockUI`], and asserts on the observable outcome: files
//! written, messages shown, and errors raised.

use stencil::recipe::{load_actions, RecipeEngine};
use stencil::store::Store;
use stencil::ui::MockUI;
use stencil::StencilError;
use tempfile::TempDir;

fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open_in(dir.path()).unwrap();
    (dir, store)
}

fn run(recipe: &str, store: &Store, ui: &mut MockUI) -> stencil::Result<()> {
    let actions = load_actions(recipe)?;
    RecipeEngine::new(store, ui).run(&actions)
}

#[test]
fn prompt_template_command_pipeline() {
    let (dir, store) = temp_store();
    store
        .insert_template("report", "Report for {{ customer }}\n")
        .unwrap();

    let rendered = dir.path().join("report.txt");
    let copied = dir.path().join("copy.txt");
    let recipe = format!(
        r#"
[[actions]]
type = "prompt"
prompt = "Customer name?"
var = "customer"

[[actions]]
type = "template"
name = "report"
output = "{rendered}"
[actions.context]
customer = "$(customer)"

[[actions]]
type = "command"
command = "cp {rendered} {copied}"
"#,
        rendered = rendered.display(),
        copied = copied.display()
    );

    let mut ui = MockUI::new();
    ui.queue_input_response("ACME");
    run(&recipe, &store, &mut ui).unwrap();

    assert_eq!(
        std::fs::read_to_string(&copied).unwrap(),
        "Report for ACME\n"
    );
    assert!(ui.has_message("[1] Stored variable 'customer'."));
    assert!(ui.has_message("[2] Rendering template 'report'."));
    assert!(ui.has_message("[3] Command completed successfully."));
}

#[test]
fn command_actions_see_variables_in_their_environment() {
    let (dir, store) = temp_store();
    let out = dir.path().join("env.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'prompt'\nprompt = 'Release?'\nvar = 'RELEASE'\n\
         [[actions]]\ntype = 'command'\ncommand = 'printf %s \"$RELEASE\" > {}'\n",
        out.display()
    );

    let mut ui = MockUI::new();
    ui.queue_input_response("v2.1");
    run(&recipe, &store, &mut ui).unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "v2.1");
}

#[test]
fn negative_gate_skips_only_the_gated_action() {
    let (dir, store) = temp_store();
    let skipped = dir.path().join("skipped.txt");
    let kept = dir.path().join("kept.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'command'\ngate = 'Write the first file?'\ncommand = 'touch {}'\n\
         [[actions]]\ntype = 'command'\ncommand = 'touch {}'\n",
        skipped.display(),
        kept.display()
    );

    let mut ui = MockUI::new();
    ui.queue_confirm_response(false);
    run(&recipe, &store, &mut ui).unwrap();

    assert!(!skipped.exists());
    assert!(kept.exists());
    assert!(ui.has_message("[1] Skipping action."));
    assert_eq!(ui.confirms_shown(), ["[1] Write the first file?".to_string()]);
}

#[test]
fn gate_text_sees_variables_stored_by_earlier_actions() {
    let (_dir, store) = temp_store();
    let recipe = "[[actions]]\ntype = 'prompt'\nprompt = 'Env?'\nvar = 'env'\n\
                  [[actions]]\ntype = 'command'\ngate = 'Deploy to $(env)?'\ncommand = 'true'\n";

    let mut ui = MockUI::new();
    ui.queue_input_response("production");
    ui.queue_confirm_response(true);
    run(recipe, &store, &mut ui).unwrap();

    assert_eq!(ui.confirms_shown(), ["[2] Deploy to production?".to_string()]);
}

#[test]
fn template_action_merges_preset_into_editor_seed() {
    let (dir, store) = temp_store();
    store
        .insert_template("invite", "{{ host }} invites {{ guest }}")
        .unwrap();
    let out = dir.path().join("invite.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'template'\nname = 'invite'\noutput = '{}'\n\
         [actions.context]\nhost = 'Ada'\n",
        out.display()
    );

    let mut ui = MockUI::new();
    ui.queue_edit_response(Some("host = 'Ada'\nguest = 'Grace'".to_string()));
    run(&recipe, &store, &mut ui).unwrap();

    // The seed shown to the editor had the preset merged over the skeleton.
    let (seed, extension) = &ui.edits_shown()[0];
    assert!(seed.contains("host = \"Ada\""));
    assert!(seed.contains("guest = \"\""));
    assert_eq!(extension, ".toml");
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "Ada invites Grace");
}

#[test]
fn template_action_expands_dotted_context_keys() {
    let (dir, store) = temp_store();
    store
        .insert_template("letter", "To {{ user.name }} <{{ user.email }}>")
        .unwrap();
    let out = dir.path().join("letter.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'template'\nname = 'letter'\noutput = '{}'\n\
         [actions.context]\n'user.name' = 'Ada'\n'user.email' = 'ada@example.com'\n",
        out.display()
    );

    let mut ui = MockUI::new();
    // Editor returns the merged seed untouched.
    run(&recipe, &store, &mut ui).unwrap();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "To Ada <ada@example.com>"
    );
}

#[test]
fn template_action_renders_loop_over_filled_array() {
    let (dir, store) = temp_store();
    store
        .insert_template(
            "inventory",
            "{% for item in items %}{{ item.name }}: {{ item.qty }}\n{% endfor %}",
        )
        .unwrap();
    let out = dir.path().join("inventory.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'template'\nname = 'inventory'\noutput = '{}'\n",
        out.display()
    );

    let mut ui = MockUI::new();
    ui.queue_edit_response(Some(
        "[[items]]\nname = 'bolt'\nqty = '40'\n[[items]]\nname = 'nut'\nqty = '90'\n".to_string(),
    ));
    run(&recipe, &store, &mut ui).unwrap();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "bolt: 40\nnut: 90\n"
    );
    // The skeleton offered one empty row with both observed fields.
    let seed = &ui.edits_shown()[0].0;
    assert!(seed.contains("[[items]]"));
    assert!(seed.contains("name = \"\""));
    assert!(seed.contains("qty = \"\""));
}

#[test]
fn template_action_renders_command_blocks_after_evaluation() {
    let (dir, store) = temp_store();
    store
        .insert_template("status", "host: {>echo myhost<}\n")
        .unwrap();
    let out = dir.path().join("status.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'template'\nname = 'status'\noutput = '{}'\n",
        out.display()
    );

    let mut ui = MockUI::new();
    run(&recipe, &store, &mut ui).unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "host: myhost\n");
}

#[test]
fn unknown_type_aborts_leaving_prior_side_effects() {
    let (dir, store) = temp_store();
    let first = dir.path().join("first.txt");
    let never = dir.path().join("never.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'command'\ncommand = 'touch {}'\n\
         [[actions]]\ntype = 'surprise'\n\
         [[actions]]\ntype = 'command'\ncommand = 'touch {}'\n",
        first.display(),
        never.display()
    );

    let mut ui = MockUI::new();
    let err = run(&recipe, &store, &mut ui).unwrap_err();

    assert!(matches!(
        err,
        StencilError::UnknownActionType { index: 2, .. }
    ));
    assert!(first.exists());
    assert!(!never.exists());
}

#[test]
fn failed_render_aborts_before_later_actions() {
    let (dir, store) = temp_store();
    store
        .insert_template("strict", "{{ user.email }}")
        .unwrap();
    let never = dir.path().join("never.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'template'\nname = 'strict'\n\
         [[actions]]\ntype = 'command'\ncommand = 'touch {}'\n",
        never.display()
    );

    let mut ui = MockUI::new();
    // The variables session is closed without saving.
    ui.queue_edit_response(None);
    let err = run(&recipe, &store, &mut ui).unwrap_err();

    assert!(matches!(err, StencilError::EditorClosed { .. }));
    assert!(!never.exists());
}

#[test]
fn variables_do_not_exist_before_their_prompt_runs() {
    let (_dir, store) = temp_store();
    let recipe = "[[actions]]\ntype = 'command'\ncommand = 'echo $(late)'\n\
                  [[actions]]\ntype = 'prompt'\nprompt = 'Late?'\nvar = 'late'\n";

    let mut ui = MockUI::new();
    let err = run(recipe, &store, &mut ui).unwrap_err();

    match err {
        StencilError::UnknownVariable { name } => assert_eq!(name, "late"),
        other => panic!("expected UnknownVariable, got {:?}", other),
    }
}

#[test]
fn later_prompt_overwrites_earlier_value() {
    let (dir, store) = temp_store();
    let out = dir.path().join("value.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'prompt'\nprompt = 'First?'\nvar = 'v'\n\
         [[actions]]\ntype = 'prompt'\nprompt = 'Second?'\nvar = 'v'\n\
         [[actions]]\ntype = 'command'\ncommand = 'printf %s \"$v\" > {}'\n",
        out.display()
    );

    let mut ui = MockUI::new();
    ui.queue_input_response("old");
    ui.queue_input_response("new");
    run(&recipe, &store, &mut ui).unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "new");
}

#[test]
fn mixed_command_list_runs_in_order() {
    let (dir, store) = temp_store();
    let log = dir.path().join("order.txt");
    let recipe = format!(
        "[[actions]]\ntype = 'command'\ncommand = [['sh', '-c', 'echo argv >> {log}'], 'echo shell >> {log}']\n",
        log = log.display()
    );

    let mut ui = MockUI::new();
    run(&recipe, &store, &mut ui).unwrap();

    assert_eq!(std::fs::read_to_string(&log).unwrap(), "argv\nshell\n");
}
