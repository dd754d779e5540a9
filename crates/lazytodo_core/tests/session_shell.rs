use lazytodo_core::{
    authenticate, AuthService, FileNoteRepository, Flow, InMemoryCredentialStore, MenuChoice,
    NoteService, Priority, ScriptedTerminal, SessionShell, TaskStatus,
};
use std::path::Path;

fn shell(home_dir: &Path) -> SessionShell<FileNoteRepository> {
    SessionShell::new(NoteService::new(FileNoteRepository::new(home_dir)))
}

#[test]
fn full_session_creates_adds_completes_and_deletes() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    let mut term = ScriptedTerminal::new([
        "1", "Groceries", // create
        "2", "Groceries", "Buy milk", "high", // add
        "2", "Groceries", "Buy eggs", "Low", // add
        "6", "Groceries", "1", // complete
        "3", "Groceries", "2", // delete task
        "4", // list
        "5", "Groceries", // show
        "0",
    ]);

    shell.run(&mut term).unwrap();

    let tasks = shell.notes().read_tasks("Groceries").unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "Buy milk");
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].status, TaskStatus::Complete);
    assert!(term.printed("Created note `Groceries`"));
    assert!(term.printed("- Groceries"));
    assert!(term.printed("1. Buy milk | Priority: High | Status: Complete"));
    assert!(term.printed("Hope to see you again soon!"));
    assert_eq!(term.remaining_answers(), 0);
}

#[test]
fn invalid_menu_choice_is_reported_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    let mut term = ScriptedTerminal::new(["9", "abc", "4", "0"]);

    shell.run(&mut term).unwrap();
    assert!(term.printed("Invalid choice"));
    assert!(term.printed("You have no notes yet"));
}

#[test]
fn input_end_exits_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    let mut term = ScriptedTerminal::new(["4"]);
    shell.run(&mut term).unwrap();
    assert!(!term.printed("Hope to see you again soon!"));
}

#[test]
fn out_of_range_index_reprompts() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    shell.notes().create_note("Chores").unwrap();
    shell
        .notes()
        .append_task("Chores", "sweep", Priority::Low)
        .unwrap();

    let mut term = ScriptedTerminal::new(["Chores", "5", "x", "1"]);
    let flow = shell.dispatch(MenuChoice::CompleteTask, &mut term).unwrap();

    assert_eq!(flow, Flow::Continue);
    assert!(term.printed("task 5 does not exist; choose 1-1"));
    assert!(term.printed("Please enter a task number"));
    assert!(term.printed("Marked `sweep` as Complete"));
}

#[test]
fn missing_note_is_reported_without_prompting_for_task() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    let mut term = ScriptedTerminal::new(["Nope", "should not be read"]);

    shell.dispatch(MenuChoice::AddTask, &mut term).unwrap();
    assert!(term.printed("Error: `Nope` not found"));
    assert_eq!(term.remaining_answers(), 1);
}

#[test]
fn duplicate_note_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    shell.notes().create_note("Groceries").unwrap();
    let mut term = ScriptedTerminal::new(["Groceries"]);

    shell.dispatch(MenuChoice::CreateNote, &mut term).unwrap();
    assert!(term.printed("Error: `Groceries` already exists"));
}

#[test]
fn invalid_priority_reprompts_and_blank_cancels() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    shell.notes().create_note("Work").unwrap();
    let mut term = ScriptedTerminal::new(["Work", "ship release", "urgent", ""]);

    shell.dispatch(MenuChoice::AddTask, &mut term).unwrap();
    assert!(term.printed("invalid priority `urgent`"));
    assert!(shell.notes().read_tasks("Work").unwrap().is_empty());
}

#[test]
fn delete_note_choice_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    shell.notes().create_note("Old").unwrap();
    let mut term = ScriptedTerminal::new(["Old"]);

    shell.dispatch(MenuChoice::DeleteNote, &mut term).unwrap();
    assert!(shell.notes().list_notes().unwrap().is_empty());
}

#[test]
fn exit_choice_returns_exit_flow() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(dir.path());
    let mut term = ScriptedTerminal::new(Vec::<String>::new());
    assert_eq!(
        shell.dispatch(MenuChoice::Exit, &mut term).unwrap(),
        Flow::Exit
    );
}

#[test]
fn startup_gate_registers_new_user() {
    let dir = tempfile::tempdir().unwrap();
    let mut auth = AuthService::open(InMemoryCredentialStore::new(), dir.path()).unwrap();
    let mut term = ScriptedTerminal::new(["maybe", "n", "erin", "Ab12", "Ab12"]);

    let identity = authenticate(&mut auth, &mut term).unwrap().unwrap();
    assert_eq!(identity.username, "erin");
    assert!(term.printed("Please answer y or n"));
    assert!(term.printed("Welcome erin!"));
    assert_eq!(auth.store().lines().len(), 1);
}

#[test]
fn startup_gate_logs_in_existing_user() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryCredentialStore::with_lines([format!(
        "frank,Gh78,{}",
        dir.path().join("frank").display()
    )]);
    let mut auth = AuthService::open(store, dir.path()).unwrap();
    let mut term = ScriptedTerminal::new(["Y", "frank", "Gh78"]);

    let identity = authenticate(&mut auth, &mut term).unwrap().unwrap();
    assert_eq!(identity.home_dir, dir.path().join("frank"));
}

#[test]
fn startup_gate_returns_none_on_decline() {
    let dir = tempfile::tempdir().unwrap();
    let mut auth = AuthService::open(InMemoryCredentialStore::new(), dir.path()).unwrap();
    let mut term = ScriptedTerminal::new(["y", "ghost", "0"]);
    assert!(authenticate(&mut auth, &mut term).unwrap().is_none());
}
