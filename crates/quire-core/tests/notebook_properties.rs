//! Integration tests for notebook-level guarantees.
//!
//! Each test drives a kernel purely through actions, the way a UI shell would.

use quire_core::{
    Action, CellId, CellType, Collaborators, Direction, EvalStatus, FixedClock, Kernel,
    LoadStatus, Notebook, NotebookConfig, Outcome, StaticLoader,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn kernel() -> Kernel {
    let config = NotebookConfig::default();
    let collaborators = Collaborators::from_config(&config)
        .expect("default collaborators")
        .with_clock(FixedClock(1_700_000_000_000))
        .with_loader(
            StaticLoader::new()
                .with("lib/math.rhai", LoadStatus::Ok)
                .with("lib/plot.rhai", LoadStatus::Ok),
        );
    Kernel::with_collaborators(config, collaborators)
}

/// Append a cell of the given type with content, leaving it selected.
fn add(kernel: &mut Kernel, cell_type: CellType, content: &str) -> CellId {
    kernel.dispatch(&Action::AddCell { cell_type });
    let id = *kernel.notebook().cell_ids().last().expect("cell was added");
    kernel.dispatch(&Action::select(id));
    kernel.dispatch(&Action::update_content(content));
    id
}

fn selected_ids(notebook: &Notebook) -> Vec<CellId> {
    notebook
        .cells()
        .iter()
        .filter(|c| c.selected)
        .map(|c| c.id)
        .collect()
}

fn script_actions() -> Vec<Action> {
    vec![
        Action::update_content("let x = 20;"),
        Action::evaluate(),
        Action::InsertCell {
            direction: Direction::Below,
        },
        Action::select(CellId::new(1)),
        Action::update_content("x * 2 + 2"),
        Action::evaluate(),
        Action::AddCell {
            cell_type: CellType::Markdown,
        },
        Action::select(CellId::new(2)),
        Action::update_content("# Result"),
        Action::evaluate(),
        Action::MoveCellUp,
    ]
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_dispatch_is_deterministic() {
    let mut first = kernel();
    let mut second = kernel();
    first.dispatch_all(&script_actions());
    second.dispatch_all(&script_actions());

    let a = serde_json::to_value(first.notebook()).unwrap();
    let b = serde_json::to_value(second.notebook()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_counter_unchanged_by_markdown_and_stylesheet() {
    let mut kernel = kernel();
    add(&mut kernel, CellType::Markdown, "*hi*");
    kernel.dispatch(&Action::evaluate());
    add(&mut kernel, CellType::Stylesheet, "body { margin: 0 }");
    kernel.dispatch(&Action::evaluate());

    assert_eq!(kernel.notebook().execution_number(), 0);
    assert!(kernel.notebook().history().is_empty());
}

#[test]
fn test_throwing_script_records_error() {
    let mut kernel = kernel();
    kernel.dispatch(&Action::update_content("throw \"bad input\";"));
    let report = kernel.dispatch(&Action::evaluate());

    assert_eq!(report.outcome, Outcome::Applied);
    let cell = &kernel.notebook().cells()[0];
    assert_eq!(cell.eval_status, EvalStatus::Error);
    assert!(cell.rendered);
    let err = cell
        .value
        .as_ref()
        .and_then(|v| v.as_error())
        .expect("error value");
    assert_eq!(
        err.thrown.as_ref().map(|v| v.to_string()),
        Some("bad input".to_string())
    );
    assert_eq!(kernel.notebook().execution_number(), 1);
}

#[test]
fn test_two_plus_two() {
    let mut kernel = kernel();
    kernel.dispatch(&Action::update_content("2 + 2"));
    kernel.dispatch(&Action::evaluate());

    let cell = &kernel.notebook().cells()[0];
    assert_eq!(cell.eval_status, EvalStatus::Success);
    let value = cell.value.as_ref().and_then(|v| v.as_script()).unwrap();
    assert_eq!(value.as_int(), Ok(4));
}

#[test]
fn test_delete_reselects_following_or_previous() {
    let mut kernel = kernel();
    kernel.dispatch(&Action::AddCell {
        cell_type: CellType::Script,
    });
    kernel.dispatch(&Action::AddCell {
        cell_type: CellType::Script,
    });
    let [a, b, c] = <[CellId; 3]>::try_from(kernel.notebook().cell_ids()).unwrap();

    // [A(selected), B, C] -> [B(selected), C]
    kernel.dispatch(&Action::select(a));
    kernel.dispatch(&Action::DeleteCell);
    assert_eq!(kernel.notebook().cell_ids(), [b, c]);
    assert_eq!(selected_ids(kernel.notebook()), [b]);

    // [A, B, C(selected)] -> [A, B(selected)]
    let mut kernel = self::kernel();
    kernel.dispatch_all(&[
        Action::AddCell {
            cell_type: CellType::Script,
        },
        Action::AddCell {
            cell_type: CellType::Script,
        },
    ]);
    let [a, b, c] = <[CellId; 3]>::try_from(kernel.notebook().cell_ids()).unwrap();
    kernel.dispatch(&Action::select(c));
    kernel.dispatch(&Action::DeleteCell);
    assert_eq!(kernel.notebook().cell_ids(), [a, b]);
    assert_eq!(selected_ids(kernel.notebook()), [b]);
}

#[test]
fn test_dependencies_registered_once() {
    let mut kernel = kernel();
    add(
        &mut kernel,
        CellType::Dependencies,
        "// helpers\nlib/math.rhai\nlib/plot.rhai",
    );
    kernel.dispatch(&Action::evaluate());
    kernel.dispatch(&Action::evaluate());

    let deps: Vec<_> = kernel
        .notebook()
        .external_dependencies()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(deps, ["lib/math.rhai", "lib/plot.rhai"]);
    assert_eq!(kernel.notebook().execution_number(), 1);
    assert_eq!(kernel.notebook().history().len(), 1);
}

#[test]
fn test_select_leaves_exactly_one_selected() {
    let mut kernel = kernel();
    kernel.dispatch_all(&[
        Action::AddCell {
            cell_type: CellType::Script,
        },
        Action::AddCell {
            cell_type: CellType::Markdown,
        },
    ]);

    kernel.dispatch(&Action::select(CellId::new(2)));
    assert_eq!(selected_ids(kernel.notebook()), [CellId::new(2)]);

    let report = kernel.dispatch(&Action::select(CellId::new(77)));
    assert_eq!(report.outcome, Outcome::NoTarget);
    assert!(selected_ids(kernel.notebook()).is_empty());
}

#[test]
fn test_insert_above_then_below_gives_distinct_increasing_ids() {
    let mut kernel = kernel();
    let start = kernel.notebook().selected_id().unwrap();
    kernel.dispatch(&Action::InsertCell {
        direction: Direction::Above,
    });
    kernel.dispatch(&Action::InsertCell {
        direction: Direction::Below,
    });

    let ids = kernel.notebook().cell_ids();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[1], start);
    assert!(ids[0] > start);
    assert!(ids[2] > ids[0]);
}

#[test]
fn test_history_grows_with_every_script_attempt() {
    let mut kernel = kernel();
    add(&mut kernel, CellType::Dependencies, "lib/math.rhai");
    kernel.dispatch(&Action::evaluate());
    let prior = kernel.notebook().history().len();

    let sources = ["1 + 1", "let = oops", "throw 1;", "let z = 3;"];
    let id = add(&mut kernel, CellType::Script, "");
    for source in sources {
        kernel.dispatch(&Action::update_content(source));
        kernel.dispatch(&Action::evaluate_cell(id));
    }

    let history = kernel.notebook().history();
    assert_eq!(history.len(), prior + sources.len());
    let recorded: Vec<_> = history.for_cell(id).map(|e| e.content.as_str()).collect();
    assert_eq!(recorded, sources);
}

#[test]
fn test_unknown_action_is_identity() {
    let mut kernel = kernel();
    let before = serde_json::to_value(kernel.notebook()).unwrap();
    let action: Action = serde_json::from_str(r#"{"type":"teleport","to":3}"#).unwrap();

    let report = kernel.dispatch(&action);
    assert_eq!(report.outcome, Outcome::Ignored);
    assert_eq!(serde_json::to_value(kernel.notebook()).unwrap(), before);

    // A recognised action that happens to change nothing is reported differently.
    let report = kernel.dispatch(&Action::MoveCellUp);
    assert_eq!(report.outcome, Outcome::Applied);
}

#[test]
fn test_previous_snapshots_are_not_mutated() {
    let mut kernel = kernel();
    kernel.dispatch(&Action::update_content("1"));
    let snapshot = kernel.notebook().clone();

    kernel.dispatch(&Action::evaluate());
    kernel.dispatch(&Action::update_content("2"));

    let old = &snapshot.cells()[0];
    assert_eq!(old.content, "1");
    assert!(old.value.is_none());
    assert!(!old.rendered);
    assert_eq!(snapshot.execution_number(), 0);
    assert!(snapshot.history().is_empty());
}
