//! Plain-text rendering of `TodoState`.

use todolist_core::{Todo, TodoState};

fn row(todo: &Todo, note: Option<&str>) -> String {
    let mark = if todo.completed { "[x]" } else { "[ ]" };
    let id = if todo.is_placeholder() {
        "-".to_string()
    } else {
        todo.id.to_string()
    };
    match note {
        Some(note) => format!("  {mark} {id:>4}  {}  ({note})", todo.title),
        None => format!("  {mark} {id:>4}  {}", todo.title),
    }
}

fn items_left(count: usize) -> String {
    match count {
        1 => "1 item left".to_string(),
        n => format!("{n} items left"),
    }
}

/// The list, the pending row, the footer and the error banner. The footer
/// only appears once there is something persisted to count.
pub fn render(state: &TodoState) -> String {
    let mut lines = vec!["todos".to_string()];

    for todo in state.visible() {
        let note = state.is_deleting(todo.id).then_some("deleting");
        lines.push(row(&todo, note));
    }
    if let Some(temp) = &state.temp_todo {
        lines.push(row(temp, Some("saving")));
    }

    if !state.todos.is_empty() {
        let mut footer = format!("{} | filter: {}", items_left(state.active_count()), state.filter);
        if state.completed_count() > 0 {
            footer.push_str(" | clear-completed");
        }
        lines.push(footer);
    }

    if let Some(error) = state.error {
        lines.push(format!("! {error}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use todolist_core::{ErrorKind, Filter};

    use super::*;

    fn todo(id: u64, title: &str, completed: bool) -> Todo {
        Todo {
            id,
            user_id: 1229,
            title: title.to_string(),
            completed,
        }
    }

    #[test]
    fn empty_state_has_no_footer() {
        assert_eq!(render(&TodoState::default()), "todos\n");
    }

    #[test]
    fn renders_rows_footer_and_markers() {
        let state = TodoState {
            todos: vec![todo(1, "milk", false), todo(12, "bread", true)],
            deleting: BTreeSet::from([12]),
            temp_todo: Some(todo(0, "eggs", false)),
            ..TodoState::default()
        };

        let expected = "\
todos
  [ ]    1  milk
  [x]   12  bread  (deleting)
  [ ]    -  eggs  (saving)
1 item left | filter: all | clear-completed
";
        assert_eq!(render(&state), expected);
    }

    #[test]
    fn applies_the_filter_but_counts_everything() {
        let state = TodoState {
            todos: vec![todo(1, "a", false), todo(2, "b", true), todo(3, "c", false)],
            filter: Filter::Completed,
            ..TodoState::default()
        };

        let expected = "\
todos
  [x]    2  b
2 items left | filter: completed | clear-completed
";
        assert_eq!(render(&state), expected);
    }

    #[test]
    fn shows_the_error_banner_last() {
        let state = TodoState {
            error: Some(ErrorKind::Load),
            ..TodoState::default()
        };
        assert_eq!(render(&state), "todos\n! Unable to load todos\n");
    }
}
