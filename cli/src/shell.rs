//! Line-oriented interactive mode.
//!
//! Plain text is typed into the creation input and submitted; lines starting
//! with `:` are commands. The list is re-rendered after every action, and a
//! progress line is printed while a remote call is outstanding.

use std::io::Write;

use todolist_core::{Filter, TodoApi, TodoError, TodoState, TodoStore};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{commands, view};

const HELP: &str = "\
type a title and press enter to add it
:rm ID...        delete todos
:clear           delete completed todos
:filter MODE     all, active or completed
:dismiss         hide the error
:q               quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Submit(String),
    Remove(Vec<u64>),
    ClearCompleted,
    Filter(Filter),
    Dismiss,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse(line: &str) -> ShellCommand {
    let Some(rest) = line.strip_prefix(':') else {
        return ShellCommand::Submit(line.to_string());
    };

    let mut words = rest.split_whitespace();
    match words.next() {
        Some("q" | "quit") => ShellCommand::Quit,
        Some("rm") => match words.map(str::parse).collect::<Result<Vec<u64>, _>>() {
            Ok(ids) if !ids.is_empty() => ShellCommand::Remove(ids),
            _ => ShellCommand::Invalid("usage: :rm ID...".to_string()),
        },
        Some("clear") => ShellCommand::ClearCompleted,
        Some("filter") => ShellCommand::Filter(Filter::from(words.next().unwrap_or(""))),
        Some("dismiss") => ShellCommand::Dismiss,
        Some("help") => ShellCommand::Help,
        _ => ShellCommand::Invalid(format!("unknown command {line:?}, try :help")),
    }
}

/// What to show while a call is outstanding.
fn progress(state: &TodoState) -> Option<String> {
    if let Some(temp) = &state.temp_todo {
        return Some(format!("saving {:?}...", temp.title));
    }
    if state.deleting.is_empty() {
        return None;
    }
    let ids: Vec<String> = state.deleting.iter().map(u64::to_string).collect();
    Some(format!("deleting {}...", ids.join(", ")))
}

pub async fn run<A, R, W>(store: &TodoStore<A>, input: R, out: &mut W) -> anyhow::Result<()>
where
    A: TodoApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    out.write_all(view::render(&store.snapshot()).as_bytes())?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Invalid(message) => writeln!(out, "{message}")?,
            command => {
                execute(store, command, out).await?;
                out.write_all(view::render(&store.snapshot()).as_bytes())?;
            }
        }
    }
    Ok(())
}

async fn execute<A, W>(store: &TodoStore<A>, command: ShellCommand, out: &mut W) -> anyhow::Result<()>
where
    A: TodoApi,
    W: Write,
{
    let mut rx = store.subscribe();
    let op = async {
        match command {
            ShellCommand::Submit(text) => {
                store.set_draft(text);
                store.submit().await.map(drop).map_err(anyhow::Error::from)
            }
            ShellCommand::Remove(ids) => commands::remove(store, &ids).await,
            ShellCommand::ClearCompleted => store.clear_completed().await.map_err(anyhow::Error::from),
            ShellCommand::Filter(filter) => {
                store.set_filter(filter);
                Ok(())
            }
            ShellCommand::Dismiss => {
                store.dismiss_error();
                Ok(())
            }
            ShellCommand::Help | ShellCommand::Quit | ShellCommand::Invalid(_) => Ok(()),
        }
    };
    tokio::pin!(op);

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            biased;
            changed = rx.changed() => {
                if changed.is_err() {
                    break (&mut op).await;
                }
                let line = progress(&rx.borrow_and_update());
                if let Some(line) = line {
                    writeln!(out, "{line}")?;
                }
            }
            result = &mut op => break result,
        }
    };

    // Store failures are already in the banner; anything else is printed.
    if let Err(err) = result {
        if err.downcast_ref::<TodoError>().is_none() {
            writeln!(out, "{err}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use todolist_core::{TodoClient, TodoService};

    use super::*;
    use crate::transport::ReqwestTransport;

    #[test]
    fn parses_commands_and_plain_text() {
        assert_eq!(parse("buy milk"), ShellCommand::Submit("buy milk".into()));
        assert_eq!(parse(":q"), ShellCommand::Quit);
        assert_eq!(parse(":rm 1 2"), ShellCommand::Remove(vec![1, 2]));
        assert_eq!(parse(":clear"), ShellCommand::ClearCompleted);
        assert_eq!(parse(":filter active"), ShellCommand::Filter(Filter::Active));
        assert_eq!(parse(":filter"), ShellCommand::Filter(Filter::All));
        assert_eq!(parse(":dismiss"), ShellCommand::Dismiss);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(matches!(parse(":rm"), ShellCommand::Invalid(_)));
        assert!(matches!(parse(":rm x"), ShellCommand::Invalid(_)));
        assert!(matches!(parse(":frobnicate"), ShellCommand::Invalid(_)));
    }

    #[test]
    fn progress_prefers_the_pending_create() {
        let mut state = TodoState::default();
        assert_eq!(progress(&state), None);

        state.deleting.extend([3, 1]);
        assert_eq!(progress(&state).as_deref(), Some("deleting 1, 3..."));

        state.temp_todo = Some(todolist_core::Todo {
            id: 0,
            user_id: 1,
            title: "eggs".into(),
            completed: false,
        });
        assert_eq!(progress(&state).as_deref(), Some("saving \"eggs\"..."));
    }

    #[tokio::test]
    async fn session_adds_and_removes() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(mock_server::run(listener));

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let store = TodoStore::new(TodoService::new(
            TodoClient::new(&format!("http://{addr}")),
            transport,
        ));
        store.load().await.unwrap();

        let input: &[u8] = b"milk\n   \n:rm 1\n:q\nnever read\n";
        let mut out = Vec::new();
        run(&store, input, &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();

        let saving = out.find("saving \"milk\"...").unwrap();
        let listed = out.find("[ ]    1  milk").unwrap();
        let banner = out.find("! Title should not be empty").unwrap();
        let deleting = out.find("deleting 1...").unwrap();
        assert!(saving < listed && listed < banner && banner < deleting);
        assert!(!out.contains("never read"));
        assert!(store.snapshot().todos.is_empty());
    }
}
