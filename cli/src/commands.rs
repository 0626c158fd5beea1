//! One-shot subcommands: load, act once, print the resulting state.

use std::io::Write;

use anyhow::bail;
use todolist_core::{Filter, Todo, TodoApi, TodoStore};
use tracing::warn;

use crate::cmd_args::Command;
use crate::{shell, view};

/// Run `command` against `store`, writing the rendered list to `out`.
///
/// The list is always fetched first. The rendered state is written even when
/// the action fails, so the error banner reaches the user before the error
/// is returned.
pub async fn run<A, W>(store: &TodoStore<A>, command: Command, out: &mut W) -> anyhow::Result<()>
where
    A: TodoApi,
    W: Write,
{
    let loaded = store.load().await;

    let outcome = match (loaded, command) {
        (_, Command::Shell) => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            return shell::run(store, stdin, out).await;
        }
        (Err(err), _) => Err(err.into()),
        (Ok(()), Command::List { filter }) => {
            store.set_filter(Filter::from(filter.as_str()));
            Ok(())
        }
        (Ok(()), Command::Add { title }) => store
            .create(&title.join(" "))
            .await
            .map(drop)
            .map_err(anyhow::Error::from),
        (Ok(()), Command::Rm { ids }) => remove(store, &ids).await,
        (Ok(()), Command::ClearCompleted) => store.clear_completed().await.map_err(anyhow::Error::from),
    };

    out.write_all(view::render(&store.snapshot()).as_bytes())?;
    outcome
}

/// Delete the listed ids that are present in the loaded list: one id goes
/// through a single delete, several through a bulk delete.
pub async fn remove<A: TodoApi>(store: &TodoStore<A>, ids: &[u64]) -> anyhow::Result<()> {
    let targets: Vec<Todo> = store
        .snapshot()
        .todos
        .into_iter()
        .filter(|t| ids.contains(&t.id))
        .collect();

    for id in ids {
        if !targets.iter().any(|t| t.id == *id) {
            warn!(id, "no such todo in the list");
        }
    }

    match targets.as_slice() {
        [] => bail!("no todo with id {ids:?}"),
        [single] => store.delete(single.id).await?,
        many => store.bulk_delete(many).await?,
    }
    Ok(())
}
