//! Terminal front end for the todo service.
//!
//! Each invocation mounts a `Controller` (restoring the saved filter and
//! fetching the list), performs one user action through the view models and
//! prints the resulting view.

mod logging;
mod state_file;
mod transport;

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use todo_core::view::{self, EditKey, TodoForm, TodoRow, MAX_TEXT_CHARS};
use todo_core::{Controller, Filter, TodoClient, TodoId, TodoState};

use state_file::FileFilterStore;
use transport::UreqTransport;

#[derive(Parser)]
#[command(name = "todo", author, version, about = "Manage your todo list", long_about = None)]
struct Cli {
    /// API root of the todo server.
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:5000/api")]
    api_url: String,

    /// File holding client preferences such as the active filter.
    #[arg(long, env = "TODO_STATE_FILE", default_value = ".todo-state.json")]
    state_file: String,

    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the list using the saved filter
    List,
    /// Add a new todo
    Add {
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Replace the text of a todo
    Edit {
        /// Full id or unique prefix as shown by `list`
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip a todo between active and completed
    Toggle {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete a todo
    Delete {
        #[arg(value_name = "ID")]
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Choose which todos `list` shows: all, active or completed
    Filter {
        #[arg(value_name = "FILTER")]
        filter: Filter,
    },
    /// Check that the server is up
    Health,
}

type App = Controller<UreqTransport, FileFilterStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(&cli.log_level)?;

    let client = TodoClient::new(&cli.api_url);
    let api_url = client.base_url().to_string();
    let mut app = Controller::new(
        client,
        UreqTransport::new(),
        FileFilterStore::new(&cli.state_file),
    );

    let command = cli.command.unwrap_or(Commands::List);
    if let Commands::Health = command {
        let health = app.health()?;
        println!("{}: {} ({})", health.status, health.message, health.timestamp);
        return Ok(());
    }

    if let Err(err) = app.mount() {
        print!("{}", view::render(app.state()));
        bail!("could not load todos from {api_url}: {err}");
    }

    match command {
        Commands::List | Commands::Health => {}
        Commands::Add { text } => add(&mut app, &text.join(" "))?,
        Commands::Edit { id, text } => {
            let id = resolve_id(app.state(), &id)?;
            edit(&mut app, id, &text.join(" "))?;
        }
        Commands::Toggle { id } => {
            let id = resolve_id(app.state(), &id)?;
            app.toggle(id)?;
        }
        Commands::Delete { id, yes } => {
            let id = resolve_id(app.state(), &id)?;
            delete(&mut app, id, yes)?;
        }
        Commands::Filter { filter } => app.set_filter(filter),
    }

    print!("{}", view::render(app.state()));
    Ok(())
}

fn add(app: &mut App, text: &str) -> anyhow::Result<()> {
    check_length(text)?;
    let mut form = TodoForm::default();
    form.set_draft(text);
    if let Some(counter) = form.counter() {
        eprintln!("{counter}");
    }
    let is_adding = app.state().is_adding;
    if !form.submit(is_adding, |text| app.add(text))? {
        bail!("nothing to add: todo text is empty");
    }
    Ok(())
}

fn edit(app: &mut App, id: TodoId, text: &str) -> anyhow::Result<()> {
    let todo = app
        .state()
        .find(id)
        .cloned()
        .ok_or_else(|| anyhow!("todo {id} is not in the list"))?;
    let mut row = TodoRow::new(todo);
    row.begin_edit();
    row.set_draft(text);
    row.key(EditKey::Enter, |id, text| app.update(id, text))?;
    if row.is_editing() {
        bail!("nothing to save: todo text is empty");
    }
    Ok(())
}

fn delete(app: &mut App, id: TodoId, yes: bool) -> anyhow::Result<()> {
    let todo = app
        .state()
        .find(id)
        .cloned()
        .ok_or_else(|| anyhow!("todo {id} is not in the list"))?;
    let row = TodoRow::new(todo);
    let confirm = |prompt: &str| yes || ask(prompt).unwrap_or(false);
    if !row.delete(confirm, |id| app.delete(id))? {
        eprintln!("Cancelled.");
    }
    Ok(())
}

/// The form truncates its draft to the maximum length; an argument that does
/// not fit is refused instead.
fn check_length(text: &str) -> anyhow::Result<()> {
    let len = text.trim().chars().count();
    if len > MAX_TEXT_CHARS {
        bail!("todo text is {len} characters, the limit is {MAX_TEXT_CHARS}");
    }
    Ok(())
}

fn ask(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Accept a full id or a prefix of its hyphen-free form that matches exactly
/// one todo in the list.
fn resolve_id(state: &TodoState, raw: &str) -> anyhow::Result<TodoId> {
    if let Ok(id) = raw.parse::<TodoId>() {
        return Ok(id);
    }
    let prefix = raw.replace('-', "").to_ascii_lowercase();
    if prefix.is_empty() {
        bail!("todo id is empty");
    }
    let mut matches = state
        .todos
        .iter()
        .filter(|todo| todo.id.simple().to_string().starts_with(&prefix));
    let first = matches
        .next()
        .with_context(|| format!("no todo matches id `{raw}`"))?;
    if matches.next().is_some() {
        bail!("id `{raw}` is ambiguous, use more characters");
    }
    Ok(first.id)
}
