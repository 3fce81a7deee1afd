//! Line-driven interactive list session.
//!
//! Every input line maps to one list controller operation. After each
//! change the session waits for the fetch it dispatched, then prints the
//! page together with any notices the controller queued.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use super::render_list;
use crate::display::notice_line;
use crate::error::Result;
use crate::list::{FilterSet, ListController, ListQuery, ListSource, LiveList};
use crate::notice::Notice;

const HELP: &str = "\
commands:
  /<text>, search <text>   search (empty clears)
  filter <name> <value>    set a filter, `all` clears it
  clear                    clear search and filters
  sort <field>             sort by field, again to flip direction
  page <n>                 jump to page n
  n, next / p, prev        next or previous page
  limit <n>                page size
  r, refresh               fetch the current page again
  h, help                  this help
  q, quit                  leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Filter { dimension: String, value: String },
    ClearFilters,
    Sort(String),
    Page(u32),
    Next,
    Prev,
    Limit(u32),
    Refresh,
    Help,
    Quit,
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_browse_command(line: &str) -> std::result::Result<Option<BrowseCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if let Some(term) = line.strip_prefix('/') {
        return Ok(Some(BrowseCommand::Search(term.trim().to_string())));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_lowercase().as_str() {
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "filter" | "f" => {
            let (dimension, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: filter <name> <value>".to_string())?;
            BrowseCommand::Filter {
                dimension: dimension.to_string(),
                value: value.trim().to_string(),
            }
        }
        "clear" | "c" => BrowseCommand::ClearFilters,
        "sort" => {
            if rest.is_empty() {
                return Err("usage: sort <field>".to_string());
            }
            BrowseCommand::Sort(rest.to_string())
        }
        "page" | "g" => BrowseCommand::Page(parse_number(rest, "page")?),
        "limit" | "l" => BrowseCommand::Limit(parse_number(rest, "limit")?),
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Prev,
        "refresh" | "r" => BrowseCommand::Refresh,
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("unknown command '{other}', type `help`")),
    };
    Ok(Some(command))
}

fn parse_number(value: &str, what: &str) -> std::result::Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("usage: {what} <number>"))
}

/// Apply a command to the live list. Returns whether a fetch was dispatched.
fn apply<T, F, S>(list: &mut LiveList<T, F, S>, command: BrowseCommand) -> Result<bool>
where
    T: Send + 'static,
    F: FilterSet,
    S: ListSource<T, F> + 'static,
{
    Ok(match command {
        BrowseCommand::Search(term) => list.update(|c| c.set_search(&term)),
        BrowseCommand::Filter { dimension, value } => {
            let dimension: F::Dimension = dimension.parse()?;
            list.try_update(|c| c.set_filter(dimension, &value))?
        }
        BrowseCommand::ClearFilters => list.update(ListController::clear_filters),
        BrowseCommand::Sort(field) => list.try_update(|c| c.set_sort(&field))?,
        BrowseCommand::Page(n) => list.update(|c| c.go_to_page(n)),
        BrowseCommand::Next => list.update(ListController::next_page),
        BrowseCommand::Prev => list.update(ListController::prev_page),
        BrowseCommand::Limit(n) => list.update(|c| c.set_limit(n)),
        BrowseCommand::Refresh => list.update(ListController::refresh),
        BrowseCommand::Help | BrowseCommand::Quit => false,
    })
}

/// `search=login status=open sort=-updated_at`, skipping paging and blanks.
fn describe_query<F: FilterSet>(query: &ListQuery<F>) -> String {
    query
        .params()
        .into_iter()
        .filter(|(key, value)| !matches!(*key, "page" | "limit") && !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

async fn show<T, F, S>(list: &mut LiveList<T, F, S>, table: fn(&[T]) -> String, create_command: &str)
where
    T: Send + 'static,
    F: FilterSet,
    S: ListSource<T, F> + 'static,
{
    list.settle().await;
    let (text, state) = list.with(|c| {
        (
            render_list(c, table, create_command),
            describe_query(c.query()),
        )
    });
    println!("{text}");
    if !state.is_empty() {
        println!("{state}");
    }
    for notice in list.take_notices() {
        eprintln!("{}", notice_line(&notice));
    }
}

/// Run an interactive session over `list` until `quit` or end of input.
pub(crate) async fn run_browse<T, F, S>(
    mut list: LiveList<T, F, S>,
    table: fn(&[T]) -> String,
    create_command: &str,
) -> Result<()>
where
    T: Send + 'static,
    F: FilterSet,
    S: ListSource<T, F> + 'static,
{
    let noun = list.with(|c| c.noun());
    println!("Browsing {noun}. Type `help` for commands.");
    list.start();
    show(&mut list, table, create_command).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{noun}> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_browse_command(&line) {
            Ok(None) => {}
            Ok(Some(BrowseCommand::Quit)) => break,
            Ok(Some(BrowseCommand::Help)) => println!("{HELP}"),
            Ok(Some(command)) => match apply(&mut list, command) {
                Ok(true) => show(&mut list, table, create_command).await,
                Ok(false) => println!("(nothing to do)"),
                Err(e) => eprintln!("{}", notice_line(&Notice::error(e.to_string()))),
            },
            Err(message) => eprintln!("{}", notice_line(&Notice::warning(message))),
        }
    }
    Ok(())
}
