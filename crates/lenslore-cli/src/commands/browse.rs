use crate::commands::context::{viewport_width, AppContext};
use crate::output::Output;
use crate::render::Screen;
use color_eyre::Result;
use lenslore_core::{Session, SessionSettings};
use lenslore_models::{RatingError, UserRating};
use std::io::{IsTerminal, Write};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "\
Type a title to search. Commands:
  :open <n|id>    open a result (again to close)
  :close, :esc    close the open movie
  :rate <1-10>    rate the open movie
  :add            add the open, rated movie to your list
  :delete <n|id>  remove a movie from your list
  :results        collapse/expand the results box
  :watched        collapse/expand the watched box
  :swap           switch between results and watched list (narrow layout)
  :width <cols>   re-layout for a new terminal width
  :clear          clear the search
  :quit           exit";

/// A result or watched row, by 1-based position or IMDb id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Position(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Query(String),
    Redraw,
    Open(Target),
    Close,
    Rate(UserRating),
    Add,
    Delete(Target),
    ToggleResults,
    ToggleWatched,
    Swap,
    Width(u16),
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command ':{0}' (try :help)")]
    UnknownCommand(String),
    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid position {0}")]
    InvalidPosition(String),
    #[error("invalid width {0:?}")]
    InvalidWidth(String),
    #[error(transparent)]
    Rating(#[from] RatingError),
}

fn parse_target(command: &'static str, arg: Option<&str>) -> Result<Target, InputError> {
    let arg = arg.ok_or(InputError::MissingArgument(command))?;
    if arg.chars().all(|c| c.is_ascii_digit()) {
        return match arg.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Target::Position(n)),
            _ => Err(InputError::InvalidPosition(arg.to_string())),
        };
    }
    Ok(Target::Id(arg.to_string()))
}

/// One line of user input. Anything not starting with `:` is the new query.
pub fn parse_input(line: &str) -> Result<Input, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix(':') else {
        if line.trim().is_empty() {
            return Ok(Input::Redraw);
        }
        return Ok(Input::Query(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "open" | "o" => Ok(Input::Open(parse_target("open", arg)?)),
        "close" | "esc" => Ok(Input::Close),
        "rate" | "r" => {
            let arg = arg.ok_or(InputError::MissingArgument("rate"))?;
            Ok(Input::Rate(arg.parse()?))
        }
        "add" => Ok(Input::Add),
        "delete" | "d" => Ok(Input::Delete(parse_target("delete", arg)?)),
        "results" => Ok(Input::ToggleResults),
        "watched" => Ok(Input::ToggleWatched),
        "swap" => Ok(Input::Swap),
        "width" => {
            let arg = arg.ok_or(InputError::MissingArgument("width"))?;
            arg.parse::<u16>()
                .ok()
                .filter(|w| *w > 0)
                .map(Input::Width)
                .ok_or_else(|| InputError::InvalidWidth(arg.to_string()))
        }
        "clear" => Ok(Input::Clear),
        "help" | "h" | "?" => Ok(Input::Help),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

/// Apply one input to the session. Returns a line to show under the screen.
fn handle_input(session: &mut Session, width: &mut u16, input: Input) -> Option<String> {
    match input {
        Input::Query(text) => session.type_query(text),
        Input::Redraw | Input::Quit => {}
        Input::Open(Target::Position(n)) => {
            if session.select_result(n - 1).is_none() {
                return Some(format!("No result #{}", n));
            }
        }
        Input::Open(Target::Id(id)) => session.select(&id),
        Input::Close => session.close_detail(),
        Input::Rate(rating) => {
            if !session.view().is_detail_open() {
                return Some("Open a movie first".to_string());
            }
            session.rate(rating);
        }
        Input::Add => match session.confirm_add() {
            Ok(entry) => return Some(format!("Added {} to your list", entry.title)),
            Err(e) => return Some(capitalize(&e.to_string())),
        },
        Input::Delete(target) => {
            let id = match target {
                Target::Position(n) => match session.watchlist().entries().get(n - 1) {
                    Some(entry) => entry.id.clone(),
                    None => return Some(format!("No watched movie #{}", n)),
                },
                Target::Id(id) => id,
            };
            if !session.watchlist().is_watched(&id) {
                return Some(format!("{} is not on your list", id));
            }
            if let Err(e) = session.delete_watched(&id) {
                return Some(capitalize(&e.to_string()));
            }
        }
        Input::ToggleResults => session.toggle_results_panel(),
        Input::ToggleWatched => session.toggle_watched_panel(),
        Input::Swap => session.toggle_active(),
        Input::Width(cols) => {
            *width = cols;
            session.set_viewport_width(cols);
        }
        Input::Clear => session.clear_query(),
        Input::Help => return Some(HELP.to_string()),
    }
    None
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn draw(session: &Session, width: u16, notice: Option<&str>, terminal: bool) -> std::io::Result<()> {
    let screen = Screen::from_session(session, width);
    let mut stdout = std::io::stdout().lock();
    if terminal {
        // Clear, home, and set the terminal title
        write!(stdout, "\x1b[2J\x1b[H\x1b]0;{}\x07", screen.title)?;
    }
    writeln!(stdout, "{}", screen.render())?;
    if let Some(notice) = notice {
        writeln!(stdout, "{}", notice)?;
    }
    write!(stdout, "> ")?;
    stdout.flush()
}

pub async fn run_browse(ephemeral: bool, width_override: Option<u16>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let watchlist = ctx.open_watchlist(ephemeral)?;

    let mut width = viewport_width(width_override);
    let settings = SessionSettings::from_config(&ctx.config, width);
    let (mut session, mut channels) = Session::new(
        catalog,
        watchlist,
        settings,
        Some(Box::new(|query: &str| debug!(query = %query, "Query changed"))),
    );

    let terminal = std::io::stdout().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut notice: Option<String> = Some("Type a title to search, :help for commands".to_string());
    draw(&session, width, notice.as_deref(), terminal)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                notice = match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle_input(&mut session, &mut width, input),
                    Err(e) => Some(capitalize(&e.to_string())),
                };
            }
            Some(completion) = channels.search.recv() => {
                if !session.apply_search(completion) {
                    continue;
                }
            }
            Some(completion) = channels.detail.recv() => {
                if !session.apply_detail(completion) {
                    continue;
                }
            }
        }
        draw(&session, width, notice.as_deref(), terminal)?;
    }

    info!(watched = session.watchlist().len(), "Session ended");
    if !terminal {
        println!();
    }
    output.success(format!("{} movies on your watched list", session.watchlist().len()));
    Ok(())
}
