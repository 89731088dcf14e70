//! Line-oriented command layer: parses one command per line, drives the
//! catalog through [`viewtime::api`], and writes the reply lines.

use std::io::{self, Write};

use viewtime::api;
use viewtime::Catalog;

/// What the shell should do after a line has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Halt,
}

/// Shell state: the catalog handle plus the init guard.
///
/// The guard lives up here rather than in the library so that the catalog
/// itself can be created and destroyed any number of times per process.
pub struct Shell {
    catalog: Option<Box<Catalog>>,
    initialized: bool,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            catalog: None,
            initialized: false,
        }
    }

    /// Handle a single input line, writing any reply to `out`.
    ///
    /// Lines with no tokens are silently ignored and lines starting with
    /// `#` are echoed back. Malformed arguments and unknown commands halt
    /// the shell.
    pub fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Outcome> {
        if line.starts_with('#') {
            writeln!(out, "{}", line)?;
            return Ok(Outcome::Continue);
        }

        let mut tokens = line.split_whitespace();
        let command = match tokens.next() {
            Some(command) => command,
            None => return Ok(Outcome::Continue),
        };

        match command {
            "Init" => self.init(out),
            "Quit" => self.quit(out),

            "AddCourse" => match parse_args(tokens, 1) {
                Some(args) => {
                    let status = api::add_course(self.catalog.as_deref_mut(), args[0]);
                    writeln!(out, "AddCourse: {}", status)?;
                    Ok(Outcome::Continue)
                }
                None => reject(command, out),
            },

            "RemoveCourse" => match parse_args(tokens, 1) {
                Some(args) => {
                    let status = api::remove_course(self.catalog.as_deref_mut(), args[0]);
                    writeln!(out, "RemoveCourse: {}", status)?;
                    Ok(Outcome::Continue)
                }
                None => reject(command, out),
            },

            "AddClass" => match parse_args(tokens, 1) {
                Some(args) => {
                    match api::add_class(self.catalog.as_deref_mut(), args[0]) {
                        Ok(class) => writeln!(out, "AddClass: {}", class)?,
                        Err(status) => writeln!(out, "AddClass: {}", status)?,
                    }
                    Ok(Outcome::Continue)
                }
                None => reject(command, out),
            },

            "WatchClass" => match parse_args(tokens, 3) {
                Some(args) => {
                    let status =
                        api::watch_class(self.catalog.as_deref_mut(), args[0], args[1], args[2]);
                    writeln!(out, "WatchClass: {}", status)?;
                    Ok(Outcome::Continue)
                }
                None => reject(command, out),
            },

            "TimeViewed" => match parse_args(tokens, 2) {
                Some(args) => {
                    match api::time_viewed(self.catalog.as_deref(), args[0], args[1]) {
                        Ok(time) => writeln!(out, "TimeViewed: {}", time)?,
                        Err(status) => writeln!(out, "TimeViewed: {}", status)?,
                    }
                    Ok(Outcome::Continue)
                }
                None => reject(command, out),
            },

            "GetIthWatchedClass" => match parse_args(tokens, 1) {
                Some(args) => {
                    match api::ith_watched_class(self.catalog.as_deref(), args[0]) {
                        Ok((course, class)) => {
                            writeln!(out, "GetIthWatchedClass: {} {}", course, class)?
                        }
                        Err(status) => writeln!(out, "GetIthWatchedClass: {}", status)?,
                    }
                    Ok(Outcome::Continue)
                }
                None => reject(command, out),
            },

            _ => Ok(Outcome::Halt),
        }
    }

    fn init<W: Write>(&mut self, out: &mut W) -> io::Result<Outcome> {
        if self.initialized {
            writeln!(out, "init was already called.")?;
            return Ok(Outcome::Continue);
        }

        self.catalog = api::init();
        if self.catalog.is_none() {
            writeln!(out, "init failed.")?;
            return Ok(Outcome::Halt);
        }

        self.initialized = true;
        writeln!(out, "init done.")?;
        Ok(Outcome::Continue)
    }

    fn quit<W: Write>(&mut self, out: &mut W) -> io::Result<Outcome> {
        api::quit(&mut self.catalog);
        self.initialized = false;

        writeln!(out, "quit done.")?;
        Ok(Outcome::Continue)
    }
}

/// Parse exactly `count` integer arguments; surplus tokens are ignored.
fn parse_args<'a, I>(tokens: I, count: usize) -> Option<Vec<i32>>
where
    I: Iterator<Item = &'a str>,
{
    let args = tokens
        .take(count)
        .map(|token| token.parse().ok())
        .collect::<Option<Vec<i32>>>()?;

    if args.len() == count {
        Some(args)
    } else {
        None
    }
}

/// Report a malformed command line and stop the shell.
fn reject<W: Write>(command: &str, out: &mut W) -> io::Result<Outcome> {
    writeln!(out, "{} failed.", command)?;
    Ok(Outcome::Halt)
}
