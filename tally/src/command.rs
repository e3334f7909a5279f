//! Line-oriented command language for driving the workbench.
//!
//! One command per line:
//!
//! ```text
//! <structure> insert|push|enqueue <v1,v2,...>   # priority: <value:priority,...>
//! <structure> remove <v1,v2,...>                # linked lists
//! <structure> pop|dequeue [count]
//! <structure> search <v1,v2,...>
//! <structure> peek
//! <structure> show
//! ring resize <capacity>
//! ring state
//! reset <structure>|all
//! ```
//!
//! Blank lines and anything after `#` are ignored.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Errors produced while parsing or validating a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The first word does not name a structure.
    #[error("unknown structure `{0}`")]
    UnknownStructure(String),
    /// The second word does not name an action.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The action exists but the structure does not offer it.
    #[error("{structure} does not support `{action}`")]
    Unsupported {
        /// Action name as written.
        action: &'static str,
        /// Structure the action was aimed at.
        structure: Structure,
    },
    /// A required argument was absent.
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    /// Arguments were given to an action that takes none.
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
    /// A count or capacity was not a non-negative integer.
    #[error("invalid number `{input}`: {source}")]
    InvalidNumber {
        /// Offending text.
        input: String,
        /// Underlying parse failure.
        source: ParseIntError,
    },
    /// A priority item was not of the form `value:priority`.
    #[error("invalid priority item `{0}`, expected value:priority")]
    InvalidPriority(String),
}

// =============================================================================
// Structure
// =============================================================================

/// The containers the workbench holds one instance of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    /// Singly linked list.
    Singly,
    /// Doubly linked list.
    Doubly,
    /// Circular linked list.
    Circular,
    /// Stack over linked nodes.
    LinkedStack,
    /// Stack over a vector.
    ArrayStack,
    /// Unbounded FIFO queue.
    Queue,
    /// Fixed-capacity ring buffer queue.
    Ring,
    /// Min-heap priority queue.
    Priority,
}

impl Structure {
    /// Every structure, in display order.
    pub const ALL: [Structure; 8] = [
        Structure::Singly,
        Structure::Doubly,
        Structure::Circular,
        Structure::LinkedStack,
        Structure::ArrayStack,
        Structure::Queue,
        Structure::Ring,
        Structure::Priority,
    ];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Structure::Singly => "singly",
            Structure::Doubly => "doubly",
            Structure::Circular => "circular",
            Structure::LinkedStack => "linked-stack",
            Structure::ArrayStack => "array-stack",
            Structure::Queue => "queue",
            Structure::Ring => "ring",
            Structure::Priority => "priority",
        }
    }

    /// Linked lists remove by value; the others only pop from one end.
    pub const fn removes_by_value(self) -> bool {
        matches!(
            self,
            Structure::Singly | Structure::Doubly | Structure::Circular
        )
    }

    /// Column headers used when listing the contents.
    pub const fn columns(self) -> (&'static str, &'static str) {
        match self {
            Structure::Priority => ("Priority", "Value"),
            Structure::Ring => ("Slot", "Value"),
            _ => ("Position", "Value"),
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Structure {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let structure = match s.to_ascii_lowercase().as_str() {
            "singly" | "sll" | "singly-linked" => Structure::Singly,
            "doubly" | "dll" | "doubly-linked" => Structure::Doubly,
            "circular" | "cll" | "circular-linked" => Structure::Circular,
            "linked-stack" | "lstack" => Structure::LinkedStack,
            "array-stack" | "stack" | "astack" => Structure::ArrayStack,
            "queue" | "array-queue" => Structure::Queue,
            "ring" | "ring-buffer" | "circular-queue" => Structure::Ring,
            "priority" | "pq" | "priority-queue" => Structure::Priority,
            _ => return Err(CommandError::UnknownStructure(s.to_string())),
        };
        Ok(structure)
    }
}

// =============================================================================
// Action & Command
// =============================================================================

/// A value to insert, with its priority when aimed at the priority queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The value.
    pub value: String,
    /// Priority; only meaningful for [`Structure::Priority`].
    pub priority: Option<i64>,
}

impl Item {
    /// An item without a priority.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            priority: None,
        }
    }

    /// An item with a priority.
    pub fn prioritized(value: impl Into<String>, priority: i64) -> Self {
        Self {
            value: value.into(),
            priority: Some(priority),
        }
    }
}

/// What to do to a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Insert, push or enqueue each item in turn.
    Insert(Vec<Item>),
    /// Remove the first occurrence of each value in turn.
    Remove(Vec<String>),
    /// Pop or dequeue up to this many elements.
    Pop(usize),
    /// Look up each value in turn.
    Search(Vec<String>),
    /// Read the next element to leave.
    Peek,
    /// List the contents.
    Show,
    /// Change the ring buffer capacity.
    Resize(usize),
    /// Report the ring buffer occupancy.
    State,
}

impl Action {
    /// Short name used in messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Insert(_) => "insert",
            Action::Remove(_) => "remove",
            Action::Pop(_) => "pop",
            Action::Search(_) => "search",
            Action::Peek => "peek",
            Action::Show => "show",
            Action::Resize(_) => "resize",
            Action::State => "state",
        }
    }

    /// Checks that `structure` offers this action.
    pub fn check(&self, structure: Structure) -> Result<(), CommandError> {
        let supported = match self {
            Action::Remove(_) => structure.removes_by_value(),
            Action::Resize(_) | Action::State => structure == Structure::Ring,
            _ => true,
        };
        if supported {
            Ok(())
        } else {
            Err(CommandError::Unsupported {
                action: self.name(),
                structure,
            })
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply an action to one structure.
    Run {
        /// Target structure.
        structure: Structure,
        /// What to do.
        action: Action,
    },
    /// Empty one structure, or all of them when `None`.
    Reset(Option<Structure>),
}

impl Command {
    /// Parses one line. Returns `Ok(None)` for blank and comment lines.
    pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
        let line = match line.split_once('#') {
            Some((code, _)) => code,
            None => line,
        }
        .trim();
        if line.is_empty() {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, rest) = split_word(s);

        if head.eq_ignore_ascii_case("reset") {
            return match rest {
                "" => Err(CommandError::MissingArgument("reset")),
                r if r.eq_ignore_ascii_case("all") => Ok(Command::Reset(None)),
                r => Ok(Command::Reset(Some(r.parse()?))),
            };
        }

        let structure: Structure = head.parse()?;
        let (verb, args) = split_word(rest);
        let action = match verb.to_ascii_lowercase().as_str() {
            "" => return Err(CommandError::MissingArgument("command")),
            "insert" | "push" | "enqueue" | "add" => {
                let values = split_values(args, "insert")?;
                let items = if structure == Structure::Priority {
                    values
                        .into_iter()
                        .map(parse_prioritized)
                        .collect::<Result<_, _>>()?
                } else {
                    values.into_iter().map(Item::plain).collect()
                };
                Action::Insert(items)
            }
            "remove" | "delete" => Action::Remove(split_values(args, "remove")?),
            "pop" | "dequeue" => {
                if args.is_empty() {
                    Action::Pop(1)
                } else {
                    Action::Pop(parse_number(args)?)
                }
            }
            "search" | "find" => Action::Search(split_values(args, "search")?),
            "peek" => {
                no_arguments(args)?;
                Action::Peek
            }
            "show" | "list" => {
                no_arguments(args)?;
                Action::Show
            }
            "resize" => {
                if args.is_empty() {
                    return Err(CommandError::MissingArgument("resize"));
                }
                Action::Resize(parse_number(args)?)
            }
            "state" => {
                no_arguments(args)?;
                Action::State
            }
            other => return Err(CommandError::UnknownAction(other.to_string())),
        };

        action.check(structure)?;
        Ok(Command::Run { structure, action })
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

/// Splits comma-separated input, trimming items and dropping empty ones.
pub fn split_values(input: &str, action: &'static str) -> Result<Vec<String>, CommandError> {
    let values: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if values.is_empty() {
        return Err(CommandError::MissingArgument(action));
    }
    Ok(values)
}

fn parse_prioritized(item: String) -> Result<Item, CommandError> {
    let (value, priority) = item
        .rsplit_once(':')
        .ok_or_else(|| CommandError::InvalidPriority(item.clone()))?;
    let value = value.trim();
    let priority: i64 = priority
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidPriority(item.clone()))?;
    if value.is_empty() {
        return Err(CommandError::InvalidPriority(item));
    }
    Ok(Item::prioritized(value, priority))
}

fn parse_number(input: &str) -> Result<usize, CommandError> {
    input.parse().map_err(|source| CommandError::InvalidNumber {
        input: input.to_string(),
        source,
    })
}

fn no_arguments(args: &str) -> Result<(), CommandError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandError::UnexpectedArgument(args.to_string()))
    }
}
