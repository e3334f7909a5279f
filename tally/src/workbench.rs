//! One instance of every container, driven by [`Command`]s.
//!
//! Every single container call is wrapped in the probe. A command that
//! carries several values makes one call per value, and the report carries
//! the summed figures.

use std::fmt;

use tally_collections::{
    ArrayQueue, ArrayStack, CircularLinkedList, DoublyLinkedList, LinkedStack, PriorityQueue,
    QueueState, ResizeError, RingBufferQueue, SinglyLinkedList,
};
use tally_probe::{MemorySource, ResidentSet, Totals, measure_with};

use crate::command::{Action, Command, CommandError, Item, Structure};

/// Largest ring buffer capacity the workbench will build or resize to.
pub const MAX_RING_CAPACITY: usize = 1 << 20;

/// Construction parameters for a [`Workbench`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbenchConfig {
    /// Initial ring buffer capacity; must be at least 1.
    pub ring_capacity: usize,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self { ring_capacity: 5 }
    }
}

/// Outcome of one container call, in user-facing terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A value went in.
    Inserted(String),
    /// A value went in with a priority.
    Enqueued {
        /// Value stored.
        value: String,
        /// Its priority.
        priority: i64,
    },
    /// A value came out.
    Removed(String),
    /// A value was located.
    Found {
        /// Value looked for.
        value: String,
        /// Zero-based position.
        position: usize,
    },
    /// A value was not present.
    NotFound(String),
    /// The next element to leave.
    Peeked(String),
    /// Nothing to pop, dequeue or peek.
    Empty,
    /// The ring buffer turned a value away.
    Full(String),
    /// The ring buffer changed capacity.
    Resized(usize),
    /// The ring buffer refused to change capacity.
    ResizeRejected(ResizeError),
    /// The requested ring capacity is above [`MAX_RING_CAPACITY`].
    OverLimit {
        /// Capacity that was asked for.
        requested: usize,
        /// The workbench limit.
        limit: usize,
    },
    /// Ring buffer occupancy.
    State(QueueState),
    /// Structure emptied.
    Reset(Structure),
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Inserted(v) => write!(f, "{v}: inserted"),
            Message::Enqueued { value, priority } => {
                write!(f, "{value}: inserted with priority {priority}")
            }
            Message::Removed(v) => write!(f, "{v}: removed"),
            Message::Found { value, position } => {
                write!(f, "{value}: found at position {position}")
            }
            Message::NotFound(v) => write!(f, "{v}: not found"),
            Message::Peeked(v) => write!(f, "next out: {v}"),
            Message::Empty => write!(f, "empty"),
            Message::Full(v) => write!(f, "{v}: full"),
            Message::Resized(n) => write!(f, "resized to {n} slots"),
            Message::ResizeRejected(err) => write!(f, "resize rejected: {err}"),
            Message::OverLimit { requested, limit } => write!(
                f,
                "resize rejected: capacity {requested} exceeds the limit of {limit}"
            ),
            Message::State(state) => write!(f, "state: {state}"),
            Message::Reset(s) => write!(f, "{s}: reset"),
        }
    }
}

/// Ring buffer figures shown alongside its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingFigures {
    /// Number of slots.
    pub capacity: usize,
    /// Unoccupied slots.
    pub free: usize,
    /// Slot of the oldest element.
    pub front: usize,
    /// Slot the next element goes to.
    pub rear: usize,
}

/// Contents of a structure after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Column headers.
    pub columns: (&'static str, &'static str),
    /// One row per element (per slot for the ring buffer).
    pub rows: Vec<(String, String)>,
    /// Number of stored elements.
    pub len: usize,
    /// Present for the ring buffer only.
    pub ring: Option<RingFigures>,
}

/// Everything a command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Structure the command touched; `None` after resetting everything.
    pub structure: Option<Structure>,
    /// One message per call, in order.
    pub messages: Vec<Message>,
    /// Summed timing and memory figures of the calls.
    pub totals: Totals,
    /// The structure's contents afterwards.
    pub snapshot: Option<Snapshot>,
}

// =============================================================================
// Container seams
// =============================================================================

/// Operations every container offers over `String` values.
trait Container {
    /// Inserts, pushes or enqueues. Hands the value back if full.
    fn put(&mut self, item: Item) -> Result<(), String>;
    /// Pops or dequeues; linked lists take from the head.
    fn take(&mut self) -> Option<String>;
    /// Reads what `take` would return.
    fn next_out(&self) -> Option<&String>;
    fn find(&self, value: &str) -> Option<usize>;
    fn count(&self) -> usize;
    fn rows(&self) -> Vec<(String, String)>;
    fn reset(&mut self);
}

/// Containers that can remove an arbitrary value.
trait Removable {
    fn remove_value(&mut self, value: &str) -> Option<String>;
}

fn positional<'a>(values: impl Iterator<Item = &'a String>) -> Vec<(String, String)> {
    values
        .enumerate()
        .map(|(i, v)| (i.to_string(), v.clone()))
        .collect()
}

macro_rules! impl_list_container {
    ($($ty:ident),*) => {
        $(
            impl Container for $ty<String> {
                fn put(&mut self, item: Item) -> Result<(), String> {
                    self.insert(item.value);
                    Ok(())
                }
                fn take(&mut self) -> Option<String> {
                    self.pop_front()
                }
                fn next_out(&self) -> Option<&String> {
                    self.front()
                }
                fn find(&self, value: &str) -> Option<usize> {
                    self.search(value)
                }
                fn count(&self) -> usize {
                    self.len()
                }
                fn rows(&self) -> Vec<(String, String)> {
                    positional(self.iter())
                }
                fn reset(&mut self) {
                    self.clear();
                }
            }

            impl Removable for $ty<String> {
                fn remove_value(&mut self, value: &str) -> Option<String> {
                    self.remove(value)
                }
            }
        )*
    };
}

impl_list_container!(SinglyLinkedList, DoublyLinkedList, CircularLinkedList);

macro_rules! impl_stack_container {
    ($($ty:ident),*) => {
        $(
            impl Container for $ty<String> {
                fn put(&mut self, item: Item) -> Result<(), String> {
                    self.push(item.value);
                    Ok(())
                }
                fn take(&mut self) -> Option<String> {
                    self.pop()
                }
                fn next_out(&self) -> Option<&String> {
                    self.peek()
                }
                fn find(&self, value: &str) -> Option<usize> {
                    self.search(value)
                }
                fn count(&self) -> usize {
                    self.len()
                }
                fn rows(&self) -> Vec<(String, String)> {
                    positional(self.iter())
                }
                fn reset(&mut self) {
                    self.clear();
                }
            }
        )*
    };
}

impl_stack_container!(LinkedStack, ArrayStack);

impl Container for ArrayQueue<String> {
    fn put(&mut self, item: Item) -> Result<(), String> {
        self.enqueue(item.value);
        Ok(())
    }
    fn take(&mut self) -> Option<String> {
        self.dequeue()
    }
    fn next_out(&self) -> Option<&String> {
        self.peek()
    }
    fn find(&self, value: &str) -> Option<usize> {
        self.search(value)
    }
    fn count(&self) -> usize {
        self.len()
    }
    fn rows(&self) -> Vec<(String, String)> {
        positional(self.iter())
    }
    fn reset(&mut self) {
        self.clear();
    }
}

impl Container for RingBufferQueue<String> {
    fn put(&mut self, item: Item) -> Result<(), String> {
        self.enqueue(item.value).map_err(|full| full.into_inner())
    }
    fn take(&mut self) -> Option<String> {
        self.dequeue()
    }
    fn next_out(&self) -> Option<&String> {
        self.peek()
    }
    fn find(&self, value: &str) -> Option<usize> {
        self.search(value)
    }
    fn count(&self) -> usize {
        self.len()
    }
    /// Physical slot layout, `-` for an empty slot.
    fn rows(&self) -> Vec<(String, String)> {
        self.slots()
            .iter()
            .enumerate()
            .map(|(i, slot)| (i.to_string(), slot.clone().unwrap_or_else(|| "-".into())))
            .collect()
    }
    fn reset(&mut self) {
        self.clear();
    }
}

impl Container for PriorityQueue<String> {
    /// A missing priority counts as 0.
    fn put(&mut self, item: Item) -> Result<(), String> {
        self.enqueue(item.value, item.priority.unwrap_or_default());
        Ok(())
    }
    fn take(&mut self) -> Option<String> {
        self.dequeue()
    }
    fn next_out(&self) -> Option<&String> {
        self.peek()
    }
    fn find(&self, value: &str) -> Option<usize> {
        self.search(value)
    }
    fn count(&self) -> usize {
        self.len()
    }
    fn rows(&self) -> Vec<(String, String)> {
        self.to_vec()
            .into_iter()
            .map(|(p, v)| (p.to_string(), v))
            .collect()
    }
    fn reset(&mut self) {
        self.clear();
    }
}

// =============================================================================
// Workbench
// =============================================================================

/// One instance of each container.
struct Shelf {
    singly: SinglyLinkedList<String>,
    doubly: DoublyLinkedList<String>,
    circular: CircularLinkedList<String>,
    linked_stack: LinkedStack<String>,
    array_stack: ArrayStack<String>,
    queue: ArrayQueue<String>,
    ring: RingBufferQueue<String>,
    priority: PriorityQueue<String>,
}

impl Shelf {
    fn new(ring_capacity: usize) -> Self {
        Self {
            singly: SinglyLinkedList::new(),
            doubly: DoublyLinkedList::new(),
            circular: CircularLinkedList::new(),
            linked_stack: LinkedStack::new(),
            array_stack: ArrayStack::new(),
            queue: ArrayQueue::new(),
            ring: RingBufferQueue::with_capacity(ring_capacity),
            priority: PriorityQueue::new(),
        }
    }

    fn get(&self, structure: Structure) -> &dyn Container {
        match structure {
            Structure::Singly => &self.singly,
            Structure::Doubly => &self.doubly,
            Structure::Circular => &self.circular,
            Structure::LinkedStack => &self.linked_stack,
            Structure::ArrayStack => &self.array_stack,
            Structure::Queue => &self.queue,
            Structure::Ring => &self.ring,
            Structure::Priority => &self.priority,
        }
    }

    fn get_mut(&mut self, structure: Structure) -> &mut dyn Container {
        match structure {
            Structure::Singly => &mut self.singly,
            Structure::Doubly => &mut self.doubly,
            Structure::Circular => &mut self.circular,
            Structure::LinkedStack => &mut self.linked_stack,
            Structure::ArrayStack => &mut self.array_stack,
            Structure::Queue => &mut self.queue,
            Structure::Ring => &mut self.ring,
            Structure::Priority => &mut self.priority,
        }
    }

    fn list_mut(&mut self, structure: Structure) -> Option<&mut dyn Removable> {
        let list: &mut dyn Removable = match structure {
            Structure::Singly => &mut self.singly,
            Structure::Doubly => &mut self.doubly,
            Structure::Circular => &mut self.circular,
            _ => return None,
        };
        Some(list)
    }
}

/// Holds one of each container and runs commands against them.
pub struct Workbench {
    config: WorkbenchConfig,
    memory: Box<dyn MemorySource>,
    shelf: Shelf,
}

impl Workbench {
    /// Creates a workbench measuring the process resident set.
    ///
    /// # Panics
    ///
    /// Panics if `config.ring_capacity` is 0.
    pub fn new(config: WorkbenchConfig) -> Self {
        Self::with_memory(config, Box::new(ResidentSet))
    }

    /// Creates a workbench measuring memory with `memory`.
    ///
    /// # Panics
    ///
    /// Panics if `config.ring_capacity` is 0.
    pub fn with_memory(config: WorkbenchConfig, memory: Box<dyn MemorySource>) -> Self {
        Self {
            config,
            memory,
            shelf: Shelf::new(config.ring_capacity),
        }
    }

    /// Returns the configuration the workbench was built with.
    pub fn config(&self) -> WorkbenchConfig {
        self.config
    }

    /// Runs one command.
    ///
    /// Fails only if the action is not offered by the structure.
    pub fn execute(&mut self, command: Command) -> Result<Report, CommandError> {
        match command {
            Command::Reset(Some(structure)) => {
                self.reset(structure);
                log::debug!("reset {structure}");
                Ok(self.report(structure, vec![Message::Reset(structure)], Totals::new()))
            }
            Command::Reset(None) => {
                let mut messages = Vec::with_capacity(Structure::ALL.len());
                for structure in Structure::ALL {
                    self.reset(structure);
                    messages.push(Message::Reset(structure));
                }
                log::debug!("reset all structures");
                Ok(Report {
                    structure: None,
                    messages,
                    totals: Totals::new(),
                    snapshot: None,
                })
            }
            Command::Run {
                structure,
                action: Action::Show,
            } => {
                let m = measure_with(&*self.memory, || self.snapshot(structure));
                let mut totals = Totals::new();
                totals.record(&m);
                Ok(Report {
                    structure: Some(structure),
                    messages: Vec::new(),
                    totals,
                    snapshot: Some(m.result),
                })
            }
            Command::Run { structure, action } => {
                action.check(structure)?;
                let mut totals = Totals::new();
                let messages = self.run(structure, action, &mut totals);
                Ok(self.report(structure, messages, totals))
            }
        }
    }

    fn run(&mut self, structure: Structure, action: Action, totals: &mut Totals) -> Vec<Message> {
        let memory = &*self.memory;

        match action {
            Action::Remove(values) => {
                let Some(list) = self.shelf.list_mut(structure) else {
                    // Rejected by Action::check
                    return Vec::new();
                };
                values
                    .into_iter()
                    .map(|value| {
                        let m = measure_with(memory, || list.remove_value(&value));
                        totals.record(&m);
                        match m.result {
                            Some(removed) => Message::Removed(removed),
                            None => Message::NotFound(value),
                        }
                    })
                    .collect()
            }
            Action::Resize(capacity) if capacity > MAX_RING_CAPACITY => {
                log::debug!("resize to {capacity} refused, above {MAX_RING_CAPACITY}");
                vec![Message::OverLimit {
                    requested: capacity,
                    limit: MAX_RING_CAPACITY,
                }]
            }
            Action::Resize(capacity) => {
                let ring = &mut self.shelf.ring;
                let m = measure_with(memory, || ring.resize(capacity));
                totals.record(&m);
                vec![match m.result {
                    Ok(()) => Message::Resized(capacity),
                    Err(err) => Message::ResizeRejected(err),
                }]
            }
            Action::State => vec![Message::State(self.shelf.ring.state())],
            action => run_common(self.shelf.get_mut(structure), memory, action, totals),
        }
    }

    /// Empties a structure; the ring buffer also returns to its configured
    /// capacity.
    fn reset(&mut self, structure: Structure) {
        if structure == Structure::Ring {
            self.shelf.ring = RingBufferQueue::with_capacity(self.config.ring_capacity);
        } else {
            self.shelf.get_mut(structure).reset();
        }
    }

    /// Returns the current contents of `structure`.
    pub fn snapshot(&self, structure: Structure) -> Snapshot {
        let container = self.shelf.get(structure);
        let ring = &self.shelf.ring;
        Snapshot {
            columns: structure.columns(),
            rows: container.rows(),
            len: container.count(),
            ring: (structure == Structure::Ring).then(|| RingFigures {
                capacity: ring.capacity(),
                free: ring.free_slots(),
                front: ring.front_index(),
                rear: ring.rear_index(),
            }),
        }
    }

    fn report(&self, structure: Structure, messages: Vec<Message>, totals: Totals) -> Report {
        Report {
            structure: Some(structure),
            messages,
            totals,
            snapshot: Some(self.snapshot(structure)),
        }
    }
}

fn run_common(
    container: &mut dyn Container,
    memory: &dyn MemorySource,
    action: Action,
    totals: &mut Totals,
) -> Vec<Message> {
    match action {
        Action::Insert(items) => items
            .into_iter()
            .map(|item| {
                let value = item.value.clone();
                let priority = item.priority;
                let m = measure_with(memory, || container.put(item));
                totals.record(&m);
                match (m.result, priority) {
                    (Ok(()), Some(priority)) => Message::Enqueued { value, priority },
                    (Ok(()), None) => Message::Inserted(value),
                    (Err(value), _) => {
                        log::debug!("{value} turned away, structure full");
                        Message::Full(value)
                    }
                }
            })
            .collect(),
        Action::Pop(count) => {
            let mut messages = Vec::with_capacity(count.min(64));
            for _ in 0..count {
                let m = measure_with(memory, || container.take());
                totals.record(&m);
                match m.result {
                    Some(value) => messages.push(Message::Removed(value)),
                    None => {
                        messages.push(Message::Empty);
                        break;
                    }
                }
            }
            messages
        }
        Action::Search(values) => values
            .into_iter()
            .map(|value| {
                let m = measure_with(memory, || container.find(&value));
                totals.record(&m);
                match m.result {
                    Some(position) => Message::Found { value, position },
                    None => Message::NotFound(value),
                }
            })
            .collect(),
        Action::Peek => {
            let m = measure_with(memory, || container.next_out().cloned());
            totals.record(&m);
            vec![m.result.map_or(Message::Empty, Message::Peeked)]
        }
        Action::Show | Action::Remove(_) | Action::Resize(_) | Action::State => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_probe::NoMemory;

    fn bench() -> Workbench {
        Workbench::with_memory(WorkbenchConfig { ring_capacity: 2 }, Box::new(NoMemory))
    }

    fn exec(bench: &mut Workbench, line: &str) -> Report {
        let command = Command::parse_line(line).unwrap().unwrap();
        bench.execute(command).unwrap()
    }

    fn values(report: &Report) -> Vec<String> {
        let snapshot = report.snapshot.as_ref().unwrap();
        snapshot.rows.iter().map(|(_, v)| v.clone()).collect()
    }

    #[test]
    fn each_value_is_one_measured_call() {
        let mut bench = bench();
        let report = exec(&mut bench, "singly insert a,b,c");

        assert_eq!(report.totals.calls(), 3);
        assert_eq!(report.totals.memory_delta(), None);
        assert_eq!(
            report.messages,
            vec![
                Message::Inserted("a".into()),
                Message::Inserted("b".into()),
                Message::Inserted("c".into()),
            ]
        );
        assert_eq!(values(&report), vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_reports_missing_values() {
        let mut bench = bench();
        exec(&mut bench, "doubly insert x,y");
        let report = exec(&mut bench, "doubly remove y,z");

        assert_eq!(
            report.messages,
            vec![Message::Removed("y".into()), Message::NotFound("z".into())]
        );
        assert_eq!(report.snapshot.unwrap().len, 1);
    }

    #[test]
    fn search_reports_positions() {
        let mut bench = bench();
        exec(&mut bench, "stack push 1,2,3");
        let report = exec(&mut bench, "stack search 3,1,9");

        assert_eq!(
            report.messages,
            vec![
                Message::Found { value: "3".into(), position: 0 },
                Message::Found { value: "1".into(), position: 2 },
                Message::NotFound("9".into()),
            ]
        );
    }

    #[test]
    fn ring_full_does_not_abort_batch() {
        let mut bench = bench();
        let report = exec(&mut bench, "ring enqueue 1,2,3,4");

        assert_eq!(report.totals.calls(), 4);
        assert_eq!(
            report.messages,
            vec![
                Message::Inserted("1".into()),
                Message::Inserted("2".into()),
                Message::Full("3".into()),
                Message::Full("4".into()),
            ]
        );
        let ring = report.snapshot.unwrap().ring.unwrap();
        assert_eq!(ring.capacity, 2);
        assert_eq!(ring.free, 0);
    }

    #[test]
    fn ring_resize_and_state() {
        let mut bench = bench();
        exec(&mut bench, "ring enqueue a,b");

        let report = exec(&mut bench, "ring resize 1");
        assert!(matches!(
            report.messages[0],
            Message::ResizeRejected(ResizeError::BelowLength { requested: 1, len: 2 })
        ));

        let report = exec(&mut bench, "ring resize 4");
        assert_eq!(report.messages, vec![Message::Resized(4)]);
        assert_eq!(values(&report), vec!["a", "b", "-", "-"]);

        let report = exec(&mut bench, "ring state");
        assert_eq!(report.messages, vec![Message::State(QueueState::Partial)]);
    }

    #[test]
    fn show_measures_the_rendered_snapshot() {
        let mut bench = bench();
        exec(&mut bench, "doubly insert a,b");

        let report = exec(&mut bench, "doubly show");
        assert!(report.messages.is_empty());
        assert_eq!(report.totals.calls(), 1);
        assert_eq!(values(&report), vec!["a", "b"]);
        assert_eq!(report.snapshot, Some(bench.snapshot(Structure::Doubly)));
    }

    #[test]
    fn oversized_resize_is_refused_without_allocating() {
        let mut bench = bench();
        exec(&mut bench, "ring enqueue a");

        let report = exec(&mut bench, "ring resize 18446744073709551615");
        assert_eq!(
            report.messages,
            vec![Message::OverLimit {
                requested: usize::MAX,
                limit: MAX_RING_CAPACITY,
            }]
        );
        assert_eq!(report.snapshot.unwrap().ring.unwrap().capacity, 2);
    }

    #[test]
    fn reset_ring_restores_configured_capacity() {
        let mut bench = bench();
        exec(&mut bench, "ring resize 6");
        let report = exec(&mut bench, "reset ring");

        assert_eq!(report.snapshot.unwrap().ring.unwrap().capacity, 2);
    }

    #[test]
    fn priority_lists_by_priority() {
        let mut bench = bench();
        exec(&mut bench, "priority enqueue x:5,y:1,z:3");
        let report = exec(&mut bench, "priority show");

        let rows = report.snapshot.unwrap().rows;
        assert_eq!(
            rows,
            vec![
                ("1".to_string(), "y".to_string()),
                ("3".to_string(), "z".to_string()),
                ("5".to_string(), "x".to_string()),
            ]
        );

        let report = exec(&mut bench, "priority dequeue 3");
        assert_eq!(
            report.messages,
            vec![
                Message::Removed("y".into()),
                Message::Removed("z".into()),
                Message::Removed("x".into()),
            ]
        );
    }

    #[test]
    fn pop_stops_at_empty() {
        let mut bench = bench();
        exec(&mut bench, "queue enqueue a");
        let report = exec(&mut bench, "queue dequeue 5");

        assert_eq!(
            report.messages,
            vec![Message::Removed("a".into()), Message::Empty]
        );
        assert_eq!(report.totals.calls(), 2);
    }

    #[test]
    fn peek_on_empty_is_empty() {
        let mut bench = bench();
        let report = exec(&mut bench, "linked-stack peek");
        assert_eq!(report.messages, vec![Message::Empty]);
    }

    #[test]
    fn unsupported_command_is_an_error() {
        let mut bench = bench();
        let err = bench
            .execute(Command::Run {
                structure: Structure::Queue,
                action: Action::Remove(vec!["a".into()]),
            })
            .unwrap_err();
        assert!(matches!(err, CommandError::Unsupported { .. }));
    }

    #[test]
    fn reset_all_empties_everything() {
        let mut bench = bench();
        exec(&mut bench, "circular insert a");
        exec(&mut bench, "array-stack push b");

        let report = exec(&mut bench, "reset all");
        assert_eq!(report.messages.len(), Structure::ALL.len());
        assert!(bench.snapshot(Structure::Circular).rows.is_empty());
        assert!(bench.snapshot(Structure::ArrayStack).rows.is_empty());
    }

    #[test]
    fn messages_read_naturally() {
        assert_eq!(Message::NotFound("q".into()).to_string(), "q: not found");
        assert_eq!(
            Message::Found { value: "q".into(), position: 2 }.to_string(),
            "q: found at position 2"
        );
        assert_eq!(Message::Empty.to_string(), "empty");
        assert_eq!(Message::Full("q".into()).to_string(), "q: full");
    }
}
