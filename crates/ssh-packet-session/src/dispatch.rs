//! The handler registry and dispatch mechanism.
//!
//! A registry is an ordered list of handler tables. Dispatch iterates the
//! tables in insertion order and stops at the first handler that reports
//! [`HandlerOutcome::Used`]: append, iterate to first USED, matching the
//! observable source behavior rather than a "later-registered sees it
//! first" prepend order.
//!
//! Handlers never get a live `&mut Session`. Re-entrant sends are modeled
//! as [`SessionAction`]s returned alongside the outcome, which the session
//! driver applies once the handler call has returned. This mirrors the
//! action-return pattern used throughout this workspace's connection and
//! server driver state machines: state machines stay pure, I/O happens at
//! the edges.

use ssh_packet_proto::MessageType;

/// The inputs a handler sees for one dispatched packet.
#[derive(Debug, Clone, Copy)]
pub struct HandlerInput<'a> {
    /// The packet's message type.
    pub msg_type: MessageType,
    /// The payload, with the type byte already stripped.
    pub payload: &'a [u8],
    /// The sequence number this packet was received under.
    pub recv_seq: u32,
}

/// Whether a handler consumed the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler consumed the packet; stop iterating tables.
    Used,
    /// The handler declined; try the next table.
    NotUsed,
}

/// A side effect a handler wants the session driver to perform once
/// dispatch for the current packet completes.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Send this payload through the outgoing framer.
    Send(Vec<u8>),
}

/// What a single handler invocation produced.
#[derive(Debug, Clone)]
pub struct HandlerResult {
    /// Used or not used.
    pub outcome: HandlerOutcome,
    /// Actions to run regardless of outcome.
    pub actions: Vec<SessionAction>,
}

impl HandlerResult {
    /// The handler declined the packet and produced no side effects.
    #[must_use]
    pub fn not_used() -> Self {
        Self { outcome: HandlerOutcome::NotUsed, actions: Vec::new() }
    }

    /// The handler consumed the packet with no side effects.
    #[must_use]
    pub fn used() -> Self {
        Self { outcome: HandlerOutcome::Used, actions: Vec::new() }
    }

    /// The handler consumed the packet and wants these actions applied.
    #[must_use]
    pub fn used_with(actions: Vec<SessionAction>) -> Self {
        Self { outcome: HandlerOutcome::Used, actions }
    }
}

/// A registered handler callback.
pub type HandlerFn = Box<dyn FnMut(&HandlerInput<'_>) -> HandlerResult + Send>;

/// One contiguous range of message types and their handlers, per distilled
/// §3: `{ start_type, count, entries: [u8; count] -> handler_fn, user_data }`.
///
/// `user_data` is modeled as whatever the closure captures, which is the
/// idiomatic Rust equivalent of a C callback's opaque `void *user_data`.
pub struct HandlerTable {
    start_type: u8,
    entries: Vec<Option<HandlerFn>>,
}

impl HandlerTable {
    /// Create an empty table covering `[start_type, start_type + count)`.
    #[must_use]
    pub fn new(start_type: u8, count: u8) -> Self {
        Self { start_type, entries: (0..count).map(|_| None).collect() }
    }

    /// Register `handler` for `msg_type`. Panics if `msg_type` falls
    /// outside this table's range. This is a programming error, always
    /// caught at registration time, not at runtime dispatch time.
    #[allow(clippy::expect_used)]
    pub fn register(&mut self, msg_type: u8, handler: HandlerFn) {
        let index = self.index_of(msg_type).expect("msg_type outside table range");
        self.entries[index] = Some(handler);
    }

    fn index_of(&self, msg_type: u8) -> Option<usize> {
        let offset = msg_type.checked_sub(self.start_type)?;
        let index = offset as usize;
        (index < self.entries.len()).then_some(index)
    }

    fn entry_mut(&mut self, msg_type: u8) -> Option<&mut HandlerFn> {
        let index = self.index_of(msg_type)?;
        self.entries[index].as_mut()
    }
}

/// Outcome of running the full dispatch pipeline for one packet.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// Some table's handler consumed the packet.
    Handled(Vec<SessionAction>),
    /// No table had a handler for this type; the caller should emit
    /// UNIMPLEMENTED.
    Unhandled(Vec<SessionAction>),
}

/// Ordered list of handler tables, append-only after construction except
/// for [`HandlerRegistry::register_table`].
pub struct HandlerRegistry {
    tables: Vec<HandlerTable>,
}

impl HandlerRegistry {
    /// A registry seeded with the default table covering types 1-100.
    #[must_use]
    pub fn new() -> Self {
        Self { tables: vec![default_table()] }
    }

    /// Append another handler table. Additional tables are consulted after
    /// all previously registered ones: append order, never prepend.
    pub fn register_table(&mut self, table: HandlerTable) {
        self.tables.push(table);
    }

    /// Dispatch one packet: iterate tables in order, stop at the first
    /// `Used`.
    pub fn dispatch(&mut self, input: &HandlerInput<'_>) -> DispatchOutcome {
        let mut actions = Vec::new();
        for table in &mut self.tables {
            let Some(handler) = table.entry_mut(input.msg_type.to_u8()) else { continue };
            let result = handler(input);
            actions.extend(result.actions);
            if result.outcome == HandlerOutcome::Used {
                return DispatchOutcome::Handled(actions);
            }
        }
        DispatchOutcome::Unhandled(actions)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in table registered at session construction, containing the
/// 100 built-in entries for messages 1-100.
///
/// `DISCONNECT`, `IGNORE`, `DEBUG`, and `UNIMPLEMENTED` are fully consumed
/// here: each logs and returns [`HandlerOutcome::Used`], matching
/// `ssh_packet_disconnect_callback`/`ssh_packet_ignore_callback`/
/// `ssh_packet_unimplemented` in the original source, which are installed
/// as the built-in callbacks for exactly these types and return
/// `SSH_PACKET_USED`. A table that left them `NotUsed` would fall through
/// to [`DispatchOutcome::Unhandled`] and synthesize a spurious
/// `SSH_MSG_UNIMPLEMENTED` reply for every `IGNORE`/`DEBUG` a peer sends,
/// and receiving `UNIMPLEMENTED` would itself trigger another
/// `UNIMPLEMENTED` — two such peers ping-ponging forever.
fn default_table() -> HandlerTable {
    let mut table = HandlerTable::new(1, 100);
    table.register(
        MessageType::Disconnect.to_u8(),
        Box::new(|input| {
            tracing::debug!(seq = input.recv_seq, "DISCONNECT consumed by default handler");
            HandlerResult::used()
        }),
    );
    table.register(
        MessageType::Ignore.to_u8(),
        Box::new(|input| {
            tracing::trace!(seq = input.recv_seq, "IGNORE consumed by default handler");
            HandlerResult::used()
        }),
    );
    table.register(
        MessageType::Debug.to_u8(),
        Box::new(|input| {
            tracing::debug!(seq = input.recv_seq, len = input.payload.len(), "DEBUG consumed by default handler");
            HandlerResult::used()
        }),
    );
    table.register(
        MessageType::Unimplemented.to_u8(),
        Box::new(|input| {
            tracing::trace!(seq = input.recv_seq, "peer UNIMPLEMENTED consumed by default handler");
            HandlerResult::used()
        }),
    );
    table
}
