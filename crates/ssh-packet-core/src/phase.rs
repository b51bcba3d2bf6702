//! The session-phase tuple the state filter reads.
//!
//! `SessionPhase` is *observed*, not owned, by the packet layer (distilled
//! §3): the key-exchange driver, user-auth driver, and channel multiplexer
//! mutate it as they make progress, and the packet layer only ever reads it
//! (the single write the layer performs is forcing `session_state =
//! SessionState::Error` on a fatal failure, which callers do by calling
//! [`SessionPhase::force_error`]).

/// Overall session progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Before the first KEXINIT has been sent or received.
    InitialKex,
    /// A KEXINIT has been received; negotiating algorithms.
    KexinitReceived,
    /// Diffie-Hellman exchange in progress.
    Dh,
    /// Authenticating (post-NEWKEYS, pre-USERAUTH_SUCCESS).
    Authenticating,
    /// Fully authenticated; channels may be opened.
    Authenticated,
    /// A fatal error occurred; no further packets are processed.
    Error,
}

/// Diffie-Hellman exchange progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhState {
    /// No KEXDH message sent or received yet.
    Init,
    /// KEXDH_INIT sent (client) or about to reply (server).
    InitSent,
    /// NEWKEYS sent, waiting for the peer's NEWKEYS.
    NewkeysSent,
    /// Both NEWKEYS exchanged; new keys are active.
    Finished,
}

/// User authentication progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// "none" method offered, awaiting response.
    NoneSent,
    /// Public-key offer ("query") sent.
    PubkeyOfferSent,
    /// Public-key authentication request sent.
    PubkeyAuthSent,
    /// Password authentication request sent.
    PasswordAuthSent,
    /// Keyboard-interactive request sent.
    KbdintSent,
    /// Keyboard-interactive info exchange in progress.
    Info,
    /// GSSAPI authentication request sent.
    GssapiRequestSent,
    /// GSSAPI token exchange in progress.
    GssapiToken,
    /// GSSAPI MIC sent, awaiting result.
    GssapiMicSent,
    /// Authentication succeeded.
    Success,
    /// Authentication failed (may retry with another method).
    Failed,
    /// Authentication partially succeeded (multi-factor continues).
    Partial,
    /// Authentication layer hit an unrecoverable error.
    Error,
}

/// Progress of the `ssh-userauth` service request/accept handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthServiceState {
    /// No SERVICE_REQUEST sent yet.
    None,
    /// SERVICE_REQUEST sent, awaiting SERVICE_ACCEPT.
    Sent,
    /// SERVICE_ACCEPT received.
    Accepted,
}

/// Which end of the connection this session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// We are the SSH client.
    Client,
    /// We are the SSH server.
    Server,
}

/// Whether a previously-sent request (global or channel-scoped) is still
/// awaiting its SUCCESS/FAILURE reply.
///
/// Gates the filter's preconditions for `REQUEST_SUCCESS` / `REQUEST_FAILURE`
/// (global) and `CHANNEL_SUCCESS` / `CHANNEL_FAILURE` (per-channel); the
/// packet layer does not track these slots itself, but the state filter
/// needs to know their current value, so callers supply it via
/// [`FilterContext`](crate::filter::FilterContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// No request outstanding.
    Idle,
    /// A request was sent and a SUCCESS/FAILURE reply is expected.
    Pending,
}

/// The full phase tuple the state filter consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPhase {
    /// Overall session progress.
    pub session_state: SessionState,
    /// Diffie-Hellman exchange progress.
    pub dh_state: DhState,
    /// User authentication progress.
    pub auth_state: AuthState,
    /// `ssh-userauth` service request/accept progress.
    pub auth_service_state: AuthServiceState,
    /// Client or server.
    pub role: Role,
}

impl SessionPhase {
    /// Construct the initial phase for a freshly connected session.
    #[must_use]
    pub fn initial(role: Role) -> Self {
        Self {
            session_state: SessionState::InitialKex,
            dh_state: DhState::Init,
            auth_state: AuthState::NoneSent,
            auth_service_state: AuthServiceState::None,
            role,
        }
    }

    /// Force the session into the terminal error state. This is the only
    /// mutation the packet layer itself performs on a phase it was handed.
    pub fn force_error(&mut self) {
        self.session_state = SessionState::Error;
    }
}
