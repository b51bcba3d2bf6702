//! The incoming state filter: `(type, phase) -> {Allowed, Denied, Unknown}`.
//!
//! Pure function, no I/O, no mutation. Consults the *current* phase, not a
//! snapshot taken at arrival, because a handler runs to completion before
//! the next packet is filtered.

use ssh_packet_proto::MessageType;

use crate::phase::{AuthServiceState, AuthState, DhState, RequestState, Role, SessionPhase, SessionState};

/// Outcome of filtering one incoming message type against the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// The message is legal right now; dispatch it.
    Allowed,
    /// The message is illegal right now; this is a protocol-confusion
    /// attempt or a bug in the peer. Fatal.
    Denied,
    /// The type has no entry in the table at all (distinct from `Denied`):
    /// not a violation, just unrecognized. Reply with UNIMPLEMENTED.
    Unknown,
}

/// Extra state the filter needs beyond the phase tuple itself: whether a
/// global request or the addressed channel's request is still pending a
/// SUCCESS/FAILURE reply.
///
/// The packet layer does not track these slots; the caller (the
/// feature layer holding the channel registry) supplies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterContext {
    /// State of the most recent unanswered `GLOBAL_REQUEST`, if any.
    pub global_request: Option<RequestState>,
    /// State of the addressed channel's most recent unanswered
    /// `CHANNEL_REQUEST`, if any (`None` if the packet's channel id does
    /// not resolve to a known channel, treated as not pending).
    pub channel_request: Option<RequestState>,
}

/// Filter `msg` against `phase` and `ctx`. Total over all `(MessageType,
/// SessionPhase)` pairs: every call returns one of the three outcomes.
#[must_use]
pub fn filter(msg: MessageType, phase: &SessionPhase, ctx: &FilterContext) -> FilterResult {
    use MessageType::{
        ChannelClose, ChannelData, ChannelEof, ChannelExtendedData, ChannelFailure,
        ChannelOpen, ChannelOpenConfirmation, ChannelOpenFailure, ChannelRequest,
        ChannelSuccess, ChannelWindowAdjust, Debug, Disconnect, ExtInfo, GlobalRequest,
        GssapiErrtok, GssapiError, GssapiExchComplete, GssapiMic, Ignore, KexDhGexInit,
        KexDhGexReply, KexDhGexRequest, KexInit, KexdhInit, KexdhReply, NewKeys,
        RequestFailure, RequestSuccess, ServiceAccept, ServiceRequest, Unimplemented,
        UserauthBanner, UserauthFailure, UserauthInfoResponse, UserauthPkOk, UserauthRequest,
        UserauthSuccess,
    };

    match msg {
        Disconnect | Ignore | Unimplemented | Debug => FilterResult::Allowed,

        ServiceRequest => allowed_if(
            phase.role == Role::Server
                && matches!(phase.session_state, SessionState::Authenticating | SessionState::Authenticated)
                && phase.dh_state == DhState::Finished,
        ),

        ServiceAccept => allowed_if(
            matches!(phase.session_state, SessionState::Authenticating | SessionState::Authenticated)
                && phase.dh_state == DhState::Finished
                && phase.auth_service_state == AuthServiceState::Sent,
        ),

        ExtInfo => allowed_if(
            phase.session_state == SessionState::Authenticating && phase.dh_state == DhState::Finished,
        ),

        KexInit => allowed_if(
            matches!(phase.session_state, SessionState::Authenticated | SessionState::InitialKex)
                && matches!(phase.dh_state, DhState::Init | DhState::Finished),
        ),

        NewKeys => allowed_if(
            phase.session_state == SessionState::Dh && phase.dh_state == DhState::NewkeysSent,
        ),

        KexdhInit => allowed_if(
            phase.role == Role::Server
                && phase.session_state == SessionState::Dh
                && phase.dh_state == DhState::Init,
        ),

        KexdhReply => allowed_if(
            phase.session_state == SessionState::Dh && phase.dh_state == DhState::InitSent,
        ),

        // Distilled §9 open question: messages 32-34 (group exchange) are
        // left unfiltered to match the observable source behavior.
        KexDhGexInit | KexDhGexReply | KexDhGexRequest => FilterResult::Allowed,

        UserauthRequest => allowed_if(
            phase.role == Role::Server
                && phase.dh_state == DhState::Finished
                && phase.session_state == SessionState::Authenticating,
        ),

        UserauthFailure => allowed_if(
            phase.role == Role::Client
                && phase.dh_state == DhState::Finished
                && phase.session_state == SessionState::Authenticating,
        ),

        UserauthSuccess => allowed_if(
            phase.role == Role::Client
                && phase.dh_state == DhState::Finished
                && phase.session_state == SessionState::Authenticating
                && matches!(
                    phase.auth_state,
                    AuthState::KbdintSent
                        | AuthState::PubkeyAuthSent
                        | AuthState::PasswordAuthSent
                        | AuthState::GssapiMicSent
                        | AuthState::NoneSent
                ),
        ),

        UserauthBanner => allowed_if(phase.session_state == SessionState::Authenticating),

        UserauthPkOk => allowed_if(
            phase.session_state == SessionState::Authenticating
                && matches!(
                    phase.auth_state,
                    AuthState::KbdintSent | AuthState::PubkeyOfferSent | AuthState::GssapiRequestSent
                ),
        ),

        UserauthInfoResponse => allowed_if(
            phase.session_state == SessionState::Authenticating
                && matches!(phase.auth_state, AuthState::Info | AuthState::GssapiToken),
        ),

        // Distilled §9 open question: GSSAPI exchange-complete/error/errtok
        // are left unfiltered to match the observable source behavior.
        GssapiExchComplete | GssapiError | GssapiErrtok => FilterResult::Allowed,

        GssapiMic => allowed_if(
            phase.role == Role::Server
                && phase.dh_state == DhState::Finished
                && phase.session_state == SessionState::Authenticating,
        ),

        GlobalRequest | ChannelOpen => allowed_if(phase.session_state == SessionState::Authenticated),

        RequestSuccess | RequestFailure => allowed_if(
            phase.session_state == SessionState::Authenticated
                && ctx.global_request == Some(RequestState::Pending),
        ),

        ChannelOpenConfirmation | ChannelOpenFailure | ChannelWindowAdjust | ChannelData
        | ChannelExtendedData | ChannelEof | ChannelClose | ChannelRequest => {
            allowed_if(phase.session_state == SessionState::Authenticated)
        },

        ChannelSuccess | ChannelFailure => allowed_if(
            phase.session_state == SessionState::Authenticated
                && ctx.channel_request == Some(RequestState::Pending),
        ),

        MessageType::Other(_) => FilterResult::Unknown,
    }
}

fn allowed_if(condition: bool) -> FilterResult {
    if condition { FilterResult::Allowed } else { FilterResult::Denied }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use ssh_packet_proto::MessageType;

    use super::*;

    fn server_authenticated() -> SessionPhase {
        SessionPhase {
            session_state: SessionState::Authenticated,
            dh_state: DhState::Finished,
            auth_state: AuthState::Success,
            auth_service_state: AuthServiceState::Accepted,
            role: Role::Server,
        }
    }

    #[test]
    fn disconnect_always_allowed() {
        let phase = SessionPhase::initial(Role::Client);
        assert_eq!(
            filter(MessageType::Disconnect, &phase, &FilterContext::default()),
            FilterResult::Allowed
        );
    }

    #[test]
    fn channel_data_denied_before_auth() {
        let phase = SessionPhase::initial(Role::Server);
        assert_eq!(
            filter(MessageType::ChannelData, &phase, &FilterContext::default()),
            FilterResult::Denied
        );
    }

    #[test]
    fn channel_data_allowed_once_authenticated() {
        let phase = server_authenticated();
        assert_eq!(
            filter(MessageType::ChannelData, &phase, &FilterContext::default()),
            FilterResult::Allowed
        );
    }

    #[test]
    fn unregistered_type_is_unknown() {
        let phase = server_authenticated();
        assert_eq!(
            filter(MessageType::from_u8(250), &phase, &FilterContext::default()),
            FilterResult::Unknown
        );
    }

    #[test]
    fn kexdh_init_requires_server_role_and_dh_init() {
        let mut phase = SessionPhase::initial(Role::Server);
        phase.session_state = SessionState::Dh;
        assert_eq!(
            filter(MessageType::KexdhInit, &phase, &FilterContext::default()),
            FilterResult::Allowed
        );

        let mut client_phase = phase;
        client_phase.role = Role::Client;
        assert_eq!(
            filter(MessageType::KexdhInit, &client_phase, &FilterContext::default()),
            FilterResult::Denied
        );
    }

    #[test]
    fn channel_success_requires_pending_request() {
        let phase = server_authenticated();
        let idle = FilterContext { channel_request: Some(RequestState::Idle), ..Default::default() };
        let pending =
            FilterContext { channel_request: Some(RequestState::Pending), ..Default::default() };

        assert_eq!(filter(MessageType::ChannelSuccess, &phase, &idle), FilterResult::Denied);
        assert_eq!(filter(MessageType::ChannelSuccess, &phase, &pending), FilterResult::Allowed);
    }

    #[test]
    fn gex_and_gssapi_ranges_are_unfiltered() {
        let phase = SessionPhase::initial(Role::Client);
        for msg in [
            MessageType::KexDhGexInit,
            MessageType::KexDhGexReply,
            MessageType::KexDhGexRequest,
            MessageType::GssapiExchComplete,
            MessageType::GssapiError,
            MessageType::GssapiErrtok,
        ] {
            assert_eq!(filter(msg, &phase, &FilterContext::default()), FilterResult::Allowed);
        }
    }

    #[test]
    fn filter_is_total() {
        let phase = SessionPhase::initial(Role::Client);
        for byte in 0u8..=255 {
            let msg = MessageType::from_u8(byte);
            // Must not panic, and must return one of the three outcomes.
            // The match is exhaustive so this is really a compile-time
            // guarantee, verified at runtime for the full byte range too.
            let _ = filter(msg, &phase, &FilterContext::default());
        }
    }

    fn arb_session_state() -> impl Strategy<Value = SessionState> {
        prop_oneof![
            Just(SessionState::InitialKex),
            Just(SessionState::KexinitReceived),
            Just(SessionState::Dh),
            Just(SessionState::Authenticating),
            Just(SessionState::Authenticated),
            Just(SessionState::Error),
        ]
    }

    fn arb_dh_state() -> impl Strategy<Value = DhState> {
        prop_oneof![
            Just(DhState::Init),
            Just(DhState::InitSent),
            Just(DhState::NewkeysSent),
            Just(DhState::Finished),
        ]
    }

    fn arb_auth_service_state() -> impl Strategy<Value = AuthServiceState> {
        prop_oneof![
            Just(AuthServiceState::None),
            Just(AuthServiceState::Sent),
            Just(AuthServiceState::Accepted),
        ]
    }

    fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Client), Just(Role::Server)]
    }

    fn arb_request_state() -> impl Strategy<Value = Option<RequestState>> {
        prop_oneof![
            Just(None),
            Just(Some(RequestState::Idle)),
            Just(Some(RequestState::Pending)),
        ]
    }

    fn arb_phase() -> impl Strategy<Value = SessionPhase> {
        (arb_session_state(), arb_dh_state(), arb_auth_service_state(), arb_role()).prop_map(
            |(session_state, dh_state, auth_service_state, role)| SessionPhase {
                session_state,
                dh_state,
                auth_state: AuthState::Success,
                auth_service_state,
                role,
            },
        )
    }

    proptest! {
        /// `filter` is a pure, total function: every `(MessageType,
        /// SessionPhase, FilterContext)` combination produces a result, and
        /// the same combination always produces the same result.
        #[test]
        fn filter_is_total_and_deterministic(
            byte in any::<u8>(),
            phase in arb_phase(),
            global_request in arb_request_state(),
            channel_request in arb_request_state(),
        ) {
            let msg = MessageType::from_u8(byte);
            let ctx = FilterContext { global_request, channel_request };

            let first = filter(msg, &phase, &ctx);
            let second = filter(msg, &phase, &ctx);
            prop_assert_eq!(first, second, "filter must be deterministic for identical inputs");
        }
    }
}
