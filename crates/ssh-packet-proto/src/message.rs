//! SSH message type codes.
//!
//! Named exactly as they appear in the incoming state filter's table. Values
//! not covered by a named variant still round-trip through
//! [`MessageType::Other`] so the framer can parse the type byte of any
//! packet, including ones the filter will mark `Unknown`.

/// A parsed SSH message type byte.
///
/// `#[non_exhaustive]` because the legal message space is the full `u8`
/// range and new named variants may be added without it being a breaking
/// change for callers that already match on `Other(_)`.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// SSH_MSG_DISCONNECT
    Disconnect,
    /// SSH_MSG_IGNORE
    Ignore,
    /// SSH_MSG_UNIMPLEMENTED
    Unimplemented,
    /// SSH_MSG_DEBUG
    Debug,
    /// SSH_MSG_SERVICE_REQUEST
    ServiceRequest,
    /// SSH_MSG_SERVICE_ACCEPT
    ServiceAccept,
    /// SSH_MSG_EXT_INFO
    ExtInfo,
    /// SSH_MSG_KEXINIT
    KexInit,
    /// SSH_MSG_NEWKEYS
    NewKeys,
    /// SSH_MSG_KEXDH_INIT
    KexdhInit,
    /// SSH_MSG_KEXDH_REPLY
    KexdhReply,
    /// SSH_MSG_KEX_DH_GEX_INIT
    KexDhGexInit,
    /// SSH_MSG_KEX_DH_GEX_REPLY
    KexDhGexReply,
    /// SSH_MSG_KEX_DH_GEX_REQUEST
    KexDhGexRequest,
    /// SSH_MSG_USERAUTH_REQUEST
    UserauthRequest,
    /// SSH_MSG_USERAUTH_FAILURE
    UserauthFailure,
    /// SSH_MSG_USERAUTH_SUCCESS
    UserauthSuccess,
    /// SSH_MSG_USERAUTH_BANNER
    UserauthBanner,
    /// SSH_MSG_USERAUTH_PK_OK
    UserauthPkOk,
    /// SSH_MSG_USERAUTH_INFO_RESPONSE
    UserauthInfoResponse,
    /// SSH_MSG_USERAUTH_GSSAPI_EXCHANGE_COMPLETE
    GssapiExchComplete,
    /// SSH_MSG_USERAUTH_GSSAPI_ERROR
    GssapiError,
    /// SSH_MSG_USERAUTH_GSSAPI_ERRTOK
    GssapiErrtok,
    /// SSH_MSG_USERAUTH_GSSAPI_MIC
    GssapiMic,
    /// SSH_MSG_GLOBAL_REQUEST
    GlobalRequest,
    /// SSH_MSG_REQUEST_SUCCESS
    RequestSuccess,
    /// SSH_MSG_REQUEST_FAILURE
    RequestFailure,
    /// SSH_MSG_CHANNEL_OPEN
    ChannelOpen,
    /// SSH_MSG_CHANNEL_OPEN_CONFIRMATION
    ChannelOpenConfirmation,
    /// SSH_MSG_CHANNEL_OPEN_FAILURE
    ChannelOpenFailure,
    /// SSH_MSG_CHANNEL_WINDOW_ADJUST
    ChannelWindowAdjust,
    /// SSH_MSG_CHANNEL_DATA
    ChannelData,
    /// SSH_MSG_CHANNEL_EXTENDED_DATA
    ChannelExtendedData,
    /// SSH_MSG_CHANNEL_EOF
    ChannelEof,
    /// SSH_MSG_CHANNEL_CLOSE
    ChannelClose,
    /// SSH_MSG_CHANNEL_REQUEST
    ChannelRequest,
    /// SSH_MSG_CHANNEL_SUCCESS
    ChannelSuccess,
    /// SSH_MSG_CHANNEL_FAILURE
    ChannelFailure,
    /// Any type code without a named variant (also covers reserved and
    /// unassigned ranges).
    Other(u8),
}

impl MessageType {
    /// Parse a message type from its wire byte.
    #[must_use]
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            1 => Self::Disconnect,
            2 => Self::Ignore,
            3 => Self::Unimplemented,
            4 => Self::Debug,
            5 => Self::ServiceRequest,
            6 => Self::ServiceAccept,
            7 => Self::ExtInfo,
            20 => Self::KexInit,
            21 => Self::NewKeys,
            30 => Self::KexdhInit,
            31 => Self::KexdhReply,
            32 => Self::KexDhGexInit,
            33 => Self::KexDhGexReply,
            34 => Self::KexDhGexRequest,
            50 => Self::UserauthRequest,
            51 => Self::UserauthFailure,
            52 => Self::UserauthSuccess,
            53 => Self::UserauthBanner,
            60 => Self::UserauthPkOk,
            61 => Self::UserauthInfoResponse,
            63 => Self::GssapiExchComplete,
            64 => Self::GssapiError,
            65 => Self::GssapiErrtok,
            66 => Self::GssapiMic,
            80 => Self::GlobalRequest,
            81 => Self::RequestSuccess,
            82 => Self::RequestFailure,
            90 => Self::ChannelOpen,
            91 => Self::ChannelOpenConfirmation,
            92 => Self::ChannelOpenFailure,
            93 => Self::ChannelWindowAdjust,
            94 => Self::ChannelData,
            95 => Self::ChannelExtendedData,
            96 => Self::ChannelEof,
            97 => Self::ChannelClose,
            98 => Self::ChannelRequest,
            99 => Self::ChannelSuccess,
            100 => Self::ChannelFailure,
            other => Self::Other(other),
        }
    }

    /// Serialize back to the wire byte.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Disconnect => 1,
            Self::Ignore => 2,
            Self::Unimplemented => 3,
            Self::Debug => 4,
            Self::ServiceRequest => 5,
            Self::ServiceAccept => 6,
            Self::ExtInfo => 7,
            Self::KexInit => 20,
            Self::NewKeys => 21,
            Self::KexdhInit => 30,
            Self::KexdhReply => 31,
            Self::KexDhGexInit => 32,
            Self::KexDhGexReply => 33,
            Self::KexDhGexRequest => 34,
            Self::UserauthRequest => 50,
            Self::UserauthFailure => 51,
            Self::UserauthSuccess => 52,
            Self::UserauthBanner => 53,
            Self::UserauthPkOk => 60,
            Self::UserauthInfoResponse => 61,
            Self::GssapiExchComplete => 63,
            Self::GssapiError => 64,
            Self::GssapiErrtok => 65,
            Self::GssapiMic => 66,
            Self::GlobalRequest => 80,
            Self::RequestSuccess => 81,
            Self::RequestFailure => 82,
            Self::ChannelOpen => 90,
            Self::ChannelOpenConfirmation => 91,
            Self::ChannelOpenFailure => 92,
            Self::ChannelWindowAdjust => 93,
            Self::ChannelData => 94,
            Self::ChannelExtendedData => 95,
            Self::ChannelEof => 96,
            Self::ChannelClose => 97,
            Self::ChannelRequest => 98,
            Self::ChannelSuccess => 99,
            Self::ChannelFailure => 100,
            Self::Other(byte) => byte,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}({})", self.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::MessageType;

    #[test]
    fn named_types_round_trip() {
        for byte in [1u8, 2, 3, 4, 5, 6, 7, 20, 21, 30, 31, 32, 33, 34, 50, 51, 52, 53, 60, 61,
            63, 64, 65, 66, 80, 81, 82, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99, 100]
        {
            let parsed = MessageType::from_u8(byte);
            assert_eq!(parsed.to_u8(), byte);
        }
    }

    proptest! {
        #[test]
        fn any_byte_round_trips(byte in any::<u8>()) {
            prop_assert_eq!(MessageType::from_u8(byte).to_u8(), byte);
        }
    }
}
