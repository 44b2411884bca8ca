//! Discriminators carried on the wire.
//!
//! Every enum keeps values outside its known table as `Unknown(raw)` so a
//! newer client never stops the decoder.

use std::fmt;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $repr:ty {
            $($variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Unknown($repr),
        }

        impl $name {
            pub fn from_code(code: $repr) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }

            pub fn code(self) -> $repr {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unknown(code) => code,
                }
            }

            /// Variant name, or `None` for values outside the known table.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $($name::$variant => Some(stringify!($variant)),)+
                    $name::Unknown(_) => None,
                }
            }

            pub fn is_unknown(self) -> bool {
                matches!(self, $name::Unknown(_))
            }
        }

        impl From<$repr> for $name {
            fn from(code: $repr) -> Self {
                Self::from_code(code)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "Unknown ({})", self.code()),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

wire_enum! {
    /// Top-level datagram discriminator (first byte).
    pub enum PacketType: u8 {
        Unreliable = 0,
        Reliable = 1,
        Hello = 8,
        Disconnect = 9,
        Acknowledgement = 10,
        Fragment = 11,
        Ping = 12,
    }
}

impl PacketType {
    /// Packet types whose header carries a two-byte nonce.
    pub fn carries_nonce(self) -> bool {
        matches!(
            self,
            PacketType::Reliable | PacketType::Ping | PacketType::Hello | PacketType::Acknowledgement
        )
    }

    /// Packet types whose body is a sequence of framed messages.
    pub fn carries_messages(self) -> bool {
        matches!(self, PacketType::Reliable | PacketType::Unreliable)
    }
}

wire_enum! {
    /// Root message tag of a framed message.
    pub enum MessageTag: u8 {
        HostGame = 0,
        JoinGame = 1,
        StartGame = 2,
        RemoveGame = 3,
        RemovePlayer = 4,
        GameData = 5,
        GameDataTo = 6,
        JoinedGame = 7,
        EndGame = 8,
        AlterGame = 10,
        KickPlayer = 11,
        WaitForHost = 12,
        Redirect = 13,
        ReselectServer = 14,
        GetGameListV2 = 16,
        ReportPlayer = 17,
        QuickMatch = 18,
        QuickMatchHost = 19,
        SetGameSession = 20,
        SetActivePodType = 21,
        QueryPlatformIds = 22,
        QueryLobbyInfo = 23,
    }
}

wire_enum! {
    /// Client language announced in Hello.
    pub enum Language: u32 {
        English = 0,
        SpanishLA = 1,
        Brazilian = 2,
        Portuguese = 3,
        Korean = 4,
        Russian = 5,
        Dutch = 6,
        Filipino = 7,
        French = 8,
        German = 9,
        Italian = 10,
        Japanese = 11,
        SpanishEU = 12,
    }
}

wire_enum! {
    pub enum QuickChatMode: u8 {
        FreeChatOrQuickChat = 1,
        QuickChatOnly = 2,
    }
}
