/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Routing category assigned to an inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    CreatorIdentity,
    CreatorContact,
    Educational,
    Rejected,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::CreatorIdentity => "creator_identity",
            Intent::CreatorContact => "creator_contact",
            Intent::Educational => "educational",
            Intent::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const CREATOR_NAME: &str = "OKAFOR EMMANUEL IKE";
pub const CREATOR_WHATSAPP: &str = "https://wa.link/i7s2lh";

/// Who built the bot and how to reach them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatorProfile {
    pub name: String,
    pub contact_link: String,
}

impl Default for CreatorProfile {
    fn default() -> Self {
        Self {
            name: CREATOR_NAME.to_string(),
            contact_link: CREATOR_WHATSAPP.to_string(),
        }
    }
}
