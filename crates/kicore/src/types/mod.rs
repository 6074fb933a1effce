//! Type definitions

pub mod chat;
pub mod phrases;
pub mod player;
pub mod selection;

pub use chat::{
    Category, ChatLine, ContextPrefix, DisplayEvent, Presentation, RoutingDecision, SenderLabel,
};
pub use phrases::Phrases;
pub use player::{names_match, PlayerIdentity};
pub use selection::{Addressee, NamedList, SelectionContext};
