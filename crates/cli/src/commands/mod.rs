pub mod ask;
pub mod chat;
pub mod collect;
pub mod status;
