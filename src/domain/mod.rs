pub mod entry;
pub mod match_record;
pub mod digest;
pub mod transport;

pub use entry::{Entry, ParsedFeed};
pub use match_record::{normalize_link, MatchRecord};
pub use digest::Digest;
pub use transport::{Encryption, TransportProfile, TransportTable};
