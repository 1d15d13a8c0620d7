//! warstats-core: domain logic for the Foxhole war statistics viewer.
//!
//! Everything here is independent of the terminal front end: the war record
//! types, commendation ranking, the typed state bus, the virtual list windowing
//! engine, roster search, the war-selection location codec, and the SQLite
//! store that remembers the last location between runs.

pub mod bus;
pub mod cache;
pub mod db;
pub mod error;
pub mod roster;
pub mod schema;
pub mod search;
pub mod selection;
pub mod source;
pub mod types;
pub mod virtual_list;

pub use error::CoreError;
