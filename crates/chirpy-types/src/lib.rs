pub mod api;
pub mod models;

/// Longest chirp body accepted, counted in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Chirp and user identifiers. Assigned from 1 upwards and never reused.
pub type Id = u64;
