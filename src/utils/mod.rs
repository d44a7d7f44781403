// Shared helpers for binary payload handling

pub mod bits;
pub mod io;
