pub(super) mod core;
pub(super) mod io;
pub(super) mod knowledge;
