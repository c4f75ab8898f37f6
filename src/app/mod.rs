// Host-side helpers that sit between a UI/upload layer and the core.

pub mod session;
