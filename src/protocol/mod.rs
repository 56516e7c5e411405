// Portal protocol: transport, session context, puzzle solvers, and the ordered step pipeline.

pub mod boundary;
pub mod context;
pub mod core;
pub mod endpoints;
pub mod identity;
pub mod pipeline;
pub mod puzzles;
pub mod steps;
