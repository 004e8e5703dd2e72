//! Traffic Signal Simulation Library
//!
//! A two-road signalized intersection with an adaptive signal controller,
//! runnable headless or behind any renderer that consumes scene snapshots.

pub mod simulation;
