//! Intersection Simulation Library
//!
//! Simulates vehicles queueing and crossing a single four-way signalized
//! intersection. Vehicles are fed in from per-road record files.

pub mod simulation;
