/*
 * Crowd Flow Simulation - Module Definitions
 *
 * This file defines the module structure for the crowd flow simulation.
 * The core is a boid flocking engine (separation, alignment, cohesion)
 * with a tick-derived peak-hour mode in which agents additionally take
 * random walks. Each tick emits one state record per agent for external
 * consumers (the CSV exporter or the interactive renderer).
 */

// Re-export key components for easier access. MemorySink stays public so
// external consumers (including the integration tests) can buffer records
// without writing a file.
pub use boid::{limit, Boid};
pub use config::{ConfigError, SimConfig};
pub use export::{AgentRecord, CsvExporter, ExportError, MemorySink, RecordSink};
pub use sim::{is_peak_hour, Simulation};

// Define modules
pub mod app;
pub mod boid;
pub mod config;
pub mod export;
pub mod sim;

// Constants
pub const MARKER_RADIUS: f32 = 3.0;
