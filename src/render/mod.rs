/*!
 * Rendering pipeline.
 *
 * - `workspace`: job-scoped temporary directory and concat manifest
 * - `renderer`: per-item cut/probe/overlay state machine
 * - `orchestrator`: sequential job driver and final concatenation
 */

pub mod orchestrator;
pub mod renderer;
pub mod workspace;

// Re-export main types
pub use self::orchestrator::PipelineOrchestrator;
pub use self::renderer::SegmentRenderer;
pub use self::workspace::JobWorkspace;
