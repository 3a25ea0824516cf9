// Core of the interactive code-walkthrough presenter: step registry,
// walkthrough controller, text highlighter, and the timer-driven step
// simulations. Rendering lives in the binary (src/main.rs); everything
// here is UI-toolkit agnostic.

pub mod config;
pub mod error;
pub mod highlight;
pub mod registry;
pub mod script;
pub mod simulation {
    pub mod architecture;
    pub mod clock;
    pub mod data_cleaning;
    pub mod sliding_window;
    pub mod training_curve;
}
pub mod walkthrough;

pub use error::{Result, WalkthroughError};
pub use registry::{builtin_steps, HighlightRange, SimulationKind, StepDefinition, StepRegistry};
pub use walkthrough::WalkthroughController;
