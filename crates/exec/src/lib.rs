//! Command execution: shell runner, safe-mode policy, confirmation gate.

pub mod confirm;
pub mod policy;
pub mod runner;

pub use confirm::{Confirmer, FixedConfirmer, StdinConfirmer};
pub use policy::ExecPolicy;
pub use runner::{CommandOutput, CommandRunner, COMMAND_TIMEOUT_SECS};
