//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    models::Instruction,
    workflow::{FeatureKickoff, StepExecution},
};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Instruction> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created instruction with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<FeatureKickoff> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instruction = &self.resource.instruction;
        writeln!(
            f,
            "Started feature build with instruction ID: {}",
            instruction.id
        )?;
        writeln!(f)?;
        write!(f, "{instruction}")?;
        writeln!(f, "\n## Next Steps")?;
        writeln!(f)?;
        for step in &self.resource.next_steps {
            writeln!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Wrapper type for displaying the outcome of a single execution step.
pub struct StepOutcome<'a>(pub &'a StepExecution);

impl fmt::Display for StepOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.0.result;
        let label = if result.success { "completed" } else { "failed" };
        writeln!(f, "Step {} ({}) {label}", result.step_id, result.step_type)?;

        let message = result.message();
        if !message.trim().is_empty() {
            writeln!(f)?;
            writeln!(f, "```text")?;
            writeln!(f, "{}", message.trim_end())?;
            writeln!(f, "```")?;
        }
        for artifact in &result.artifacts {
            writeln!(f, "- Artifact: `{}`", artifact.path)?;
        }
        Ok(())
    }
}
