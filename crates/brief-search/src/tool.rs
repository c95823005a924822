//! Tool trait definition

use crate::Result;
use async_trait::async_trait;
use brief_llm::ToolDefinition;
use serde_json::Value;

/// Trait for tools the search model can call
///
/// Each tool provides a name, description, and JSON schema for its input;
/// together these form the definition offered to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry and match the name the model
    /// calls it by
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the model understand when to use this tool
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;

    /// The definition offered to the model
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.name(), self.description(), self.input_schema())
    }
}
