//! external_lookup — pointers to external IT knowledge sources.

use async_trait::async_trait;
use sysward_core::error::ToolError;
use sysward_core::Tool;

/// Structured pointers to vendor documentation and community resources.
/// A stand-in for a real search integration; the shape of the answer is
/// what the reasoning loop consumes.
#[derive(Debug, Default)]
pub struct ExternalLookupTool;

#[async_trait]
impl Tool for ExternalLookupTool {
    fn name(&self) -> &str {
        "external_lookup"
    }

    fn description(&self) -> &str {
        "Look up IT knowledge, documentation pointers, and known solutions for a topic"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        Ok(format!(
            "External search results for: \"{input}\"\n\n\
             Recommended resources:\n\
             1. Official documentation: check vendor documentation for {input}\n\
             2. Community forums: Stack Overflow, r/sysadmin\n\
             3. Knowledge bases: Microsoft Docs, Red Hat Documentation, Ubuntu Wiki\n\
             4. Security advisories: CVE databases, vendor security bulletins\n\n\
             Suggested search terms: {input}, troubleshooting, best practices, configuration"
        ))
    }
}
