//! Type conversions between AWS Bedrock SDK and domain types
//!
//! Converts Bedrock Converse API responses to domain `LlmResponse`,
//! and domain tool types to Bedrock request formats.

use aws_sdk_bedrockruntime::types as bedrock;
use aws_smithy_types::Document;
use notion_agent_application::{GatewayError, ToolResultMessage};
use notion_agent_domain::{ContentBlock, LlmResponse, StopReason};
use std::collections::HashMap;

// ─── Bedrock → Domain ────────────────────────────────────────────

/// Convert Bedrock stop reason to domain StopReason.
pub fn convert_stop_reason(reason: &bedrock::StopReason) -> StopReason {
    match reason {
        bedrock::StopReason::EndTurn => StopReason::EndTurn,
        bedrock::StopReason::ToolUse => StopReason::ToolUse,
        bedrock::StopReason::MaxTokens => StopReason::MaxTokens,
        other => StopReason::Other(format!("{:?}", other)),
    }
}

/// Convert a single Bedrock content block to a domain ContentBlock.
///
/// Returns `None` for unsupported block types (Image, GuardContent, etc.).
pub fn convert_content_block(block: &bedrock::ContentBlock) -> Option<ContentBlock> {
    match block {
        bedrock::ContentBlock::Text(text) => Some(ContentBlock::Text(text.clone())),
        bedrock::ContentBlock::ToolUse(tool_use) => {
            let input = document_to_json(tool_use.input());
            let input_map = match input {
                serde_json::Value::Object(map) => map
                    .into_iter()
                    .collect::<HashMap<String, serde_json::Value>>(),
                _ => HashMap::new(),
            };
            Some(ContentBlock::ToolUse {
                id: tool_use.tool_use_id().to_string(),
                name: tool_use.name().to_string(),
                input: input_map,
            })
        }
        // Skip Image, GuardContent, Document, etc.
        _ => None,
    }
}

/// Convert a Bedrock ConverseOutput to a domain LlmResponse.
pub fn convert_converse_output(
    output: &bedrock::ConverseOutput,
    stop_reason: &bedrock::StopReason,
    model_id: &str,
) -> LlmResponse {
    let content = match output {
        bedrock::ConverseOutput::Message(message) => message
            .content()
            .iter()
            .filter_map(convert_content_block)
            .collect(),
        _ => return LlmResponse::from_text(""),
    };

    LlmResponse {
        content,
        stop_reason: Some(convert_stop_reason(stop_reason)),
        model: Some(model_id.to_string()),
    }
}

// ─── Domain → Bedrock ────────────────────────────────────────────

/// Convert a domain ToolResultMessage to a Bedrock ContentBlock::ToolResult.
pub fn convert_tool_result(
    result: &ToolResultMessage,
) -> Result<bedrock::ContentBlock, GatewayError> {
    let status = if result.is_error {
        bedrock::ToolResultStatus::Error
    } else {
        bedrock::ToolResultStatus::Success
    };

    // Bedrock rejects blank text blocks.
    let text = if result.output.trim().is_empty() {
        "(no output)".to_string()
    } else {
        result.output.clone()
    };
    let content = bedrock::ToolResultContentBlock::Text(text);

    let block = bedrock::ToolResultBlock::builder()
        .tool_use_id(&result.tool_use_id)
        .status(status)
        .content(content)
        .build()
        .map_err(|e| GatewayError::RequestFailed(format!("Failed to build tool result: {}", e)))?;

    Ok(bedrock::ContentBlock::ToolResult(block))
}

/// Convert a domain LlmResponse back to Bedrock content blocks for history
/// tracking. Blank text blocks are dropped.
pub fn response_to_content_blocks(
    response: &LlmResponse,
) -> Result<Vec<bedrock::ContentBlock>, GatewayError> {
    let mut blocks = Vec::with_capacity(response.content.len());
    for block in &response.content {
        match block {
            ContentBlock::Text(text) if text.trim().is_empty() => {}
            ContentBlock::Text(text) => blocks.push(bedrock::ContentBlock::Text(text.clone())),
            ContentBlock::ToolUse { id, name, input } => {
                let input_doc = json_to_document(&serde_json::json!(input));
                let tool_use = bedrock::ToolUseBlock::builder()
                    .tool_use_id(id)
                    .name(name)
                    .input(input_doc)
                    .build()
                    .map_err(|e| {
                        GatewayError::RequestFailed(format!("Failed to build tool use: {}", e))
                    })?;
                blocks.push(bedrock::ContentBlock::ToolUse(tool_use));
            }
        }
    }
    Ok(blocks)
}

/// Convert a provider-neutral tool schema (`{name, description, input_schema}`)
/// to a Bedrock Tool::ToolSpec.
pub fn convert_tool_schema(schema: &serde_json::Value) -> Option<bedrock::Tool> {
    let name = schema.get("name")?.as_str()?;
    let description = schema.get("description").and_then(|d| d.as_str());

    let input_schema_json = schema.get("input_schema").cloned().unwrap_or_else(|| {
        serde_json::json!({
            "type": "object",
            "properties": {},
        })
    });
    let input_schema = json_to_document(&input_schema_json);

    let mut builder = bedrock::ToolSpecification::builder()
        .name(name)
        .input_schema(bedrock::ToolInputSchema::Json(input_schema));
    if let Some(desc) = description {
        builder = builder.description(desc);
    }

    builder.build().ok().map(bedrock::Tool::ToolSpec)
}

// ─── JSON ↔ Document helpers ─────────────────────────────────────

/// Convert a serde_json::Value to an aws_smithy_types::Document.
pub fn json_to_document(value: &serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::Null,
        serde_json::Value::Bool(b) => Document::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Document::Number(aws_smithy_types::Number::NegInt(i))
            } else if let Some(f) = n.as_f64() {
                Document::Number(aws_smithy_types::Number::Float(f))
            } else {
                Document::Null
            }
        }
        serde_json::Value::String(s) => Document::String(s.clone()),
        serde_json::Value::Array(arr) => {
            Document::Array(arr.iter().map(json_to_document).collect())
        }
        serde_json::Value::Object(map) => Document::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_document(v)))
                .collect(),
        ),
    }
}

/// Convert an aws_smithy_types::Document to a serde_json::Value.
pub fn document_to_json(doc: &Document) -> serde_json::Value {
    match doc {
        Document::Null => serde_json::Value::Null,
        Document::Bool(b) => serde_json::Value::Bool(*b),
        Document::Number(n) => match n {
            aws_smithy_types::Number::PosInt(i) => serde_json::json!(*i),
            aws_smithy_types::Number::NegInt(i) => serde_json::json!(*i),
            aws_smithy_types::Number::Float(f) => serde_json::Value::Number(
                serde_json::Number::from_f64(*f).unwrap_or_else(|| serde_json::Number::from(0)),
            ),
        },
        Document::String(s) => serde_json::Value::String(s.clone()),
        Document::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(document_to_json).collect())
        }
        Document::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), document_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert a Bedrock SDK error to a GatewayError.
pub fn convert_converse_error(
    err: &aws_sdk_bedrockruntime::error::SdkError<
        aws_sdk_bedrockruntime::operation::converse::ConverseError,
    >,
) -> GatewayError {
    use aws_sdk_bedrockruntime::operation::converse::ConverseError;

    match err {
        aws_sdk_bedrockruntime::error::SdkError::ServiceError(service_err) => {
            match service_err.err() {
                ConverseError::ThrottlingException(e) => {
                    GatewayError::RequestFailed(format!("Bedrock throttled: {}", e))
                }
                ConverseError::ModelNotReadyException(e) => {
                    GatewayError::ModelNotAvailable(format!("Bedrock model not ready: {}", e))
                }
                ConverseError::ValidationException(e) => {
                    GatewayError::RequestFailed(format!("Bedrock validation error: {}", e))
                }
                ConverseError::ModelTimeoutException(_) => GatewayError::Timeout,
                other => GatewayError::RequestFailed(format!("Bedrock error: {:?}", other)),
            }
        }
        other => GatewayError::ConnectionError(format!("Bedrock SDK error: {}", other)),
    }
}
