//! Scripted fakes for the gateway and tool session ports.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage};
use crate::ports::tool_session::{SessionError, ToolSession, ToolSessionLauncher};
use async_trait::async_trait;
use notion_agent_domain::{
    ConnectionParams, ContentBlock, LlmResponse, ModelId, StopReason, ToolCall, ToolDescriptor,
    ToolError, ToolResult,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::Text(text.to_string())],
        stop_reason: Some(StopReason::EndTurn),
        model: Some("test-model".to_string()),
    }
}

/// A turn requesting the given `(id, tool)` pairs, in order.
pub fn tool_use_response(calls: &[(&str, &str)]) -> LlmResponse {
    LlmResponse {
        content: calls
            .iter()
            .map(|(id, name)| ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input: HashMap::new(),
            })
            .collect(),
        stop_reason: Some(StopReason::ToolUse),
        model: Some("test-model".to_string()),
    }
}

// ==================== Gateway ====================

#[derive(Default)]
struct GatewayState {
    responses: Mutex<VecDeque<LlmResponse>>,
    sent_results: Mutex<Vec<Vec<ToolResultMessage>>>,
    system_prompt: Mutex<Option<String>>,
}

/// Gateway whose sessions pop pre-scripted responses from a shared queue.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    state: Arc<GatewayState>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        let gateway = Self::default();
        *gateway.state.responses.lock().unwrap() = VecDeque::from(responses);
        gateway
    }

    /// Tool result batches sent back to the model, one entry per turn.
    pub fn sent_results(&self) -> Vec<Vec<ToolResultMessage>> {
        self.state.sent_results.lock().unwrap().clone()
    }

    pub fn system_prompt(&self) -> Option<String> {
        self.state.system_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session(&self, model: &ModelId) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ScriptedSession {
            model: model.clone(),
            state: self.state.clone(),
        }))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &ModelId,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        *self.state.system_prompt.lock().unwrap() = Some(system_prompt.to_string());
        self.create_session(model).await
    }
}

struct ScriptedSession {
    model: ModelId,
    state: Arc<GatewayState>,
}

impl ScriptedSession {
    fn next(&self) -> Result<LlmResponse, GatewayError> {
        self.state
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GatewayError::Other("No more responses".to_string()))
    }
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &ModelId {
        &self.model
    }

    async fn send_with_tools(
        &self,
        _message: &str,
        _tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        self.next()
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError> {
        self.state
            .sent_results
            .lock()
            .unwrap()
            .push(results.to_vec());
        self.next()
    }
}

// ==================== Tool session ====================

#[derive(Clone)]
enum Behavior {
    Output(String),
    InvocationError(String),
    SessionError(SessionError),
}

#[derive(Default)]
struct SessionState {
    tools: Vec<ToolDescriptor>,
    behaviors: HashMap<String, Behavior>,
    list_error: Option<SessionError>,
    list_delay: Option<Duration>,
    list_calls: AtomicUsize,
    calls: Mutex<Vec<String>>,
    closes: AtomicUsize,
    double_close: AtomicBool,
}

/// Tool session with scripted per-tool behavior.
///
/// Clones share state, so a test can hand a clone to a launcher and inspect
/// the original afterwards.
#[derive(Clone, Default)]
pub struct ScriptedToolSession {
    state: Arc<SessionState>,
}

impl ScriptedToolSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self) -> &mut SessionState {
        Arc::get_mut(&mut self.state).expect("configure before cloning")
    }

    pub fn with_tools(mut self, names: &[&str]) -> Self {
        self.state_mut().tools = names.iter().map(|n| ToolDescriptor::new(*n)).collect();
        self
    }

    pub fn with_output(mut self, tool: &str, output: &str) -> Self {
        self.state_mut()
            .behaviors
            .insert(tool.to_string(), Behavior::Output(output.to_string()));
        self
    }

    pub fn with_invocation_error(mut self, tool: &str, message: &str) -> Self {
        self.state_mut().behaviors.insert(
            tool.to_string(),
            Behavior::InvocationError(message.to_string()),
        );
        self
    }

    pub fn with_session_error(mut self, tool: &str, error: SessionError) -> Self {
        self.state_mut()
            .behaviors
            .insert(tool.to_string(), Behavior::SessionError(error));
        self
    }

    pub fn with_list_error(mut self, error: SessionError) -> Self {
        self.state_mut().list_error = Some(error);
        self
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.state_mut().list_delay = Some(delay);
        self
    }

    /// Tool names dispatched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    pub fn closed_twice(&self) -> bool {
        self.state.double_close.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolSession for ScriptedToolSession {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.state.list_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.state.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.state.tools.clone()),
        }
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<ToolResult, SessionError> {
        self.state
            .calls
            .lock()
            .unwrap()
            .push(call.tool_name.clone());
        match self.state.behaviors.get(&call.tool_name) {
            Some(Behavior::Output(out)) => Ok(ToolResult::success(&call.tool_name, out.as_str())),
            Some(Behavior::InvocationError(message)) => Err(SessionError::ToolInvocation {
                tool: call.tool_name.clone(),
                message: message.clone(),
            }),
            Some(Behavior::SessionError(err)) => Err(err.clone()),
            None => Ok(ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed("no scripted behavior"),
            )),
        }
    }

    async fn close(&self) -> Result<(), SessionError> {
        if self.state.closes.fetch_add(1, Ordering::SeqCst) > 0 {
            self.state.double_close.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

// ==================== Launcher ====================

/// Launcher handing out clones of one scripted session.
pub struct FakeLauncher {
    session: ScriptedToolSession,
    open_error: Option<SessionError>,
    open_delay: Option<Duration>,
    opens: AtomicUsize,
}

impl FakeLauncher {
    pub fn new(session: ScriptedToolSession) -> Self {
        Self {
            session,
            open_error: None,
            open_delay: None,
            opens: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: SessionError) -> Self {
        Self {
            open_error: Some(error),
            ..Self::new(ScriptedToolSession::new())
        }
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolSessionLauncher for FakeLauncher {
    async fn open(&self, _params: &ConnectionParams) -> Result<Box<dyn ToolSession>, SessionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.open_error {
            Some(err) => Err(err.clone()),
            None => Ok(Box::new(self.session.clone())),
        }
    }
}
