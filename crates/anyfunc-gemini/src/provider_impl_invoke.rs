use std::sync::Arc;

use anyfunc_core::{
    backend::BackendKind,
    context::CallContext,
    error::AnyFuncError,
    provider::{InvokeFuture, InvokeProvider, InvokeRequest},
};

use crate::{
    GeminiAdapter,
    adapter::MODEL,
    api_v1beta::{GenerateContentRequest, GenerateContentResponse},
    error::GeminiError,
};

impl InvokeProvider for GeminiAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Gemini
    }

    fn model(&self) -> &str {
        MODEL
    }

    fn invoke<'a>(&'a self, ctx: &'a CallContext, request: InvokeRequest<'a>) -> InvokeFuture<'a> {
        let client = Arc::clone(&self.client);
        let body = build_request(request);

        Box::pin(ctx.run(async move {
            let response = client.generate_content(MODEL, &body).await?;
            Ok::<_, AnyFuncError>(first_text(response)?)
        }))
    }
}

pub(crate) fn build_request(request: InvokeRequest<'_>) -> GenerateContentRequest {
    GenerateContentRequest::new(request.user_text)
        .with_system_instruction(request.system_instruction)
}

/// Text of the first candidate.
pub(crate) fn first_text(response: GenerateContentResponse) -> Result<String, GeminiError> {
    let Some(candidate) = response.candidates.first() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map(|reason| format!("prompt blocked: {reason}"))
            .unwrap_or_else(|| "response has no candidates".into());
        return Err(GeminiError::EmptyGeneration(reason));
    };

    candidate.text().ok_or_else(|| {
        GeminiError::EmptyGeneration(format!(
            "first candidate has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })
}
