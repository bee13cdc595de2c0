use std::sync::Arc;

use anyfunc_core::{
    backend::BackendKind,
    context::CallContext,
    error::AnyFuncError,
    provider::{InvokeFuture, InvokeProvider, InvokeRequest},
};

use crate::{
    OpenAiAdapter,
    adapter::MODEL,
    api_v1::{ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse},
    error::OpenAiError,
};

impl InvokeProvider for OpenAiAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::OpenAi
    }

    fn model(&self) -> &str {
        MODEL
    }

    fn invoke<'a>(&'a self, ctx: &'a CallContext, request: InvokeRequest<'a>) -> InvokeFuture<'a> {
        let client = Arc::clone(&self.client);
        let body = build_request(request);

        Box::pin(ctx.run(async move {
            let response = client.chat_completion(&body).await?;
            Ok::<_, AnyFuncError>(first_text(response)?)
        }))
    }
}

/// System message first, then the encoded prompt as the user message.
pub(crate) fn build_request(request: InvokeRequest<'_>) -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        MODEL,
        vec![
            ChatCompletionMessage::system(request.system_instruction),
            ChatCompletionMessage::user(request.user_text),
        ],
    )
}

/// Text of the first choice.
pub(crate) fn first_text(response: ChatCompletionResponse) -> Result<String, OpenAiError> {
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(OpenAiError::EmptyGeneration("response has no choices".into()));
    };

    match choice.message.content {
        Some(content) => Ok(content),
        None => Err(OpenAiError::EmptyGeneration(
            choice
                .message
                .refusal
                .map(|refusal| format!("model refused: {refusal}"))
                .unwrap_or_else(|| {
                    format!("first choice has no content ({:?})", choice.finish_reason)
                }),
        )),
    }
}
