mod invoke;

pub use invoke::{InvokeFuture, InvokeProvider, InvokeRequest};
