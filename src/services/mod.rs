pub mod chat_client;
pub mod endpoint_guard;
pub mod invoker;
pub mod logger;
pub mod preset;
pub mod resolver;
pub mod tool_executor;
pub mod validation;
