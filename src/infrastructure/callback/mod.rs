mod http_callback_dispatcher;

pub use http_callback_dispatcher::{DEFAULT_CALLBACK_TIMEOUT, HttpCallbackDispatcher};
