//! Dispatch of validated instructions to action handlers, and the request
//! pipeline that ties resolution, dispatch and formatting together.

pub mod agent;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod response;
pub mod types;

pub use agent::Agent;
pub use dispatcher::Dispatcher;
pub use error::ActionError;
pub use handler::{ActionHandler, HandlerMap, PreviewHandler, WebhookConfig, WebhookHandler};
pub use response::{ResponseEnvelope, ResponseFormatter};
pub use types::{ActionOutput, DispatchResult};
