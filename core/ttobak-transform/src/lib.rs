//! Turns Korean text into an easier form through a text-generation provider.
//!
//! A request is validated, rendered into one fixed per-mode prompt, and sent
//! as a single-turn chat completion. The first completion's text is the
//! output.

mod error;
mod generator;
mod mode;
mod prompt;
mod request;
mod transformer;

pub use error::{TransformError, TransformResult};
pub use generator::{GeneratorConfig, OpenAiGenerator, TextGenerator, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use mode::Mode;
pub use prompt::render_prompt;
pub use request::TransformRequest;
pub use transformer::Transformer;
