pub mod text_input;
pub mod toggle;

pub use text_input::TextInputState;
pub use toggle::Toggle;
