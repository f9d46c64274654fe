//! Input events and the font serialization boundary

pub mod codec;
pub mod input;
pub mod worker;

// Input system
pub use input::{KeyCode, KeyEvent, ModifierState, PointerEvent, PointerPhase, ViewTransform};
// Serialization
pub use codec::{AssetPayload, CodecError, FontAsset, FontCodec, FontSnapshot, JsonCodec, UfoCodec};
pub use worker::{CodecWorker, PendingJob};
