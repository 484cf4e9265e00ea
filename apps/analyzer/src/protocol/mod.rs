//! Wire layer: tagged binary decoding and action classification.

pub mod classifier;
pub mod decoder;
pub mod encoder;
pub mod event;
pub mod value;

pub use classifier::{ActionKind, Classification, Classifier, ClassifierConfig, Matcher};
pub use decoder::{decode, DecodeError, Decoded, DecoderLimits};
pub use encoder::FrameBuilder;
pub use event::{Direction, GameEvent};
pub use value::{DecodedValue, TypeTag};
