//! Conversion between protocol messages and link payloads
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors related to the transport of messages
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("could not encode message: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("could not decode message: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("payload has {0} trailing bytes")]
    TrailingBytes(usize),
    #[error("io channel is full")]
    ChannelFull,
    #[error("io channel is disconnected")]
    Disconnected,
}

pub fn encode<M: Serialize>(message: &M) -> Result<Bytes, TransportError> {
    let bytes = bincode::serde::encode_to_vec(message, bincode::config::standard())?;
    Ok(Bytes::from(bytes))
}

/// Decode a full payload; a payload must contain exactly one message
pub fn decode<M: DeserializeOwned>(payload: &[u8]) -> Result<M, TransportError> {
    let (message, read) =
        bincode::serde::decode_from_slice::<M, _>(payload, bincode::config::standard())?;
    if read != payload.len() {
        return Err(TransportError::TrailingBytes(payload.len() - read));
    }
    Ok(message)
}
