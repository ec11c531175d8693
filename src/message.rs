use serde::{Serialize, de::DeserializeOwned};

/// Wrapper trait for application message types.
///
/// Any type implementing [`Serialize`] and [`DeserializeOwned`] automatically
/// implements this trait via a blanket implementation, so plain data structs,
/// enums and [`serde_json::Value`] can all travel through a connection.
pub trait Message: Serialize + DeserializeOwned {}

impl<T> Message for T where T: Serialize + DeserializeOwned {}
