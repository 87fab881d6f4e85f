use serde::de::DeserializeOwned;

/// A list resource served at `{base_url}/{PATH}`.
pub trait Method {
    const PATH: &'static str;

    type Item: DeserializeOwned;
}
