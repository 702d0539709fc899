use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Claims carried by an access token.
pub trait Payload: Serialize + for<'d> Deserialize<'d> {
    fn user(&self) -> &str;
    fn role(&self) -> &str;
}

pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}
