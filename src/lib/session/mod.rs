mod codec;

pub use codec::{Identity, SessionCodec, SessionError, SESSION_COOKIE};
