//! Identity provider infrastructure

mod gotrue;

pub use gotrue::{GoTrueIdentityClient, IdentityConfig};
