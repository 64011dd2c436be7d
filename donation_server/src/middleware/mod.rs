mod signature;

pub use signature::{check_signature, SignatureMiddlewareFactory, SignatureMiddlewareService};
