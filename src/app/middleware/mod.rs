pub mod cors;
pub mod json;

pub use cors::{OriginPolicy, enforce_origin_policy, guard_socket_handshake};
pub use json::{JsonBody, ParsedJson, parse_json_body};
