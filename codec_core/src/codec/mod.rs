pub mod email;
pub mod jwt;
pub mod primitives;
pub mod url;

pub use email::decode_cloudflare_email;
pub use jwt::{decode_jwt, encode_jwt, DecodedJwt};
pub use primitives::{
    bytes_to_hex, decode_base64, decode_base64_bytes, decode_base64url, decode_base64url_bytes,
    encode_base64, encode_base64url, hex_to_bytes, utf8_decode,
};
pub use url::{url_decode, url_encode};
