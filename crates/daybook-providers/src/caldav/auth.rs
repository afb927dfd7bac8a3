//! HTTP authentication for CalDAV requests.
//!
//! Implements the two schemes personal DAV servers actually deploy:
//! Basic (RFC 7617) and MD5 Digest with `qop=auth` (RFC 7616).

use base64::Engine;
use rand::Rng;
use std::collections::HashMap;

/// HTTP Digest authentication state, built from a server challenge.
#[derive(Debug, Clone)]
pub struct DigestAuth {
    /// The realm from the server challenge.
    pub realm: String,
    /// The nonce from the server challenge.
    pub nonce: String,
    /// The opaque value from the server challenge (optional).
    pub opaque: Option<String>,
    /// Whether the challenge offered `qop=auth`.
    pub qop_auth: bool,
    /// Client nonce counter.
    nc: u32,
}

impl DigestAuth {
    /// Parses a `WWW-Authenticate` header into digest state.
    ///
    /// Returns `None` unless the header is a Digest challenge carrying at
    /// least a realm and a nonce.
    pub fn parse(header: &str) -> Option<Self> {
        let content = header.strip_prefix("Digest ")?.trim();
        let params = parse_auth_params(content);

        Some(Self {
            realm: params.get("realm")?.to_string(),
            nonce: params.get("nonce")?.to_string(),
            opaque: params.get("opaque").map(|s| s.to_string()),
            qop_auth: params.get("qop").is_some_and(|q| q.contains("auth")),
            nc: 0,
        })
    }

    /// Generates an `Authorization` header value for one request.
    pub fn authorize(&mut self, method: &str, uri: &str, username: &str, password: &str) -> String {
        self.nc += 1;
        let nc = format!("{:08x}", self.nc);
        let cnonce = generate_cnonce();

        let ha1 = md5_hex(&format!("{}:{}:{}", username, self.realm, password));
        let ha2 = md5_hex(&format!("{}:{}", method, uri));

        let response = if self.qop_auth {
            md5_hex(&format!(
                "{}:{}:{}:{}:auth:{}",
                ha1, self.nonce, nc, cnonce, ha2
            ))
        } else {
            // RFC 2069 compatibility (no qop).
            md5_hex(&format!("{}:{}:{}", ha1, self.nonce, ha2))
        };

        let mut parts = vec![
            format!("username=\"{}\"", username),
            format!("realm=\"{}\"", self.realm),
            format!("nonce=\"{}\"", self.nonce),
            format!("uri=\"{}\"", uri),
            format!("response=\"{}\"", response),
            "algorithm=MD5".to_string(),
        ];

        if self.qop_auth {
            parts.push("qop=auth".to_string());
            parts.push(format!("nc={}", nc));
            parts.push(format!("cnonce=\"{}\"", cnonce));
        }

        if let Some(ref opaque) = self.opaque {
            parts.push(format!("opaque=\"{}\"", opaque));
        }

        format!("Digest {}", parts.join(", "))
    }
}

/// Generates a Basic authentication header value.
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    format!("Basic {}", encoded)
}

/// Parses `key=value` / `key="quoted value"` pairs from a challenge.
fn parse_auth_params(content: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let mut chars = content.chars().peekable();

    while chars.peek().is_some() {
        while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
            chars.next();
        }

        let key: String = chars
            .by_ref()
            .take_while(|c| *c != '=')
            .collect::<String>()
            .trim()
            .to_lowercase();
        if key.is_empty() {
            break;
        }

        let value = if chars.peek() == Some(&'"') {
            chars.next();
            let mut val = String::new();
            let mut escaped = false;
            for c in chars.by_ref() {
                if escaped {
                    val.push(c);
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    break;
                } else {
                    val.push(c);
                }
            }
            val
        } else {
            chars
                .by_ref()
                .take_while(|c| *c != ',' && !c.is_whitespace())
                .collect()
        };

        params.insert(key, value);
    }

    params
}

/// Generates a random client nonce.
fn generate_cnonce() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 8] = rng.random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Computes MD5 hash and returns hex string.
fn md5_hex(input: &str) -> String {
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)
}
