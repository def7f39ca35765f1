//! The response as handed over by the interception layer.

/// One intercepted response plus the request context it answers.
///
/// `body` must already be decompressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterceptedResponse {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl InterceptedResponse {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes every header called `name`; returns true if any was present.
    pub fn remove_header(&mut self, name: &str) -> bool {
        let before = self.headers.len();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.len() != before
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Request URL rebuilt from its parts; the port is omitted when it is the
    /// scheme's default.
    pub fn url(&self) -> String {
        let default_port = match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        match self.port {
            Some(p) if Some(p) != default_port => {
                format!("{}://{}:{}{}", self.scheme, self.host, p, self.path)
            }
            _ => format!("{}://{}{}", self.scheme, self.host, self.path),
        }
    }
}
