//! Emby login sessions
//!
//! A session is the result of one `authenticatebyname` call. It is what the
//! login cache memoizes per account.

use url::form_urlencoded;
use uuid::Uuid;

use crate::cache::ComputeCache;

/// Client name reported to Emby.
pub const CLIENT_NAME: &str = "Vod Converter";
/// Client version reported to Emby.
pub const CLIENT_VERSION: &str = "1.0.0";
/// UI language reported to Emby.
pub const CLIENT_LANGUAGE: &str = "zh-cn";

/// Login sessions keyed by the encoded account segment.
pub type SessionCache = ComputeCache<String, AuthSession>;

// == Client Identity ==
/// How the bridge identifies itself to Emby on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub device_name: String,
    pub device_id: String,
}

impl ClientIdentity {
    /// Identity for a new login: this host's name and a fresh device id.
    pub fn generate() -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string());

        Self {
            device_name: format!("{}-XA", host),
            device_id: Uuid::new_v4().to_string(),
        }
    }

    /// `X-Emby-*` client parameters, without a token.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("X-Emby-Client", CLIENT_NAME.to_string()),
            ("X-Emby-Device-Name", self.device_name.clone()),
            ("X-Emby-Device-Id", self.device_id.clone()),
            ("X-Emby-Client-Version", CLIENT_VERSION.to_string()),
            ("X-Emby-Language", CLIENT_LANGUAGE.to_string()),
        ]
    }
}

// == Auth Session ==
/// An authenticated Emby session.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub identity: ClientIdentity,
    pub access_token: String,
    /// Emby user whose library is browsed
    pub user_id: String,
}

impl AuthSession {
    /// Client parameters plus `X-Emby-Token`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.identity.query_pairs();
        pairs.push(("X-Emby-Token", self.access_token.clone()));
        pairs
    }

    /// The session parameters as an encoded query string, for URLs handed
    /// to catalog clients.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("identity", &self.identity)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AuthSession {
        AuthSession {
            identity: ClientIdentity {
                device_name: "box-XA".to_string(),
                device_id: "dev-1".to_string(),
            },
            access_token: "tok en".to_string(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_generate_identity() {
        let a = ClientIdentity::generate();
        let b = ClientIdentity::generate();

        assert!(a.device_name.ends_with("-XA"));
        assert_ne!(a.device_id, b.device_id);
        assert!(Uuid::parse_str(&a.device_id).is_ok());
    }

    #[test]
    fn test_query_string() {
        assert_eq!(
            session().query_string(),
            "X-Emby-Client=Vod+Converter&X-Emby-Device-Name=box-XA&X-Emby-Device-Id=dev-1\
             &X-Emby-Client-Version=1.0.0&X-Emby-Language=zh-cn&X-Emby-Token=tok+en"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", session());
        assert!(debug.contains("u1"));
        assert!(!debug.contains("tok en"));
    }
}
