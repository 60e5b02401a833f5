use once_cell::sync::Lazy;
use serde_json::Value;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    Id,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Id];

    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            _ => Self::En,
        }
    }

    fn folder(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Auth,
    Validation,
    User,
    Session,
    Ledger,
}

impl Namespace {
    const ALL: [Namespace; 5] = [
        Namespace::Auth,
        Namespace::Validation,
        Namespace::User,
        Namespace::Session,
        Namespace::Ledger,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Namespace::Auth => "auth",
            Namespace::Validation => "validation",
            Namespace::User => "user",
            Namespace::Session => "session",
            Namespace::Ledger => "ledger",
        }
    }
}

fn locales_dir() -> PathBuf {
    env::var("LOCALES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("locales"))
}

fn load_message_file(dir: &Path, lang: Lang, namespace: Namespace) -> Value {
    let file_path = dir
        .join(lang.folder())
        .join(format!("{}.json", namespace.as_str()));

    match fs::read_to_string(&file_path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(json) => {
                log::debug!("Loaded messages from {:?}", file_path);
                json
            }
            Err(err) => {
                log::error!("Failed to parse JSON from {:?}: {}", file_path, err);
                Value::Null
            }
        },
        Err(err) => {
            log::warn!("Failed to read file {:?}: {}", file_path, err);
            Value::Null
        }
    }
}

static CATALOGS: Lazy<HashMap<Lang, Arc<Messages>>> = Lazy::new(|| {
    let dir = locales_dir();
    Lang::ALL
        .into_iter()
        .map(|lang| (lang, Arc::new(Messages::load(&dir, lang))))
        .collect()
});

/// Localized message catalog for one language. Lookups fall back to the
/// caller's English default when a key is missing.
#[derive(Debug, Default)]
pub struct Messages {
    catalogs: HashMap<Namespace, Value>,
}

impl Messages {
    pub fn load(dir: &Path, lang: Lang) -> Self {
        Self {
            catalogs: Namespace::ALL
                .into_iter()
                .map(|namespace| (namespace, load_message_file(dir, lang, namespace)))
                .collect(),
        }
    }

    /// Shared, lazily loaded catalog.
    pub fn new(lang: Lang) -> Arc<Self> {
        CATALOGS
            .get(&lang)
            .cloned()
            .unwrap_or_else(|| Arc::new(Self::default()))
    }

    pub fn get(&self, namespace: &Namespace, path: &str) -> Option<&Value> {
        let mut current = self.catalogs.get(namespace)?;
        for key in path.split('.') {
            match current.get(key) {
                Some(next) => current = next,
                None => {
                    log::debug!(
                        "Key '{}' not found in path '{}.{}'",
                        key,
                        namespace.as_str(),
                        path
                    );
                    return None;
                }
            }
        }
        Some(current)
    }

    pub fn get_str(&self, namespace: Namespace, path: &str, fallback: &str) -> String {
        self.get(&namespace, path)
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn get_auth_message(&self, path: &str, fallback: &str) -> String {
        self.get_str(Namespace::Auth, path, fallback)
    }

    pub fn get_validation_message(&self, path: &str, fallback: &str) -> String {
        self.get_str(Namespace::Validation, path, fallback)
    }

    pub fn get_user_message(&self, path: &str, fallback: &str) -> String {
        self.get_str(Namespace::User, path, fallback)
    }

    pub fn get_session_message(&self, path: &str, fallback: &str) -> String {
        self.get_str(Namespace::Session, path, fallback)
    }

    pub fn get_ledger_message(&self, path: &str, fallback: &str) -> String {
        self.get_str(Namespace::Ledger, path, fallback)
    }
}

pub fn get_lang(req: &actix_web::HttpRequest) -> Lang {
    req.headers()
        .get("Accept-Language")
        .and_then(|value| value.to_str().ok())
        .and_then(|header| {
            header
                .split(',')
                .next()
                .and_then(|tag| tag.split('-').next())
        })
        .map(|code| Lang::from_code(code.trim()))
        .unwrap_or(Lang::En)
}

pub fn messages_for(req: &actix_web::HttpRequest) -> Arc<Messages> {
    Messages::new(get_lang(req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn resolves_language_from_header() {
        let req = TestRequest::default()
            .insert_header(("Accept-Language", "id-ID,id;q=0.9,en;q=0.8"))
            .to_http_request();
        assert_eq!(get_lang(&req), Lang::Id);

        let req = TestRequest::default().to_http_request();
        assert_eq!(get_lang(&req), Lang::En);
    }

    #[test]
    fn falls_back_when_key_is_missing() {
        let messages = Messages::new(Lang::En);
        assert_eq!(
            messages.get_auth_message("no.such.key", "Fallback"),
            "Fallback"
        );
        assert_eq!(
            messages.get_auth_message("login.success", "Login successful"),
            "Login successful"
        );
    }

    #[test]
    fn indonesian_catalog_is_loaded() {
        let messages = Messages::new(Lang::Id);
        assert_eq!(
            messages.get_auth_message("login.success", "Login successful"),
            "Berhasil masuk"
        );
    }
}
