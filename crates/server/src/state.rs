use std::sync::Arc;

use axum::http::{header, HeaderMap};
use sea_orm::DatabaseConnection;

use service::auth::{repo::SeaOrmAuthRepository, AuthConfig, AuthService};
use service::guides::{repo::SeaOrmGuideRepository, GuideService};
use service::mail::{LogMailer, Mailer};
use service::media::{LocalMediaStore, MediaStore};

/// Shared handles every handler can reach.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub guides: Arc<GuideService<SeaOrmGuideRepository>>,
    pub media: Arc<dyn MediaStore>,
    pub mailer: Arc<dyn Mailer>,
    pub public_url: Option<String>,
    pub default_base_url: String,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &configs::AppConfig, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        let auth_cfg = AuthConfig::from_settings(&cfg.auth)?;
        let auth = AuthService::new(Arc::new(SeaOrmAuthRepository::new(db.clone())), auth_cfg)?;
        let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::from_settings(&cfg.media));
        let guides = GuideService::new(Arc::new(SeaOrmGuideRepository::new(db.clone())), Arc::clone(&media));
        Ok(Self {
            db,
            auth: Arc::new(auth),
            guides: Arc::new(guides),
            media,
            mailer,
            public_url: cfg.server.public_url.clone(),
            default_base_url: cfg.server.base_url(),
        })
    }

    /// State with the logging mailer configured in `[mail]`.
    pub fn from_config(db: DatabaseConnection, cfg: &configs::AppConfig) -> anyhow::Result<Self> {
        Self::new(db, cfg, Arc::new(LogMailer::new(cfg.mail.from.clone())))
    }

    /// Address used in outgoing links: configured public URL, else the request Host, else the bind address.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(url) = &self.public_url {
            return url.clone();
        }
        match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
            Some(host) if !host.is_empty() => format!("http://{}/", host),
            _ => self.default_base_url.clone(),
        }
    }
}
