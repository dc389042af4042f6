// src/services/scope_service.rs

use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::common::error::AppError;

/// What a request carries to point at its event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRequest {
    pub code: Option<String>,
    pub id: Option<i64>,
}

impl ScopeRequest {
    pub fn by_code(code: impl Into<String>) -> Self {
        Self { code: Some(code.into()), id: None }
    }

    pub fn by_id(id: i64) -> Self {
        Self { code: None, id: Some(id) }
    }
}

/// What to do when a request names no event at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvePolicy {
    /// Latest event, or the default one created on first use.
    #[default]
    Permissive,
    /// Reject with NotFound.
    Strict,
}

impl FromStr for ResolvePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(ResolvePolicy::Permissive),
            "strict" => Ok(ResolvePolicy::Strict),
            other => anyhow::bail!("unknown event scope policy '{other}' (expected permissive|strict)"),
        }
    }
}

/// Event storage as seen by the resolver. Implemented by the meeting and the
/// tradeshow repositories.
#[async_trait]
pub trait EventDirectory: Send + Sync {
    type Event: Send;

    /// Label used in NotFound errors.
    const RESOURCE: &'static str;

    /// Single atomic statement; concurrent callers with the same new code get the same row.
    async fn get_or_create_by_code(&self, code: &str, title: &str) -> Result<Self::Event, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Self::Event>, AppError>;

    async fn find_latest(&self) -> Result<Option<Self::Event>, AppError>;
}

#[derive(Debug, Clone)]
pub struct ScopeResolver {
    policy: ResolvePolicy,
    default_code: String,
    default_title: String,
}

impl ScopeResolver {
    pub fn new(policy: ResolvePolicy, default_code: impl Into<String>, default_title: impl Into<String>) -> Self {
        Self {
            policy,
            default_code: default_code.into(),
            default_title: default_title.into(),
        }
    }

    pub fn strict() -> Self {
        Self::new(ResolvePolicy::Strict, "QUICK-START", "Quick Start")
    }

    #[tracing::instrument(skip(self, directory), fields(resource = D::RESOURCE))]
    pub async fn resolve<D: EventDirectory>(
        &self,
        directory: &D,
        request: &ScopeRequest,
    ) -> Result<D::Event, AppError> {
        if let Some(code) = request.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            return directory.get_or_create_by_code(code, code).await;
        }

        if let Some(id) = request.id {
            return directory
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found(D::RESOURCE, id));
        }

        match self.policy {
            ResolvePolicy::Strict => Err(AppError::NotFound {
                resource: D::RESOURCE,
                key: "none given".to_string(),
            }),
            ResolvePolicy::Permissive => match directory.find_latest().await? {
                Some(event) => Ok(event),
                None => {
                    tracing::info!(code = %self.default_code, "no events yet, creating the default one");
                    directory
                        .get_or_create_by_code(&self.default_code, &self.default_title)
                        .await
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct FakeEvent {
        id: i64,
        code: String,
    }

    #[derive(Default)]
    struct FakeDirectory {
        events: Mutex<Vec<FakeEvent>>,
    }

    #[async_trait]
    impl EventDirectory for FakeDirectory {
        type Event = FakeEvent;
        const RESOURCE: &'static str = "event";

        async fn get_or_create_by_code(&self, code: &str, _title: &str) -> Result<FakeEvent, AppError> {
            let mut events = self.events.lock().unwrap();
            if let Some(found) = events.iter().find(|e| e.code == code) {
                return Ok(found.clone());
            }
            let event = FakeEvent { id: events.len() as i64 + 1, code: code.to_string() };
            events.push(event.clone());
            Ok(event)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<FakeEvent>, AppError> {
            Ok(self.events.lock().unwrap().iter().find(|e| e.id == id).cloned())
        }

        async fn find_latest(&self) -> Result<Option<FakeEvent>, AppError> {
            Ok(self.events.lock().unwrap().last().cloned())
        }
    }

    fn permissive() -> ScopeResolver {
        ScopeResolver::new(ResolvePolicy::Permissive, "QUICK-START", "Quick Start")
    }

    #[tokio::test]
    async fn code_wins_over_id_and_is_created_once() {
        let dir = FakeDirectory::default();
        let request = ScopeRequest { code: Some("C-1".into()), id: Some(99) };

        let first = permissive().resolve(&dir, &request).await.unwrap();
        let second = permissive().resolve(&dir, &request).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(dir.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_code_falls_through_to_id() {
        let dir = FakeDirectory::default();
        let created = permissive().resolve(&dir, &ScopeRequest::by_code("C-1")).await.unwrap();

        let request = ScopeRequest { code: Some("  ".into()), id: Some(created.id) };
        let found = permissive().resolve(&dir, &request).await.unwrap();

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let dir = FakeDirectory::default();
        let err = permissive().resolve(&dir, &ScopeRequest::by_id(5)).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { resource: "event", .. }));
    }

    #[tokio::test]
    async fn permissive_fallback_creates_default_then_reuses_latest() {
        let dir = FakeDirectory::default();

        let first = permissive().resolve(&dir, &ScopeRequest::default()).await.unwrap();
        assert_eq!(first.code, "QUICK-START");

        let other = permissive().resolve(&dir, &ScopeRequest::by_code("C-2")).await.unwrap();
        let latest = permissive().resolve(&dir, &ScopeRequest::default()).await.unwrap();
        assert_eq!(latest, other);
    }

    #[tokio::test]
    async fn strict_policy_rejects_unscoped_requests() {
        let dir = FakeDirectory::default();
        let err = ScopeResolver::strict().resolve(&dir, &ScopeRequest::default()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(dir.events.lock().unwrap().is_empty());
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Strict".parse::<ResolvePolicy>().unwrap(), ResolvePolicy::Strict);
        assert_eq!(" permissive ".parse::<ResolvePolicy>().unwrap(), ResolvePolicy::Permissive);
        assert!("lenient".parse::<ResolvePolicy>().is_err());
    }
}
