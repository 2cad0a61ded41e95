//! Fakes and request helpers shared by the router-level tests.
#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use buques::{
    application::{
        repos::{RepoError, VesselsRepo},
        source::SourceFetcher,
        vessels::VesselService,
    },
    cache::{CacheConfig, CacheError, CacheGateway, CacheStore, MemoryStore},
    domain::{
        entities::{VesselEntry, VesselList},
        types::PortId,
    },
    infra::http::{HttpState, build_router},
};
use serde_json::Value;
use tower::ServiceExt;

pub fn vessel(name: &str, arrival: &str, departure: &str) -> VesselEntry {
    VesselEntry {
        arrival: arrival.to_string(),
        vessel: name.to_string(),
        kind: "Crucero".to_string(),
        length: 120.5,
        agent: "Agencia Sur".to_string(),
        departure: departure.to_string(),
        berth: "Muelle Comercial".to_string(),
        berth_image: "muelle_comercial.png".to_string(),
        berth_code: 4,
    }
}

pub fn sample_vessels() -> VesselList {
    vec![
        vessel("USHUAIA", "2024-05-01T08:00:00", ""),
        vessel("BEAGLE", "2024-05-01T09:30:00", "2024-05-02T18:00:00"),
    ]
}

enum Behaviour {
    Rows(VesselList),
    Fail(String),
    Decode(String),
}

/// Repository double that counts queries and can be slowed down to force
/// overlapping requests.
pub struct FakeRepo {
    behaviour: Behaviour,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeRepo {
    pub fn returning(rows: VesselList) -> Arc<Self> {
        Arc::new(Self {
            behaviour: Behaviour::Rows(rows),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn slow(rows: VesselList, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            behaviour: Behaviour::Rows(rows),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            behaviour: Behaviour::Fail(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Rows come back but cannot be mapped, e.g. an unexpected NULL.
    pub fn undecodable(message: &str) -> Arc<Self> {
        Arc::new(Self {
            behaviour: Behaviour::Decode(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VesselsRepo for FakeRepo {
    async fn current_vessels(&self, _port: PortId) -> Result<VesselList, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.behaviour {
            Behaviour::Rows(rows) => Ok(rows.clone()),
            Behaviour::Fail(message) => Err(RepoError::source_unavailable(message)),
            Behaviour::Decode(message) => Err(RepoError::row_decode(message)),
        }
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        match &self.behaviour {
            Behaviour::Rows(_) | Behaviour::Decode(_) => Ok(()),
            Behaviour::Fail(message) => Err(RepoError::source_unavailable(message)),
        }
    }
}

/// Cache store whose every operation fails, as if Redis were down.
pub struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }
}

pub fn service(
    repo: Arc<FakeRepo>,
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
) -> Arc<VesselService> {
    let gateway = CacheGateway::new(store, config.operation_timeout);
    let repo: Arc<dyn VesselsRepo> = repo;
    let source = SourceFetcher::new(repo, Duration::from_secs(5));
    Arc::new(VesselService::new(gateway, source, config, PortId::default()))
}

pub fn router(repo: Arc<FakeRepo>, store: Arc<dyn CacheStore>, config: CacheConfig) -> Router {
    build_router(HttpState {
        vessels: service(repo, store, config),
        expose_error_detail: true,
    })
}

pub fn router_withholding_detail(repo: Arc<FakeRepo>) -> Router {
    build_router(HttpState {
        vessels: service(repo, Arc::new(MemoryStore::new()), CacheConfig::default()),
        expose_error_detail: false,
    })
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, body.to_vec())
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(router, uri).await;
    let json = serde_json::from_slice(&body).expect("body should be JSON");
    (status, json)
}
