//! Application state injected into every handler

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    clock: Box<dyn Clock>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, SystemClock)
    }

    pub fn with_clock(pool: PgPool, clock: impl Clock + 'static) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                clock: Box::new(clock),
            }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The reference instant for past/upcoming classification.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }
}
