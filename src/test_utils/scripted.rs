use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::SalesDbError;
use crate::results::ResultSet;
use crate::session::{DatabaseSession, SessionProvider};
use crate::types::RowValues;

/// Everything a session was asked to do, in order, across all sessions of a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Acquire,
    Begin,
    Select { sql: String, params: Vec<RowValues> },
    Dml { sql: String, params: Vec<RowValues> },
    Commit,
    Rollback,
    Release,
}

#[derive(Default)]
struct Script {
    selects: HashMap<String, VecDeque<Result<ResultSet, String>>>,
    dmls: HashMap<String, VecDeque<Result<usize, String>>>,
    acquire_error: Option<String>,
    commit_error: Option<String>,
    events: Vec<SessionEvent>,
}

// The last scripted response for a statement repeats once the queue is drained.
fn next_response<T: Clone>(queue: Option<&mut VecDeque<T>>) -> Option<T> {
    let queue = queue?;
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

/// A `SessionProvider` whose statements answer from a script keyed by SQL text.
///
/// Unscripted selects return an empty result set and unscripted DML affects zero rows.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<Script>>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn on_select(&self, sql: &str, result: ResultSet) -> &Self {
        self.lock()
            .selects
            .entry(sql.to_string())
            .or_default()
            .push_back(Ok(result));
        self
    }

    pub fn fail_select(&self, sql: &str, message: &str) -> &Self {
        self.lock()
            .selects
            .entry(sql.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn on_dml(&self, sql: &str, rows_affected: usize) -> &Self {
        self.lock()
            .dmls
            .entry(sql.to_string())
            .or_default()
            .push_back(Ok(rows_affected));
        self
    }

    pub fn fail_dml(&self, sql: &str, message: &str) -> &Self {
        self.lock()
            .dmls
            .entry(sql.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn fail_acquire(&self, message: &str) -> &Self {
        self.lock().acquire_error = Some(message.to_string());
        self
    }

    pub fn fail_commit(&self, message: &str) -> &Self {
        self.lock().commit_error = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn events(&self) -> Vec<SessionEvent> {
        self.lock().events.clone()
    }

    /// SQL text of every executed statement, in order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Select { sql, .. } | SessionEvent::Dml { sql, .. } => {
                    Some(sql.clone())
                }
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn count(&self, wanted: &SessionEvent) -> usize {
        self.lock().events.iter().filter(|e| *e == wanted).count()
    }
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, SalesDbError> {
        let mut script = self.lock();
        if let Some(message) = &script.acquire_error {
            return Err(SalesDbError::PoolError(message.clone()));
        }
        script.events.push(SessionEvent::Acquire);
        Ok(Box::new(ScriptedSession {
            provider: self.clone(),
        }))
    }
}

struct ScriptedSession {
    provider: ScriptedProvider,
}

impl ScriptedSession {
    fn record(&self, event: SessionEvent) {
        self.provider.lock().events.push(event);
    }
}

#[async_trait]
impl DatabaseSession for ScriptedSession {
    async fn begin(&mut self) -> Result<(), SalesDbError> {
        self.record(SessionEvent::Begin);
        Ok(())
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SalesDbError> {
        let mut script = self.provider.lock();
        script.events.push(SessionEvent::Select {
            sql: query.to_string(),
            params: params.to_vec(),
        });
        match next_response(script.selects.get_mut(query)) {
            Some(Ok(rs)) => Ok(rs),
            Some(Err(message)) => Err(SalesDbError::ExecutionError(message)),
            None => Ok(ResultSet::default()),
        }
    }

    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, SalesDbError> {
        let mut script = self.provider.lock();
        script.events.push(SessionEvent::Dml {
            sql: query.to_string(),
            params: params.to_vec(),
        });
        match next_response(script.dmls.get_mut(query)) {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(SalesDbError::ExecutionError(message)),
            None => Ok(0),
        }
    }

    async fn commit(&mut self) -> Result<(), SalesDbError> {
        let mut script = self.provider.lock();
        script.events.push(SessionEvent::Commit);
        match &script.commit_error {
            Some(message) => Err(SalesDbError::ExecutionError(message.clone())),
            None => Ok(()),
        }
    }

    async fn rollback(&mut self) -> Result<(), SalesDbError> {
        self.record(SessionEvent::Rollback);
        Ok(())
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.record(SessionEvent::Release);
    }
}
