use std::time::Duration;

use actix_web::{rt, web};
use chrono::Local;
use tracing::{debug, warn};

use crate::{session::Session, utils};

/// A background loop that runs until shut down
pub struct TimerHandle(rt::task::JoinHandle<()>);

impl TimerHandle {
    pub async fn shutdown(self) {
        self.0.abort();
        let _ = self.0.await;
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

/// Saves the whole roster every `period`, on top of the per-mutation writes
pub fn spawn_autosave(session: web::Data<Session>, period: Duration) -> TimerHandle {
    // interval panics on a zero period
    let period = period.max(Duration::from_millis(1));

    TimerHandle(rt::spawn(async move {
        let mut interval = rt::time::interval(period);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;

            match session.save_all().await {
                Ok(()) => debug!("autosave complete"),
                Err(error) => warn!(%error, "autosave failed"),
            }
        }
    }))
}

/// Moves the session's notion of today forward at every local midnight
pub fn spawn_midnight_refresh(session: web::Data<Session>) -> TimerHandle {
    TimerHandle(rt::spawn(async move {
        loop {
            let wait = utils::until_next_midnight(&Local::now());
            debug!(?wait, "next midnight refresh scheduled");

            rt::time::sleep(wait).await;
            session.refresh_today(Local::now().date_naive());
        }
    }))
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::{roster::Roster, store::DocumentStore};

    use super::*;

    fn session(writes: usize) -> web::Data<Session> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results((0..writes).map(|_| MockExecResult { last_insert_id: 0, rows_affected: 1 }))
            .into_connection();

        web::Data::new(Session::new(Roster::default(), DocumentStore::new(db), Local::now().date_naive()))
    }

    #[actix_web::test]
    async fn test_autosave_ticks() {
        // enough for exactly one snapshot
        let session = session(2);

        let timer = spawn_autosave(session.clone(), Duration::from_millis(10));
        rt::time::sleep(Duration::from_millis(100)).await;
        timer.shutdown().await;

        assert!(session.save_all().await.is_err());
    }

    #[actix_web::test]
    async fn test_shutdown() {
        let session = session(0);

        let autosave = spawn_autosave(session.clone(), Duration::from_secs(3600));
        let midnight = spawn_midnight_refresh(session.clone());
        assert!(!autosave.is_finished());
        assert!(!midnight.is_finished());

        autosave.shutdown().await;
        midnight.shutdown().await;
    }
}
