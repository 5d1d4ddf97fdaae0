use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use certgen_logging::{certgen_debug, certgen_info, certgen_trace, certgen_warn};

use crate::{
    CertificateService, EngineEvent, EventSink, FailureKind, ScheduledTask, Scheduler,
    ServiceError,
};

/// Repeatedly reads the service status and forwards it as
/// [`EngineEvent::StatusUpdated`].
///
/// Runs until its task (or the whole scheduler) is cancelled; it does not
/// care whether a submission is in flight. Failed ticks are logged and the
/// next tick proceeds as usual. A tick that has no answer after one period is
/// abandoned, so at most about one status call is outstanding.
pub struct StatusPoller;

impl StatusPoller {
    pub fn start(
        scheduler: &Scheduler,
        service: Arc<dyn CertificateService>,
        period: Duration,
        sink: Arc<dyn EventSink>,
    ) -> ScheduledTask {
        certgen_info!("Status poller started, period {:?}", period);
        let failing = Arc::new(AtomicBool::new(false));
        scheduler.every(period, move || {
            let service = service.clone();
            let sink = sink.clone();
            let failing = failing.clone();
            async move {
                Self::poll_once(service.as_ref(), sink.as_ref(), &failing, period).await;
            }
        })
    }

    /// One tick, given up after `timeout`. `failing` keeps a streak of errors
    /// to a single warning.
    pub async fn poll_once(
        service: &dyn CertificateService,
        sink: &dyn EventSink,
        failing: &AtomicBool,
        timeout: Duration,
    ) {
        let reply = tokio::time::timeout(timeout, service.status())
            .await
            .unwrap_or_else(|_| {
                Err(ServiceError::new(
                    FailureKind::Timeout,
                    format!("no status within {timeout:?}"),
                ))
            });
        match reply {
            Ok(message) => {
                if failing.swap(false, Ordering::Relaxed) {
                    certgen_info!("Status endpoint reachable again");
                }
                certgen_trace!("Status: {}", message);
                sink.emit(EngineEvent::StatusUpdated(message));
            }
            Err(err) => {
                if failing.swap(true, Ordering::Relaxed) {
                    certgen_debug!("Error fetching status: {}", err);
                } else {
                    certgen_warn!("Error fetching status: {}", err);
                }
            }
        }
    }
}
