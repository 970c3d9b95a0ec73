//! QR visit tracking

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{QrTracker, QrTrackerCreate, Visit};
use shared::util::now_millis;
use shared::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_required_text};

use crate::store::Store;

/// Request metadata recorded with each scan
#[derive(Debug, Clone, Default)]
pub struct VisitorInfo {
    pub user_agent: String,
    pub language: String,
}

/// Accept only absolute http(s) links as redirect targets
pub fn validate_outlink(outlink: &str) -> AppResult<&str> {
    let trimmed = outlink.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty() && !rest.starts_with('/'));
    if !has_scheme || !has_host || trimmed.chars().count() > MAX_URL_LEN {
        return Err(AppError::with_message(
            ErrorCode::InvalidOutlink,
            "Outlink must be an absolute http(s) URL",
        )
        .with_detail("outlink", trimmed));
    }
    Ok(trimmed)
}

#[derive(Clone, Debug)]
pub struct TrackerService {
    store: Store,
}

impl TrackerService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Count one scan; the tracker is created on its first scan
    pub fn record_visit(
        &self,
        tracker_id: &str,
        outlink: &str,
        visitor: &VisitorInfo,
    ) -> AppResult<QrTracker> {
        validate_required_text(tracker_id, "id", MAX_SHORT_TEXT_LEN)?;
        let visit = Visit {
            timestamp: now_millis(),
            user_agent: visitor.user_agent.clone(),
            language: visitor.language.clone(),
            outlink: outlink.to_string(),
        };
        let tracker = self.store.record_visit(tracker_id, &visit)?;
        tracing::debug!(
            tracker_id = %tracker_id,
            total_accesses = tracker.total_accesses,
            "QR visit recorded"
        );
        Ok(tracker)
    }

    /// Best-effort variant for the redirect path: failures are logged and
    /// reported as `false`
    pub fn log_visit(&self, tracker_id: &str, outlink: &str, visitor: &VisitorInfo) -> bool {
        match self.record_visit(tracker_id, outlink, visitor) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(tracker_id = %tracker_id, error = %e, "Failed to record QR visit");
                false
            }
        }
    }

    /// Admin create; an existing tracker with the same id is overwritten and
    /// its counter reset
    pub fn create(&self, payload: QrTrackerCreate) -> AppResult<QrTracker> {
        let id = payload.id.trim();
        let name = payload.name.trim();
        validate_required_text(id, "id", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        let tracker = QrTracker {
            id: id.to_string(),
            name: name.to_string(),
            total_accesses: 0,
            created_at: now_millis(),
            last_visit: None,
        };
        self.store.put(&tracker)?;
        tracing::info!(tracker_id = %tracker.id, "QR tracker created");
        Ok(tracker)
    }

    /// Newest first
    pub fn list(&self) -> AppResult<Vec<QrTracker>> {
        Ok(self.store.list::<QrTracker>()?)
    }

    pub fn get(&self, tracker_id: &str) -> AppResult<QrTracker> {
        self.store
            .get::<QrTracker>(tracker_id)?
            .ok_or_else(|| AppError::tracker_not_found(tracker_id))
    }

    /// Visits of an existing tracker, most recent first
    pub fn visits(&self, tracker_id: &str) -> AppResult<Vec<Visit>> {
        self.get(tracker_id)?;
        Ok(self.store.list_visits(tracker_id)?)
    }

    pub fn delete(&self, tracker_id: &str) -> AppResult<()> {
        self.store.delete_tracker(tracker_id)?;
        tracing::info!(tracker_id = %tracker_id, "QR tracker deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor() -> VisitorInfo {
        VisitorInfo {
            user_agent: "Mozilla/5.0".into(),
            language: "pt-BR".into(),
        }
    }

    #[test]
    fn test_two_scans_of_new_id() {
        let trackers = TrackerService::new(Store::open_in_memory().unwrap());
        assert!(trackers.log_visit("flyer", "https://matelli.com.br", &visitor()));
        assert!(trackers.log_visit("flyer", "https://matelli.com.br/menu", &visitor()));

        let tracker = trackers.get("flyer").unwrap();
        assert_eq!(tracker.total_accesses, 2);
        assert_eq!(tracker.name, "QR flyer");

        let visits = trackers.visits("flyer").unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].outlink, "https://matelli.com.br/menu");
        assert_eq!(visits[1].language, "pt-BR");
    }

    #[test]
    fn test_blank_id_is_not_recorded() {
        let trackers = TrackerService::new(Store::open_in_memory().unwrap());
        assert!(!trackers.log_visit("  ", "https://matelli.com.br", &visitor()));
        assert!(trackers.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_overwrites_and_resets_counter() {
        let trackers = TrackerService::new(Store::open_in_memory().unwrap());
        trackers.log_visit("box", "https://matelli.com.br", &visitor());

        let created = trackers
            .create(QrTrackerCreate {
                id: "box".into(),
                name: "Embalagem".into(),
            })
            .unwrap();
        assert_eq!(created.total_accesses, 0);
        assert_eq!(trackers.get("box").unwrap().name, "Embalagem");

        trackers.log_visit("box", "https://matelli.com.br", &visitor());
        assert_eq!(trackers.get("box").unwrap().total_accesses, 1);
    }

    #[test]
    fn test_delete_and_missing_tracker() {
        let trackers = TrackerService::new(Store::open_in_memory().unwrap());
        trackers.log_visit("x", "https://a.example", &visitor());
        trackers.delete("x").unwrap();

        assert_eq!(trackers.visits("x").unwrap_err().code, ErrorCode::TrackerNotFound);
        assert_eq!(trackers.delete("x").unwrap_err().code, ErrorCode::TrackerNotFound);
    }

    #[test]
    fn test_validate_outlink() {
        assert_eq!(validate_outlink(" https://wa.me/55 ").unwrap(), "https://wa.me/55");
        assert!(validate_outlink("http://example.com").is_ok());
        assert!(validate_outlink("javascript:alert(1)").is_err());
        assert!(validate_outlink("ftp://example.com").is_err());
        assert!(validate_outlink("https://").is_err());
        assert!(validate_outlink("example.com").is_err());
    }
}
