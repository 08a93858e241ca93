//! Session state: the entity store plus everything a mutation needs
//! (clock, id source, toast queue, activity feed, settings).
//!
//! A session is created when the dashboard opens and dropped when it closes.
//! Nothing outlives it except the settings file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::activity::{ActivityEvent, ActivityLog, MAX_ACTIVITY_SIZE};
use crate::error::{Notice, PipelineError, ValidationError};
use crate::store::{Clock, EntityStore, IdGenerator, SystemClock, TimestampIds};
use crate::types::Config;
use crate::util::iso_timestamp;

pub struct Session {
    pub store: EntityStore,
    pub config: Config,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    notices: Vec<Notice>,
    activity: Vec<ActivityLog>,
    activity_seq: u64,
}

impl Session {
    pub fn new(store: EntityStore) -> Self {
        Self {
            store,
            config: Config::default(),
            clock: Box::new(SystemClock),
            ids: Box::new(TimestampIds),
            notices: Vec::new(),
            activity: Vec::new(),
            activity_seq: 0,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Current time as an ISO-8601 timestamp.
    pub fn now_iso(&self) -> String {
        iso_timestamp(self.clock.now())
    }

    /// Today's date (`YYYY-MM-DD`) for task buckets.
    pub fn today(&self) -> String {
        self.clock.today()
    }

    /// Id for a new record. Timestamp ids can repeat within a millisecond;
    /// a repeat is logged, not corrected.
    pub(crate) fn next_id(&mut self) -> String {
        let id = self.ids.next_id(self.clock.now());
        if self.store.contains_id(&id) {
            log::warn!("Generated id {} is already in use", id);
        }
        id
    }

    // =========================================================================
    // Toasts
    // =========================================================================

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand pending toasts to the view layer.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Queue the validation message as an error toast and return it as an error.
    pub(crate) fn reject(&mut self, err: ValidationError) -> PipelineError {
        log::debug!("Form rejected: {}", err);
        self.notify(Notice::error(err.to_string()));
        PipelineError::Validation(err)
    }

    // =========================================================================
    // Activity feed
    // =========================================================================

    pub(crate) fn record(&mut self, event: ActivityEvent) {
        self.activity_seq += 1;
        let entry = event.into_log(format!("act-{}", self.activity_seq), self.now_iso());
        self.activity.insert(0, entry);
        if self.activity.len() > MAX_ACTIVITY_SIZE {
            self.activity.truncate(MAX_ACTIVITY_SIZE);
        }
    }

    /// Activity entries, newest first.
    pub fn activity(&self) -> &[ActivityLog] {
        &self.activity
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Apply a settings change, write it to `path`, and keep it in memory.
    pub fn update_config(
        &mut self,
        path: &Path,
        mutator: impl FnOnce(&mut Config),
    ) -> Result<Config, PipelineError> {
        let mut config = self.config.clone();
        mutator(&mut config);
        save_config_to(path, &config)?;
        self.config = config.clone();
        self.notify(Notice::success("Settings saved successfully"));
        Ok(config)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EntityStore::default())
    }
}

/// Get the canonical config file path (~/.crmdesk/config.json)
pub fn config_path() -> Result<PathBuf, PipelineError> {
    let home = dirs::home_dir()
        .ok_or_else(|| PipelineError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".crmdesk").join("config.json"))
}

/// Load configuration from ~/.crmdesk/config.json, or defaults if absent.
pub fn load_config() -> Result<Config, PipelineError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, PipelineError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| PipelineError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

pub fn save_config(config: &Config) -> Result<(), PipelineError> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &Config) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
