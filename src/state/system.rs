use serde::{Deserialize, Serialize};

pub const STATUS_PREPARING: &str = "Preparing";
pub const STATUS_LOADING_MODEL: &str = "Loading Model";
pub const STATUS_CONVERTING_MODEL: &str = "Converting Model";
pub const STATUS_MERGING_MODELS: &str = "Merging Models";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    #[default]
    Info,
    Warning,
    Error,
}

/// One line of the application activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    #[serde(default)]
    pub level: ActivityLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InProgressImageType {
    None,
    FullRes,
    #[default]
    Latents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemState {
    pub is_processing: bool,
    pub is_connected: bool,
    pub is_cancelable: bool,
    pub current_status: String,
    pub current_status_has_steps: bool,
    pub current_step: u32,
    pub total_steps: u32,
    pub current_iteration: u32,
    pub total_iterations: u32,
    pub log: Vec<LogEntry>,
    pub should_display_in_progress_type: InProgressImageType,
    pub save_intermediates_interval: u32,
    pub enable_image_debugging: bool,
    pub is_esrgan_available: bool,
    pub is_gfpgan_available: bool,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            is_processing: false,
            is_connected: false,
            is_cancelable: true,
            current_status: "Disconnected".to_string(),
            current_status_has_steps: false,
            current_step: 0,
            total_steps: 0,
            current_iteration: 0,
            total_iterations: 0,
            log: Vec::new(),
            should_display_in_progress_type: InProgressImageType::Latents,
            save_intermediates_interval: 5,
            enable_image_debugging: false,
            is_esrgan_available: true,
            is_gfpgan_available: true,
        }
    }
}

impl SystemState {
    pub fn generation_requested(&mut self) {
        self.is_processing = true;
        self.is_cancelable = true;
        self.current_step = 0;
        self.total_steps = 0;
        self.current_iteration = 0;
        self.total_iterations = 0;
        self.current_status_has_steps = false;
        self.current_status = STATUS_PREPARING.to_string();
    }

    /// Model load, conversion and merge all block cancellation.
    pub fn model_job_requested(&mut self, status: &str) {
        self.current_status = status.to_string();
        self.is_cancelable = false;
        self.is_processing = true;
        self.current_status_has_steps = false;
    }

    pub fn add_log_entry(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_requested_resets_progress() {
        let mut system = SystemState {
            current_step: 12,
            total_steps: 50,
            current_status_has_steps: true,
            ..Default::default()
        };
        system.generation_requested();
        assert!(system.is_processing);
        assert!(system.is_cancelable);
        assert_eq!(system.current_step, 0);
        assert_eq!(system.total_steps, 0);
        assert!(!system.current_status_has_steps);
        assert_eq!(system.current_status, STATUS_PREPARING);
    }

    #[test]
    fn model_jobs_are_not_cancelable() {
        let mut system = SystemState::default();
        system.model_job_requested(STATUS_MERGING_MODELS);
        assert!(system.is_processing);
        assert!(!system.is_cancelable);
        assert_eq!(system.current_status, "Merging Models");
    }

    #[test]
    fn in_progress_type_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&InProgressImageType::FullRes).unwrap(),
            "\"full-res\""
        );
    }
}
