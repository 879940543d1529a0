// Sweep options
//
// Tunables shared by every strategy. Strategy-specific inputs (threshold,
// level) live on `Strategy` itself.

use crate::defaults;
use crate::error::SearchError;

#[derive(Debug, Clone)]
pub struct SearchOpt {
    pub progress_interval: u32, // Log progress whenever seed % progress_interval == 0
    pub batch_size: usize,      // Seeds evaluated per parallel batch
    pub n_threads: usize,       // Size of the rayon pool the sweep runs on
}

impl Default for SearchOpt {
    fn default() -> Self {
        Self {
            progress_interval: defaults::PROGRESS_INTERVAL,
            batch_size: defaults::BATCH_SIZE,
            n_threads: num_cpus::get(),
        }
    }
}

impl SearchOpt {
    pub fn with_progress_interval(mut self, interval: u32) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.progress_interval == 0 {
            return Err(SearchError::InvalidOption(
                "progress interval must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(SearchError::InvalidOption(
                "batch size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a progress interval the way the CLI receives it.
    pub fn parse_interval(s: &str) -> Result<u32, String> {
        match s.trim().parse::<u32>() {
            Ok(0) => Err("Progress interval must be at least 1".to_string()),
            Ok(v) => Ok(v),
            Err(_) => Err(format!("Invalid progress interval: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opt = SearchOpt::default();
        assert_eq!(opt.progress_interval, 1000);
        assert_eq!(opt.batch_size, defaults::BATCH_SIZE);
        assert!(opt.n_threads >= 1);
        assert!(opt.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(SearchOpt::default().with_progress_interval(0).validate().is_err());
        assert!(SearchOpt::default().with_batch_size(0).validate().is_err());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(SearchOpt::parse_interval("250"), Ok(250));
        assert!(SearchOpt::parse_interval("0").is_err());
        assert!(SearchOpt::parse_interval("-5").is_err());
        assert!(SearchOpt::parse_interval("abc").is_err());
    }
}
