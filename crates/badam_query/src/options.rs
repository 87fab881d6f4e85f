use bon::Builder;
use std::time::Duration;

#[derive(Debug, Clone, Builder)]
pub struct QueryOptions {
    #[builder(default = true)]
    pub enabled: bool,
    /// Polling period. `None` or zero disables polling.
    pub refetch_interval: Option<Duration>,
    /// Keep showing the last data while a refresh is in flight.
    #[builder(default = true)]
    pub keep_previous_data: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            refetch_interval: None,
            keep_previous_data: true,
        }
    }
}

impl QueryOptions {
    pub(crate) fn polling_period(&self) -> Option<Duration> {
        self.refetch_interval.filter(|period| !period.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = QueryOptions::builder().build();
        let default = QueryOptions::default();

        assert_eq!(built.enabled, default.enabled);
        assert_eq!(built.keep_previous_data, default.keep_previous_data);
        assert_eq!(built.refetch_interval, None);
    }

    #[test]
    fn zero_interval_disables_polling() {
        let options = QueryOptions::builder()
            .refetch_interval(Duration::ZERO)
            .build();
        assert_eq!(options.polling_period(), None);

        let options = QueryOptions::builder()
            .refetch_interval(Duration::from_secs(10))
            .build();
        assert_eq!(options.polling_period(), Some(Duration::from_secs(10)));
    }
}
