use crate::generator::context::{DEFAULT_TIMESPAN, EvaluationDefaults};

pub fn timespan() -> String {
  DEFAULT_TIMESPAN.to_string()
}

pub fn evaluation_frequency() -> u32 {
  EvaluationDefaults::default().frequency
}

pub fn evaluation_time_window() -> u32 {
  EvaluationDefaults::default().time_window
}

pub fn event_occurrences() -> u32 {
  EvaluationDefaults::default().event_occurrences
}
