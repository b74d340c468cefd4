/// Date format accepted for goal due dates
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Upper bound of a progress percentage
pub const FULL_PROGRESS_PERCENTAGE: u8 = 100;
