use chrono::Utc;

/// Source of "now" for everything that computes reminder times or decides
/// whether an event has passed. All values are UTC epoch millis.
pub trait ISys: Send + Sync {
    fn get_timestamp_millis(&self) -> i64;
}

/// Reads the wall clock
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Frozen clock for tests
pub struct FixedSys(pub i64);
impl ISys for FixedSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0
    }
}
