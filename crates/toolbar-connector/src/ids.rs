//! Interaction identifier generation

use chrono::Utc;

/// Generates `MCT_MEDIA_ITEM_ID` values for new interactions
///
/// The toolbar expects a long integer rendered as a string. Ids are taken
/// from the wall clock in milliseconds and bumped past the previous id when
/// the clock has not advanced, so every id handed out by one generator is
/// unique and strictly increasing.
#[derive(Debug, Default)]
pub struct CallIdGenerator {
    last: i64,
}

impl CallIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier
    pub fn next_id(&mut self) -> String {
        self.next_after(Utc::now().timestamp_millis()).to_string()
    }

    fn next_after(&mut self, now_millis: i64) -> i64 {
        let id = if now_millis > self.last {
            now_millis
        } else {
            self.last + 1
        };
        self.last = id;
        id
    }
}
