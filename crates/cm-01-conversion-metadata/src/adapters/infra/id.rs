use uuid::Uuid;

use crate::ports::outbound::IdGenerator;

/// Random (v4) UUID identifiers, hyphenated.
#[derive(Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
