use chrono::Utc;
use std::collections::HashSet;

/// Generates instance ids and field names for one form-build session
///
/// Ids combine the session's start time with a counter; field names are kept
/// unique across everything the generator has handed out or been told about.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: i64,
    count: u32,
    used_fields: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_seed(Utc::now().timestamp_millis())
    }

    pub fn from_seed(seed: i64) -> Self {
        Self {
            seed,
            count: 0,
            used_fields: HashSet::new(),
        }
    }

    /// Next instance id, e.g. `comp_1704067200000_3`
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("comp_{}_{}", self.seed, self.count)
    }

    /// Field name derived from `base`, or a generated `field_<millis>_<seq>`
    ///
    /// A base that is already taken gets a numeric suffix: `input`, `input_2`,
    /// `input_3`, ...
    pub fn field_name(&mut self, base: Option<&str>) -> String {
        let name = match base.filter(|b| !b.is_empty()) {
            Some(base) => {
                let mut candidate = base.to_string();
                let mut suffix = 1;
                while self.used_fields.contains(&candidate) {
                    suffix += 1;
                    candidate = format!("{}_{}", base, suffix);
                }
                candidate
            }
            None => loop {
                self.count += 1;
                let candidate = format!("field_{}_{}", self.seed, self.count);
                if !self.used_fields.contains(&candidate) {
                    break candidate;
                }
            },
        };

        self.used_fields.insert(name.clone());
        name
    }

    /// Mark a field name as taken, e.g. when loading an existing form
    pub fn reserve_field(&mut self, field: impl Into<String>) {
        self.used_fields.insert(field.into());
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
